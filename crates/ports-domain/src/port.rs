// port.rs
use crate::errors::{FieldViolation, Rule, ValidationError};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Longitud exacta de un UN/LOCODE.
pub const UNLOC_LEN: usize = 5;

/// Par ordenado (longitud, latitud).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
  pub fn longitude(&self) -> f64 {
    self.0
  }

  pub fn latitude(&self) -> f64 {
    self.1
  }
}

/// Puerto identificado por su UN/LOCODE.
///
/// El identificador (`unloc`) lo aporta siempre la clave del objeto externo
/// del documento JSON; cualquier `unloc` del objeto anidado se sobrescribe con
/// `with_unloc`. Los campos son privados: un `Port` validado no se modifica,
/// sólo se derivan copias con los métodos `with_*`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Port {
  unloc: String,
  #[serde(deserialize_with = "null_as_default")]
  name: String,
  #[serde(deserialize_with = "null_as_default")]
  city: String,
  #[serde(deserialize_with = "null_as_default")]
  country: String,
  #[serde(deserialize_with = "null_as_default")]
  alias: Vec<String>,
  #[serde(deserialize_with = "null_as_default")]
  regions: Vec<String>,
  // Tal cual llega: la aridad la comprueba `validate`, no el decodificador.
  #[serde(deserialize_with = "null_as_default")]
  coordinates: Vec<f64>,
  province: Option<String>,
  timezone: Option<String>,
  #[serde(deserialize_with = "null_as_default")]
  unlocs: Vec<String>,
  code: Option<String>,
}

impl Port {
  pub fn new(unloc: impl Into<String>,
             name: impl Into<String>,
             city: impl Into<String>,
             country: impl Into<String>)
             -> Self {
    Self { unloc: unloc.into(), name: name.into(), city: city.into(), country: country.into(), ..Default::default() }
  }

  /// Reemplaza el identificador. La clave externa del documento manda.
  pub fn with_unloc(mut self, unloc: impl Into<String>) -> Self {
    self.unloc = unloc.into();
    self
  }

  pub fn with_alias<I, S>(mut self, alias: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.alias = alias.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.regions = regions.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_coordinates(mut self, longitude: f64, latitude: f64) -> Self {
    self.coordinates = vec![longitude, latitude];
    self
  }

  pub fn with_province(mut self, province: impl Into<String>) -> Self {
    self.province = Some(province.into());
    self
  }

  pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
    self.timezone = Some(timezone.into());
    self
  }

  pub fn with_unlocs<I, S>(mut self, unlocs: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String>
  {
    self.unlocs = unlocs.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_code(mut self, code: impl Into<String>) -> Self {
    self.code = Some(code.into());
    self
  }

  pub fn unloc(&self) -> &str {
    &self.unloc
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn city(&self) -> &str {
    &self.city
  }

  pub fn country(&self) -> &str {
    &self.country
  }

  pub fn alias(&self) -> &[String] {
    &self.alias
  }

  pub fn regions(&self) -> &[String] {
    &self.regions
  }

  /// Par (longitud, latitud); `None` si no vino o si la aridad no es 2.
  pub fn coordinates(&self) -> Option<Coordinates> {
    match self.coordinates.as_slice() {
      [lon, lat] => Some(Coordinates(*lon, *lat)),
      _ => None,
    }
  }

  pub fn province(&self) -> Option<&str> {
    self.province.as_deref()
  }

  pub fn timezone(&self) -> Option<&str> {
    self.timezone.as_deref()
  }

  /// UN/LOCODEs alternativos del puerto.
  pub fn unlocs(&self) -> &[String] {
    &self.unlocs
  }

  pub fn code(&self) -> Option<&str> {
    self.code.as_deref()
  }

  /// Valida el puerto y devuelve todas las violaciones encontradas.
  ///
  /// Reglas, en este orden:
  /// 1. `unloc` tiene exactamente 5 caracteres.
  /// 2. `name`, `city` y `country` no están vacíos.
  /// 3. `coordinates`, si viene, tiene exactamente 2 valores.
  /// 4. cada entrada de `unlocs` tiene exactamente 5 caracteres.
  pub fn validate(&self) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    check_len(&mut violations, "unloc", &self.unloc);
    for (field, value) in [("name", &self.name), ("city", &self.city), ("country", &self.country)] {
      if value.is_empty() {
        violations.push(FieldViolation { field: field.to_string(), rule: Rule::Required });
      }
    }
    if !self.coordinates.is_empty() && self.coordinates.len() != 2 {
      violations.push(FieldViolation { field: "coordinates".to_string(),
                                       rule: Rule::Arity { expected: 2, actual: self.coordinates.len() } });
    }
    for (i, alt) in self.unlocs.iter().enumerate() {
      check_len(&mut violations, &format!("unlocs[{}]", i), alt);
    }
    if violations.is_empty() {
      Ok(())
    } else {
      Err(ValidationError { unloc: self.unloc.clone(), violations })
    }
  }
}

fn check_len(violations: &mut Vec<FieldViolation>, field: &str, value: &str) {
  let actual = value.chars().count();
  if actual != UNLOC_LEN {
    violations.push(FieldViolation { field: field.to_string(), rule: Rule::Length { expected: UNLOC_LEN, actual } });
  }
}

impl fmt::Display for Port {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Port({}: {}, {}, {})", self.unloc, self.name, self.city, self.country)
  }
}

// `null` cuenta como ausente; así la validación, y no el decodificador, decide
// si el campo es aceptable.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
  where D: Deserializer<'de>,
        T: Default + Deserialize<'de>
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}


#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn jebel_ali() -> Port {
    Port::new("AEJEA", "Jebel Ali", "Dubai", "United Arab Emirates")
  }

  #[test]
  fn valid_port_passes() {
    assert!(jebel_ali().validate().is_ok());
    let full = jebel_ali().with_alias(["Mina Jebel Ali"])
                          .with_coordinates(55.0272904, 24.9857145)
                          .with_unlocs(["AEJEA", "AEDXB"])
                          .with_code("52051");
    assert!(full.validate().is_ok());
  }

  #[test]
  fn each_rule_names_its_field() {
    let cases = [(Port::new("AEJEA", "", "Dubai", "UAE"), "name"),
                 (Port::new("AEJEA", "Jebel Ali", "", "UAE"), "city"),
                 (Port::new("AEJEA", "Jebel Ali", "Dubai", ""), "country"),
                 (Port::new("AEJE", "Jebel Ali", "Dubai", "UAE"), "unloc"),
                 (jebel_ali().with_unlocs(["AEJEA", "XX"]), "unlocs[1]")];
    for (port, field) in cases {
      let err = port.validate().expect_err(field);
      assert_eq!(err.fields().collect::<Vec<_>>(), vec![field]);
      assert!(err.to_string().contains(field), "{}", err);
    }
  }

  #[test]
  fn all_violations_are_collected_in_order() {
    let err = Port::new("BAD1", "X", "", "").validate().unwrap_err();
    assert_eq!(err.unloc, "BAD1");
    assert_eq!(err.fields().collect::<Vec<_>>(), vec!["unloc", "city", "country"]);
    assert_eq!(err.violations[0].rule, Rule::Length { expected: 5, actual: 4 });
  }

  #[test]
  fn unloc_length_counts_characters_not_bytes() {
    assert!(Port::new("ÅÄÖÜÉ", "n", "c", "k").validate().is_ok());
  }

  #[test]
  fn decodes_the_published_shape() {
    let port: Port = serde_json::from_value(json!({
      "name": "Jebel Ali",
      "city": "Jebel Ali",
      "country": "United Arab Emirates",
      "alias": [],
      "regions": [],
      "coordinates": [55.0272904, 24.9857145],
      "province": "Dubai",
      "timezone": "Asia/Dubai",
      "unlocs": ["AEJEA"],
      "code": "52051",
      "unknown": {"ignored": true}
    })).unwrap();
    assert_eq!(port.unloc(), "");
    assert_eq!(port.coordinates().map(|c| c.latitude()), Some(24.9857145));
    assert_eq!(port.province(), Some("Dubai"));
    assert_eq!(port.unlocs(), ["AEJEA"]);
  }

  #[test]
  fn nulls_and_empty_coordinates_decode_as_absent() {
    let port: Port = serde_json::from_value(json!({
      "name": null,
      "alias": null,
      "coordinates": []
    })).unwrap();
    assert_eq!(port.name(), "");
    assert!(port.alias().is_empty());
    assert_eq!(port.coordinates(), None);
    assert!(port.validate().unwrap_err().has_field("name"));
  }

  #[test]
  fn coordinates_with_wrong_arity_fail_validation_not_decoding() {
    let port: Port = serde_json::from_value(json!({
      "name": "Jebel Ali", "city": "Dubai", "country": "UAE", "coordinates": [1.0, 2.0, 3.0]
    })).unwrap();
    let port = port.with_unloc("AEJEA");
    assert_eq!(port.coordinates(), None);
    let err = port.validate().unwrap_err();
    assert_eq!(err.fields().collect::<Vec<_>>(), vec!["coordinates"]);
    assert_eq!(err.violations[0].rule, Rule::Arity { expected: 2, actual: 3 });
  }
}
