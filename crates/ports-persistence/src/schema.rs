// Esquema Diesel de la tabla `ports`.
// Las secuencias (alias, regions, unlocs) se guardan como texto JSON.
diesel::table! {
    ports (unloc) {
        unloc -> Text,
        name -> Text,
        city -> Text,
        country -> Text,
        alias -> Text,
        regions -> Text,
        longitude -> Nullable<Double>,
        latitude -> Nullable<Double>,
        province -> Nullable<Text>,
        timezone -> Nullable<Text>,
        unlocs -> Text,
        code -> Nullable<Text>,
    }
}
