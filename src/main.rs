use log::{error, info, warn};
use ports_loader::CancellationToken;
use ports_service::{open_repository, run_import, AppConfig};
use std::error::Error;

/// Importa el fichero de `PORTS_JSON_PATH` en el almacenamiento configurado.
///
/// SIGINT/SIGTERM piden una parada ordenada: el registro en curso termina y
/// se informa de lo importado hasta ese momento.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let repo = open_repository(&config)?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        let received = shutdown_signal().await;
        warn!("{} recibida, cancelando la importación", received);
        signal_token.cancel();
    });

    let import = tokio::task::spawn_blocking(move || run_import(&config, repo, &cancel));
    match import.await? {
        Ok(report) => {
            if report.summary.cancelled {
                info!("importación interrumpida: {:?}", report.summary);
            }
            println!("Ports imported: {}", report.stored);
            Ok(())
        }
        Err(e) => {
            error!("la importación falló: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            warn!("no se pudieron instalar los manejadores de señales: {}", e);
            return std::future::pending().await;
        }
    };
    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("no se pudo instalar el manejador de Ctrl+C: {}", e);
        return std::future::pending().await;
    }
    "Ctrl+C"
}
