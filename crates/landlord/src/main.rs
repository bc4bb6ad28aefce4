use std::process::ExitCode;

use landlord::prelude::*;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    // Panics inside connection tasks would otherwise only reach stderr.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env locally; fine when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "bad configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        bind_addr = %config.bind_addr,
        max_players = config.room.max_players,
        forfeit_on_disconnect = config.room.forfeit_on_disconnect,
        "starting"
    );

    let server = match LandlordServer::builder().config(config).build().await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
