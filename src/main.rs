use log::*;
use service::{auth, config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting up natssse_gateway ({} backbone, {} environment)",
        config.backbone, config.runtime_env
    );

    let backbone = match service::init_backbone(&config).await {
        Ok(backbone) => backbone,
        Err(e) => {
            error!("Failed to connect to the backbone: {e}");
            std::process::exit(1);
        }
    };

    let authorizer = auth::authorizer_from_config(&config);
    let app_state = service::AppState::new(config, backbone, authorizer);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
