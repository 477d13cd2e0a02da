use tinywiki::logger::Logger;
use tinywiki::{server, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialise logger: {}", e);
    }

    let config = Config::from_env();
    log::debug!("Starting with {:?}", config);
    server::run(config).await
}
