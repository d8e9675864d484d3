use strata_core::logging_facility;
use strata_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    logging_facility::init(config.logging.profile);

    strata_server::run(config).await
}
