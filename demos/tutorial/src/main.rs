use routebind_rs::{load_dotenv, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    let config = ServerConfig::from_env()?;

    tracing::info!("Starting tutorial app on http://{}", config);
    tutorial::app()?.serve(&config).await
}
