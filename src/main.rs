use letsquiz::app::App;
use letsquiz::config::AppConfig;
use letsquiz::util::logging;
use letsquiz::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init(&config)?;
    tracing::info!(backend = %config.backend_url, "Application started");

    let mut app = App::new(config)?;
    if let Err(err) = app.init() {
        app.shutdown();
        return Err(err);
    }
    let result = app.run().await;

    tracing::info!(screen = ?app.session().screen_kind(), "Application ended");
    if let Err(err) = &result {
        tracing::error!(error = %err, "Application failed");
    }
    result
}
