mod config;
mod error;
mod models;
mod report;
mod scraping;

use config::Settings;
use dotenv::dotenv;
use models::concern::Concern;
use report::Reporter;
use scraping::browser::WebDriverSession;
use scraping::scraper::TerminScraper;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    dotenv().ok();

    let settings = Settings::from_env()?;
    info!("scraping {} for open appointments", settings.booking_url);

    let browser = WebDriverSession::launch(&settings).await?;
    let mut reporter = Reporter::new(settings.output, std::io::stdout());
    let scraper = TerminScraper::new(settings, Concern::ANMELDUNG);

    scraper.run(browser, &mut reporter).await?;
    Ok(())
}
