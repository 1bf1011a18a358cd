use std::time::Duration;

use url::Url;

use crate::error::{ScrapeError, ScrapeResult};
use crate::report::OutputFormat;
use crate::scraping::constants::{BASE_URL, WAIT_TIMEOUT_SECS, WEBDRIVER_URL};

const MAX_PERSONS: u8 = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub webdriver_url: Url,
    pub booking_url: Url,
    pub headless: bool,
    pub wait_timeout: Duration,
    pub persons: u8,
    pub output: OutputFormat,
}

impl Settings {
    /// Reads settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> ScrapeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ScrapeResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webdriver_url = parse_url("WEBDRIVER_URL", var("WEBDRIVER_URL").as_deref(), WEBDRIVER_URL)?;
        let booking_url = parse_url("BOOKING_URL", var("BOOKING_URL").as_deref(), BASE_URL)?;

        let headless = match var("HEADLESS") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ScrapeError::Config(format!("HEADLESS must be a boolean, got {raw:?}")))?,
            None => true,
        };

        let timeout_secs = match var("WAIT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ScrapeError::Config(format!("WAIT_TIMEOUT_SECS must be a positive integer, got {raw:?}"))
                })?,
            None => WAIT_TIMEOUT_SECS,
        };

        let persons = match var("PERSONS") {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=MAX_PERSONS).contains(n))
                .ok_or_else(|| {
                    ScrapeError::Config(format!("PERSONS must be between 1 and {MAX_PERSONS}, got {raw:?}"))
                })?,
            None => 1,
        };

        let output = match var("OUTPUT_FORMAT") {
            Some(raw) => raw.parse::<OutputFormat>()?,
            None => OutputFormat::Text,
        };

        Ok(Settings {
            webdriver_url,
            booking_url,
            headless,
            wait_timeout: Duration::from_secs(timeout_secs),
            persons,
            output,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            webdriver_url: Url::parse(WEBDRIVER_URL).expect("default WebDriver URL is valid"),
            booking_url: Url::parse(BASE_URL).expect("default booking URL is valid"),
            headless: true,
            wait_timeout: Duration::from_secs(WAIT_TIMEOUT_SECS),
            persons: 1,
            output: OutputFormat::Text,
        }
    }
}

fn parse_url(key: &str, raw: Option<&str>, default: &str) -> ScrapeResult<Url> {
    let raw = raw.unwrap_or(default).trim();
    Url::parse(raw).map_err(|e| ScrapeError::Config(format!("{key} is not a valid URL ({raw:?}): {e}")))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
