use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("{target} was not clickable after {timeout:?}")]
    NotClickable { target: String, timeout: Duration },

    #[error("clicking {target} did not open a new tab")]
    NoNewTab { target: String },

    #[error("no element matches {0}")]
    ElementMissing(String),

    #[error("malformed appointment title {title:?}: expected 3 comma-separated fields, found {fields}")]
    MalformedTitle { title: String, fields: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
