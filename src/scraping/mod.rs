pub mod browser;
pub mod constants;
pub mod scraper;

#[cfg(test)]
pub mod stub;
