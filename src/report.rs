use std::io::Write;
use std::str::FromStr;

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::appointment::{AppointmentDetail, AppointmentReport, DATE_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Office, date and times printed as each appointment is read
    Text,
    /// One JSON array once the run is done
    Json,
}

impl FromStr for OutputFormat {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ScrapeError::Config(format!(
                "OUTPUT_FORMAT must be `text` or `json`, got {other:?}"
            ))),
        }
    }
}

/// Console output of a run. stdout carries only the report; logs go to stderr.
pub struct Reporter<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Reporter { format, out }
    }

    pub fn office(&mut self, office: &str) -> ScrapeResult<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "{office}")?;
        }
        Ok(())
    }

    pub fn detail(&mut self, detail: &AppointmentDetail) -> ScrapeResult<()> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }
        match detail.date {
            Some(date) => writeln!(self.out, "Available date: {}", date.format(DATE_FORMAT))?,
            None => writeln!(self.out, "Date not found.")?,
        }
        writeln!(self.out, "Available times: {:?}", detail.available_times)?;
        Ok(())
    }

    pub fn finish(&mut self, reports: &[AppointmentReport]) -> ScrapeResult<()> {
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.out, reports).map_err(std::io::Error::from)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
