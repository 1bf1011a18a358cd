use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{ScrapeError, ScrapeResult};

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("date pattern is valid"));

pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// An appointment heading as listed on the suggestion page, `office,date,time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentCandidate {
    pub office: String,
    pub date: String,
    pub time: String,
}

impl AppointmentCandidate {
    pub fn parse(title: &str) -> ScrapeResult<Self> {
        let fields: Vec<&str> = title.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [office, date, time] => Ok(AppointmentCandidate {
                office: office.to_string(),
                date: date.to_string(),
                time: time.to_string(),
            }),
            _ => Err(ScrapeError::MalformedTitle {
                title: title.to_string(),
                fields: fields.len(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetail {
    pub date: Option<NaiveDate>,
    pub available_times: Vec<String>,
}

impl AppointmentDetail {
    pub fn new(summary: &str, available_times: Vec<String>) -> Self {
        AppointmentDetail {
            date: extract_date(summary),
            available_times,
        }
    }
}

/// First `DD.MM.YYYY` in the summary text that is also a real calendar date.
pub fn extract_date(summary: &str) -> Option<NaiveDate> {
    DATE_PATTERN
        .find_iter(summary)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), DATE_FORMAT).ok())
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AppointmentReport {
    pub office: String,
    pub listed_date: String,
    pub listed_time: String,
    pub date: Option<NaiveDate>,
    pub available_times: Vec<String>,
}

impl AppointmentReport {
    pub fn new(candidate: AppointmentCandidate, detail: AppointmentDetail) -> Self {
        AppointmentReport {
            office: candidate.office,
            listed_date: candidate.date,
            listed_time: candidate.time,
            date: detail.date,
            available_times: detail.available_times,
        }
    }
}
