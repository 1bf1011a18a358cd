use crate::config::Settings;
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::appointment::{AppointmentCandidate, AppointmentDetail, AppointmentReport};
use crate::models::concern::Concern;
use crate::report::Reporter;
use crate::scraping::browser::{BookingBrowser, Target};
use crate::scraping::constants::*;
use std::io::Write;
use tracing::{debug, error, info, warn};

/// Outcome of the best-effort cookie banner click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieBanner {
    Dismissed,
    NotPresent,
}

pub struct TerminScraper {
    settings: Settings,
    concern: Concern,
}

impl TerminScraper {
    pub fn new(settings: Settings, concern: Concern) -> Self {
        TerminScraper { settings, concern }
    }

    /// Scrapes the suggestions and quits the browser on every exit path.
    pub async fn run<B: BookingBrowser, W: Write>(
        &self,
        browser: B,
        reporter: &mut Reporter<W>,
    ) -> ScrapeResult<Vec<AppointmentReport>> {
        let outcome = self.scrape(&browser, reporter).await;

        if let Err(e) = browser.quit().await {
            error!("Failed to quit browser session: {:?}", e);
        }

        outcome
    }

    pub async fn scrape<B: BookingBrowser, W: Write>(
        &self,
        browser: &B,
        reporter: &mut Reporter<W>,
    ) -> ScrapeResult<Vec<AppointmentReport>> {
        info!("navigating to {}", self.settings.booking_url);
        browser.goto(self.settings.booking_url.as_str()).await?;

        self.dismiss_cookie_banner(browser).await;
        self.select_concern(browser).await?;

        let reports = self.collect_appointments(browser, reporter).await?;
        reporter.finish(&reports)?;

        info!("found {} appointment(s)", reports.len());
        Ok(reports)
    }

    pub async fn dismiss_cookie_banner<B: BookingBrowser>(&self, browser: &B) -> CookieBanner {
        let target = Target::css(COOKIE_DISMISS_SELECTOR);

        let button = match browser
            .find_clickable(&target, self.settings.wait_timeout)
            .await
        {
            Ok(Some(button)) => button,
            Ok(None) => {
                info!("Cookie message not found or not clickable.");
                return CookieBanner::NotPresent;
            }
            Err(e) => {
                warn!("Cookie message not found or not clickable: {}", e);
                return CookieBanner::NotPresent;
            }
        };

        match browser.click(&button).await {
            Ok(()) => {
                debug!("cookie message dismissed");
                CookieBanner::Dismissed
            }
            Err(e) => {
                warn!("Cookie message not found or not clickable: {}", e);
                CookieBanner::NotPresent
            }
        }
    }

    /// Clicks through category, accordion, counter, documents and confirm.
    pub async fn select_concern<B: BookingBrowser>(&self, browser: &B) -> ScrapeResult<()> {
        for step in self.concern.navigation_steps(self.settings.persons) {
            browser
                .click_when_clickable(&step, self.settings.wait_timeout)
                .await?;
        }
        Ok(())
    }

    pub async fn collect_appointments<B: BookingBrowser, W: Write>(
        &self,
        browser: &B,
        reporter: &mut Reporter<W>,
    ) -> ScrapeResult<Vec<AppointmentReport>> {
        let headings = browser.find_all(&Target::css(HEADING_SELECTOR)).await?;
        debug!("{} appointment headings listed", headings.len());

        let mut results = Vec::new();

        for heading in &headings {
            if !browser.is_interactable(heading).await? {
                continue;
            }

            let Some(title) = browser.attr(heading, "title").await? else {
                continue;
            };
            if !title.contains(APPOINTMENT_MARKER) {
                debug!("skipping heading {:?}", title);
                continue;
            }

            let candidate = match AppointmentCandidate::parse(&title) {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!("skipping heading: {}", e);
                    continue;
                }
            };

            info!("checking office {}", candidate.office);
            reporter.office(&candidate.office)?;

            // clicking an open accordion section would collapse it again
            let aria_selected = browser.attr(heading, "aria-selected").await?;
            if aria_selected.as_deref() != Some("true") {
                browser.click(heading).await?;
            }

            let detail = self.read_detail(browser, &candidate.office).await?;
            reporter.detail(&detail)?;

            results.push(AppointmentReport::new(candidate, detail));
        }

        Ok(results)
    }

    /// Opens the office's suggestion in a new tab, reads it and closes the tab
    /// again, also when reading failed. Fails with `NoNewTab` without closing
    /// anything when the click opened no tab.
    async fn read_detail<B: BookingBrowser>(
        &self,
        browser: &B,
        office: &str,
    ) -> ScrapeResult<AppointmentDetail> {
        let target = submit_target(office);
        let submit = browser
            .wait_clickable(&target, self.settings.wait_timeout)
            .await?;

        let before = browser.window_count().await?;
        let opened = browser.click_into_new_tab(&submit).await?;
        if !opened || browser.window_count().await? <= before {
            return Err(ScrapeError::NoNewTab {
                target: target.to_string(),
            });
        }

        let detail = Self::read_detail_tab(browser).await;
        let closed = browser.close_tab_and_return().await;

        let detail = detail?;
        closed?;
        Ok(detail)
    }

    async fn read_detail_tab<B: BookingBrowser>(browser: &B) -> ScrapeResult<AppointmentDetail> {
        let summary = browser.find(&Target::id(SUMMARY_ID)).await?;
        let summary_text = browser.text(&summary).await?;

        let mut available_times = Vec::new();
        for button in browser.find_all(&Target::css(TIME_BUTTON_SELECTOR)).await? {
            if browser.attr(&button, "disabled").await?.is_some() {
                continue;
            }
            if let Some(title) = browser.attr(&button, "title").await? {
                available_times.push(title);
            }
        }

        Ok(AppointmentDetail::new(&summary_text, available_times))
    }
}

/// The "<office> auswählen" submit input of an appointment section.
pub fn submit_target(office: &str) -> Target {
    let value = format!("{office}{SUBMIT_VALUE_SUFFIX}");
    Target::xpath(format!("//input[@value={}]", xpath_literal(&value)))
}

/// Quotes `s` as an XPath 1.0 string literal. XPath has no escapes, so a
/// value holding both quote kinds is assembled with concat().
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        format!("'{s}'")
    } else if !s.contains('"') {
        format!("\"{s}\"")
    } else {
        let parts: Vec<String> = s.split('\'').map(|part| format!("'{part}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
