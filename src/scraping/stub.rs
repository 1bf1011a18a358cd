//! In-memory stand-in for the booking site, for driving the scraper in tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ScrapeError, ScrapeResult};
use crate::scraping::browser::{BookingBrowser, Target};
use crate::scraping::constants::{COOKIE_DISMISS_SELECTOR, HEADING_SELECTOR, SUMMARY_ID, TIME_BUTTON_SELECTOR};
use crate::scraping::scraper::submit_target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubElement {
    Control(Target),
    Heading(usize),
    Summary,
    TimeButton(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubClick {
    Control(Target),
    Heading(usize),
    NewTab(Target),
}

#[derive(Debug, Clone)]
pub struct StubHeading {
    title: Option<String>,
    aria_selected: bool,
    displayed: bool,
    enabled: bool,
}

impl StubHeading {
    pub fn new(title: &str) -> Self {
        StubHeading {
            title: Some(title.to_string()),
            aria_selected: false,
            displayed: true,
            enabled: true,
        }
    }

    pub fn untitled() -> Self {
        StubHeading {
            title: None,
            ..StubHeading::new("")
        }
    }

    pub fn selected(mut self) -> Self {
        self.aria_selected = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct StubDetail {
    summary: Option<String>,
    buttons: Vec<(String, bool)>,
}

impl StubDetail {
    /// `buttons` are `(title, disabled)` in document order.
    pub fn new(summary: &str, buttons: &[(&str, bool)]) -> Self {
        StubDetail {
            summary: Some(summary.to_string()),
            buttons: buttons
                .iter()
                .map(|(title, disabled)| (title.to_string(), *disabled))
                .collect(),
        }
    }

    pub fn without_summary() -> Self {
        StubDetail {
            summary: None,
            buttons: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct StubState {
    pub visited: Vec<String>,
    pub clicks: Vec<StubClick>,
    /// Open tabs; index 0 is the suggestion page, the others detail pages.
    pub windows: Vec<Option<StubDetail>>,
    pub focused: usize,
    pub max_windows: usize,
    pub windows_after_close: Vec<usize>,
    pub quit: bool,
}

impl Default for StubState {
    fn default() -> Self {
        StubState {
            visited: Vec::new(),
            clicks: Vec::new(),
            windows: vec![None],
            focused: 0,
            max_windows: 1,
            windows_after_close: Vec::new(),
            quit: false,
        }
    }
}

impl StubState {
    fn focused_detail(&self) -> Option<&StubDetail> {
        self.windows.get(self.focused).and_then(Option::as_ref)
    }
}

#[derive(Default)]
pub struct StubBrowser {
    controls: HashSet<Target>,
    headings: Vec<StubHeading>,
    details: HashMap<Target, StubDetail>,
    failing_clicks: HashSet<Target>,
    tabs_blocked: bool,
    failing_quit: bool,
    state: Arc<Mutex<StubState>>,
}

impl StubBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie_banner(mut self) -> Self {
        self.controls.insert(Target::css(COOKIE_DISMISS_SELECTOR));
        self
    }

    pub fn with_controls(mut self, controls: impl IntoIterator<Item = Target>) -> Self {
        self.controls.extend(controls);
        self
    }

    pub fn with_heading(mut self, heading: StubHeading) -> Self {
        self.headings.push(heading);
        self
    }

    pub fn with_detail(mut self, office: &str, detail: StubDetail) -> Self {
        self.details.insert(submit_target(office), detail);
        self
    }

    /// The control is found but clicking it fails.
    pub fn with_failing_click(mut self, target: Target) -> Self {
        self.failing_clicks.insert(target);
        self
    }

    /// Modifier-clicks open no tab, as when the browser ignores the modifier.
    pub fn with_tabs_blocked(mut self) -> Self {
        self.tabs_blocked = true;
        self
    }

    pub fn with_failing_quit(mut self) -> Self {
        self.failing_quit = true;
        self
    }

    pub fn state(&self) -> Arc<Mutex<StubState>> {
        Arc::clone(&self.state)
    }

    fn missing(target: &Target) -> ScrapeError {
        ScrapeError::ElementMissing(target.to_string())
    }
}

#[async_trait]
impl BookingBrowser for StubBrowser {
    type Element = StubElement;

    async fn goto(&self, url: &str) -> ScrapeResult<()> {
        self.state.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn find_clickable(
        &self,
        target: &Target,
        _timeout: Duration,
    ) -> ScrapeResult<Option<StubElement>> {
        let present = self.controls.contains(target) || self.details.contains_key(target);
        Ok(present.then(|| StubElement::Control(target.clone())))
    }

    async fn find(&self, target: &Target) -> ScrapeResult<StubElement> {
        let state = self.state.lock().unwrap();
        match state.focused_detail() {
            Some(detail) if *target == Target::id(SUMMARY_ID) && detail.summary.is_some() => {
                Ok(StubElement::Summary)
            }
            _ => Err(Self::missing(target)),
        }
    }

    async fn find_all(&self, target: &Target) -> ScrapeResult<Vec<StubElement>> {
        let state = self.state.lock().unwrap();
        let elements = if *target == Target::css(HEADING_SELECTOR) && state.focused == 0 {
            (0..self.headings.len()).map(StubElement::Heading).collect()
        } else if *target == Target::css(TIME_BUTTON_SELECTOR) {
            let count = state.focused_detail().map_or(0, |d| d.buttons.len());
            (0..count).map(StubElement::TimeButton).collect()
        } else {
            Vec::new()
        };
        Ok(elements)
    }

    async fn click(&self, element: &StubElement) -> ScrapeResult<()> {
        let click = match element {
            StubElement::Control(target) if self.failing_clicks.contains(target) => {
                return Err(ScrapeError::NotClickable {
                    target: target.to_string(),
                    timeout: Duration::ZERO,
                });
            }
            StubElement::Control(target) => StubClick::Control(target.clone()),
            StubElement::Heading(index) => StubClick::Heading(*index),
            other => panic!("stub cannot click {other:?}"),
        };
        self.state.lock().unwrap().clicks.push(click);
        Ok(())
    }

    async fn click_into_new_tab(&self, element: &StubElement) -> ScrapeResult<bool> {
        let StubElement::Control(target) = element else {
            panic!("stub cannot open {element:?} in a new tab");
        };
        let detail = self.details.get(target).cloned().ok_or_else(|| Self::missing(target))?;

        let mut state = self.state.lock().unwrap();
        state.clicks.push(StubClick::NewTab(target.clone()));
        if self.tabs_blocked {
            return Ok(false);
        }
        state.windows.push(Some(detail));
        state.focused = state.windows.len() - 1;
        state.max_windows = state.max_windows.max(state.windows.len());
        Ok(true)
    }

    async fn is_interactable(&self, element: &StubElement) -> ScrapeResult<bool> {
        Ok(match element {
            StubElement::Heading(index) => {
                let heading = &self.headings[*index];
                heading.displayed && heading.enabled
            }
            _ => true,
        })
    }

    async fn attr(&self, element: &StubElement, name: &str) -> ScrapeResult<Option<String>> {
        let state = self.state.lock().unwrap();
        let value = match (element, name) {
            (StubElement::Heading(index), "title") => self.headings[*index].title.clone(),
            (StubElement::Heading(index), "aria-selected") => {
                Some(self.headings[*index].aria_selected.to_string())
            }
            (StubElement::TimeButton(index), "title") => state
                .focused_detail()
                .map(|d| d.buttons[*index].0.clone()),
            (StubElement::TimeButton(index), "disabled") => state
                .focused_detail()
                .filter(|d| d.buttons[*index].1)
                .map(|_| "true".to_string()),
            _ => None,
        };
        Ok(value)
    }

    async fn text(&self, element: &StubElement) -> ScrapeResult<String> {
        let state = self.state.lock().unwrap();
        match element {
            StubElement::Summary => Ok(state
                .focused_detail()
                .and_then(|d| d.summary.clone())
                .unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    async fn window_count(&self) -> ScrapeResult<usize> {
        Ok(self.state.lock().unwrap().windows.len())
    }

    async fn close_tab_and_return(&self) -> ScrapeResult<()> {
        let mut state = self.state.lock().unwrap();
        let focused = state.focused;
        state.windows.remove(focused);
        state.focused = 0;
        let remaining = state.windows.len();
        state.windows_after_close.push(remaining);
        Ok(())
    }

    async fn quit(self) -> ScrapeResult<()> {
        self.state.lock().unwrap().quit = true;
        if self.failing_quit {
            return Err(ScrapeError::Io(std::io::Error::other("session already gone")));
        }
        Ok(())
    }
}
