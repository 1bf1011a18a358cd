// thirtyfour (selenium) inputs
pub const BASE_URL: &str = "https://dortmund.termine-reservieren.de/";
pub const WEBDRIVER_URL: &str = "http://localhost:9515";

pub const WAIT_TIMEOUT_SECS: u64 = 10;
pub const WAIT_POLL_MILLIS: u64 = 250;

pub const CHROME_ARGS: [&str; 5] = [
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-software-rasterizer",
    "--log-level=3",
    "--disable-search-engine-choice-screen",
];

// HTML element selectors used in automation
pub const COOKIE_DISMISS_SELECTOR: &str = "input#cookie_msg_btn_no";
pub const CONCERN_CATEGORY_NAME: &str = "Einwohnermelde- und Kraftfahrzeugangelegenheiten";
pub const CONTINUE_BUTTON_ID: &str = "WeiterButton";
pub const CONFIRM_BUTTON_ID: &str = "OKButton";

// HTML selectors for scraping
pub const HEADING_SELECTOR: &str = "div#suggest_location_accordion h3[title]";
pub const SUMMARY_ID: &str = "suggest_details_summary";
pub const TIME_BUTTON_SELECTOR: &str = "table.sugg_table button";

pub const APPOINTMENT_MARKER: &str = "Termin";
pub const SUBMIT_VALUE_SUFFIX: &str = " auswählen";
