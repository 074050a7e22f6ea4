/// Calendar metadata constants shared across crates
pub const PRODUCT_NAME: &str = "Kairos";
pub const PRODUCT_VERSION: &str = "0.1";
pub const DEFAULT_PRODUCT_ID: &str =
    const_str::concat!("-//", PRODUCT_NAME, "//Scheduler ", PRODUCT_VERSION, "//EN");
pub const DEFAULT_ORGANIZER_DOMAIN: &str = "kairos.local";
pub const DEFAULT_PAST_EVENT_MARGIN_MINUTES: u32 = 60;

/// Scheduler defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 3660;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub const BOOTSTRAP_LOG_FILTER: &str = "info";
