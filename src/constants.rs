use std::time::Duration;

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(1);
pub const DEFAULT_EXCERPT_LIMIT: usize = 60;

pub const TIME_LIMIT_ENV: &str = "BLACKBOX_TIME_LIMIT_MS";
pub const HALT_ON_ERROR_ENV: &str = "BLACKBOX_HALT_ON_ERROR";
pub const EXCERPT_LIMIT_ENV: &str = "BLACKBOX_EXCERPT_LIMIT";
