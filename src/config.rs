//! Client configuration: page origin, API base path and transition timings.
//!
//! Defaults reproduce the page's stock behaviour. A few knobs can be
//! overridden from `<body>` data attributes:
//!
//! - `data-api-base`   prefix for every backend path (default: empty)
//! - `data-toast-ms`   how long a toast stays up before it leaves
//! - `data-stagger-ms` delay between comments appearing in the modal

/// Durations (milliseconds) for every timed visual step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// Button press: scale down, then reset.
    pub press_ms: u32,
    /// Counter swap: scale up, swap text, scale back.
    pub counter_swap_ms: u32,
    /// Delay before a freshly inserted comment eases in.
    pub comment_enter_ms: u32,
    /// Slide-out before a deleted comment is removed.
    pub comment_exit_ms: u32,
    /// Gap between consecutive comments during a list load.
    pub comment_stagger_ms: u32,
    /// Delay before a new comment is scrolled into view.
    pub reveal_delay_ms: u32,
    pub toast_enter_ms: u32,
    pub toast_dwell_ms: u32,
    pub toast_exit_ms: u32,
    /// Gap between consecutive cards in the page entrance.
    pub card_stagger_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            press_ms: 150,
            counter_swap_ms: 150,
            comment_enter_ms: 50,
            comment_exit_ms: 400,
            comment_stagger_ms: 100,
            reveal_delay_ms: 100,
            toast_enter_ms: 100,
            toast_dwell_ms: 5000,
            toast_exit_ms: 400,
            card_stagger_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Page origin, e.g. `https://games.example`. Used for share links.
    pub origin: String,
    /// Prefix for backend paths. No trailing slash.
    pub api_base: String,
    pub timings: Timings,
}

impl ClientConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            api_base: String::new(),
            timings: Timings::default(),
        }
    }

    /// Apply overrides from the body dataset. `lookup` receives camelCase
    /// dataset keys (`apiBase`, `toastMs`, `staggerMs`).
    pub fn from_dataset<F>(origin: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(origin);

        if let Some(base) = lookup("apiBase") {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = parse_ms(&lookup, "toastMs") {
            config.timings.toast_dwell_ms = ms;
        }
        if let Some(ms) = parse_ms(&lookup, "staggerMs") {
            config.timings.comment_stagger_ms = ms;
        }

        config
    }
}

fn parse_ms<F>(lookup: &F, key: &str) -> Option<u32>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u32>() {
        Ok(ms) => Some(ms),
        Err(_) => {
            log::warn!("ignoring invalid data-{} value {:?}", key, raw);
            None
        }
    }
}
