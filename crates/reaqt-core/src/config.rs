#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! The only process-wide knob is the [`ErrorPolicy`] applied by streams when
//! they receive `on_error`. The default comes from `REAQT_ERROR_POLICY`
//! (`report` or `forward`), read once; individual streams override it with
//! `with_policy`.

use std::sync::OnceLock;

/// Environment variable holding the default error policy.
pub const ERROR_POLICY_ENV: &str = "REAQT_ERROR_POLICY";

/// What a stream does with an error pushed through `on_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the error and keep the stream running. Subscribers never see it.
    #[default]
    Report,
    /// Log the error, then forward it to every subscriber's `on_error`.
    Forward,
}

impl ErrorPolicy {
    /// Parse a policy name. Accepts `report`/`log` and `forward`/`propagate`,
    /// case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "report" | "log" => Some(Self::Report),
            "forward" | "propagate" => Some(Self::Forward),
            _ => None,
        }
    }

    /// Resolve a policy using a custom environment lookup.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match get_env(ERROR_POLICY_ENV) {
            Some(raw) => Self::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unrecognized REAQT_ERROR_POLICY, using report");
                Self::Report
            }),
            None => Self::Report,
        }
    }

    /// Process default, read from the environment on first use.
    #[must_use]
    pub fn global() -> Self {
        static POLICY: OnceLock<ErrorPolicy> = OnceLock::new();
        *POLICY.get_or_init(|| Self::from_env_with(|key| std::env::var(key).ok()))
    }
}
