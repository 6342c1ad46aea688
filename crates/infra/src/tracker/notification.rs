//! Transient notification banner.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Seconds a notification stays visible.
pub const AUTO_DISMISS_SECS: i64 = 6;

pub fn auto_dismiss() -> TimeDelta {
    TimeDelta::seconds(AUTO_DISMISS_SECS)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self::raised_at(severity, message, Utc::now())
    }

    pub fn raised_at(severity: Severity, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            severity,
            raised_at: at,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + auto_dismiss()
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_for_six_seconds() {
        let t0 = Utc::now();
        let n = Notification::raised_at(Severity::Info, "hello", t0);
        assert!(n.is_visible_at(t0));
        assert!(n.is_visible_at(t0 + TimeDelta::milliseconds(5_999)));
        assert!(!n.is_visible_at(t0 + TimeDelta::seconds(6)));
    }

    #[test]
    fn severity_serializes_lowercase() {
        let n = Notification::warning("careful");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["message"], "careful");
    }

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Notification::success("x").severity, Severity::Success);
        assert_eq!(Notification::error("x").severity, Severity::Error);
        assert_eq!(Notification::info("x").severity, Severity::Info);
        assert_eq!(Notification::warning("x").severity, Severity::Warning);
    }
}
