//! Core value types
//!
//! - [`Timestamp`]: milliseconds since the Unix epoch, read leniently
//! - [`new_id`] / [`short_token`]: identifier helpers backed by UUID v4

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Values below this are taken to be seconds rather than milliseconds.
///
/// 10^11 ms is early March 1973; 10^11 s is far beyond any realistic date.
const SECONDS_CUTOFF: i64 = 100_000_000_000;

/// Naive datetime layouts accepted in legacy files, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Point in time stored as milliseconds since the Unix epoch
///
/// Serialized as a plain integer. Deserialization accepts the variety of
/// shapes found in older files; see [`Timestamp::from_json_lenient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The zero timestamp, used when a value is missing or unreadable
    pub const ZERO: Timestamp = Timestamp(0);

    /// Current wall-clock time
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp_millis())
    }

    /// Build from raw milliseconds
    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms.max(0))
    }

    /// Raw milliseconds
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whether the timestamp is unset
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Interpret an arbitrary JSON value as a timestamp
    ///
    /// Accepted:
    /// - integers and floats (seconds when below 10^11, otherwise milliseconds)
    /// - numeric strings, same rule
    /// - RFC 3339 strings
    /// - `YYYY-MM-DDTHH:MM:SS` and a few close variants (UTC)
    ///
    /// Anything else yields [`Timestamp::ZERO`].
    ///
    /// # Examples
    ///
    /// ```
    /// use casebook_core::Timestamp;
    /// use serde_json::json;
    ///
    /// assert_eq!(Timestamp::from_json_lenient(&json!(1_700_000_000)).as_millis(), 1_700_000_000_000);
    /// assert_eq!(Timestamp::from_json_lenient(&json!(1_700_000_000_123i64)).as_millis(), 1_700_000_000_123);
    /// assert_eq!(Timestamp::from_json_lenient(&json!("garbage")), Timestamp::ZERO);
    /// ```
    pub fn from_json_lenient(value: &Value) -> Self {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::from_number(i as f64)
                } else {
                    n.as_f64().map(Self::from_number).unwrap_or_default()
                }
            }
            Value::String(s) => Self::parse_str(s).unwrap_or_default(),
            _ => Timestamp::ZERO,
        }
    }

    fn from_number(n: f64) -> Self {
        if !n.is_finite() || n <= 0.0 {
            return Timestamp::ZERO;
        }
        if n < SECONDS_CUTOFF as f64 {
            Timestamp((n * 1000.0).round() as i64)
        } else {
            Timestamp(n.round() as i64)
        }
    }

    fn parse_str(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<f64>() {
            return Some(Self::from_number(n));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::from_millis(dt.timestamp_millis()));
        }
        NAIVE_FORMATS.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|dt| Self::from_millis(dt.and_utc().timestamp_millis()))
        })
    }

    /// Human-readable `YYYY-MM-DD HH:MM` (UTC), empty for unset values
    pub fn display_short(&self) -> String {
        if self.is_zero() {
            return String::new();
        }
        DateTime::from_timestamp_millis(self.0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .map(Timestamp::from_json_lenient)
            .unwrap_or_default())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fresh UUID v4 in hyphenated form
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Eight random hex characters, used to keep generated file names unique
pub fn short_token() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(8);
    simple
}
