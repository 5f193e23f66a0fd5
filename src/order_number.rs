//! Human-readable order numbers: `ORD-YYMM-NNNN`
//!
//! The suffix is random, so two orders placed in the same month collide
//! with probability 1 in 10,000. Callers that persist orders check for an
//! existing number and draw again (see
//! [`OrderWorkflow`](crate::workflow::OrderWorkflow)).

use crate::core::error::ValidationError;
use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;

const PREFIX: &str = "ORD";
const SUFFIX_SPACE: u16 = 10_000;

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^ORD-([0-9]{2})([0-9]{2})-([0-9]{4})$").ok())
        .as_ref()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Fresh number for the current month (local time)
    pub fn generate() -> Self {
        Self::generate_for(Local::now().date_naive())
    }

    /// Fresh number for the month of `date`
    pub fn generate_for(date: NaiveDate) -> Self {
        let suffix = rand::rng().random_range(0..SUFFIX_SPACE);
        Self::from_parts(date, suffix)
    }

    /// Number with a fixed suffix; the suffix is taken modulo 10,000
    pub fn from_parts(date: NaiveDate, suffix: u16) -> Self {
        Self(format!(
            "{}-{:02}{:02}-{:04}",
            PREFIX,
            date.year().rem_euclid(100),
            date.month(),
            suffix % SUFFIX_SPACE
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit year and month
    pub fn year_month(&self) -> (u32, u32) {
        let field = |range: Range<usize>| -> u32 {
            self.0
                .get(range)
                .and_then(|digits| digits.parse().ok())
                .unwrap_or_default()
        };
        (field(4..6), field(6..8))
    }

    pub fn suffix(&self) -> u16 {
        self.0.get(9..).and_then(|digits| digits.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for OrderNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::FieldError {
            field: "order_number".to_string(),
            message: format!("'{}' does not match ORD-YYMM-NNNN", s),
        };
        let captures = pattern().and_then(|re| re.captures(s)).ok_or_else(invalid)?;
        let month: u32 = captures[2].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
