use std::fmt;

use serde::{Deserialize, Serialize};

/// Label rendered when either half of a fiscal period is missing
pub const UNKNOWN_PERIOD_LABEL: &str = "Quarter Unknown";

/// A fiscal quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Short code, e.g. "Q1"
    pub fn code(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }

    /// Spoken name used in scripts, e.g. "First Quarter"
    pub fn long_name(&self) -> &'static str {
        match self {
            Quarter::Q1 => "First Quarter",
            Quarter::Q2 => "Second Quarter",
            Quarter::Q3 => "Third Quarter",
            Quarter::Q4 => "Fourth Quarter",
        }
    }

    /// Parse a quarter code, case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Quarter::ALL
            .into_iter()
            .find(|q| q.code().to_lowercase() == code)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reporting period a transcript covers.
///
/// Field order matters: periods compare by year first, then quarter, and an
/// unknown field sorts before any known one. Serialized as its label, so an
/// unresolved period is written as "Quarter Unknown" rather than nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FiscalPeriod {
    /// Four-digit year, e.g. "2024"
    pub year: Option<String>,
    pub quarter: Option<Quarter>,
}

impl FiscalPeriod {
    pub fn new(quarter: Quarter, year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            quarter: Some(quarter),
        }
    }

    /// Both quarter and year are known
    pub fn is_known(&self) -> bool {
        self.quarter.is_some() && self.year.is_some()
    }

    /// Collapse a partially resolved period to the unknown period
    pub fn or_unknown(self) -> Self {
        if self.is_known() {
            self
        } else {
            Self::default()
        }
    }

    /// Render as "Q1 FY2024", or the unknown sentinel when incomplete
    pub fn label(&self) -> String {
        match (&self.quarter, &self.year) {
            (Some(quarter), Some(year)) => format!("{} FY{}", quarter, year),
            _ => UNKNOWN_PERIOD_LABEL.to_string(),
        }
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<FiscalPeriod> for String {
    fn from(period: FiscalPeriod) -> Self {
        period.label()
    }
}

impl TryFrom<String> for FiscalPeriod {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        if label == UNKNOWN_PERIOD_LABEL {
            return Ok(Self::default());
        }

        let parsed = label.split_once(" FY").and_then(|(quarter, year)| {
            let quarter = Quarter::from_code(quarter)?;
            let is_year = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
            is_year.then(|| Self::new(quarter, year))
        });

        parsed.ok_or_else(|| format!("invalid fiscal period label '{}'", label))
    }
}
