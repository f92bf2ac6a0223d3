//! Confidence levels for each dataset.
//!
//! Two independent tables exist per dataset: the ordered filter levels used to build the
//! "lowest acceptable confidence" predicate, and the labels that score 1.0 when a record is
//! normalized. They are deliberately not derived from each other.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Integrated deforestation alert filter levels, low to high.
pub const INTEGRATED_CONFIDENCE_ORDER: &[&str] = &["high", "highest"];

/// Integrated deforestation alert labels that score 1.0.
pub const INTEGRATED_HIGH_CONFIDENCE_LABELS: &[&str] = &["high", "highest"];

/// VIIRS fire alert filter levels, low to high.
pub const FIRE_CONFIDENCE_ORDER: &[&str] = &["low", "nominal", "high"];

/// VIIRS fire alert labels that score 1.0. The upstream category column holds single-letter
/// codes; the long form is accepted as well.
pub const FIRE_HIGH_CONFIDENCE_LABELS: &[&str] = &["h", "high"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegratedAlertsConfidence {
    High,
    Highest,
}

impl IntegratedAlertsConfidence {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Highest => "highest",
        }
    }
}

impl Default for IntegratedAlertsConfidence {
    fn default() -> Self {
        Self::Highest
    }
}

impl fmt::Display for IntegratedAlertsConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegratedAlertsConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "highest" => Ok(Self::Highest),
            other => Err(format!("unknown integrated alerts confidence: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireAlertConfidence {
    Low,
    Nominal,
    High,
}

impl FireAlertConfidence {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Nominal => "nominal",
            Self::High => "high",
        }
    }
}

impl Default for FireAlertConfidence {
    fn default() -> Self {
        Self::High
    }
}

impl fmt::Display for FireAlertConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FireAlertConfidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "nominal" => Ok(Self::Nominal),
            "high" => Ok(Self::High),
            other => Err(format!("unknown fire alert confidence: {other}")),
        }
    }
}
