//! Need specifications: the filter templates scouts author
//!
//! A need describes what a club is looking for (position, age and
//! height windows, foot, traits, per-attribute score floors). Needs are
//! created and edited through the API and read as an immutable snapshot
//! at import time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Preferred foot required by a need. `Any` is the wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFoot {
    #[default]
    Any,
    Left,
    Right,
    Both,
}

impl PreferredFoot {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferredFoot::Any => "any",
            PreferredFoot::Left => "left",
            PreferredFoot::Right => "right",
            PreferredFoot::Both => "both",
        }
    }

    /// Case-insensitive comparison against a candidate's declared foot.
    /// The wildcard matches everything.
    pub fn matches(self, declared: &str) -> bool {
        self == PreferredFoot::Any || declared.trim().eq_ignore_ascii_case(self.as_str())
    }
}

/// Per-attribute minimum scores. Each floor is independently optional;
/// a configured floor is an integer in 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeMinimums {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technik: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schnelligkeit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zweikampf: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passspiel: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kopfball: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abschluss: Option<u8>,
}

impl AttributeMinimums {
    /// Configured floors paired with their attribute names
    pub fn floors(&self) -> [(&'static str, Option<u8>); 6] {
        [
            ("technik", self.technik),
            ("schnelligkeit", self.schnelligkeit),
            ("zweikampf", self.zweikampf),
            ("passspiel", self.passspiel),
            ("kopfball", self.kopfball),
            ("abschluss", self.abschluss),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.floors().iter().all(|(_, floor)| floor.is_none())
    }
}

/// A filter template describing criteria for a scouting requirement.
///
/// All fields are optional; the default value is the all-open
/// specification ("no constraints"). Range bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NeedSpec {
    /// Position filter, matched as a case-insensitive substring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u8>,
    /// Height window in centimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_min: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_max: Option<u16>,
    pub preferred_foot: PreferredFoot,
    /// Traits a candidate must all declare (case-insensitive)
    pub required_traits: Vec<String>,
    pub min_stats: AttributeMinimums,
    /// Informational only; the filter does not enforce leagues
    pub league_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NeedSpec {
    /// Check the structural invariants of a specification:
    /// min ≤ max for both ranges, floors inside 0–100, and required
    /// traits non-empty after trimming.
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "Age range inverted: minAge {} > maxAge {}",
                    min, max
                )));
            }
        }

        if let (Some(min), Some(max)) = (self.height_min, self.height_max) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "Height range inverted: heightMin {} > heightMax {}",
                    min, max
                )));
            }
        }

        for (name, floor) in self.min_stats.floors() {
            if let Some(floor) = floor {
                if floor > 100 {
                    return Err(Error::InvalidInput(format!(
                        "Minimum score for {} must be in 0-100, got {}",
                        name, floor
                    )));
                }
            }
        }

        if self.required_traits.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "Required traits must be non-empty strings".to_string(),
            ));
        }

        Ok(())
    }
}

/// A persisted need: specification plus identity and bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNeed {
    pub id: Uuid,
    pub name: String,
    pub spec: NeedSpec,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredNeed {
    pub fn new(name: String, spec: NeedSpec) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            spec,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Where the effective filter for an import run comes from: wholesale
/// from a stored need, or authored inline. Never a mix of both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum FilterSource {
    #[serde(rename_all = "camelCase")]
    FromNeed { need_id: Uuid },
    Manual { spec: NeedSpec },
}
