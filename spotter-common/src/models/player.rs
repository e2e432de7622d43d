//! Candidate and persisted player shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed-shape attribute scores (0–100 integers). `None` means the
/// source did not report the field; zero is a valid low score and is
/// never used as a stand-in for "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeScores {
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

impl AttributeScores {
    /// Look up a score by attribute name. Unknown names read as unset.
    pub fn get(&self, attribute: &str) -> Option<u8> {
        match attribute {
            "technik" => self.technik,
            "schnelligkeit" => self.schnelligkeit,
            "zweikampf" => self.zweikampf,
            "passspiel" => self.passspiel,
            "kopfball" => self.kopfball,
            "abschluss" => self.abschluss,
            _ => None,
        }
    }
}

/// A normalized player returned by the roster fetcher, pre-persistence.
/// Constructed once per import run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Provider-side identity, unique per source
    pub external_id: u32,
    pub name: String,
    pub age: Option<u8>,
    pub height_cm: Option<u16>,
    pub position: Option<String>,
    /// Free text as declared by the source ("Left", "right", ...)
    pub preferred_foot: Option<String>,
    pub league_name: String,
    pub club_name: String,
    #[serde(default)]
    pub on_loan: bool,
    pub loan_from: Option<String>,
    #[serde(default)]
    pub scores: AttributeScores,
    #[serde(default)]
    pub traits: Vec<String>,
}

/// Persisted player entity: the candidate shape plus locally curated
/// fields the import never fills in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: Uuid,
    pub external_id: u32,
    pub name: String,
    pub age: Option<u8>,
    pub height_cm: Option<u16>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub league_name: String,
    pub club_name: String,
    pub on_loan: bool,
    pub loan_from: Option<String>,
    pub scores: AttributeScores,
    pub traits: Vec<String>,
    /// Curated by scouts after import
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub market_value: Option<i64>,
    pub market_value_source: Option<String>,
    pub agency: Option<String>,
    pub overall_rating: Option<u8>,
    pub potential_rating: Option<u8>,
    pub image_path: Option<String>,
    pub video_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create a fresh player entity from an accepted candidate. The
    /// curated fields start empty.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: candidate.external_id,
            name: candidate.name.clone(),
            age: candidate.age,
            height_cm: candidate.height_cm,
            position: candidate.position.clone(),
            preferred_foot: candidate.preferred_foot.clone(),
            league_name: candidate.league_name.clone(),
            club_name: candidate.club_name.clone(),
            on_loan: candidate.on_loan,
            loan_from: candidate.loan_from.clone(),
            scores: candidate.scores,
            traits: candidate.traits.clone(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            market_value: None,
            market_value_source: None,
            agency: None,
            overall_rating: None,
            potential_rating: None,
            image_path: None,
            video_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
