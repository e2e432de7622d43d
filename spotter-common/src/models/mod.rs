//! Domain models shared across Spotter services

pub mod need;
pub mod player;

pub use need::{AttributeMinimums, FilterSource, NeedSpec, PreferredFoot, StoredNeed};
pub use player::{AttributeScores, Candidate, PlayerRecord};
