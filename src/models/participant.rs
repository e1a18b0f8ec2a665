//! Participant data structure and roster import.

use crate::models::tournament::ChampionshipError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and standings).
pub type ParticipantId = Uuid;

/// A registered championship participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Rating snapshot used for pairing. Only the external rating system changes it.
    pub rating: i32,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant registered now.
    pub fn new(name: impl Into<String>, rating: i32) -> Self {
        Self::registered(name, rating, Utc::now())
    }

    /// Create a participant with an explicit registration time.
    pub fn registered(name: impl Into<String>, rating: i32, registered_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating,
            registered_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    rating: i32,
    #[serde(default)]
    registered_at: Option<String>,
}

/// Parse a roster from CSV with a `name,rating[,registered_at]` header.
///
/// `registered_at` is RFC 3339; rows without it are stamped with the import time.
/// Blank names are rejected.
pub fn parse_roster_csv<R: Read>(reader: R) -> Result<Vec<Participant>, ChampionshipError> {
    let now = Utc::now();
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut roster = Vec::new();
    for (line, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| ChampionshipError::InvalidRoster(format!("row {}: {}", line + 1, e)))?;
        if row.name.is_empty() {
            return Err(ChampionshipError::InvalidRoster(format!("row {}: empty name", line + 1)));
        }
        let registered_at = match row.registered_at.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map_err(|e| ChampionshipError::InvalidRoster(format!("row {}: {}", line + 1, e)))?
                .with_timezone(&Utc),
            None => now,
        };
        roster.push(Participant::registered(row.name, row.rating, registered_at));
    }
    Ok(roster)
}
