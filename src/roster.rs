use csv::Reader;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::error::Result;
use crate::schedule::types::{Person, Position, Seniority, TimeSlot};

/// Someone picked to work today and for how long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    /// One of "11-2pm", "11-1pm", "12-2pm", "1-2pm"
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPreference {
    pub position: String,
    pub preference_level: i64,
}

/// Stored staff profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub seniority: Seniority,
    #[serde(default)]
    pub preferences: Vec<PositionPreference>,
}

/// Maps a shift duration label to the slots it covers
pub fn duration_to_slots(duration: &str) -> Option<Vec<TimeSlot>> {
    let slots = match duration.trim() {
        "11-2pm" => vec![TimeSlot::ElevenToNoon, TimeSlot::NoonToOne, TimeSlot::OneToTwo],
        "11-1pm" => vec![TimeSlot::ElevenToNoon, TimeSlot::NoonToOne],
        "12-2pm" => vec![TimeSlot::NoonToOne, TimeSlot::OneToTwo],
        "1-2pm" => vec![TimeSlot::OneToTwo],
        _ => return None,
    };
    Some(slots)
}

/// Loads today's roster from a CSV file with an `id,name,duration` header.
///
/// Rows missing an id or name are skipped; a repeated id keeps its first row.
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Vec<RosterEntry>> {
    let mut reader = Reader::from_path(csv_path)?;
    let headers = reader.headers()?.clone();

    // Find column indices
    let id_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("id")).unwrap_or(0);
    let name_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("name")).unwrap_or(1);
    let duration_col = headers.iter().position(|h| h.trim().eq_ignore_ascii_case("duration")).unwrap_or(2);

    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for result in reader.records() {
        let record = result?;

        let id = record.get(id_col).unwrap_or("").trim().to_string();
        let name = record.get(name_col).unwrap_or("").trim().to_string();
        let duration = record.get(duration_col).unwrap_or("").trim().to_string();

        // Skip if essential fields are missing
        if id.is_empty() || name.is_empty() {
            continue;
        }
        if !seen.insert(id.clone()) {
            warn!(%id, "duplicate roster row ignored");
            continue;
        }

        entries.push(RosterEntry { id, name, duration });
    }

    Ok(entries)
}

/// Loads staff profiles from a JSON array
pub fn load_profiles<P: AsRef<Path>>(json_path: P) -> Result<Vec<StaffProfile>> {
    let raw = std::fs::read_to_string(json_path)?;
    let profiles = serde_json::from_str(&raw)?;
    Ok(profiles)
}

/// Turns stored preferences into a per-position lookup, dropping anything unusable
fn parse_preferences(profile: &StaffProfile) -> HashMap<Position, u8> {
    let mut preferences = HashMap::new();
    for pref in &profile.preferences {
        let Some(position) = Position::from_label(&pref.position) else {
            warn!(staff_id = %profile.id, position = %pref.position, "unknown position in preferences");
            continue;
        };
        if !(1..=5).contains(&pref.preference_level) {
            warn!(staff_id = %profile.id, level = pref.preference_level, "preference level out of range");
            continue;
        }
        preferences.insert(position.canonical(), pref.preference_level as u8);
    }
    preferences
}

/// Joins today's roster with the staff profiles.
///
/// A person without a profile gets neutral preferences and the lowest seniority.
/// Roster order is kept, since it breaks scoring ties.
pub fn build_people(roster: &[RosterEntry], profiles: &[StaffProfile]) -> Vec<Person> {
    let by_id: HashMap<&str, &StaffProfile> = profiles.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut seen = HashSet::new();

    roster
        .iter()
        .filter(|entry| seen.insert(entry.id.as_str()))
        .map(|entry| {
            let profile = by_id.get(entry.id.as_str());
            if profile.is_none() {
                warn!(staff_id = %entry.id, "no staff profile, using neutral preferences");
            }

            let available_slots = duration_to_slots(&entry.duration).unwrap_or_else(|| {
                warn!(staff_id = %entry.id, duration = %entry.duration, "unknown shift duration");
                Vec::new()
            });

            Person {
                id: entry.id.clone(),
                name: entry.name.clone(),
                seniority: profile.map(|p| p.seniority).unwrap_or_default(),
                preferences: profile.map(|p| parse_preferences(p)).unwrap_or_default(),
                available_slots: available_slots.into_iter().collect(),
            }
        })
        .collect()
}
