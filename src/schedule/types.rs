use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use serde::{Serialize, Deserialize};

/// Marker name the original front end stored for an unfilled position
pub const UNFILLED_LABEL: &str = "UNFILLED";

/// A station in the lunch-rush catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Grill 1")]
    Grill1,
    #[serde(rename = "Grill 2")]
    Grill2,
    #[serde(rename = "P.O.S.")]
    Register,
    #[serde(rename = "Expo 1")]
    Expo1,
    #[serde(rename = "Expo 2")]
    Expo2,
    #[serde(rename = "Fries")]
    Fries,
    #[serde(rename = "Lobby/Dish 1")]
    LobbyDish1,
    #[serde(rename = "Lobby/Dish 2")]
    LobbyDish2,
}

/// Kind of hot station; two instances of the same station share a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardType {
    Grill,
    Fries,
}

impl Position {
    /// Catalog order, which is also the display order
    pub const CATALOG: [Position; 8] = [
        Position::Grill1,
        Position::Grill2,
        Position::Register,
        Position::Expo1,
        Position::Expo2,
        Position::Fries,
        Position::LobbyDish1,
        Position::LobbyDish2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Position::Grill1 => "Grill 1",
            Position::Grill2 => "Grill 2",
            Position::Register => "P.O.S.",
            Position::Expo1 => "Expo 1",
            Position::Expo2 => "Expo 2",
            Position::Fries => "Fries",
            Position::LobbyDish1 => "Lobby/Dish 1",
            Position::LobbyDish2 => "Lobby/Dish 2",
        }
    }

    /// Parses a catalog label, ignoring surrounding whitespace
    pub fn from_label(label: &str) -> Option<Position> {
        let label = label.trim();
        Position::CATALOG.iter().copied().find(|p| p.label() == label)
    }

    /// The primary instance whose preference and hazard type this position shares
    pub fn canonical(self) -> Position {
        match self {
            Position::Grill2 => Position::Grill1,
            Position::LobbyDish2 => Position::LobbyDish1,
            other => other,
        }
    }

    pub fn hazard_type(self) -> Option<HazardType> {
        match self.canonical() {
            Position::Grill1 => Some(HazardType::Grill),
            Position::Fries => Some(HazardType::Fries),
            _ => None,
        }
    }

    pub fn is_hazardous(self) -> bool {
        self.hazard_type().is_some()
    }

    /// Core stations filled before any optional ones
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            Position::Register | Position::Grill1 | Position::Expo1 | Position::Fries | Position::Expo2
        )
    }

    fn catalog_index(self) -> usize {
        Position::CATALOG.iter().position(|p| *p == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the fixed lunch-rush hours, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "11am-12pm")]
    ElevenToNoon,
    #[serde(rename = "12pm-1pm")]
    NoonToOne,
    #[serde(rename = "1pm-2pm")]
    OneToTwo,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::ElevenToNoon, TimeSlot::NoonToOne, TimeSlot::OneToTwo];

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::ElevenToNoon => "11am-12pm",
            TimeSlot::NoonToOne => "12pm-1pm",
            TimeSlot::OneToTwo => "1pm-2pm",
        }
    }

    pub fn is_first(self) -> bool {
        self == TimeSlot::ElevenToNoon
    }

    pub fn is_last(self) -> bool {
        self == TimeSlot::OneToTwo
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seniority tier, most senior first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Seniority {
    GeneralManager,
    AssistantManager,
    Captain,
    #[default]
    TeamMember,
}

impl Seniority {
    /// 1 for the most senior tier, 4 for the least
    pub fn rank(self) -> u32 {
        match self {
            Seniority::GeneralManager => 1,
            Seniority::AssistantManager => 2,
            Seniority::Captain => 3,
            Seniority::TeamMember => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seniority::GeneralManager => "GM",
            Seniority::AssistantManager => "AGM",
            Seniority::Captain => "Captain",
            Seniority::TeamMember => "Team Member",
        }
    }
}

impl From<String> for Seniority {
    fn from(value: String) -> Self {
        match value.trim() {
            "GM" => Seniority::GeneralManager,
            "AGM" => Seniority::AssistantManager,
            "Captain" => Seniority::Captain,
            _ => Seniority::TeamMember,
        }
    }
}

impl From<Seniority> for String {
    fn from(value: Seniority) -> Self {
        value.label().to_string()
    }
}

/// A person working today, joined from the roster and their staff profile
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub seniority: Seniority,
    /// Keyed by canonical position; absent means neutral
    pub preferences: HashMap<Position, u8>,
    pub available_slots: HashSet<TimeSlot>,
}

impl Person {
    /// Preference for a position, looked up through its canonical counterpart
    pub fn preference_for(&self, position: Position, default_level: u8) -> u8 {
        self.preferences
            .get(&position.canonical())
            .copied()
            .unwrap_or(default_level)
    }

    pub fn is_available(&self, slot: TimeSlot) -> bool {
        self.available_slots.contains(&slot)
    }
}

/// One cell of the schedule: a position and who (if anyone) holds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    pub position: Position,
    #[serde(default)]
    pub staff_id: String,
    #[serde(default)]
    pub staff_name: String,
}

impl SlotAssignment {
    pub fn filled(position: Position, person: &Person) -> Self {
        Self {
            position,
            staff_id: person.id.clone(),
            staff_name: person.name.clone(),
        }
    }

    pub fn unfilled(position: Position) -> Self {
        Self {
            position,
            staff_id: String::new(),
            staff_name: UNFILLED_LABEL.to_string(),
        }
    }

    /// The person holding this position, or None when it was left open
    pub fn person_id(&self) -> Option<&str> {
        if self.staff_id.is_empty() {
            None
        } else {
            Some(&self.staff_id)
        }
    }

    pub fn is_filled(&self) -> bool {
        self.person_id().is_some()
    }
}

/// Schedule for a single day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    pub slots: BTreeMap<TimeSlot, Vec<SlotAssignment>>, // slot -> assignments in fill order
}

impl DaySchedule {
    pub fn assignments(&self, slot: TimeSlot) -> &[SlotAssignment] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, slot: TimeSlot, position: Position) -> Option<&SlotAssignment> {
        self.assignments(slot).iter().find(|a| a.position == position)
    }

    /// Every position active in at least one slot, in catalog order
    pub fn active_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .slots
            .values()
            .flatten()
            .map(|a| a.position)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        positions.sort_by_key(|p| p.catalog_index());
        positions
    }

    /// (slot, position) pairs nobody could be found for
    pub fn unfilled(&self) -> Vec<(TimeSlot, Position)> {
        self.slots
            .iter()
            .flat_map(|(slot, list)| {
                list.iter()
                    .filter(|a| !a.is_filled())
                    .map(move |a| (*slot, a.position))
            })
            .collect()
    }
}
