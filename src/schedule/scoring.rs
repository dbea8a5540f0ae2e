use std::collections::{HashMap, HashSet};

use crate::config::ScoringWeights;
use crate::history::HistoryView;
use super::types::{HazardType, Person, Position, TimeSlot};

/// What a person has already done today. Lives for one allocation pass only.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    positions_today: HashMap<String, HashSet<Position>>,
    hazard_count: HashMap<String, u32>,
    hazard_types: HashMap<String, HashSet<HazardType>>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an assignment and, for hot stations, the exposure that comes with it
    pub fn record(&mut self, person_id: &str, position: Position) {
        self.positions_today
            .entry(person_id.to_string())
            .or_default()
            .insert(position);

        if let Some(hazard) = position.hazard_type() {
            *self.hazard_count.entry(person_id.to_string()).or_insert(0) += 1;
            self.hazard_types
                .entry(person_id.to_string())
                .or_default()
                .insert(hazard);
        }
    }

    pub fn has_worked(&self, person_id: &str, position: Position) -> bool {
        self.positions_today
            .get(person_id)
            .map(|held| held.contains(&position))
            .unwrap_or(false)
    }

    pub fn hazard_count(&self, person_id: &str) -> u32 {
        self.hazard_count.get(person_id).copied().unwrap_or(0)
    }

    pub fn has_hazard_type(&self, person_id: &str, hazard: HazardType) -> bool {
        self.hazard_types
            .get(person_id)
            .map(|types| types.contains(&hazard))
            .unwrap_or(false)
    }

    /// Positions the person holds today
    pub fn positions_for(&self, person_id: &str) -> Vec<Position> {
        let mut held: Vec<Position> = self
            .positions_today
            .get(person_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        held.sort();
        held
    }
}

/// Hard eligibility rules, checked before any scoring.
///
/// The grill opener stays off hot stations in the first slot, and nobody works
/// the same position twice in one day.
pub fn is_eligible(
    person: &Person,
    position: Position,
    slot: TimeSlot,
    hazard_exempt: Option<&str>,
    state: &RunState,
) -> bool {
    if position.is_hazardous() && slot.is_first() && hazard_exempt == Some(person.id.as_str()) {
        return false;
    }
    !state.has_worked(&person.id, position)
}

/// Penalty for a hot station when the person already worked one today
pub fn repeat_hazard_penalty(person: &Person, position: Position, state: &RunState, weights: &ScoringWeights) -> f64 {
    let Some(hazard) = position.hazard_type() else {
        return 0.0;
    };
    if state.hazard_count(&person.id) == 0 {
        return 0.0;
    }

    // Senior staff are penalized less
    let mut penalty = weights.repeat_hazard_base_penalty
        - weights.repeat_hazard_seniority_step * f64::from(person.seniority.rank());
    if state.has_hazard_type(&person.id, hazard) {
        penalty += weights.same_hazard_type_penalty;
    }
    penalty
}

/// Scores a person for a position in a slot; higher is a better fit.
///
/// Callers check `is_eligible` first.
pub fn score_candidate(
    person: &Person,
    position: Position,
    slot: TimeSlot,
    state: &RunState,
    history: &HistoryView,
    weights: &ScoringWeights,
) -> f64 {
    let preference = f64::from(person.preference_for(position, weights.default_preference));
    let variety = if state.has_worked(&person.id, position) {
        0.0
    } else {
        weights.variety_bonus
    };
    let history_penalty =
        f64::from(history.frequency(&person.id, position)) * weights.history_penalty_per_shift;
    let previous_day_penalty = if history.worked_same_slot_previous_day(&person.id, position, slot) {
        weights.same_slot_previous_day_penalty
    } else {
        0.0
    };

    preference + variety
        - history_penalty
        - previous_day_penalty
        - repeat_hazard_penalty(person, position, state, weights)
}
