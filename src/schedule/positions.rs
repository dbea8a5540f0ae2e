use std::collections::BTreeMap;

use crate::config::MIN_HEADCOUNT;
use crate::error::{Result, RotationError};
use super::types::{Position, TimeSlot};

/// Each slot's positions, keyed by slot so a slot is scheduled at most once
pub type PositionsBySlot = BTreeMap<TimeSlot, Vec<Position>>;

/// Fill priority with both grills available
const NORMAL_PRIORITY: [Position; 8] = [
    Position::Register,
    Position::Grill1,
    Position::Expo1,
    Position::Fries,
    Position::Expo2,
    Position::LobbyDish1,
    Position::Grill2,
    Position::LobbyDish2,
];

/// Fill priority with a single griller
const REDUCED_RISK_PRIORITY: [Position; 7] = [
    Position::Register,
    Position::Grill1,
    Position::Expo1,
    Position::Fries,
    Position::Expo2,
    Position::LobbyDish1,
    Position::LobbyDish2,
];

/// How many positions from the priority order a headcount staffs
fn positions_for_headcount(headcount: usize) -> usize {
    match headcount {
        0..=5 => 5,
        6 => 6,
        7 => 7,
        _ => 8,
    }
}

/// Positions active for the whole day, before any per-slot override, in fill priority order
pub fn day_positions(headcount: usize, reduced_risk: bool) -> Result<Vec<Position>> {
    if headcount < MIN_HEADCOUNT {
        return Err(RotationError::InsufficientStaff {
            headcount,
            minimum: MIN_HEADCOUNT,
        });
    }

    let priority: &[Position] = if reduced_risk {
        &REDUCED_RISK_PRIORITY
    } else {
        &NORMAL_PRIORITY
    };
    let take = positions_for_headcount(headcount).min(priority.len());

    Ok(priority[..take].to_vec())
}

/// Positions active in one slot, in fill priority order.
///
/// The second grill never runs in the final slot.
pub fn select_positions(headcount: usize, reduced_risk: bool, slot: TimeSlot) -> Result<Vec<Position>> {
    let mut positions = day_positions(headcount, reduced_risk)?;
    if slot.is_last() {
        positions.retain(|p| *p != Position::Grill2);
    }
    Ok(positions)
}

/// Runs the selector for every slot of the day
pub fn positions_by_slot(headcount: usize, reduced_risk: bool) -> Result<PositionsBySlot> {
    TimeSlot::ALL
        .iter()
        .map(|&slot| Ok((slot, select_positions(headcount, reduced_risk, slot)?)))
        .collect()
}
