use std::collections::HashSet;

use tracing::{debug, info, info_span, warn};

use crate::config::ScoringWeights;
use crate::error::Result;
use crate::history::HistoryView;
use super::move_chain::{apply_move_chain, find_move_chain, seat_of, Seats};
use super::positions::{positions_by_slot, PositionsBySlot};
use super::scoring::{is_eligible, score_candidate, RunState};
use super::types::{DaySchedule, Person, Position, SlotAssignment, TimeSlot};

/// Options the caller picks for the day
#[derive(Debug, Clone, Default)]
pub struct DayOptions {
    /// Person who did the pre-open grill prep
    pub hazard_exempt: Option<String>,
    /// Run with a single griller
    pub reduced_risk: bool,
}

/// Inputs that stay fixed for a whole allocation pass
#[derive(Debug, Clone, Copy)]
pub struct AllocationContext<'a> {
    pub hazard_exempt: Option<&'a str>,
    pub history: &'a HistoryView,
    pub weights: &'a ScoringWeights,
}

/// Best free candidate for one position; the earliest listed person wins a tie
fn pick_candidate<'a>(
    candidates: &[&'a Person],
    position: Position,
    slot: TimeSlot,
    seats: &[(Position, Option<&'a Person>)],
    state: &RunState,
    ctx: &AllocationContext,
) -> Option<(&'a Person, f64)> {
    let mut best: Option<(&'a Person, f64)> = None;

    for &person in candidates {
        if seat_of(seats, person).is_some() {
            continue;
        }
        if !is_eligible(person, position, slot, ctx.hazard_exempt, state) {
            continue;
        }

        let score = score_candidate(person, position, slot, state, ctx.history, ctx.weights);
        // Strictly greater keeps the first of equal scores
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((person, score));
        }
    }

    best
}

/// Fills one slot: mandatory positions in priority order, then the rest in catalog order.
///
/// Positions the greedy pass leaves open get one move-chain repair each, in the
/// same order. A repair only reshuffles people already seated in this slot, so
/// a filled position never empties.
fn allocate_slot(
    people: &[Person],
    slot: TimeSlot,
    positions: &[Position],
    state: &mut RunState,
    ctx: &AllocationContext,
) -> Vec<SlotAssignment> {
    let candidates: Vec<&Person> = people.iter().filter(|p| p.is_available(slot)).collect();

    let mandatory = positions.iter().copied().filter(|p| p.is_mandatory());
    let mut optional: Vec<Position> = positions.iter().copied().filter(|p| !p.is_mandatory()).collect();
    optional.sort_by_key(|p| Position::CATALOG.iter().position(|c| c == p));

    let mut seats: Seats = mandatory.chain(optional).map(|position| (position, None)).collect();

    for index in 0..seats.len() {
        let position = seats[index].0;
        if let Some((person, score)) = pick_candidate(&candidates, position, slot, &seats, state, ctx) {
            debug!(%slot, %position, person = %person.id, score, "assigned");
            seats[index].1 = Some(person);
        }
    }

    let earlier_slots: &RunState = state;
    let eligible = |person: &Person, position: Position| {
        is_eligible(person, position, slot, ctx.hazard_exempt, earlier_slots)
    };
    for index in 0..seats.len() {
        let position = seats[index].0;
        if seats[index].1.is_some() {
            continue;
        }
        match find_move_chain(position, &seats, &candidates, &eligible, &mut HashSet::new()) {
            Some(chain) => {
                debug!(%slot, %position, moves = chain.len(), "filled by moving people within the slot");
                apply_move_chain(&chain, &mut seats);
            }
            None => warn!(%slot, %position, "no eligible candidate, position left unfilled"),
        }
    }

    seats
        .into_iter()
        .map(|(position, holder)| match holder {
            Some(person) => {
                state.record(&person.id, position);
                SlotAssignment::filled(position, person)
            }
            None => SlotAssignment::unfilled(position),
        })
        .collect()
}

/// Assigns people to each slot's positions, earliest slot first.
///
/// What a person did in earlier slots (positions held, hot stations worked)
/// carries into later slots. A position nobody is eligible for is recorded
/// as unfilled rather than failing the run.
pub fn allocate(people: &[Person], positions_by_slot: &PositionsBySlot, ctx: &AllocationContext) -> DaySchedule {
    let mut state = RunState::new();
    let mut schedule = DaySchedule::default();

    // BTreeMap iteration is chronological
    for (&slot, positions) in positions_by_slot {
        let assignments = allocate_slot(people, slot, positions, &mut state, ctx);
        schedule.slots.insert(slot, assignments);
    }

    schedule
}

/// Builds the whole day: checks staffing, selects positions per slot, then allocates.
///
/// Headcount is everyone on today's roster, whatever part of the day they cover.
pub fn generate_day(
    people: &[Person],
    options: &DayOptions,
    history: &HistoryView,
    weights: &ScoringWeights,
) -> Result<DaySchedule> {
    let span = info_span!("generate_day", headcount = people.len(), reduced_risk = options.reduced_risk);
    let _guard = span.enter();

    let positions = positions_by_slot(people.len(), options.reduced_risk)?;
    let ctx = AllocationContext {
        hazard_exempt: options.hazard_exempt.as_deref(),
        history,
        weights,
    };
    let schedule = allocate(people, &positions, &ctx);

    info!(
        history_days = history.days(),
        unfilled = schedule.unfilled().len(),
        "schedule generated"
    );
    Ok(schedule)
}
