use std::collections::HashSet;

use super::types::{Person, Position};

/// One reassignment inside a slot
#[derive(Debug, Clone, Copy)]
pub struct Move<'a> {
    pub person: &'a Person,
    pub from: Option<Position>,
    pub to: Position,
}

/// Positions of one slot and who currently holds each of them
pub type Seats<'a> = Vec<(Position, Option<&'a Person>)>;

/// Position the person holds in this slot, if any
pub fn seat_of(seats: &[(Position, Option<&Person>)], person: &Person) -> Option<Position> {
    seats
        .iter()
        .find(|(_, holder)| holder.map_or(false, |h| h.id == person.id))
        .map(|(position, _)| *position)
}

/// Looks for a chain of moves that fills `target` without emptying any other seat.
///
/// A free eligible person is taken directly. Otherwise an eligible person leaves
/// their seat for `target` and the seat they vacate is filled the same way.
/// `visited` holds everyone already moved in this search, so each person moves
/// at most once.
pub fn find_move_chain<'a>(
    target: Position,
    seats: &[(Position, Option<&'a Person>)],
    candidates: &[&'a Person],
    eligible: &dyn Fn(&Person, Position) -> bool,
    visited: &mut HashSet<&'a str>,
) -> Option<Vec<Move<'a>>> {
    for &person in candidates {
        if eligible(person, target) && seat_of(seats, person).is_none() {
            return Some(vec![Move {
                person,
                from: None,
                to: target,
            }]);
        }
    }

    for &person in candidates {
        if !eligible(person, target) || visited.contains(person.id.as_str()) {
            continue;
        }
        let Some(current) = seat_of(seats, person) else {
            continue;
        };

        visited.insert(person.id.as_str());
        if let Some(mut chain) = find_move_chain(current, seats, candidates, eligible, visited) {
            chain.push(Move {
                person,
                from: Some(current),
                to: target,
            });
            return Some(chain);
        }
    }

    None
}

/// Seats everyone in the chain. Every vacated seat is another move's target.
pub fn apply_move_chain<'a>(moves: &[Move<'a>], seats: &mut Seats<'a>) {
    for mv in moves {
        if let Some(seat) = seats.iter_mut().find(|(position, _)| *position == mv.to) {
            seat.1 = Some(mv.person);
        }
    }
}
