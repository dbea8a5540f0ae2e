pub mod types;
pub mod positions;
pub mod scoring;
pub mod move_chain;
pub mod allocator;

pub use types::{DaySchedule, Person, Position, Seniority, SlotAssignment, TimeSlot};
pub use positions::{positions_by_slot, select_positions, PositionsBySlot};
pub use scoring::{score_candidate, RunState};
pub use allocator::{allocate, generate_day, AllocationContext, DayOptions};
