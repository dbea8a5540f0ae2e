use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::schedule::{DaySchedule, Position, TimeSlot};

const POSITION_WIDTH: usize = 14;
const CELL_WIDTH: usize = 12;

/// Name in a cell, or "-" when the position was left open
fn cell_text(schedule: &DaySchedule, slot: TimeSlot, position: Position) -> String {
    match schedule.find(slot, position) {
        Some(a) if a.is_filled() => a.staff_name.clone(),
        _ => "-".to_string(),
    }
}

/// Renders the schedule as a table: one row per position, one column per slot.
///
/// Positions never filled in any slot are left out.
pub fn render_schedule(title: &str, schedule: &DaySchedule) -> String {
    let mut lines = vec![format!("** {} **", title)];

    let mut header = format!("{:<width$}", "Position", width = POSITION_WIDTH);
    for slot in TimeSlot::ALL {
        header.push_str(&format!(" {:<width$}", slot.label(), width = CELL_WIDTH));
    }
    lines.push(header);

    for position in schedule.active_positions() {
        let has_assignments = TimeSlot::ALL
            .iter()
            .any(|&slot| schedule.find(slot, position).map(|a| a.is_filled()).unwrap_or(false));
        if !has_assignments {
            continue;
        }

        let mut row = format!("{:<width$}", position.label(), width = POSITION_WIDTH);
        for slot in TimeSlot::ALL {
            row.push_str(&format!(" {:<width$}", cell_text(schedule, slot, position), width = CELL_WIDTH));
        }
        lines.push(row);
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Writes the rendered schedule to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(
    title: &str,
    schedule: &DaySchedule,
    filename: P,
) -> Result<()> {
    let mut file = File::create(filename)?;
    write!(file, "{}", render_schedule(title, schedule))?;
    Ok(())
}

/// Prints a day schedule in a readable format
pub fn print_day_schedule(title: &str, schedule: &DaySchedule) {
    println!("\n{}", render_schedule(title, schedule));

    let unfilled = schedule.unfilled();
    if !unfilled.is_empty() {
        println!("Unfilled positions ({}):", unfilled.len());
        for (slot, position) in unfilled {
            println!("  - {} at {}", position, slot);
        }
    }
}
