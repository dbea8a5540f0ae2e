use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use lunch_rotation::config::ScoringWeights;
use lunch_rotation::history::HistoryView;
use lunch_rotation::roster::{build_people, PositionPreference, RosterEntry, StaffProfile};
use lunch_rotation::schedule::{
    allocate, generate_day, score_candidate, AllocationContext, DayOptions, DaySchedule, Person,
    Position, RunState, Seniority, TimeSlot,
};
use lunch_rotation::RotationError;

// ==========================================
// Fixtures
// ==========================================

const NAMES: [&str; 9] = ["Ana", "Ben", "Cy", "Dee", "Eli", "Fay", "Gus", "Hal", "Ivy"];

fn roster(n: usize) -> Vec<RosterEntry> {
    NAMES
        .iter()
        .take(n)
        .enumerate()
        .map(|(i, name)| RosterEntry {
            id: format!("{}", i + 1),
            name: name.to_string(),
            duration: match i % 4 {
                3 => "11-1pm".to_string(),
                _ => "11-2pm".to_string(),
            },
        })
        .collect()
}

fn pref(position: &str, level: i64) -> PositionPreference {
    PositionPreference {
        position: position.to_string(),
        preference_level: level,
    }
}

fn profiles() -> Vec<StaffProfile> {
    let specs: [(&str, Seniority, Vec<PositionPreference>); 6] = [
        ("1", Seniority::GeneralManager, vec![pref("Grill 1", 5), pref("Fries", 4)]),
        ("2", Seniority::Captain, vec![pref("P.O.S.", 5), pref("Grill 1", 1)]),
        ("3", Seniority::TeamMember, vec![pref("Fries", 5), pref("Expo 1", 2)]),
        ("4", Seniority::AssistantManager, vec![pref("Expo 1", 5)]),
        ("5", Seniority::TeamMember, vec![pref("Lobby/Dish 1", 5), pref("Grill 1", 4)]),
        ("6", Seniority::TeamMember, vec![pref("Expo 2", 4)]),
    ];
    specs
        .into_iter()
        .map(|(id, seniority, preferences)| StaffProfile {
            id: id.to_string(),
            name: String::new(),
            email: None,
            seniority,
            preferences,
        })
        .collect()
}

fn person(id: &str, prefs: &[(Position, u8)]) -> Person {
    Person {
        id: id.to_string(),
        name: id.to_string(),
        seniority: Seniority::TeamMember,
        preferences: prefs.iter().copied().collect(),
        available_slots: TimeSlot::ALL.into_iter().collect(),
    }
}

fn run(people: &[Person], options: &DayOptions, history: &HistoryView) -> DaySchedule {
    generate_day(people, options, history, &ScoringWeights::default()).unwrap()
}

fn allocate_with(people: &[Person], slots: &[(TimeSlot, Vec<Position>)], history: &HistoryView) -> DaySchedule {
    let weights = ScoringWeights::default();
    let ctx = AllocationContext {
        hazard_exempt: None,
        history,
        weights: &weights,
    };
    allocate(people, &slots.iter().cloned().collect(), &ctx)
}

fn assert_invariants(schedule: &DaySchedule) {
    let mut held_today: HashSet<(String, Position)> = HashSet::new();

    for (slot, assignments) in &schedule.slots {
        let mut in_slot = HashSet::new();
        for a in assignments {
            let Some(id) = a.person_id() else { continue };
            assert!(in_slot.insert(id.to_string()), "{} holds two positions at {}", id, slot);
            assert!(
                held_today.insert((id.to_string(), a.position)),
                "{} works {} twice",
                id,
                a.position
            );
        }
    }
}

// ==========================================
// Properties
// ==========================================

#[test]
fn test_no_double_booking_across_headcounts_and_modes() {
    for n in 5..=9 {
        for reduced_risk in [false, true] {
            let people = build_people(&roster(n), &profiles());
            let options = DayOptions {
                hazard_exempt: Some("1".to_string()),
                reduced_risk,
            };
            assert_invariants(&run(&people, &options, &HistoryView::empty()));
        }
    }
}

#[test]
fn test_four_people_signal_insufficient_staff() {
    let people = build_people(&roster(4), &profiles());
    let result = generate_day(&people, &DayOptions::default(), &HistoryView::empty(), &ScoringWeights::default());

    match result {
        Err(RotationError::InsufficientStaff { headcount, minimum }) => {
            assert_eq!(headcount, 4);
            assert_eq!(minimum, 5);
        }
        other => panic!("expected InsufficientStaff, got {:?}", other),
    }
}

/// Random crew with full availability and preferences on a random subset of positions
fn random_crew(rng: &mut StdRng, n: usize) -> Vec<Person> {
    const TIERS: [Seniority; 4] = [
        Seniority::GeneralManager,
        Seniority::AssistantManager,
        Seniority::Captain,
        Seniority::TeamMember,
    ];

    (0..n)
        .map(|i| {
            let mut p = person(&format!("p{}", i), &[]);
            p.seniority = TIERS[rng.gen_range(0..TIERS.len())];
            for position in Position::CATALOG {
                if rng.gen_bool(0.6) {
                    p.preferences.insert(position, rng.gen_range(1..=5));
                }
            }
            p
        })
        .collect()
}

#[test]
fn test_five_people_fill_exactly_the_mandatory_positions() {
    let mandatory: HashSet<Position> = [
        Position::Register,
        Position::Grill1,
        Position::Expo1,
        Position::Fries,
        Position::Expo2,
    ]
    .into_iter()
    .collect();
    let mut rng = StdRng::seed_from_u64(5);

    for trial in 0..2000 {
        let mut people = random_crew(&mut rng, 5);
        people.shuffle(&mut rng);
        let options = DayOptions {
            hazard_exempt: (trial % 2 == 0).then(|| people[rng.gen_range(0..5)].id.clone()),
            reduced_risk: trial % 3 == 0,
        };
        let schedule = run(&people, &options, &HistoryView::empty());

        assert_invariants(&schedule);
        for slot in TimeSlot::ALL {
            let assignments = schedule.assignments(slot);
            let positions: HashSet<Position> = assignments.iter().map(|a| a.position).collect();
            assert_eq!(positions, mandatory);
            assert!(
                assignments.iter().all(|a| a.is_filled()),
                "trial {}: unfilled at {}: {:?}",
                trial,
                slot,
                schedule.unfilled()
            );
        }
    }
}

#[test]
fn test_full_crews_never_leave_positions_open() {
    let mut rng = StdRng::seed_from_u64(11);

    for trial in 0..1000 {
        let n = rng.gen_range(5..=10);
        let people = random_crew(&mut rng, n);
        let options = DayOptions {
            hazard_exempt: rng.gen_bool(0.5).then(|| format!("p{}", rng.gen_range(0..n))),
            reduced_risk: rng.gen_bool(0.3),
        };
        let first = run(&people, &options, &HistoryView::empty());
        let history = HistoryView::from_schedules([&first]);
        let schedule = run(&people, &options, &history);

        assert_invariants(&schedule);
        assert!(schedule.unfilled().is_empty(), "trial {} ({} people): {:?}", trial, n, schedule.unfilled());
    }
}

#[test]
fn test_grill_opener_never_on_hot_station_in_first_slot() {
    let base = build_people(&roster(8), &profiles());
    // the opener loves the grill
    let opener = "1";

    for shift in 0..base.len() {
        for reversed in [false, true] {
            let mut people = base.clone();
            people.rotate_left(shift);
            if reversed {
                people.reverse();
            }

            let options = DayOptions {
                hazard_exempt: Some(opener.to_string()),
                reduced_risk: false,
            };
            let schedule = run(&people, &options, &HistoryView::empty());

            for a in schedule.assignments(TimeSlot::ElevenToNoon) {
                if a.position.is_hazardous() {
                    assert_ne!(a.staff_id, opener, "opener on {} (shift {})", a.position, shift);
                }
            }
        }
    }
}

#[test]
fn test_fresh_person_wins_hot_station_over_exposed_favourite() {
    let a = person("a", &[(Position::Grill1, 3)]);
    let b = person("b", &[(Position::Grill1, 5)]);
    let weights = ScoringWeights::default();
    let history = HistoryView::empty();

    let mut state = RunState::new();
    state.record("b", Position::Fries);
    let score_a = score_candidate(&a, Position::Grill1, TimeSlot::NoonToOne, &state, &history, &weights);
    let score_b = score_candidate(&b, Position::Grill1, TimeSlot::NoonToOne, &state, &history, &weights);
    assert!(score_a > score_b);

    // Same scenario through the allocator: B works Fries first, then both compete for the grill
    let schedule = allocate_with(
        &[b.clone(), a.clone()],
        &[
            (TimeSlot::ElevenToNoon, vec![Position::Fries]),
            (TimeSlot::NoonToOne, vec![Position::Grill1]),
        ],
        &history,
    );
    assert_eq!(schedule.find(TimeSlot::ElevenToNoon, Position::Fries).unwrap().staff_id, "b");
    assert_eq!(schedule.find(TimeSlot::NoonToOne, Position::Grill1).unwrap().staff_id, "a");
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let people = build_people(&roster(8), &profiles());
    let options = DayOptions {
        hazard_exempt: Some("3".to_string()),
        reduced_risk: false,
    };
    let first = run(&people, &options, &HistoryView::empty());
    let history = HistoryView::from_schedules([&first]);

    let a = serde_json::to_string(&run(&people, &options, &history)).unwrap();
    let b = serde_json::to_string(&run(&people, &options, &history)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_yesterday_repeat_is_suppressed() {
    // Yesterday "fav" held the register in every slot they could
    let fav = person("fav", &[(Position::Register, 5)]);
    let other = person("other", &[(Position::Register, 5)]);
    let slots = vec![(TimeSlot::ElevenToNoon, vec![Position::Register])];

    let yesterday = allocate_with(&[fav.clone(), other.clone()], &slots, &HistoryView::empty());
    assert_eq!(yesterday.find(TimeSlot::ElevenToNoon, Position::Register).unwrap().staff_id, "fav");

    let history = HistoryView::from_schedules([&yesterday]);
    let today = allocate_with(&[fav.clone(), other.clone()], &slots, &history);
    assert_eq!(today.find(TimeSlot::ElevenToNoon, Position::Register).unwrap().staff_id, "other");

    // An alternative with a lower preference still wins over the repeat
    let reluctant = person("reluctant", &[(Position::Register, 1)]);
    let today = allocate_with(&[fav, reluctant], &slots, &history);
    assert_eq!(today.find(TimeSlot::ElevenToNoon, Position::Register).unwrap().staff_id, "reluctant");
}

#[test]
fn test_short_shift_people_only_work_their_slots() {
    let people = build_people(&roster(8), &profiles());
    let schedule = run(&people, &DayOptions::default(), &HistoryView::empty());

    // roster index 3 and 7 work 11-1pm
    for a in schedule.assignments(TimeSlot::OneToTwo) {
        assert_ne!(a.staff_id, "4");
        assert_ne!(a.staff_id, "8");
    }
}
