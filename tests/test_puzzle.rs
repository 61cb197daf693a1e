use is_shifty::constants::LEVER_ANIM_FRAMES;
use is_shifty::error::LevelError;
use is_shifty::events::GameEvent;
use is_shifty::geometry::Rect;
use is_shifty::puzzle::*;

fn machine(id: u32, y: f32, on: bool) -> LaserMachine {
    LaserMachine {
        id,
        rect: Rect::new(0.0, y, 32.0, 32.0),
        on,
    }
}

/// Beam of machine `id` running from x = 32 to x = 332 at height `y`.
fn beam(id: u32, y: f32) -> LaserBeam {
    LaserBeam::new(id, Rect::new(32.0, y + 8.0, 300.0, 16.0))
}

fn receiver(y: f32, door: u32, required_on: bool) -> LaserReceiver {
    LaserReceiver::new(Rect::new(320.0, y, 32.0, 32.0), door, required_on)
}

fn door(group: u32) -> Door {
    Door::new(Rect::new(500.0, 0.0, 32.0, 640.0), group)
}

fn lever(x: f32, targets: Vec<LeverTarget>) -> Lever {
    Lever::new(Rect::new(x, 600.0, 32.0, 40.0), targets)
}

/// Two machines, both off, each with a beam onto its own receiver. Both
/// receivers gate door 1. Lever 0 drives machine 1, lever 1 machine 2.
fn and_gate_parts() -> PuzzleParts {
    PuzzleParts {
        levers: vec![
            lever(100.0, vec![LeverTarget::Machine(1)]),
            lever(200.0, vec![LeverTarget::Machine(2)]),
        ],
        machines: vec![machine(1, 100.0, false), machine(2, 200.0, false)],
        beams: vec![beam(1, 100.0), beam(2, 200.0)],
        receivers: vec![receiver(100.0, 1, true), receiver(200.0, 1, true)],
        switches: Vec::new(),
        doors: vec![door(1)],
    }
}

fn make_graph() -> PuzzleGraph {
    PuzzleGraph::build("test", and_gate_parts()).expect("valid wiring")
}

/// Pull a lever and let its animation finish.
fn pull(graph: &mut PuzzleGraph, idx: usize, events: &mut Vec<GameEvent>) {
    assert!(graph.pull_lever(idx, events));
    graph.update(LEVER_ANIM_FRAMES, &[], events);
}

// ── Target lists ──────────────────────────────────────────────────────────────

#[test]
fn lever_targets_parse() {
    assert_eq!(
        LeverTarget::parse_list("1, machine:2,door:3"),
        Some(vec![
            LeverTarget::Machine(1),
            LeverTarget::Machine(2),
            LeverTarget::Door(3)
        ])
    );
    assert_eq!(LeverTarget::parse_list(""), None);
    assert_eq!(LeverTarget::parse_list("gate:1"), None);
    assert_eq!(LeverTarget::parse_list("x"), None);
}

// ── AND-gated door ────────────────────────────────────────────────────────────

#[test]
fn door_starts_closed_without_events() {
    let graph = make_graph();
    assert_eq!(graph.door_open(1), Some(false));
    assert_eq!(graph.closed_door_rects().count(), 1);
    assert_eq!(graph.active_beams().count(), 0);
}

#[test]
fn one_satisfied_receiver_does_not_open_door() {
    let mut graph = make_graph();
    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    assert!(graph.receivers()[0].satisfied);
    assert!(!graph.receivers()[1].satisfied);
    assert_eq!(graph.door_open(1), Some(false));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::DoorOpened { .. })));
}

#[test]
fn both_receivers_open_door_in_either_order() {
    for order in [[0, 1], [1, 0]] {
        let mut graph = make_graph();
        let mut events = Vec::new();
        pull(&mut graph, order[0], &mut events);
        pull(&mut graph, order[1], &mut events);
        assert_eq!(graph.door_open(1), Some(true), "order {order:?}");
        assert_eq!(graph.closed_door_rects().count(), 0);
        let opened = events
            .iter()
            .filter(|e| **e == GameEvent::DoorOpened { door: 1 })
            .count();
        assert_eq!(opened, 1);
    }
}

#[test]
fn unsatisfying_either_receiver_recloses_door() {
    for which in [0, 1] {
        let mut graph = make_graph();
        let mut events = Vec::new();
        pull(&mut graph, 0, &mut events);
        pull(&mut graph, 1, &mut events);
        events.clear();

        pull(&mut graph, which, &mut events);
        assert_eq!(graph.door_open(1), Some(false));
        assert!(events.contains(&GameEvent::DoorClosed { door: 1 }));
    }
}

#[test]
fn door_state_only_signals_on_change() {
    let mut graph = make_graph();
    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    pull(&mut graph, 1, &mut events);
    events.clear();
    for _ in 0..10 {
        graph.update(1.0, &[], &mut events);
    }
    assert!(events.is_empty());
}

#[test]
fn door_stays_open_while_its_doorway_is_occupied() {
    let mut graph = make_graph();
    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    pull(&mut graph, 1, &mut events);
    events.clear();

    let in_doorway = [Rect::new(510.0, 560.0, 40.0, 80.0)];
    assert!(graph.pull_lever(0, &mut events));
    graph.update(LEVER_ANIM_FRAMES, &in_doorway, &mut events);
    assert_eq!(graph.door_open(1), Some(true));
    assert!(!events.contains(&GameEvent::DoorClosed { door: 1 }));

    // Flush against the door face is not inside it.
    let beside = [Rect::new(460.0, 560.0, 40.0, 80.0)];
    graph.update(1.0, &beside, &mut events);
    assert_eq!(graph.door_open(1), Some(false));
    assert!(events.contains(&GameEvent::DoorClosed { door: 1 }));
}

// ── Levers ────────────────────────────────────────────────────────────────────

#[test]
fn lever_toggle_emits_laser_events() {
    let mut graph = make_graph();
    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    assert_eq!(graph.machine_on(1), Some(true));
    assert_eq!(events[..2], [GameEvent::LeverPulled, GameEvent::LaserOn]);
    assert_eq!(graph.active_beams().count(), 1);

    events.clear();
    pull(&mut graph, 0, &mut events);
    assert_eq!(events[..2], [GameEvent::LeverPulled, GameEvent::LaserOff]);
}

#[test]
fn toggling_lever_twice_restores_everything() {
    let mut graph = make_graph();
    let machines_before: Vec<bool> = graph.machines().iter().map(|m| m.on).collect();
    let receivers_before: Vec<bool> = graph.receivers().iter().map(|r| r.satisfied).collect();
    let mut events = Vec::new();

    pull(&mut graph, 0, &mut events);
    pull(&mut graph, 0, &mut events);

    let machines_after: Vec<bool> = graph.machines().iter().map(|m| m.on).collect();
    let receivers_after: Vec<bool> = graph.receivers().iter().map(|r| r.satisfied).collect();
    assert_eq!(machines_before, machines_after);
    assert_eq!(receivers_before, receivers_after);
    assert!(!graph.levers()[0].on);
}

#[test]
fn lever_ignores_pulls_while_animating() {
    let mut graph = make_graph();
    let mut events = Vec::new();
    assert!(graph.pull_lever(0, &mut events));
    assert!(graph.levers()[0].is_animating());
    assert!(!graph.pull_lever(0, &mut events));
    graph.update(1.0, &[], &mut events);
    assert!(!graph.pull_lever(0, &mut events));
    assert_eq!(graph.machine_on(1), Some(true));
}

#[test]
fn receiver_can_require_machine_off() {
    let parts = PuzzleParts {
        levers: vec![lever(100.0, vec![LeverTarget::Machine(1)])],
        machines: vec![machine(1, 100.0, true)],
        beams: vec![beam(1, 100.0)],
        receivers: vec![receiver(100.0, 1, false)],
        switches: Vec::new(),
        doors: vec![door(1)],
    };
    let mut graph = PuzzleGraph::build("test", parts).expect("valid wiring");
    assert_eq!(graph.door_open(1), Some(false));

    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    assert_eq!(graph.door_open(1), Some(true));
    assert_eq!(graph.active_beams().count(), 0);
}

#[test]
fn lever_can_drive_a_door_directly() {
    let parts = PuzzleParts {
        levers: vec![lever(100.0, vec![LeverTarget::Door(7)])],
        doors: vec![door(7)],
        ..PuzzleParts::default()
    };
    let mut graph = PuzzleGraph::build("test", parts).expect("valid wiring");
    let mut events = Vec::new();
    pull(&mut graph, 0, &mut events);
    assert_eq!(graph.door_open(7), Some(true));
    pull(&mut graph, 0, &mut events);
    assert_eq!(graph.door_open(7), Some(false));
}

#[test]
fn lever_lookup_by_overlap() {
    let graph = make_graph();
    assert_eq!(graph.lever_at(&Rect::new(210.0, 590.0, 40.0, 80.0)), Some(1));
    assert_eq!(graph.lever_at(&Rect::new(1000.0, 590.0, 40.0, 80.0)), None);
}

// ── Door switches ─────────────────────────────────────────────────────────────

fn switch_graph() -> PuzzleGraph {
    let parts = PuzzleParts {
        switches: vec![DoorSwitch::new(Rect::new(400.0, 600.0, 32.0, 40.0), 2)],
        doors: vec![door(2)],
        ..PuzzleParts::default()
    };
    PuzzleGraph::build("test", parts).expect("valid wiring")
}

#[test]
fn switch_without_key_fails_distinctly() {
    let mut graph = switch_graph();
    let mut has_key = false;
    let mut events = Vec::new();
    assert_eq!(graph.press_switch(0, &mut has_key, &mut events), SwitchOutcome::Failed);
    graph.update(1.0, &[], &mut events);
    assert_eq!(events, vec![GameEvent::SwitchFail]);
    assert_eq!(graph.door_open(2), Some(false));
}

#[test]
fn switch_with_key_consumes_it_and_opens_door() {
    let mut graph = switch_graph();
    let mut has_key = true;
    let mut events = Vec::new();
    assert_eq!(graph.press_switch(0, &mut has_key, &mut events), SwitchOutcome::Unlocked);
    assert!(!has_key);
    graph.update(1.0, &[], &mut events);
    assert_eq!(
        events,
        vec![GameEvent::SwitchSuccess, GameEvent::DoorOpened { door: 2 }]
    );

    events.clear();
    assert_eq!(
        graph.press_switch(0, &mut has_key, &mut events),
        SwitchOutcome::AlreadyUnlocked
    );
    assert!(events.is_empty());
}

// ── Load-time validation ──────────────────────────────────────────────────────

#[test]
fn beam_for_missing_machine_is_rejected() {
    let mut parts = and_gate_parts();
    parts.beams.push(beam(9, 400.0));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::UnknownMachine { machine: 9, .. }));
}

#[test]
fn lever_for_missing_machine_is_rejected() {
    let mut parts = and_gate_parts();
    parts.levers.push(lever(300.0, vec![LeverTarget::Machine(5)]));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::UnknownMachine { machine: 5, .. }));
}

#[test]
fn duplicate_machine_ids_are_rejected() {
    let mut parts = and_gate_parts();
    parts.machines.push(machine(1, 400.0, true));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::DuplicateMachine { machine: 1, .. }));
}

#[test]
fn receiver_no_beam_reaches_is_rejected() {
    let mut parts = and_gate_parts();
    parts.receivers.push(LaserReceiver::new(Rect::new(900.0, 900.0, 10.0, 10.0), 1, true));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::UnreachableReceiver { door: 1, .. }));
}

#[test]
fn reference_to_missing_door_is_rejected() {
    let mut parts = and_gate_parts();
    parts.switches.push(DoorSwitch::new(Rect::new(0.0, 0.0, 10.0, 10.0), 4));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::UnknownDoor { door: 4, .. }));
}

#[test]
fn door_without_inputs_is_rejected() {
    let mut parts = and_gate_parts();
    parts.doors.push(door(3));
    let err = PuzzleGraph::build("test", parts).unwrap_err();
    assert!(matches!(err, LevelError::UnwiredDoor { door: 3, .. }));
}
