use tabela_kit::program::{StopAnimation, TabelaItem, TabelaProgram, TransitionKind};
use tabela_kit::scheduler::ProgramScheduler;

fn programs(count: u32, duration_seconds: u32) -> Vec<TabelaProgram> {
    (1..=count)
        .map(|id| {
            let mut program = TabelaProgram::new(id, format!("Program {id}"));
            program.set_duration_seconds(duration_seconds);
            program
        })
        .collect()
}

fn stop_item(id: u32, stops: &[&str], duration_seconds: f32) -> TabelaItem {
    let mut item = TabelaItem::text(id, "");
    item.stops.is_enabled = true;
    item.stops.stops = stops.iter().map(|stop| (*stop).to_owned()).collect();
    item.stops.set_duration_seconds(duration_seconds);
    item
}

#[test]
fn next_program_round_trips_when_looping() {
    let mut scheduler = ProgramScheduler::new(programs(4, 10), true);
    for _ in 0..4 {
        scheduler.next_program();
    }
    assert_eq!(scheduler.current_program_index(), 0);
}

#[test]
fn next_program_stays_on_last_without_looping() {
    let mut scheduler = ProgramScheduler::new(programs(3, 10), false);
    for _ in 0..5 {
        scheduler.next_program();
    }
    assert_eq!(scheduler.current_program_index(), 2);
}

#[test]
fn go_to_program_clamps_and_resets_elapsed() {
    let mut scheduler = ProgramScheduler::new(programs(3, 10), true);
    scheduler.play();
    scheduler.on_tick(2.0);
    assert_eq!(scheduler.program_elapsed_time(), 2.0);

    scheduler.go_to_program(10);
    assert_eq!(scheduler.current_program_index(), 2);
    assert_eq!(scheduler.program_elapsed_time(), 0.0);
}

#[test]
fn play_and_pause_do_not_move_the_index() {
    let mut scheduler = ProgramScheduler::new(programs(3, 10), true);
    scheduler.go_to_program(1);
    scheduler.play();
    assert!(scheduler.is_playing());
    assert_eq!(scheduler.current_program_index(), 1);
    scheduler.pause();
    assert!(!scheduler.is_playing());
    assert_eq!(scheduler.current_program_index(), 1);
}

#[test]
fn ticks_are_ignored_while_paused_or_empty() {
    let mut scheduler = ProgramScheduler::new(programs(2, 5), true);
    scheduler.on_tick(100.0);
    assert_eq!(scheduler.current_program_index(), 0);
    assert_eq!(scheduler.program_elapsed_time(), 0.0);

    let mut empty = ProgramScheduler::new(Vec::new(), true);
    empty.play();
    empty.on_tick(1.0);
    empty.next_program();
    assert_eq!(empty.current_program_index(), 0);
    assert!(empty.current_program().is_none());
}

#[test]
fn program_advances_once_and_discards_surplus() {
    let mut scheduler = ProgramScheduler::new(programs(3, 5), true);
    scheduler.play();
    scheduler.on_tick(2.0);
    scheduler.on_tick(2.0);
    assert_eq!(scheduler.current_program_index(), 0);
    scheduler.on_tick(2.0);
    assert_eq!(scheduler.current_program_index(), 1);
    assert_eq!(scheduler.program_elapsed_time(), 0.0);

    // A huge tick still moves only one program.
    scheduler.on_tick(1000.0);
    assert_eq!(scheduler.current_program_index(), 2);
}

#[test]
fn playback_stops_at_last_program_without_looping() {
    let mut scheduler = ProgramScheduler::new(programs(2, 1), false);
    scheduler.play();
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_program_index(), 1);
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_program_index(), 1);
    assert!(!scheduler.is_playing());
}

#[test]
fn playback_wraps_when_looping() {
    let mut scheduler = ProgramScheduler::new(programs(2, 1), true);
    scheduler.play();
    scheduler.on_tick(1.0);
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_program_index(), 0);
    assert!(scheduler.is_playing());
}

#[test]
fn stops_cycle_modulo_count() {
    let mut program_list = programs(1, 60);
    program_list[0].items.push(stop_item(7, &["A", "B", "C"], 1.0));
    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();

    assert_eq!(scheduler.current_stop_index(7), 0);
    let mut seen = Vec::new();
    for _ in 0..4 {
        scheduler.on_tick(1.0);
        seen.push(scheduler.current_stop_index(7));
    }
    assert_eq!(seen, [1, 2, 0, 1]);
}

#[test]
fn a_long_tick_moves_one_stop() {
    let mut program_list = programs(1, 60);
    program_list[0].items.push(stop_item(1, &["A", "B", "C"], 1.0));
    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();
    scheduler.on_tick(5.0);
    assert_eq!(scheduler.current_stop_index(1), 1);
    assert_eq!(scheduler.stop_elapsed_time(1), 0.0);
}

#[test]
fn auto_calculated_stop_duration_splits_the_program() {
    let mut program_list = programs(1, 6);
    let mut item = stop_item(1, &["A", "B", "C"], 10.0);
    item.stops.auto_calculate_duration = true;
    assert_eq!(item.stops.effective_duration(6), 2.0);
    program_list[0].items.push(item);

    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_stop_index(1), 0);
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_stop_index(1), 1);
}

#[test]
fn disabled_stops_have_no_clock() {
    let mut program_list = programs(1, 60);
    let mut item = stop_item(1, &["A", "B"], 1.0);
    item.stops.is_enabled = false;
    assert!(!item.stops.has_intermediate_stops());
    program_list[0].items.push(item);

    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();
    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_stop_index(1), 0);
    assert_eq!(scheduler.stop_elapsed_time(1), 0.0);
}

#[test]
fn stop_clocks_survive_program_changes() {
    let mut program_list = programs(2, 60);
    program_list[0].items.push(stop_item(1, &["A", "B", "C"], 1.0));
    program_list[1].items.push(stop_item(1, &["X", "Y"], 1.0));
    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();

    scheduler.on_tick(1.0);
    assert_eq!(scheduler.current_stop_index(1), 1);

    scheduler.go_to_program(1);
    assert_eq!(scheduler.current_stop_index(1), 0);

    scheduler.go_to_program(0);
    assert_eq!(scheduler.current_stop_index(1), 1);
}

#[test]
fn program_change_starts_a_transition() {
    let mut program_list = programs(2, 10);
    program_list[1].transition = TransitionKind::Fade;
    program_list[1].set_transition_duration_ms(500);
    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();
    assert!(scheduler.active_transition().is_none());

    scheduler.next_program();
    let transition = scheduler.active_transition().copied();
    assert_eq!(transition.map(|transition| transition.kind), Some(TransitionKind::Fade));
    assert_eq!(transition.map(|transition| transition.from_index), Some(0));
    assert_eq!(transition.map(|transition| transition.progress()), Some(0.0));

    scheduler.on_tick(0.25);
    let progress = scheduler
        .active_transition()
        .map(|transition| transition.progress())
        .unwrap_or_default();
    assert!((progress - 0.5).abs() < 1e-4);

    scheduler.on_tick(0.3);
    assert!(scheduler.active_transition().is_none());
}

#[test]
fn cut_programs_have_no_transition() {
    let mut scheduler = ProgramScheduler::new(programs(2, 10), true);
    scheduler.next_program();
    assert!(scheduler.active_transition().is_none());
}

#[test]
fn stop_change_reports_its_animation() {
    let mut program_list = programs(1, 60);
    let mut item = stop_item(1, &["A", "B"], 1.0);
    item.stops.animation = StopAnimation::Fade;
    item.stops.set_animation_duration_ms(200);
    program_list[0].items.push(item);
    let mut scheduler = ProgramScheduler::new(program_list, true);
    scheduler.play();

    assert!(scheduler.stop_transition(1).is_none());
    scheduler.on_tick(1.0);
    let stop = scheduler.stop_transition(1);
    assert_eq!(stop.map(|stop| (stop.from_index, stop.to_index)), Some((0, 1)));

    scheduler.on_tick(0.1);
    let progress = scheduler.stop_transition(1).map(|stop| stop.progress).unwrap_or_default();
    assert!((progress - 0.5).abs() < 1e-4);

    scheduler.on_tick(0.2);
    assert!(scheduler.stop_transition(1).is_none());
}
