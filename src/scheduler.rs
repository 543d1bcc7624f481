//! Program playback with nested, independently clocked intermediate stops.
//!
//! The scheduler is driven by an external tick: each [`ProgramScheduler::on_tick`]
//! call advances every clock by the elapsed time. Two kinds of clock run:
//!
//! - one program clock, counting how long the current program has been shown;
//! - one stop clock per item with intermediate stops, keyed by program and item
//!   id. Stop clocks are not reset by program changes; a program that comes back
//!   on screen resumes its stops where they were.

use std::collections::HashMap;

use crate::bounds::{clamp_program_duration, clamp_stop_animation, clamp_transition_duration};
use crate::program::{StopAnimation, TabelaProgram, TransitionKind};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StopClock {
    index: usize,
    elapsed: f32,
    previous: Option<usize>,
    animation_elapsed: f32,
}

/// A program change being animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgramTransition {
    /// Index of the outgoing program.
    pub from_index: usize,
    /// Index of the incoming program.
    pub to_index: usize,
    /// Animation kind, taken from the incoming program.
    pub kind: TransitionKind,
    /// Total length in seconds.
    pub duration_seconds: f32,
    /// Time spent so far.
    pub elapsed_seconds: f32,
}

impl ProgramTransition {
    /// `0.0` at the start, `1.0` when done.
    #[must_use]
    pub fn progress(&self) -> f32 {
        progress(self.elapsed_seconds, self.duration_seconds)
    }
}

/// A stop change being animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopTransition {
    /// Outgoing stop index.
    pub from_index: usize,
    /// Incoming stop index.
    pub to_index: usize,
    /// Animation kind.
    pub animation: StopAnimation,
    /// `0.0` at the start, `1.0` when done.
    pub progress: f32,
}

/// Decides which program, and which stop of each item, is on screen.
#[derive(Clone, Debug)]
pub struct ProgramScheduler {
    programs: Vec<TabelaProgram>,
    current_index: usize,
    is_playing: bool,
    is_looping: bool,
    program_elapsed: f32,
    stop_clocks: HashMap<(u32, u32), StopClock>,
    transition: Option<ProgramTransition>,
}

impl ProgramScheduler {
    /// Create a paused scheduler on the first program.
    #[must_use]
    pub fn new(programs: Vec<TabelaProgram>, is_looping: bool) -> Self {
        Self {
            programs,
            current_index: 0,
            is_playing: false,
            is_looping,
            program_elapsed: 0.0,
            stop_clocks: HashMap::new(),
            transition: None,
        }
    }

    /// Start or resume playback; the current program is kept.
    pub fn play(&mut self) {
        self.is_playing = true;
    }

    /// Pause playback; clocks freeze until [`Self::play`].
    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Whether ticks advance the clocks.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether playback wraps after the last program.
    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.is_looping
    }

    /// Turn wrapping on or off.
    pub fn set_looping(&mut self, is_looping: bool) {
        self.is_looping = is_looping;
    }

    /// All programs in play order.
    #[must_use]
    pub fn programs(&self) -> &[TabelaProgram] {
        &self.programs
    }

    /// Index of the program on screen.
    #[must_use]
    pub const fn current_program_index(&self) -> usize {
        self.current_index
    }

    /// The program on screen, `None` when there are no programs.
    #[must_use]
    pub fn current_program(&self) -> Option<&TabelaProgram> {
        self.programs.get(self.current_index)
    }

    /// Seconds the current program has been on screen.
    #[must_use]
    pub const fn program_elapsed_time(&self) -> f32 {
        self.program_elapsed
    }

    /// Program change animation in progress, if any.
    #[must_use]
    pub const fn active_transition(&self) -> Option<&ProgramTransition> {
        self.transition.as_ref()
    }

    /// Jump to program `index`, clamped into range.
    ///
    /// The program clock restarts; stop clocks are left as they are.
    pub fn go_to_program(&mut self, index: usize) {
        if self.programs.is_empty() {
            return;
        }
        let index = index.min(self.programs.len() - 1);
        self.switch_to(index);
    }

    /// Advance one program, wrapping when looping and staying on the last
    /// program otherwise.
    pub fn next_program(&mut self) {
        let count = self.programs.len();
        if count == 0 {
            return;
        }
        let index = if self.current_index + 1 < count {
            self.current_index + 1
        } else if self.is_looping {
            0
        } else {
            count - 1
        };
        self.switch_to(index);
    }

    /// Advance all clocks by `dt_seconds`.
    ///
    /// Does nothing while paused or without programs. Each stop clock moves at
    /// most one stop per tick, and the program clock makes at most one program
    /// change per tick, discarding any surplus time.
    pub fn on_tick(&mut self, dt_seconds: f32) {
        if !self.is_playing || self.programs.is_empty() {
            return;
        }
        let dt = if dt_seconds.is_finite() { dt_seconds.max(0.0) } else { 0.0 };

        if let Some(transition) = self.transition.as_mut() {
            transition.elapsed_seconds += dt;
            if transition.elapsed_seconds >= transition.duration_seconds {
                self.transition = None;
            }
        }

        let Some(program) = self.programs.get(self.current_index) else {
            return;
        };
        let program_duration = clamp_program_duration(program.duration_seconds);
        for item in program.items.iter().filter(|item| item.stops.has_intermediate_stops()) {
            let stop_count = item.stops.stops.len();
            let stop_duration = item.stops.effective_duration(program_duration);
            let clock = self.stop_clocks.entry((program.id, item.id)).or_default();
            clock.index %= stop_count;
            clock.elapsed += dt;
            clock.animation_elapsed += dt;
            if stop_duration > 0.0 && clock.elapsed >= stop_duration {
                clock.previous = Some(clock.index);
                clock.index = (clock.index + 1) % stop_count;
                clock.elapsed = 0.0;
                clock.animation_elapsed = 0.0;
                log::debug!("item {} advanced to stop {}", item.id, clock.index);
            }
        }

        self.program_elapsed += dt;
        if self.program_elapsed >= program_duration as f32 {
            self.program_elapsed = 0.0;
            self.advance_on_timer();
        }
    }

    /// Stop index of `item_id` in the current program; 0 for an item not yet ticked.
    #[must_use]
    pub fn current_stop_index(&self, item_id: u32) -> usize {
        self.stop_clock(item_id).map_or(0, |clock| clock.index)
    }

    /// Stop index of `item_id` in program `program_id`, current or not.
    ///
    /// Clocks of programs off screen keep the stop they were last on.
    #[must_use]
    pub fn stop_index_in(&self, program_id: u32, item_id: u32) -> usize {
        self.stop_clocks
            .get(&(program_id, item_id))
            .map_or(0, |clock| clock.index)
    }

    /// Seconds the current stop of `item_id` has been on screen.
    #[must_use]
    pub fn stop_elapsed_time(&self, item_id: u32) -> f32 {
        self.stop_clock(item_id).map_or(0.0, |clock| clock.elapsed)
    }

    /// Stop change animation of `item_id` in progress, if any.
    #[must_use]
    pub fn stop_transition(&self, item_id: u32) -> Option<StopTransition> {
        let item = self.current_program()?.item(item_id)?;
        if item.stops.animation == StopAnimation::None {
            return None;
        }
        let clock = self.stop_clock(item_id)?;
        let from_index = clock.previous?;
        let duration = clamp_stop_animation(item.stops.animation_duration_ms) as f32 / 1000.0;
        (clock.animation_elapsed < duration).then(|| StopTransition {
            from_index,
            to_index: clock.index,
            animation: item.stops.animation,
            progress: progress(clock.animation_elapsed, duration),
        })
    }

    fn stop_clock(&self, item_id: u32) -> Option<&StopClock> {
        let program = self.current_program()?;
        self.stop_clocks.get(&(program.id, item_id))
    }

    fn advance_on_timer(&mut self) {
        let count = self.programs.len();
        if self.current_index + 1 < count {
            self.switch_to(self.current_index + 1);
        } else if self.is_looping {
            self.switch_to(0);
        } else {
            self.is_playing = false;
            log::info!("reached last program {}, playback stopped", self.current_index);
        }
    }

    fn switch_to(&mut self, index: usize) {
        let from_index = self.current_index;
        self.current_index = index;
        self.program_elapsed = 0.0;
        if from_index == index {
            return;
        }
        log::info!("program {from_index} -> {index}");
        self.transition = self.programs.get(index).and_then(|program| {
            (program.transition != TransitionKind::None).then(|| ProgramTransition {
                from_index,
                to_index: index,
                kind: program.transition,
                duration_seconds: clamp_transition_duration(program.transition_duration_ms) as f32
                    / 1000.0,
                elapsed_seconds: 0.0,
            })
        });
    }
}

fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}
