//! Host-facing frame driver
//!
//! The host calls [`Runner::advance`] once per display refresh with the
//! elapsed wall time. The runner clamps it, runs whole fixed steps, forwards
//! notifications to its [`RunListener`] and reports the end of the run once.

use rand_pcg::Pcg32;

use crate::clamp_frame_dt;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::random::{RandomSource, entropy_rng};
use crate::sim::snapshot::Snapshot;
use crate::sim::state::{GameEvent, GamePhase, RunState, RunStats};
use crate::sim::tick::{TickInput, tick, toggle_pause};
use crate::tuning::Tuning;

/// Receives run notifications. Every method defaults to a no-op.
pub trait RunListener {
    /// Score, lives, multiplier, pickups, hits and lifecycle changes
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called exactly once, after the last simulation step of the run
    fn on_run_end(&mut self, _final_score: f64, _stats: &RunStats) {}
}

/// A plain closure works as a termination callback
impl<F: FnMut(f64, &RunStats)> RunListener for F {
    fn on_run_end(&mut self, final_score: f64, stats: &RunStats) {
        self(final_score, stats)
    }
}

/// Drives one run from countdown to game over
pub struct Runner<L: RunListener, R: RandomSource = Pcg32> {
    state: RunState,
    tuning: Tuning,
    rng: R,
    listener: L,
    accumulator: f32,
    /// One-shot inputs waiting for the next step
    input: TickInput,
    /// Raw wall time since the countdown finished
    wall_secs: f32,
    summary_sent: bool,
}

impl<L: RunListener> Runner<L> {
    /// New run with an entropy-seeded generator
    pub fn new(tuning: Tuning, listener: L) -> Self {
        Self::with_rng(tuning, listener, entropy_rng())
    }
}

impl<L: RunListener, R: RandomSource> Runner<L, R> {
    pub fn with_rng(tuning: Tuning, listener: L, rng: R) -> Self {
        Self {
            state: RunState::new(&tuning),
            tuning,
            rng,
            listener,
            accumulator: 0.0,
            input: TickInput::default(),
            wall_secs: 0.0,
            summary_sent: false,
        }
    }

    /// Jump button down; dropped unless running
    pub fn jump_pressed(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.input.jump_pressed = true;
        }
    }

    /// Jump button up; dropped unless running
    pub fn jump_released(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.input.jump_released = true;
        }
    }

    /// Queue a pause toggle for the next frame
    pub fn toggle_pause(&mut self) {
        if matches!(self.state.phase, GamePhase::Running | GamePhase::Paused) {
            self.input.pause = !self.input.pause;
        }
    }

    /// Advance by the host-measured `elapsed` seconds.
    ///
    /// Returns the frame's snapshot, or `None` during the countdown.
    pub fn advance(&mut self, elapsed: f32) -> Option<Snapshot> {
        if self.state.phase != GamePhase::Starting && elapsed.is_finite() && elapsed > 0.0 {
            self.wall_secs += elapsed;
        }
        if elapsed > MAX_FRAME_DT {
            log::warn!("Frame delta {elapsed:.3}s clamped to {MAX_FRAME_DT}s");
        }
        let mut dt = clamp_frame_dt(elapsed);

        if std::mem::take(&mut self.input.pause) {
            let resuming = self.state.phase == GamePhase::Paused;
            if toggle_pause(&mut self.state) && resuming {
                // Time spent across the pause boundary is dropped
                self.accumulator = 0.0;
                dt = 0.0;
            }
        }

        if matches!(self.state.phase, GamePhase::Starting | GamePhase::Running) {
            self.step(dt);
        }

        self.dispatch_events();
        self.finish_if_ended();

        (self.state.phase != GamePhase::Starting).then(|| Snapshot::capture(&self.state, &self.tuning))
    }

    fn step(&mut self, dt: f32) {
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.tuning, &mut self.rng, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            if self.state.phase == GamePhase::Ended {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            self.listener.on_event(&event);
        }
    }

    fn finish_if_ended(&mut self) {
        if self.state.phase != GamePhase::Ended || self.summary_sent {
            return;
        }
        self.summary_sent = true;
        let stats = self.state.stats(self.wall_secs);
        log::info!("Run summary: {stats:?}");
        self.listener.on_run_end(stats.score, &stats);
    }

    /// Countdown number while starting: 3, 2, 1, then 0 for "GO"
    pub fn countdown(&self) -> Option<u32> {
        self.state.countdown_display(&self.tuning)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Wall-clock seconds since the countdown finished, pauses included
    pub fn wall_secs(&self) -> f32 {
        self.wall_secs
    }

    pub fn is_finished(&self) -> bool {
        self.summary_sent
    }
}
