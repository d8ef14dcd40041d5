//! Base Runner headless demo
//!
//! Plays one run with a simple autopilot at a simulated 60 Hz display and
//! prints the run summary as JSON.
//!
//! Usage: `base-runner [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use base_runner::consts::SIM_DT;
    use base_runner::sim::{RunStats, Snapshot};
    use base_runner::{Runner, Tuning};

    /// Give up after ten simulated minutes
    const MAX_DISPLAY_FRAMES: u32 = 60 * 60 * 10;
    /// Look-ahead (in frames of travel) at which the autopilot jumps
    const JUMP_LEAD_FRAMES: f32 = 7.0;
    /// Frames the jump button stays down
    const JUMP_HOLD_FRAMES: u32 = 12;

    fn load_tuning() -> Tuning {
        let Some(path) = std::env::args().nth(1) else {
            return Tuning::default();
        };
        match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Falling back to default tuning: {e}");
                Tuning::default()
            }
        }
    }

    /// Jump when the nearest obstacle ahead is about to reach the player
    fn should_jump(snap: &Snapshot) -> bool {
        let player = &snap.player.rect;
        snap.obstacles
            .iter()
            .map(|o| o.rect.pos.x - player.right())
            .filter(|gap| *gap >= 0.0)
            .fold(None, |nearest: Option<f32>, gap| Some(nearest.map_or(gap, |n| n.min(gap))))
            .is_some_and(|gap| gap < snap.speed * JUMP_LEAD_FRAMES)
    }

    pub fn run() {
        let tuning = load_tuning();
        let summary: Rc<RefCell<Option<RunStats>>> = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&summary);
        let mut runner = Runner::new(tuning, move |score: f64, stats: &RunStats| {
            log::info!("Final score {score:.0}");
            *sink.borrow_mut() = Some(stats.clone());
        });

        let mut hold = 0;
        for _ in 0..MAX_DISPLAY_FRAMES {
            let Some(snap) = runner.advance(SIM_DT) else {
                continue;
            };
            if runner.is_finished() {
                break;
            }

            if hold > 0 {
                hold -= 1;
                if hold == 0 {
                    runner.jump_released();
                }
            } else if !snap.player.is_jumping && should_jump(&snap) {
                runner.jump_pressed();
                hold = JUMP_HOLD_FRAMES;
            }
        }

        let stats = summary
            .borrow_mut()
            .take()
            .unwrap_or_else(|| {
                log::info!("Autopilot survived; stopping");
                runner.state().stats(runner.wall_secs())
            });

        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not encode run summary: {e}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Base Runner (headless) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `Runner` directly; nothing to do here
}
