//! Fixed-timestep accumulator for the game loop.
//!
//! Rendered frames take whatever time they take; the world always advances in
//! steps of exactly `step` seconds. Wall time is banked every frame and spent
//! one step at a time.

use log::{debug, warn};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulated: f64,
    paused: bool,
}

impl FixedTimestep {
    pub fn new(step: f32, max_steps: u32) -> Self {
        FixedTimestep {
            step,
            max_steps: max_steps.max(1),
            accumulated: 0.0,
            paused: false,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flips pause and drops any banked time.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.accumulated = 0.0;
        debug!("simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Banks exactly one step, paused or not.
    pub fn single_step(&mut self) {
        self.accumulated += f64::from(self.step);
    }

    /// Banks `elapsed` seconds of wall time (ignored while paused) and returns
    /// how many steps to run now.
    ///
    /// Steps are taken while strictly more than one step is banked. When more
    /// than `max_steps` are due the surplus is dropped so a slow frame cannot
    /// snowball.
    pub fn advance(&mut self, elapsed: f64) -> u32 {
        if !self.paused {
            self.accumulated += elapsed.max(0.0);
        }

        let step = f64::from(self.step);
        let mut steps = 0;
        while self.accumulated > step {
            if steps == self.max_steps {
                warn!(
                    "simulation falling behind, dropping {:.3}s",
                    self.accumulated
                );
                self.accumulated = 0.0;
                break;
            }
            self.accumulated -= step;
            steps += 1;
        }
        steps
    }
}
