//! Fixed-timestep accumulator
//!
//! Decouples simulation determinism from display refresh rate: wall-clock
//! frame deltas are clamped, accumulated, and drained as whole fixed ticks.
//! Leftover time carries to the next frame.

use crate::consts::*;

/// Drains real-time deltas into fixed simulation ticks
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    accumulator: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Feed one frame's elapsed wall time; returns how many fixed ticks to
    /// run. The delta is clamped and the drain is bounded by MAX_SUBSTEPS
    /// so a long stall cannot trigger catch-up spiral.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        // Anything beyond the substep bound is dropped, not owed
        if self.accumulator >= SIM_DT {
            self.accumulator = self.accumulator % SIM_DT;
        }
        ticks
    }

    /// Discard accumulated time (on restart / teardown)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
