use std::time::Duration;

use serde::Deserialize;

/// How a marker deviates from its resting style at some point of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerFrame {
    pub radius_delta: f32,
    pub fill_opacity: f32,
}

/// An animation applied to every marker after a render. Keeps the renderer
/// ignorant of timing and the model ignorant of the renderer.
pub trait MarkerAnimation {
    /// Style at `elapsed` time after the animation started.
    fn frame(&self, elapsed: Duration) -> MarkerFrame;

    fn is_finished(&self, elapsed: Duration) -> bool;
}

/// Grow and fade, then shrink and recover. Runs once and then rests.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pulse {
    pub phase_ms: u64,
    pub radius_delta: f32,
    pub opacity_delta: f32,
    pub fill_opacity: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            phase_ms: 1000,
            radius_delta: 2.0,
            opacity_delta: 0.2,
            fill_opacity: 0.7,
        }
    }
}

impl Pulse {
    fn phase(&self) -> Duration {
        Duration::from_millis(self.phase_ms)
    }

    fn resting(&self) -> MarkerFrame {
        MarkerFrame {
            radius_delta: 0.0,
            fill_opacity: self.fill_opacity,
        }
    }

    fn at(&self, amount: f32) -> MarkerFrame {
        MarkerFrame {
            radius_delta: self.radius_delta * amount,
            fill_opacity: self.fill_opacity - self.opacity_delta * amount,
        }
    }
}

impl MarkerAnimation for Pulse {
    #[allow(clippy::cast_possible_truncation)]
    fn frame(&self, elapsed: Duration) -> MarkerFrame {
        let phase = self.phase();
        if phase.is_zero() || self.is_finished(elapsed) {
            return self.resting();
        }
        if elapsed < phase {
            let t = elapsed.as_secs_f64() / phase.as_secs_f64();
            self.at(ease_cubic_in_out(t as f32))
        } else {
            let t = (elapsed - phase).as_secs_f64() / phase.as_secs_f64();
            self.at(1.0 - ease_cubic_in_out(t as f32))
        }
    }

    fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.phase() * 2
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
