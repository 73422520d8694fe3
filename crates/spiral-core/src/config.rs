#![forbid(unsafe_code)]

//! Animation configuration.

use std::fmt;
use std::time::Duration;

use crate::color::PackedRgba;
use crate::path::BRANCH_THRESHOLD_FRAMES;

/// Highest accepted frame rate.
pub const MAX_FRAMES_PER_SECOND: u32 = 1000;

/// Tunables for a [`SurfaceController`](crate::SurfaceController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralConfig {
    /// Tick rate used by `start`, and the clock for staggered start-ups.
    pub frames_per_second: u32,
    /// Color for layout-created paths instead of a random one.
    pub initial_color: Option<PackedRgba>,
    /// Magnitude of every path's angular acceleration (radians per frame²).
    pub angular_accel_magnitude: f64,
    /// Per-frame chance that a recorded branch point spawns a branch.
    pub branch_probability: f64,
    /// Half-rate frames before a path records its branch point.
    pub branch_threshold_frames: u32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            initial_color: None,
            angular_accel_magnitude: 0.05,
            branch_probability: 0.001,
            branch_threshold_frames: BRANCH_THRESHOLD_FRAMES,
        }
    }
}

impl SpiralConfig {
    #[must_use]
    pub fn with_frames_per_second(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    #[must_use]
    pub fn with_initial_color(mut self, color: PackedRgba) -> Self {
        self.initial_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_angular_accel_magnitude(mut self, magnitude: f64) -> Self {
        self.angular_accel_magnitude = magnitude;
        self
    }

    #[must_use]
    pub fn with_branch_probability(mut self, probability: f64) -> Self {
        self.branch_probability = probability;
        self
    }

    #[must_use]
    pub fn with_branch_threshold_frames(mut self, frames: u32) -> Self {
        self.branch_threshold_frames = frames;
        self
    }

    /// Time between frames at the configured rate.
    ///
    /// Assumes a validated config; a zero rate is treated as 1 fps.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frames_per_second.max(1)
    }

    /// Virtual milliseconds elapsed after `frames` frames.
    pub fn virtual_millis(&self, frames: u64) -> u64 {
        frames.saturating_mul(1000) / u64::from(self.frames_per_second.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames_per_second == 0 || self.frames_per_second > MAX_FRAMES_PER_SECOND {
            return Err(ConfigError::FrameRate(self.frames_per_second));
        }
        if !self.angular_accel_magnitude.is_finite() {
            return Err(ConfigError::AngularAcceleration(self.angular_accel_magnitude));
        }
        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(ConfigError::BranchProbability(self.branch_probability));
        }
        Ok(())
    }
}

/// Configuration rejected by [`SpiralConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    FrameRate(u32),
    AngularAcceleration(f64),
    BranchProbability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameRate(fps) => write!(
                f,
                "frames per second must be in 1..={MAX_FRAMES_PER_SECOND}, got {fps}"
            ),
            Self::AngularAcceleration(v) => {
                write!(f, "angular acceleration magnitude must be finite, got {v}")
            }
            Self::BranchProbability(p) => {
                write!(f, "branch probability must be in [0, 1], got {p}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_visual_contract() {
        let cfg = SpiralConfig::default();
        assert_eq!(cfg.frames_per_second, 60);
        assert_eq!(cfg.initial_color, None);
        assert_eq!(cfg.angular_accel_magnitude, 0.05);
        assert_eq!(cfg.branch_probability, 0.001);
        assert_eq!(cfg.branch_threshold_frames, 25);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn builders_set_fields() {
        let cfg = SpiralConfig::default()
            .with_frames_per_second(30)
            .with_initial_color(PackedRgba::WHITE)
            .with_angular_accel_magnitude(0.1)
            .with_branch_probability(0.5)
            .with_branch_threshold_frames(10);
        assert_eq!(cfg.frames_per_second, 30);
        assert_eq!(cfg.initial_color, Some(PackedRgba::WHITE));
        assert_eq!(cfg.angular_accel_magnitude, 0.1);
        assert_eq!(cfg.branch_probability, 0.5);
        assert_eq!(cfg.branch_threshold_frames, 10);
    }

    #[test]
    fn rejects_bad_values() {
        let base = SpiralConfig::default();
        assert_eq!(
            base.with_frames_per_second(0).validate(),
            Err(ConfigError::FrameRate(0))
        );
        assert_eq!(
            base.with_frames_per_second(5000).validate(),
            Err(ConfigError::FrameRate(5000))
        );
        assert!(matches!(
            base.with_angular_accel_magnitude(f64::INFINITY).validate(),
            Err(ConfigError::AngularAcceleration(_))
        ));
        assert!(matches!(
            base.with_branch_probability(1.5).validate(),
            Err(ConfigError::BranchProbability(_))
        ));
        assert!(matches!(
            base.with_branch_probability(f64::NAN).validate(),
            Err(ConfigError::BranchProbability(_))
        ));
    }

    #[test]
    fn timing_helpers() {
        let cfg = SpiralConfig::default();
        assert_eq!(cfg.frame_interval(), Duration::from_secs(1) / 60);
        assert_eq!(cfg.virtual_millis(60), 1000);
        assert_eq!(cfg.virtual_millis(90), 1500);
        assert_eq!(cfg.virtual_millis(0), 0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::BranchProbability(2.0).to_string(),
            "branch probability must be in [0, 1], got 2"
        );
    }
}
