#![forbid(unsafe_code)]

//! One growing spiral.
//!
//! A [`SpiralPath`] moves its tip along its heading every frame, bends the
//! heading by its angular acceleration, and slows down until its speed turns
//! negative. Pixels covered by the tip are queued until the controller drains
//! them.
//!
//! # Branch window
//!
//! For the first `branch_threshold` frames the path bends at half its angular
//! acceleration. After that it bends at full rate, and on the first frame past
//! the window it records a [`BranchPoint`] from which the controller may later
//! grow a new path.

use crate::color::PackedRgba;
use crate::raster;

/// Multiplicative speed decay applied every frame.
pub const SPEED_DECAY: f64 = 0.993;
/// Linear speed decay per unit of size, applied every frame.
pub const SPEED_DRAG: f64 = 0.0016;
/// Initial speed per unit of size.
pub const INITIAL_SPEED_FACTOR: f64 = 3.0;
/// Frames spent at half angular acceleration before a branch point is recorded.
pub const BRANCH_THRESHOLD_FRAMES: u32 = 25;

/// A rasterized pixel waiting to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
    pub color: PackedRgba,
}

/// Kinematic snapshot a branch can grow from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchPoint {
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    pub angular_acceleration: f64,
}

/// One frame of speed decay.
#[inline]
pub fn decay_speed(speed: f64, size: f64) -> f64 {
    speed * SPEED_DECAY - SPEED_DRAG * size
}

/// A single animated spiral.
#[derive(Debug, Clone)]
pub struct SpiralPath {
    root: (f64, f64),
    tip: (f64, f64),
    direction: f64,
    speed: f64,
    angular_acceleration: f64,
    size: f64,
    color: PackedRgba,
    branch_frames: u32,
    branch_threshold: u32,
    /// Latched once the branch point has been captured, so clearing it does
    /// not let it be captured again.
    branch_recorded: bool,
    branch_point: Option<BranchPoint>,
    stopped: bool,
    pending: Vec<Pixel>,
}

impl SpiralPath {
    /// Create a path rooted at `(x, y)` with initial speed `3 * size`.
    pub fn new(
        x: f64,
        y: f64,
        direction: f64,
        angular_acceleration: f64,
        size: f64,
        color: PackedRgba,
    ) -> Self {
        Self {
            root: (x, y),
            tip: (x, y),
            direction,
            speed: INITIAL_SPEED_FACTOR * size,
            angular_acceleration,
            size,
            color,
            branch_frames: 0,
            branch_threshold: BRANCH_THRESHOLD_FRAMES,
            branch_recorded: false,
            branch_point: None,
            stopped: false,
            pending: Vec::new(),
        }
    }

    /// Grow a new path out of a recorded branch point.
    ///
    /// The branch keeps the recorded heading and curls the opposite way:
    /// its angular acceleration is `-sign(recorded) * magnitude`.
    pub fn from_branch(point: BranchPoint, magnitude: f64, size: f64, color: PackedRgba) -> Self {
        let acceleration = -crate::random::sign(point.angular_acceleration) * magnitude;
        Self::new(point.x, point.y, point.direction, acceleration, size, color)
    }

    /// Override the number of half-rate frames before the branch point.
    #[must_use]
    pub fn with_branch_threshold(mut self, frames: u32) -> Self {
        self.branch_threshold = frames;
        self
    }

    /// Advance one frame: move, rasterize, decay, bend.
    pub fn advance(&mut self) {
        if self.stopped {
            return;
        }

        let (x1, y1) = self.tip;
        let x2 = x1 + self.speed * self.direction.cos();
        let y2 = y1 + self.speed * self.direction.sin();
        self.tip = (x2, y2);

        let color = self.color;
        let pending = &mut self.pending;
        raster::line_samples(x1, y1, x2, y2, |x, y| pending.push(Pixel { x, y, color }));

        self.speed = decay_speed(self.speed, self.size);

        if self.branch_frames < self.branch_threshold {
            self.branch_frames += 1;
            self.direction += self.angular_acceleration / 2.0;
        } else {
            self.direction += self.angular_acceleration;
            if !self.branch_recorded {
                self.branch_recorded = true;
                self.branch_point = Some(BranchPoint {
                    x: x2,
                    y: y2,
                    direction: self.direction,
                    angular_acceleration: self.angular_acceleration,
                });
            }
        }
    }

    /// Hand over every queued pixel, oldest first. The queue is empty afterwards.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Pixel> {
        self.pending.drain(..)
    }

    /// Number of pixels queued since the last drain.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Stop the path. It keeps its state but no longer advances.
    #[inline]
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Remove and return the recorded branch point, if any.
    #[inline]
    pub fn take_branch_point(&mut self) -> Option<BranchPoint> {
        self.branch_point.take()
    }

    #[inline]
    pub fn branch_point(&self) -> Option<BranchPoint> {
        self.branch_point
    }

    #[inline]
    pub fn root(&self) -> (f64, f64) {
        self.root
    }

    #[inline]
    pub fn tip(&self) -> (f64, f64) {
        self.tip
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    /// Size multiplier; scales initial speed and linear drag.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn color(&self) -> PackedRgba {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const RED: PackedRgba = PackedRgba::rgb(255, 0, 0);

    fn path(size: f64) -> SpiralPath {
        SpiralPath::new(10.0, 10.0, 0.0, 0.05, size, RED)
    }

    #[test]
    fn initial_speed_scales_with_size() {
        let p = path(0.32);
        assert!((p.speed() - 0.96).abs() < 1e-12);
        assert_eq!(p.root(), p.tip());
    }

    #[test]
    fn advance_moves_tip_along_heading() {
        let mut p = SpiralPath::new(0.0, 0.0, FRAC_PI_2, 0.0, 1.0, RED);
        p.advance();
        let (x, y) = p.tip();
        assert!(x.abs() < 1e-9);
        assert!((y - 3.0).abs() < 1e-9);
        assert_eq!(p.root(), (0.0, 0.0));
    }

    #[test]
    fn advance_queues_segment_pixels() {
        let mut p = SpiralPath::new(0.0, 0.0, 0.0, 0.0, 1.0, RED);
        p.advance();
        let pixels: Vec<Pixel> = p.drain().collect();
        let expected: Vec<(i32, i32)> = raster::line_points(0.0, 0.0, 3.0, 0.0);
        assert_eq!(pixels.len(), expected.len());
        assert!(pixels.iter().all(|px| px.color == RED));
        assert_eq!(
            pixels.iter().map(|px| (px.x, px.y)).collect::<Vec<_>>(),
            expected
        );
        assert_eq!(p.pending_len(), 0);
    }

    #[test]
    fn pending_accumulates_until_drained() {
        let mut p = path(0.3);
        p.advance();
        let after_one = p.pending_len();
        p.advance();
        assert!(p.pending_len() > after_one);
        let drained = p.drain().count();
        assert!(drained > 0);
        assert_eq!(p.pending_len(), 0);
    }

    #[test]
    fn speed_follows_decay_recurrence() {
        let size = 0.31;
        let mut p = path(size);
        let mut expected = INITIAL_SPEED_FACTOR * size;
        for _ in 0..200 {
            p.advance();
            expected = expected * 0.993 - 0.0016 * size;
            assert!((p.speed() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn half_rate_bend_inside_window() {
        let mut p = SpiralPath::new(0.0, 0.0, 0.0, 0.1, 0.3, RED);
        for _ in 0..BRANCH_THRESHOLD_FRAMES {
            p.advance();
        }
        let expected = 0.05 * BRANCH_THRESHOLD_FRAMES as f64;
        assert!((p.direction() - expected).abs() < 1e-9);
        assert!(p.branch_point().is_none());

        p.advance();
        assert!((p.direction() - (expected + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn branch_point_recorded_once_after_window() {
        let mut p = SpiralPath::new(0.0, 0.0, 0.0, -0.05, 0.3, RED);
        for _ in 0..BRANCH_THRESHOLD_FRAMES {
            p.advance();
        }
        assert!(p.branch_point().is_none());
        p.advance();
        let bp = p.branch_point().expect("branch point after window");
        assert_eq!((bp.x, bp.y), p.tip());
        assert_eq!(bp.direction, p.direction());
        assert_eq!(bp.angular_acceleration, -0.05);

        assert_eq!(p.take_branch_point(), Some(bp));
        for _ in 0..50 {
            p.advance();
        }
        assert!(p.branch_point().is_none(), "branch point must not re-arm");
    }

    #[test]
    fn custom_threshold_shortens_window() {
        let mut p = path(0.3).with_branch_threshold(0);
        p.advance();
        assert!(p.branch_point().is_some());
    }

    #[test]
    fn stopped_path_is_inert() {
        let mut p = path(0.3);
        p.stop();
        let before = (p.tip(), p.speed(), p.direction());
        p.advance();
        assert_eq!(before, (p.tip(), p.speed(), p.direction()));
        assert_eq!(p.pending_len(), 0);
    }

    #[test]
    fn branch_inverts_curl() {
        let bp = BranchPoint {
            x: 4.0,
            y: 5.0,
            direction: 1.25,
            angular_acceleration: 0.05,
        };
        let b = SpiralPath::from_branch(bp, 0.05, 0.33, RED);
        assert_eq!(b.root(), (4.0, 5.0));
        assert_eq!(b.direction(), 1.25);
        assert_eq!(b.angular_acceleration(), -0.05);
        assert!((b.speed() - 0.99).abs() < 1e-12);

        let back = SpiralPath::from_branch(
            BranchPoint {
                angular_acceleration: -0.02,
                ..bp
            },
            0.05,
            0.3,
            RED,
        );
        assert_eq!(back.angular_acceleration(), 0.05);
    }
}
