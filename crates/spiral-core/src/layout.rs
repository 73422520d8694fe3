#![forbid(unsafe_code)]

//! Initial spiral arrangements.
//!
//! A [`Layout`] expands into a list of [`PlannedSpiral`]s, each with a start
//! delay measured in virtual time (frames converted through the configured
//! frame rate). Delays are listed in non-decreasing order.

use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

/// Which curl a planned spiral gets.
///
/// The buffer's y axis points down, so a positive angular acceleration turns
/// the heading clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curl {
    Clockwise,
    CounterClockwise,
}

impl Curl {
    /// Signed angular acceleration for a given magnitude.
    #[inline]
    pub fn acceleration(self, magnitude: f64) -> f64 {
        match self {
            Self::Clockwise => magnitude.abs(),
            Self::CounterClockwise => -magnitude.abs(),
        }
    }
}

/// One spiral to create, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedSpiral {
    pub delay: Duration,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    pub curl: Curl,
}

/// Initial arrangement of spirals on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// No spirals; paths are added by the caller.
    Empty,
    /// One spiral rooted at the middle of the bottom edge, heading right.
    #[default]
    SingleSpiral,
    /// Four spirals from the centre, started 0, 1000, 1500 and 2000 ms apart.
    FourSpiral,
}

/// Start delays of the four-spiral layout.
pub const FOUR_SPIRAL_DELAYS_MS: [u64; 4] = [0, 1000, 1500, 2000];

impl Layout {
    /// Expand into planned spirals for a `width` x `height` surface.
    pub fn plan(self, width: u32, height: u32) -> Vec<PlannedSpiral> {
        let w = f64::from(width);
        let h = f64::from(height);
        match self {
            Self::Empty => Vec::new(),
            Self::SingleSpiral => vec![PlannedSpiral {
                delay: Duration::ZERO,
                x: (w / 2.0).floor(),
                y: h,
                direction: 0.0,
                curl: Curl::CounterClockwise,
            }],
            Self::FourSpiral => {
                let cx = (w / 2.0).floor();
                let cy = (h / 2.0).floor();
                let headings = [0.0, PI, FRAC_PI_2, -FRAC_PI_2];
                let curls = [
                    Curl::Clockwise,
                    Curl::CounterClockwise,
                    Curl::Clockwise,
                    Curl::CounterClockwise,
                ];
                FOUR_SPIRAL_DELAYS_MS
                    .iter()
                    .zip(headings)
                    .zip(curls)
                    .map(|((&ms, direction), curl)| PlannedSpiral {
                        delay: Duration::from_millis(ms),
                        x: cx,
                        y: cy,
                        direction,
                        curl,
                    })
                    .collect()
            }
        }
    }

    /// Parse a layout name: `single`, `four`, or `empty`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "single" | "one" | "1" => Some(Self::SingleSpiral),
            "four" | "4" => Some(Self::FourSpiral),
            "empty" | "none" => Some(Self::Empty),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spiral_roots_at_bottom_centre() {
        let plan = Layout::SingleSpiral.plan(100, 100);
        assert_eq!(plan.len(), 1);
        let s = plan[0];
        assert_eq!((s.x, s.y), (50.0, 100.0));
        assert_eq!(s.direction, 0.0);
        assert_eq!(s.delay, Duration::ZERO);
    }

    #[test]
    fn four_spiral_is_staggered_and_balanced() {
        let plan = Layout::FourSpiral.plan(81, 41);
        assert_eq!(plan.len(), 4);
        let delays: Vec<u64> = plan.iter().map(|p| p.delay.as_millis() as u64).collect();
        assert_eq!(delays, FOUR_SPIRAL_DELAYS_MS);
        assert!(plan.iter().all(|p| (p.x, p.y) == (40.0, 20.0)));
        let cw = plan.iter().filter(|p| p.curl == Curl::Clockwise).count();
        assert_eq!(cw, 2);
    }

    #[test]
    fn curl_sign() {
        assert_eq!(Curl::Clockwise.acceleration(0.05), 0.05);
        assert_eq!(Curl::CounterClockwise.acceleration(0.05), -0.05);
        assert_eq!(Curl::Clockwise.acceleration(-0.05), 0.05);
    }

    #[test]
    fn empty_plans_nothing() {
        assert!(Layout::Empty.plan(10, 10).is_empty());
    }

    #[test]
    fn names() {
        assert_eq!(Layout::from_name("Four"), Some(Layout::FourSpiral));
        assert_eq!(Layout::from_name("single"), Some(Layout::SingleSpiral));
        assert_eq!(Layout::from_name("empty"), Some(Layout::Empty));
        assert_eq!(Layout::from_name("spiral"), None);
    }
}
