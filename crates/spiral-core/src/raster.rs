#![forbid(unsafe_code)]

//! Half-step DDA line rasterizer.
//!
//! Samples a segment every half pixel along its major axis and snaps each
//! sample to the nearest pixel. The sampled interval is half-open: the
//! sample that would land exactly on the far endpoint is never taken, so the
//! terminal pixel of a segment is not guaranteed to be emitted. Consecutive
//! segments of a path share that endpoint, which hides the gap in practice.

/// Distance between consecutive samples along the major axis.
pub const RASTER_STEP: f64 = 0.5;

/// Snap a coordinate to the nearest pixel, rounding halves upward.
///
/// Halves go toward +inf on both sides of zero so the grid is uniform for
/// negative (off-canvas) coordinates as well.
#[inline]
pub fn snap(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Visit every raw sample position of the segment `(x1, y1) -> (x2, y2)`.
///
/// Samples are visited from the smaller to the larger coordinate on the major
/// axis, which may be the reverse of the segment's direction. Every sample
/// lies strictly before the far bound on that axis. Zero-length and
/// non-finite segments produce no samples.
pub fn walk_samples(x1: f64, y1: f64, x2: f64, y2: f64, mut visit: impl FnMut(f64, f64)) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if !dx.is_finite() || !dy.is_finite() {
        return;
    }

    if dx.abs() >= dy.abs() {
        let (sx, sy, ex) = if x1 <= x2 { (x1, y1, x2) } else { (x2, y2, x1) };
        if dx == 0.0 {
            return;
        }
        let minor_step = RASTER_STEP * dy / dx;
        let mut x = sx;
        let mut y = sy;
        while x < ex {
            visit(x, y);
            x += RASTER_STEP;
            y += minor_step;
        }
    } else {
        let (sx, sy, ey) = if y1 <= y2 { (x1, y1, y2) } else { (x2, y2, y1) };
        let minor_step = RASTER_STEP * dx / dy;
        let mut x = sx;
        let mut y = sy;
        while y < ey {
            visit(x, y);
            y += RASTER_STEP;
            x += minor_step;
        }
    }
}

/// Visit every pixel sample of a segment: [`walk_samples`] snapped with
/// [`snap`].
///
/// The interval is open on the sample positions, not on the pixels. A last
/// sample half a pixel before the bound rounds up onto the bound's pixel.
#[inline]
pub fn line_samples(x1: f64, y1: f64, x2: f64, y2: f64, mut visit: impl FnMut(i32, i32)) {
    walk_samples(x1, y1, x2, y2, |x, y| visit(snap(x), snap(y)));
}

/// Collect the pixel samples of a segment into a vector.
pub fn line_points(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    line_samples(x1, y1, x2, y2, |x, y| out.push((x, y)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_has_twenty_snapped_samples() {
        let pts = line_points(0.0, 0.0, 10.0, 0.0);
        assert_eq!(pts.len(), 20);
        assert!(pts.iter().all(|&(_, y)| y == 0));
        let xs: Vec<i32> = pts.iter().map(|&(x, _)| x).collect();
        let expected: Vec<i32> = (0..20).map(|k| snap(k as f64 * 0.5)).collect();
        assert_eq!(xs, expected);
    }

    #[test]
    fn horizontal_samples_stop_before_far_bound() {
        let mut xs = Vec::new();
        walk_samples(0.0, 0.0, 10.0, 0.0, |x, y| {
            assert_eq!(y, 0.0);
            xs.push(x);
        });
        assert_eq!(xs.len(), 20);
        assert_eq!(xs.first(), Some(&0.0));
        assert_eq!(xs.last(), Some(&9.5));
        assert!(xs.iter().all(|&x| x < 10.0));
        // 9.5 rounds half-up onto the bound's pixel.
        assert_eq!(line_points(0.0, 0.0, 10.0, 0.0).last(), Some(&(10, 0)));
    }

    #[test]
    fn diagonal_follows_identity() {
        let pts = line_points(0.0, 0.0, 4.0, 4.0);
        assert_eq!(pts.len(), 8);
        for (x, y) in pts {
            assert!((x - y).abs() <= 1, "({x}, {y}) strays from y = x");
        }
    }

    #[test]
    fn reversed_segment_is_normalized() {
        let fwd = line_points(2.0, 1.0, 9.0, 4.0);
        let rev = line_points(9.0, 4.0, 2.0, 1.0);
        assert_eq!(fwd, rev);
        assert_eq!(fwd.first(), Some(&(2, 1)));
    }

    #[test]
    fn steep_segment_steps_on_y() {
        let pts = line_points(0.0, 0.0, 1.0, 6.0);
        assert_eq!(pts.len(), 12);
        let ys: Vec<i32> = pts.iter().map(|&(_, y)| y).collect();
        assert!(ys.windows(2).all(|w| w[0] <= w[1]));
        assert!(pts.iter().all(|&(x, _)| (0..=1).contains(&x)));
    }

    #[test]
    fn degenerate_segment_is_empty() {
        assert!(line_points(3.0, 3.0, 3.0, 3.0).is_empty());
        assert!(line_points(0.0, 0.0, f64::NAN, 1.0).is_empty());
    }

    #[test]
    fn short_segment_emits_start_only() {
        assert_eq!(line_points(5.0, 5.0, 5.4, 5.0), vec![(5, 5)]);
    }

    #[test]
    fn snap_rounds_halves_up() {
        assert_eq!(snap(0.5), 1);
        assert_eq!(snap(1.49), 1);
        assert_eq!(snap(-0.5), 0);
        assert_eq!(snap(-1.5), -1);
        assert_eq!(snap(-1.6), -2);
    }
}
