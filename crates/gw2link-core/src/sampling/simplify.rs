//! Polyline simplification for position trails.
//!
//! Douglas-Peucker over integer minimap points, optionally preceded by a
//! radial-distance pass that drops points closer than `tolerance` to the
//! last kept point. Endpoints are always kept.

type Point = [i64; 2];

/// Reduce a polyline to the points that deviate more than `tolerance`
/// from the simplified shape.
///
/// With `highest_quality` unset, a cheaper radial-distance pass runs first;
/// the result is coarser but much faster on dense trails. Fewer than two
/// points are returned unchanged.
///
/// # Examples
/// ```
/// use gw2link_core::simplify;
///
/// let points = [[0, 0], [5, 0], [10, 0], [10, 10]];
/// assert_eq!(simplify(&points, 1, true), vec![[0, 0], [10, 0], [10, 10]]);
/// ```
pub fn simplify(points: &[Point], tolerance: i64, highest_quality: bool) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let sq_tolerance = i128::from(tolerance) * i128::from(tolerance);
    if highest_quality {
        douglas_peucker(points, sq_tolerance)
    } else {
        let reduced = radial_distance(points, sq_tolerance);
        douglas_peucker(&reduced, sq_tolerance)
    }
}

fn square_distance(a: Point, b: Point) -> i128 {
    let dx = i128::from(a[0]) - i128::from(b[0]);
    let dy = i128::from(a[1]) - i128::from(b[1]);
    dx * dx + dy * dy
}

/// Squared distance from `p` to the segment `a`-`b`, truncated to an integer.
fn square_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (p[0] as f64, p[1] as f64);
    let (mut x, mut y) = (a[0] as f64, a[1] as f64);
    let dx = b[0] as f64 - x;
    let dy = b[1] as f64 - y;

    if dx != 0.0 || dy != 0.0 {
        let t = ((px - x) * dx + (py - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b[0] as f64;
            y = b[1] as f64;
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }

    let dx = px - x;
    let dy = py - y;
    (dx * dx + dy * dy).trunc()
}

fn radial_distance(points: &[Point], sq_tolerance: i128) -> Vec<Point> {
    let mut prev = points[0];
    let mut kept = vec![prev];
    for &point in &points[1..] {
        if square_distance(point, prev) > sq_tolerance {
            kept.push(point);
            prev = point;
        }
    }

    let last = points[points.len() - 1];
    if prev != last {
        kept.push(last);
    }
    kept
}

fn douglas_peucker(points: &[Point], sq_tolerance: i128) -> Vec<Point> {
    let last = points.len() - 1;
    let sq_tolerance = sq_tolerance as f64;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut pending = vec![(0, last)];
    while let Some((first, last)) = pending.pop() {
        let mut max_distance = 0.0;
        let mut index = first;
        for (i, &point) in points.iter().enumerate().take(last).skip(first + 1) {
            let distance = square_segment_distance(point, points[first], points[last]);
            if distance > max_distance {
                index = i;
                max_distance = distance;
            }
        }

        if max_distance > sq_tolerance {
            keep[index] = true;
            pending.push((first, index));
            pending.push((index, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&point, kept)| kept.then_some(point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{radial_distance, simplify};

    #[test]
    fn short_input_is_unchanged() {
        assert_eq!(simplify(&[], 5, true), Vec::<[i64; 2]>::new());
        assert_eq!(simplify(&[[3, 4]], 5, true), vec![[3, 4]]);
    }

    #[test]
    fn collinear_run_collapses_to_endpoints() {
        let points: Vec<[i64; 2]> = (0..20).map(|i| [i * 3, i * 2]).collect();
        assert_eq!(simplify(&points, 1, true), vec![[0, 0], [57, 38]]);
        assert_eq!(simplify(&points, 1, false), vec![[0, 0], [57, 38]]);
    }

    #[test]
    fn spike_above_tolerance_is_kept() {
        let points = [[0, 0], [10, 0], [20, 15], [30, 0], [40, 0]];
        assert_eq!(
            simplify(&points, 7, true),
            vec![[0, 0], [20, 15], [40, 0]]
        );
    }

    #[test]
    fn spike_within_tolerance_is_dropped() {
        let points = [[0, 0], [10, 0], [20, 3], [30, 0], [40, 0]];
        assert_eq!(simplify(&points, 5, true), vec![[0, 0], [40, 0]]);
    }

    #[test]
    fn two_points_are_kept() {
        assert_eq!(simplify(&[[0, 0], [0, 0]], 10, true), vec![[0, 0], [0, 0]]);
    }

    #[test]
    fn radial_pass_drops_close_points_and_keeps_last() {
        let points = [[0, 0], [1, 0], [2, 0], [10, 0], [11, 0]];
        // Squared tolerance 9: [1,0] and [2,0] are within reach of [0,0].
        assert_eq!(
            radial_distance(&points, 9),
            vec![[0, 0], [10, 0], [11, 0]]
        );
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let points = [[i64::MIN, 0], [0, 0], [i64::MAX, 0]];
        assert_eq!(
            simplify(&points, 1, false),
            vec![[i64::MIN, 0], [i64::MAX, 0]]
        );
    }
}
