//! Ramer-Douglas-Peucker polyline simplification.
//!
//! Reduces a dense point sequence to the subset of points needed to stay
//! within `tolerance` of the original shape. The first and last points are
//! always retained and input order is preserved.

use bevy::math::Vec2;

/// Tolerance used for fragment and target outlines.
pub const DEFAULT_TOLERANCE: f32 = 1.0;

/// Simplifies an ordered point sequence.
///
/// Sequences of three points or fewer are returned unchanged. A span is split
/// at its furthest interior point when that distance is at least `tolerance`,
/// otherwise it collapses to its two endpoints. Ties keep the earliest point.
///
/// Spans are processed with an explicit stack, so dense outlines cannot
/// exhaust the call stack.
pub fn simplify(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
  if points.len() <= 3 {
    return points.to_vec();
  }

  let mut keep = vec![false; points.len()];
  keep[0] = true;
  keep[points.len() - 1] = true;

  let mut spans = vec![(0, points.len() - 1)];
  while let Some((start, end)) = spans.pop() {
    if let Some(split) = furthest_point(points, start, end, tolerance) {
      keep[split] = true;
      spans.push((split, end));
      spans.push((start, split));
    }
  }

  points
    .iter()
    .zip(keep)
    .filter_map(|(&p, k)| k.then_some(p))
    .collect()
}

/// Index of the interior point that forces a split, if any.
fn furthest_point(points: &[Vec2], start: usize, end: usize, tolerance: f32) -> Option<usize> {
  let (first, last) = (points[start], points[end]);
  let mut max_dist = 0.0f32;
  let mut max_idx = None;

  for (i, &point) in points.iter().enumerate().take(end).skip(start + 1) {
    let dist = perpendicular_distance(point, first, last);
    if dist > max_dist {
      max_dist = dist;
      max_idx = Some(i);
    }
  }

  max_idx.filter(|_| max_dist >= tolerance)
}

/// Distance from `point` to the infinite line through `line_start` and
/// `line_end`.
///
/// A degenerate line falls back to the distance to `line_start`.
pub fn perpendicular_distance(point: Vec2, line_start: Vec2, line_end: Vec2) -> f32 {
  if line_start == line_end {
    return point.distance(line_start);
  }

  let line_vec = line_end - line_start;
  line_vec.perp_dot(point - line_start).abs() / line_vec.length()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn zigzag() -> Vec<Vec2> {
    vec![
      Vec2::new(0.0, 0.0),
      Vec2::new(1.0, 0.1),
      Vec2::new(2.0, -0.1),
      Vec2::new(3.0, 5.0),
      Vec2::new(4.0, 6.0),
      Vec2::new(5.0, 7.0),
      Vec2::new(6.0, 8.1),
      Vec2::new(7.0, 9.0),
      Vec2::new(8.0, 9.0),
      Vec2::new(9.0, 9.0),
    ]
  }

  #[test]
  fn short_inputs_are_unchanged() {
    assert!(simplify(&[], 1.0).is_empty());
    let three = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
    assert_eq!(simplify(&three, 1.0), three.to_vec());
  }

  #[test]
  fn collinear_points_collapse_to_endpoints() {
    let line: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32, 0.0)).collect();
    assert_eq!(
      simplify(&line, 1.0),
      vec![Vec2::new(0.0, 0.0), Vec2::new(9.0, 0.0)]
    );
  }

  #[test]
  fn corner_is_retained() {
    let mut points: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32, 0.0)).collect();
    points.extend((1..5).map(|i| Vec2::new(4.0, i as f32)));
    assert_eq!(
      simplify(&points, 1.0),
      vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0)]
    );
  }

  #[test]
  fn distance_exactly_at_tolerance_splits() {
    let points = [
      Vec2::new(0.0, 0.0),
      Vec2::new(1.0, 1.0),
      Vec2::new(2.0, 0.0),
      Vec2::new(3.0, 0.0),
    ];
    let simplified = simplify(&points, 1.0);
    assert!(simplified.contains(&Vec2::new(1.0, 1.0)));
  }

  #[test]
  fn ties_keep_earliest_point() {
    let points = [
      Vec2::new(0.0, 0.0),
      Vec2::new(1.0, 2.0),
      Vec2::new(2.0, 2.0),
      Vec2::new(3.0, 0.0),
    ];
    // Both interior points are 2.0 from the chord; the earliest one splits.
    assert_eq!(furthest_point(&points, 0, 3, 1.0), Some(1));
  }

  #[test]
  fn simplify_is_idempotent() {
    let once = simplify(&zigzag(), 1.0);
    let twice = simplify(&once, 1.0);
    assert_eq!(once, twice);
  }

  #[test]
  fn output_preserves_input_order() {
    let input = zigzag();
    let simplified = simplify(&input, 1.0);
    let positions: Vec<usize> = simplified
      .iter()
      .map(|p| input.iter().position(|q| q == p).unwrap())
      .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(simplified.first(), input.first());
    assert_eq!(simplified.last(), input.last());
  }

  #[test]
  fn discarded_points_lie_within_tolerance_of_retained_chord() {
    let input = zigzag();
    let tolerance = 1.0;
    let simplified = simplify(&input, tolerance);

    for chord in simplified.windows(2) {
      let start = input.iter().position(|p| *p == chord[0]).unwrap();
      let end = input.iter().position(|p| *p == chord[1]).unwrap();
      for &point in &input[start + 1..end] {
        assert!(perpendicular_distance(point, chord[0], chord[1]) < tolerance);
      }
    }
  }

  #[test]
  fn degenerate_chord_uses_point_distance() {
    let d = perpendicular_distance(Vec2::new(3.0, 4.0), Vec2::ZERO, Vec2::ZERO);
    assert!((d - 5.0).abs() < 1e-6);
  }

  #[test]
  fn closed_loop_with_shared_endpoints_keeps_far_point() {
    let square = [
      Vec2::new(0.0, 0.0),
      Vec2::new(5.0, 0.0),
      Vec2::new(5.0, 5.0),
      Vec2::new(0.0, 5.0),
      Vec2::new(0.0, 0.0),
    ];
    let simplified = simplify(&square, 1.0);
    assert!(simplified.len() >= 3);
  }

  #[test]
  fn zero_tolerance_keeps_every_bend() {
    let points = [
      Vec2::new(0.0, 0.0),
      Vec2::new(1.0, 0.5),
      Vec2::new(2.0, 0.0),
      Vec2::new(3.0, 0.5),
      Vec2::new(4.0, 0.0),
    ];
    assert_eq!(simplify(&points, 0.0), points.to_vec());
  }
}
