//! Boundary tracing for occupancy grids.
//!
//! Every occupied cell edge that borders an empty cell (or the grid border)
//! becomes a unit segment between two integer corners. Segments are oriented
//! clockwise around solid cells (Y+ down), so chaining each segment's end to
//! the next segment's start walks closed loops.

use std::collections::HashMap;

use bevy::math::Vec2;

use crate::primitives::Surface;

type Corner = (i32, i32);

/// Emits the oriented boundary segments of all occupied cells.
fn boundary_segments(mask: &Surface<bool>) -> Vec<(Corner, Corner)> {
  let solid = |x: i64, y: i64| -> bool {
    x >= 0
      && y >= 0
      && mask
        .get(x as u32, y as u32)
        .copied()
        .unwrap_or(false)
  };

  let mut segments = Vec::new();
  for (x, y, &occupied) in mask.iter_cells() {
    if !occupied {
      continue;
    }
    let (cx, cy) = (x as i64, y as i64);
    let (x, y) = (x as i32, y as i32);
    if !solid(cx, cy - 1) {
      segments.push(((x, y), (x + 1, y)));
    }
    if !solid(cx + 1, cy) {
      segments.push(((x + 1, y), (x + 1, y + 1)));
    }
    if !solid(cx, cy + 1) {
      segments.push(((x + 1, y + 1), (x, y + 1)));
    }
    if !solid(cx - 1, cy) {
      segments.push(((x, y + 1), (x, y)));
    }
  }
  segments
}

/// Chains oriented segments into closed loops of corner points.
///
/// Collinear runs are kept; callers simplify afterwards.
pub fn trace_outlines(mask: &Surface<bool>) -> Vec<Vec<Vec2>> {
  let segments = boundary_segments(mask);
  if segments.is_empty() {
    return vec![];
  }

  let mut starts: HashMap<Corner, Vec<usize>> = HashMap::new();
  for (i, (start, _)) in segments.iter().enumerate() {
    starts.entry(*start).or_default().push(i);
  }

  let mut used = vec![false; segments.len()];
  let mut loops = Vec::new();

  for first in 0..segments.len() {
    if used[first] {
      continue;
    }

    let mut outline = Vec::new();
    let mut current = first;
    loop {
      used[current] = true;
      let (start, end) = segments[current];
      outline.push(Vec2::new(start.0 as f32, start.1 as f32));

      let next = starts
        .get(&end)
        .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
      match next {
        Some(i) => current = i,
        None => break,
      }
    }

    if outline.len() >= 3 {
      loops.push(outline);
    }
  }

  loops
}

/// The longest traced loop, which for a single blob is its outer boundary.
pub fn outer_outline(mask: &Surface<bool>) -> Option<Vec<Vec2>> {
  trace_outlines(mask).into_iter().max_by_key(Vec::len)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn mask_from_rows(rows: &[&str]) -> Surface<bool> {
    let width = rows[0].len() as u32;
    let cells = rows
      .iter()
      .flat_map(|row| row.chars().map(|c| c == '#'))
      .collect();
    Surface::from_vec(width, rows.len() as u32, cells).unwrap()
  }

  #[test]
  fn single_cell_is_a_unit_square() {
    let outlines = trace_outlines(&mask_from_rows(&["#"]));
    assert_eq!(outlines.len(), 1);
    assert_eq!(
      outlines[0],
      vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
      ]
    );
  }

  #[test]
  fn block_perimeter_has_one_point_per_unit_edge() {
    let outline = outer_outline(&mask_from_rows(&["###", "###"])).unwrap();
    assert_eq!(outline.len(), 10);
  }

  #[test]
  fn hole_produces_a_second_loop() {
    let outlines = trace_outlines(&mask_from_rows(&["###", "#.#", "###"]));
    assert_eq!(outlines.len(), 2);
    let outer = outer_outline(&mask_from_rows(&["###", "#.#", "###"])).unwrap();
    assert_eq!(outer.len(), 12);
  }

  #[test]
  fn empty_mask_has_no_outline() {
    assert!(outer_outline(&mask_from_rows(&["...", "..."])).is_none());
  }
}
