// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam search
//!
//! Given an energy map, find the connected path of one pixel per row
//! (a vertical seam) or one pixel per column (a horizontal seam) whose
//! summed energy is lowest.  The search walks the map one *level* at a
//! time (a row for vertical seams, a column for horizontal seams),
//! recording for every *position* on the level the cheapest way to
//! reach it from the three neighbouring positions of the level before.
//!
//! The first and last positions of every level are never part of a
//! seam; a map needs at least three positions across for a search to
//! be possible.
//!
//! The horizontal and vertical searches are the same algorithm over
//! transposed axes, so there's only one of them here: `Direction`
//! knows how to turn a (level, position) pair into an (x, y) address.

use crate::cq;
use crate::error::SeamError;
use crate::twodmap::{EnergyMap, TwoDimensionalMap, WeightedCell};
use std::fmt;

/// Which way a seam runs through the image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right, one entry per column; removing it shrinks the
    /// height.
    Horizontal,
    /// Top to bottom, one entry per row; removing it shrinks the width.
    Vertical,
}

impl Direction {
    pub fn turn(self) -> Self {
        cq!(
            self == Direction::Horizontal,
            Direction::Vertical,
            Direction::Horizontal
        )
    }

    /// The number of levels and the number of positions per level for
    /// an image of the given size.
    pub fn extents(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Direction::Horizontal => (width, height),
            Direction::Vertical => (height, width),
        }
    }

    /// Map a (level, position) pair to an (x, y) pixel address.
    pub fn address(self, level: u32, position: u32) -> (u32, u32) {
        match self {
            Direction::Horizontal => (level, position),
            Direction::Vertical => (position, level),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Horizontal => write!(f, "horizontal"),
            Direction::Vertical => write!(f, "vertical"),
        }
    }
}

/// A seam and what it costs.  `path[level]` is the position of the
/// seam on that level: the row for each column of a horizontal seam,
/// the column for each row of a vertical one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub path: Vec<u32>,
    pub total_energy: u64,
}

/// A reusable search table.  A resize loop that finds hundreds of seams
/// in a row can hand the same scratch to every search and skip the
/// per-call allocation; the table grows when a larger map comes along
/// and is completely overwritten by each search.
#[derive(Debug, Default)]
pub struct SeamScratch {
    table: TwoDimensionalMap<WeightedCell>,
}

impl SeamScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scratch table already big enough for a `width` by `height` map
    /// searched in either direction.  Either search needs one cell per
    /// pixel plus a closing level as long as the wider axis.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        SeamScratch {
            table: TwoDimensionalMap::with_capacity(cells_needed(width, height)),
        }
    }
}

fn cells_needed(width: u32, height: u32) -> usize {
    width as usize * height as usize + width.max(height) as usize
}

/// The default ordering: a candidate beats the incumbent only if it
/// is strictly cheaper.
pub fn minimum_energy(candidate: u64, incumbent: u64) -> bool {
    candidate < incumbent
}

/// Find the most expensive seam instead.
pub fn maximum_energy(candidate: u64, incumbent: u64) -> bool {
    candidate > incumbent
}

/// Find the lowest-energy seam running in `direction`.
pub fn find_seam(energy: &EnergyMap, direction: Direction) -> Result<PathResult, SeamError> {
    find_seam_with(energy, direction, minimum_energy, None)
}

/// Find the seam that wins under `better`, which is asked whether a
/// candidate weight should replace the incumbent one.
pub fn find_seam_by<F>(
    energy: &EnergyMap,
    direction: Direction,
    better: F,
) -> Result<PathResult, SeamError>
where
    F: Fn(u64, u64) -> bool,
{
    find_seam_with(energy, direction, better, None)
}

/// The full search.  With a scratch table the search borrows it for
/// its working state; without one it allocates a table of its own and
/// drops it on return.
pub fn find_seam_with<F>(
    energy: &EnergyMap,
    direction: Direction,
    better: F,
    scratch: Option<&mut SeamScratch>,
) -> Result<PathResult, SeamError>
where
    F: Fn(u64, u64) -> bool,
{
    let (levels, positions) = direction.extents(energy.width(), energy.height());
    if positions < 3 {
        return Err(SeamError::TooSmall {
            direction,
            extent: positions,
            minimum: 3,
        });
    }
    if levels == 0 {
        return Err(SeamError::TooSmall {
            direction,
            extent: levels,
            minimum: 1,
        });
    }

    let mut owned = TwoDimensionalMap::default();
    let table = match scratch {
        Some(scratch) => &mut scratch.table,
        None => &mut owned,
    };
    // One extra level at the end, so the backtrace can start from a
    // single cell like every other level.
    table.reshape(positions, levels + 1);

    let cost = |level: u32, position: u32| u64::from(energy[direction.address(level, position)]);
    let (first, last) = (1, positions - 2);

    // Populate the first level with the native energies.
    for p in first..=last {
        table[(p, 0)] = WeightedCell::new(cost(0, p), None);
    }

    // For every subsequent level, populate the cell with the sum of the
    // *best adjacent energy* on the level before and its own energy,
    // remembering *which* adjacent cell that was.  Straight ahead is
    // the incumbent; a diagonal only wins if it is strictly better.
    for level in 1..levels {
        for p in first..=last {
            let prev = level - 1;
            let mut best = WeightedCell::new(table[(p, prev)].weight, Some(p));
            if p > first && better(table[(p - 1, prev)].weight, best.weight) {
                best = WeightedCell::new(table[(p - 1, prev)].weight, Some(p - 1));
            }
            if p < last && better(table[(p + 1, prev)].weight, best.weight) {
                best = WeightedCell::new(table[(p + 1, prev)].weight, Some(p + 1));
            }
            best.weight += cost(level, p);
            table[(p, level)] = best;
        }
    }

    for p in first..=last {
        table[(p, levels)] = WeightedCell::new(table[(p, levels - 1)].weight, Some(p));
    }

    // Find the position of the closing cell with the best energy.
    let end = (first + 1..=last).fold(first, |end, p| {
        cq!(
            better(table[(p, levels)].weight, table[(end, levels)].weight),
            p,
            end
        )
    });
    let total_energy = table[(end, levels)].weight;

    // Working backwards, collect the positions the predecessors point
    // to, reverse and return.
    let mut position = end;
    let path = (0..=levels)
        .rev()
        .fold(Vec::<u32>::with_capacity(levels as usize), |mut acc, level| {
            if level < levels {
                acc.push(position);
            }
            position = table[(position, level)].predecessor.unwrap_or(position);
            acc
        })
        .into_iter()
        .rev()
        .collect();

    Ok(PathResult { path, total_energy })
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    const ENERGY_DATA: [u32; 20] = [9, 9, 0, 9, 9, 9, 1, 9, 8, 9, 9, 9, 9, 9, 0, 9, 9, 9, 0, 9];

    fn energies() -> EnergyMap {
        EnergyMap::from_raw(5, 4, ENERGY_DATA.to_vec()).unwrap()
    }

    fn seam_energy(energy: &EnergyMap, direction: Direction, path: &[u32]) -> u64 {
        path.iter()
            .enumerate()
            .map(|(level, &p)| u64::from(energy[direction.address(level as u32, p)]))
            .sum()
    }

    // A small linear congruential generator, so the property checks
    // below run over the same maps every time.
    fn noise_map(width: u32, height: u32, seed: u64) -> EnergyMap {
        let mut state = seed;
        EnergyMap::from_fn(width, height, |_, _| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) % 256) as u32
        })
    }

    #[test]
    fn energy_grid_to_vertical_seam() {
        let result = find_seam(&energies(), Direction::Vertical).unwrap();
        assert_eq!(result.path, [2, 1, 2, 3]);
        assert_eq!(result.total_energy, 10);
    }

    #[test]
    fn energy_grid_to_horizontal_seam() {
        let result = find_seam(&energies(), Direction::Horizontal).unwrap();
        assert_eq!(result.path, [1, 1, 1, 1, 2]);
        assert_eq!(result.total_energy, 27);
    }

    #[test]
    fn maximum_ordering_finds_the_expensive_seam() {
        let result = find_seam_by(&energies(), Direction::Vertical, maximum_energy).unwrap();
        assert_eq!(result.path, [1, 2, 1, 1]);
        assert_eq!(result.total_energy, 36);
    }

    #[test]
    fn seam_follows_a_diagonal_valley() {
        let energy = EnergyMap::from_fn(5, 5, |x, y| cq!(x == y && (1..=3).contains(&x), 0, 100));
        let result = find_seam(&energy, Direction::Vertical).unwrap();
        assert_eq!(&result.path[1..4], &[1, 2, 3]);
        assert_eq!(result.path, [1, 1, 2, 3, 2]);
        assert_eq!(result.total_energy, 200);
    }

    #[test]
    fn three_positions_is_enough() {
        let energy = EnergyMap::from_fn(6, 3, |x, _| x);
        let result = find_seam(&energy, Direction::Horizontal).unwrap();
        assert_eq!(result.path, [1; 6]);
        assert_eq!(result.total_energy, 15);
    }

    #[test]
    fn two_positions_is_rejected() {
        let energy = EnergyMap::new(6, 2);
        assert_eq!(
            find_seam(&energy, Direction::Horizontal),
            Err(SeamError::TooSmall {
                direction: Direction::Horizontal,
                extent: 2,
                minimum: 3
            })
        );
        let energy = EnergyMap::new(2, 6);
        assert!(find_seam(&energy, Direction::Vertical).is_err());
    }

    #[test]
    fn empty_levels_are_rejected() {
        let energy = EnergyMap::new(5, 0);
        assert_eq!(
            find_seam(&energy, Direction::Vertical),
            Err(SeamError::TooSmall {
                direction: Direction::Vertical,
                extent: 0,
                minimum: 1
            })
        );
    }

    #[test]
    fn single_level_picks_the_cheapest_interior_cell() {
        let energy = EnergyMap::from_raw(5, 1, vec![0, 7, 3, 5, 0]).unwrap();
        let result = find_seam(&energy, Direction::Vertical).unwrap();
        assert_eq!(result.path, [2]);
        assert_eq!(result.total_energy, 3);
    }

    #[test]
    fn ties_keep_the_lowest_position() {
        let energy = EnergyMap::new(7, 4);
        let result = find_seam(&energy, Direction::Vertical).unwrap();
        assert_eq!(result.path, [1, 1, 1, 1]);
        assert_eq!(result.total_energy, 0);
    }

    #[test]
    fn seams_are_connected_and_priced_exactly() {
        for (seed, (width, height)) in [(3, 3), (9, 4), (4, 11), (17, 13), (32, 8)]
            .iter()
            .enumerate()
        {
            let energy = noise_map(*width, *height, seed as u64);
            for &direction in &[Direction::Horizontal, Direction::Vertical] {
                let (levels, positions) = direction.extents(*width, *height);
                let result = find_seam(&energy, direction).unwrap();
                assert_eq!(result.path.len(), levels as usize);
                assert!(result
                    .path
                    .iter()
                    .all(|&p| p >= 1 && p <= positions - 2));
                assert!(result
                    .path
                    .iter()
                    .tuple_windows()
                    .all(|(a, b)| (i64::from(*a) - i64::from(*b)).abs() <= 1));
                assert_eq!(
                    result.total_energy,
                    seam_energy(&energy, direction, &result.path)
                );
            }
        }
    }

    #[test]
    fn scratch_reuse_matches_fresh_tables() {
        let mut scratch = SeamScratch::new();
        let maps = [noise_map(24, 18, 7), noise_map(5, 9, 8), noise_map(12, 30, 9)];
        for energy in &maps {
            for &direction in &[Direction::Vertical, Direction::Horizontal] {
                let reused =
                    find_seam_with(energy, direction, minimum_energy, Some(&mut scratch)).unwrap();
                assert_eq!(reused, find_seam(energy, direction).unwrap());
            }
        }
    }

    #[test]
    fn sized_scratch_does_not_grow() {
        let energy = noise_map(20, 10, 3);
        let mut scratch = SeamScratch::with_dimensions(20, 10);
        let capacity = scratch.table.capacity();
        assert!(capacity <= 20 * 10 + 20);
        find_seam_with(&energy, Direction::Horizontal, minimum_energy, Some(&mut scratch)).unwrap();
        find_seam_with(&energy, Direction::Vertical, minimum_energy, Some(&mut scratch)).unwrap();
        assert_eq!(scratch.table.capacity(), capacity);
    }

    #[test]
    fn long_thin_scratch_stays_proportional() {
        let (width, height) = (4000, 3);
        let mut scratch = SeamScratch::with_dimensions(width, height);
        let capacity = scratch.table.capacity();
        let needed = (width as usize * (height as usize + 1)).max(height as usize * (width as usize + 1));
        assert!(capacity >= needed);
        assert!(capacity <= width as usize * height as usize + width as usize);
        let energy = noise_map(width, height, 11);
        find_seam_with(&energy, Direction::Vertical, minimum_energy, Some(&mut scratch)).unwrap();
        find_seam_with(&energy, Direction::Horizontal, minimum_energy, Some(&mut scratch)).unwrap();
        assert_eq!(scratch.table.capacity(), capacity);
    }

    #[test]
    fn weights_accumulate_past_u32() {
        let energy = EnergyMap::from_fn(3, 4, |_, _| u32::MAX);
        let result = find_seam(&energy, Direction::Vertical).unwrap();
        assert_eq!(result.total_energy, 4 * u64::from(u32::MAX));
    }

    #[test]
    fn direction_turns() {
        assert_eq!(Direction::Vertical.turn(), Direction::Horizontal);
        assert_eq!(Direction::Horizontal.turn(), Direction::Vertical);
    }
}
