// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two dimensional maps
//!
//! The addressable grids every stage works over: the energy map handed
//! in by the caller, and the table of weighted cells the seam search
//! fills in.

use std::ops::{Index, IndexMut};

/// Defines the basic two-dimensional map: An addressable field
/// containing one of several possible objects during processing: a
/// plain `u32` for the energy map, or a weight + predecessor pair for
/// the seam search table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

/// The per-pixel energy of an image, as supplied to the seam search.
pub type EnergyMap = TwoDimensionalMap<u32>;

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map filled with the content type's default.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// An empty map with room for `cells` values, for use with
    /// `reshape`.
    pub fn with_capacity(cells: usize) -> Self {
        TwoDimensionalMap {
            width: 0,
            height: 0,
            data: Vec::with_capacity(cells),
        }
    }

    /// Wrap an existing row-major buffer.  Returns `None` if the buffer
    /// does not hold exactly `width * height` values.
    pub fn from_raw(width: u32, height: u32, data: Vec<P>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Build a map by calling `f(x, y)` for every address.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut map = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                map[(x, y)] = f(x, y);
            }
        }
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The row-major contents of the map.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// Change the shape of the map, resetting every cell to its default.
    /// The existing allocation is kept and only grown when the new shape
    /// needs more room.
    pub fn reshape(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data
            .resize(width as usize * height as usize, P::default());
    }

    /// How many cells the map can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// One cell of the seam search table: the cheapest accumulated cost of
/// any seam reaching this cell, and the position on the previous level
/// that seam came through.  The first level has no predecessor.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct WeightedCell {
    pub weight: u64,
    pub predecessor: Option<u32>,
}

impl WeightedCell {
    pub fn new(weight: u64, predecessor: Option<u32>) -> Self {
        WeightedCell {
            weight,
            predecessor,
        }
    }
}
