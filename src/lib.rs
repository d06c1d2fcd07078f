// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Minimum-energy seams for content-aware resizing.
//!
//! Hand `find_seam` an energy map and it returns the cheapest
//! horizontal or vertical seam; hand that seam to one of the
//! `remove_*`, `insert_*` or `mark_*` functions to shrink, grow or
//! annotate an image.  `SeamCarver` strings the two together.

mod ternary;

pub mod energy;
pub use energy::{calculate_energy, energy_to_image};

pub mod error;
pub use error::SeamError;

pub mod pathops;
pub use pathops::{
    insert_horizontal_seam, insert_vertical_seam, mark_horizontal_seam, mark_vertical_seam,
    remove_horizontal_seam, remove_vertical_seam, Blend,
};

pub mod seamcarver;
pub use seamcarver::SeamCarver;

pub mod seamfinder;
pub use seamfinder::{
    find_seam, find_seam_by, find_seam_with, maximum_energy, minimum_energy, Direction,
    PathResult, SeamScratch,
};

pub mod twodmap;
pub use twodmap::{EnergyMap, TwoDimensionalMap, WeightedCell};
