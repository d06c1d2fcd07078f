// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors raised when a search or a seam edit is handed data it cannot
//! work with.  Every check runs before anything is allocated or written.

use crate::seamfinder::Direction;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SeamError {
    /// The axis the operation walks across is too short.
    #[error("a {direction} seam needs an extent of at least {minimum}, found {extent}")]
    TooSmall {
        direction: Direction,
        extent: u32,
        minimum: u32,
    },

    /// The seam does not have one entry per level of the target.
    #[error("seam has {actual} entries but the image has {expected} levels")]
    PathLength { expected: usize, actual: usize },

    /// A seam entry falls outside the legal range for the operation.
    #[error("seam position {position} at level {level} lies outside {low}..{high}")]
    PathOutOfBounds {
        level: usize,
        position: u32,
        low: u32,
        high: u32,
    },

    /// A colour was supplied with the wrong number of channel values.
    #[error("expected {expected} channel values, found {actual}")]
    ChannelCount { expected: usize, actual: usize },
}
