// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The seam search will take an energy map from anywhere; this is the
//! one the carver uses when it isn't given anything better.  It is the
//! plain dual-gradient energy with no forward energy term: for every
//! pixel, the squared colour distance between its left and right
//! neighbours plus the squared distance between the ones above and
//! below.  Pixels on the border stand in for their missing neighbours.

use crate::cq;
use crate::twodmap::EnergyMap;
use image::{GenericImageView, GrayImage, Luma, Pixel, Primitive};
use itertools::iproduct;
use num_traits::ToPrimitive;

// Takes the channels (R,G,B) from two pixels and maps the difference
// between each channel, squares it, and then sums them all up.  This
// is the rusty expression of:
//
//        |Δx|² = (Δrx)²+(Δgx)²+(Δbx)²
//
// Done in f64 so that sixteen bit and floating point images don't
// overflow on the way.
fn energy_of_pair<S>(p1: &[S], p2: &[S]) -> f64
where
    S: Primitive,
{
    p1.iter()
        .zip(p2)
        .map(|(c1, c2)| {
            let d = c1.to_f64().unwrap_or(0.0) - c2.to_f64().unwrap_or(0.0);
            d * d
        })
        .sum()
}

fn saturate(energy: f64) -> u32 {
    cq!(energy >= f64::from(u32::MAX), u32::MAX, energy as u32)
}

/// Compute the energy of every pixel in an image.  Energies too large
/// for a `u32` are clamped to `u32::MAX`.
pub fn calculate_energy<I, P, S>(image: &I) -> EnergyMap
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let mut emap = EnergyMap::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        let current_pixel = image.get_pixel(x, y);
        let (leftpixel, rightpixel, uppixel, downpixel) = (
            cq!(x == 0, current_pixel, image.get_pixel(x - 1, y)),
            cq!(x + 1 >= width, current_pixel, image.get_pixel(x + 1, y)),
            cq!(y == 0, current_pixel, image.get_pixel(x, y - 1)),
            cq!(y + 1 >= height, current_pixel, image.get_pixel(x, y + 1)),
        );
        emap[(x, y)] = saturate(
            energy_of_pair(leftpixel.channels(), rightpixel.channels())
                + energy_of_pair(uppixel.channels(), downpixel.channels()),
        );
    }
    emap
}

/// Render an energy map as a greyscale image, scaled so the most
/// energetic pixel is white.
pub fn energy_to_image(energy: &EnergyMap) -> GrayImage {
    let factor = u64::from(energy.as_slice().iter().copied().max().unwrap_or(0).max(1));
    GrayImage::from_fn(energy.width(), energy.height(), |x, y| {
        Luma([(u64::from(energy[(x, y)]) * 255 / factor) as u8])
    })
}
