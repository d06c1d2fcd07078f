// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! Repeatedly find and remove (or insert) seams until an image reaches
//! the requested size.  The energy map is recalculated after every
//! seam; the search table is not, as one scratch table is carried
//! through the whole run.

use crate::energy::calculate_energy;
use crate::error::SeamError;
use crate::pathops::{
    color_pixel, insert_horizontal_seam, insert_vertical_seam, mark_horizontal_seam,
    mark_vertical_seam, remove_horizontal_seam, remove_vertical_seam, Blend,
};
use crate::seamfinder::{find_seam_with, minimum_energy, Direction, PathResult, SeamScratch};
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use log::{debug, info};

type Buffer<P, S> = ImageBuffer<P, Vec<S>>;

fn next_seam<I, P, S>(
    image: &I,
    direction: Direction,
    scratch: &mut SeamScratch,
) -> Result<PathResult, SeamError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    find_seam_with(
        &calculate_energy(image),
        direction,
        minimum_energy,
        Some(scratch),
    )
}

fn carveonce<P, S>(
    image: &Buffer<P, S>,
    direction: Direction,
    scratch: &mut SeamScratch,
) -> Result<Buffer<P, S>, SeamError>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Blend + 'static,
{
    let seam = next_seam(image, direction, scratch)?;
    let carved = match direction {
        Direction::Horizontal => remove_horizontal_seam(image, &seam.path)?,
        Direction::Vertical => remove_vertical_seam(image, &seam.path)?,
    };
    debug!(
        "removed {} seam of energy {}, now {}x{}",
        direction,
        seam.total_energy,
        carved.width(),
        carved.height()
    );
    Ok(carved)
}

// Inserting the cheapest seam over and over tends to pick the same
// neighbourhood, since the blended pixels are themselves cheap.
fn growonce<P, S>(
    image: &Buffer<P, S>,
    direction: Direction,
    scratch: &mut SeamScratch,
) -> Result<Buffer<P, S>, SeamError>
where
    P: Pixel<Subpixel = S> + 'static,
    S: Blend + 'static,
{
    let seam = next_seam(image, direction, scratch)?;
    let grown = match direction {
        Direction::Horizontal => insert_horizontal_seam(image, &seam.path)?,
        Direction::Vertical => insert_vertical_seam(image, &seam.path)?,
    };
    debug!(
        "inserted {} seam of energy {}, now {}x{}",
        direction,
        seam.total_energy,
        grown.width(),
        grown.height()
    );
    Ok(grown)
}

// A search needs three positions across its levels, so an axis can be
// carved down to two, and grown only once it has three.
fn check_target(direction: Direction, current: u32, target: u32) -> Result<(), SeamError> {
    if target < current && target < 2 {
        return Err(SeamError::TooSmall {
            direction,
            extent: target,
            minimum: 2,
        });
    }
    if target > current && current < 3 {
        return Err(SeamError::TooSmall {
            direction,
            extent: current,
            minimum: 3,
        });
    }
    Ok(())
}

/// A struct for holding the image to be carved.  The image itself is
/// never modified.
pub struct SeamCarver<'a, I> {
    image: &'a I,
}

impl<'a, I, P, S> SeamCarver<'a, I>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Blend + 'static,
{
    /// Creates a new SeamCarver with an image to be carved.
    pub fn new(image: &'a I) -> Self {
        Self { image }
    }

    fn copy(&self) -> Buffer<P, S> {
        let (width, height) = self.image.dimensions();
        ImageBuffer::from_fn(width, height, |x, y| self.image.get_pixel(x, y))
    }

    /// Given a desired new width and height, repeatedly carve seams out
    /// of (or insert seams into) a copy of the image until it has that
    /// size.  While both axes are shrinking the carver alternates
    /// between them.
    pub fn carve(&self, newwidth: u32, newheight: u32) -> Result<Buffer<P, S>, SeamError> {
        let (width, height) = self.image.dimensions();
        check_target(Direction::Vertical, width, newwidth)?;
        check_target(Direction::Horizontal, height, newheight)?;

        let mut scratch =
            SeamScratch::with_dimensions(width.max(newwidth), height.max(newheight));
        let mut image = self.copy();
        let mut direction = Direction::Vertical;

        while image.width() > newwidth && image.height() > newheight {
            image = carveonce(&image, direction, &mut scratch)?;
            direction = direction.turn();
        }
        while image.width() > newwidth {
            image = carveonce(&image, Direction::Vertical, &mut scratch)?;
        }
        while image.height() > newheight {
            image = carveonce(&image, Direction::Horizontal, &mut scratch)?;
        }
        while image.width() < newwidth {
            image = growonce(&image, Direction::Vertical, &mut scratch)?;
        }
        while image.height() < newheight {
            image = growonce(&image, Direction::Horizontal, &mut scratch)?;
        }

        info!("resized {}x{} to {}x{}", width, height, newwidth, newheight);
        Ok(image)
    }

    /// The seam that would be carved next, without carving it.
    pub fn seam(&self, direction: Direction) -> Result<PathResult, SeamError> {
        next_seam(self.image, direction, &mut SeamScratch::new())
    }

    /// Return a copy of the image with the next seam painted in `color`.
    pub fn highlight(&self, direction: Direction, color: &[S]) -> Result<Buffer<P, S>, SeamError> {
        color_pixel::<P, S>(color)?;
        let seam = self.seam(direction)?;
        let mut image = self.copy();
        match direction {
            Direction::Horizontal => mark_horizontal_seam(&mut image, &seam.path, color)?,
            Direction::Vertical => mark_vertical_seam(&mut image, &seam.path, color)?,
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cq;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    // Three black columns, then four bright ones.  The only energy is
    // along the edge between them.
    fn step_image() -> GrayImage {
        GrayImage::from_fn(7, 4, |x, _| Luma([cq!(x < 3, 0, 200)]))
    }

    #[test]
    fn carving_removes_flat_columns_first() {
        let image = step_image();
        let carved = SeamCarver::new(&image).carve(6, 4).unwrap();
        assert_eq!(carved.dimensions(), (6, 4));
        for y in 0..4 {
            let row: Vec<u8> = (0..6).map(|x| carved.get_pixel(x, y)[0]).collect();
            assert_eq!(row, [0, 0, 200, 200, 200, 200]);
        }
    }

    #[test]
    fn carving_both_axes() {
        let image = RgbImage::from_fn(9, 7, |x, y| Rgb([(x * 20) as u8, (y * 30) as u8, 7]));
        let carved = SeamCarver::new(&image).carve(5, 4).unwrap();
        assert_eq!(carved.dimensions(), (5, 4));
    }

    #[test]
    fn growing_keeps_the_borders() {
        let image = GrayImage::from_fn(4, 3, |x, y| Luma([(x * 40 + y) as u8]));
        let grown = SeamCarver::new(&image).carve(6, 5).unwrap();
        assert_eq!(grown.dimensions(), (6, 5));
        assert_eq!(grown.get_pixel(0, 0), image.get_pixel(0, 0));
        assert_eq!(grown.get_pixel(5, 4), image.get_pixel(3, 2));
    }

    #[test]
    fn same_size_is_a_copy() {
        let image = step_image();
        assert_eq!(SeamCarver::new(&image).carve(7, 4).unwrap(), image);
    }

    #[test]
    fn carving_below_two_is_refused() {
        let image = step_image();
        assert_eq!(
            SeamCarver::new(&image).carve(1, 4),
            Err(SeamError::TooSmall {
                direction: Direction::Vertical,
                extent: 1,
                minimum: 2
            })
        );
    }

    #[test]
    fn growing_a_narrow_image_is_refused() {
        let image = GrayImage::new(2, 5);
        assert!(SeamCarver::new(&image).carve(4, 5).is_err());
    }

    #[test]
    fn highlight_marks_a_copy() {
        let image = step_image();
        let marked = SeamCarver::new(&image)
            .highlight(Direction::Vertical, &[255])
            .unwrap();
        for y in 0..4 {
            assert_eq!(marked.get_pixel(1, y)[0], 255);
        }
        assert_eq!(image.get_pixel(1, 0)[0], 0);
        let changed = marked
            .pixels()
            .zip(image.pixels())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 4);
    }

    #[test]
    fn highlight_checks_the_colour() {
        let image = step_image();
        assert_eq!(
            SeamCarver::new(&image).highlight(Direction::Horizontal, &[1, 2, 3]),
            Err(SeamError::ChannelCount {
                expected: 1,
                actual: 3
            })
        );
    }
}
