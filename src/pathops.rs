// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam application
//!
//! Once a seam is known, it can be removed from an image (which loses
//! a row or a column), inserted into an image (which gains one, the
//! new pixels blended from their neighbours), or painted over with a
//! fixed colour for display.
//!
//! Every operation is generic on the pixel type, so the channel count
//! and the subpixel representation of the source carry through to the
//! result unchanged.  Seams are checked against the image before any
//! work is done.

use crate::cq;
use crate::error::SeamError;
use crate::seamfinder::Direction;
use image::{GenericImage, GenericImageView, ImageBuffer, Pixel, Primitive};

/// The midpoint of two subpixel values, used to synthesize the pixels
/// of an inserted seam.  Integer subpixels round down.
pub trait Blend: Primitive {
    fn blend(a: Self, b: Self) -> Self;
}

macro_rules! blend_integer {
    ($($t:ty => $wide:ty),*) => {
        $(
            impl Blend for $t {
                #[inline]
                fn blend(a: Self, b: Self) -> Self {
                    (a as $wide + b as $wide).div_euclid(2) as $t
                }
            }
        )*
    };
}

macro_rules! blend_float {
    ($($t:ty),*) => {
        $(
            impl Blend for $t {
                #[inline]
                fn blend(a: Self, b: Self) -> Self {
                    (a + b) / 2.0
                }
            }
        )*
    };
}

blend_integer!(u8 => u32, u16 => u32, u32 => u64, u64 => u128, usize => u128,
               i8 => i32, i16 => i32, i32 => i64, i64 => i128, isize => i128);
blend_float!(f32, f64);

// A seam needs one entry per level, and every entry must land in
// `low..high` on the axis it cuts across.
fn check_seam(
    seam: &[u32],
    direction: Direction,
    (levels, positions): (u32, u32),
    low: u32,
) -> Result<(), SeamError> {
    if positions <= low {
        return Err(SeamError::TooSmall {
            direction,
            extent: positions,
            minimum: low + 1,
        });
    }
    if seam.len() != levels as usize {
        return Err(SeamError::PathLength {
            expected: levels as usize,
            actual: seam.len(),
        });
    }
    match seam
        .iter()
        .enumerate()
        .find(|&(_, &p)| p < low || p >= positions)
    {
        Some((level, &position)) => Err(SeamError::PathOutOfBounds {
            level,
            position,
            low,
            high: positions,
        }),
        None => Ok(()),
    }
}

fn check_extents<I: GenericImageView>(
    image: &I,
    seam: &[u32],
    direction: Direction,
    low: u32,
) -> Result<(), SeamError> {
    let (width, height) = image.dimensions();
    check_seam(seam, direction, direction.extents(width, height), low)
}

/// Remove a horizontal seam (one row per column), returning an image
/// one row shorter.  Every pixel at or below the seam moves up one.
pub fn remove_horizontal_seam<I, P, S>(
    image: &I,
    seam: &[u32],
) -> Result<ImageBuffer<P, Vec<S>>, SeamError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    check_extents(image, seam, Direction::Horizontal, 0)?;
    let (width, height) = image.dimensions();
    Ok(ImageBuffer::from_fn(width, height - 1, |x, y| {
        image.get_pixel(x, cq!(y >= seam[x as usize], y + 1, y))
    }))
}

/// Remove a vertical seam (one column per row), returning an image one
/// column narrower.  Every pixel at or right of the seam moves left one.
pub fn remove_vertical_seam<I, P, S>(
    image: &I,
    seam: &[u32],
) -> Result<ImageBuffer<P, Vec<S>>, SeamError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    check_extents(image, seam, Direction::Vertical, 0)?;
    let (width, height) = image.dimensions();
    Ok(ImageBuffer::from_fn(width - 1, height, |x, y| {
        image.get_pixel(cq!(x >= seam[y as usize], x + 1, x), y)
    }))
}

/// Insert a horizontal seam, returning an image one row taller.  The
/// new pixel in each column sits at the seam's row and is the average
/// of the source pixels just above and at that row; everything from
/// the seam down moves down one.  Seams touching row zero are rejected,
/// as there is no pixel above them to blend with.
pub fn insert_horizontal_seam<I, P, S>(
    image: &I,
    seam: &[u32],
) -> Result<ImageBuffer<P, Vec<S>>, SeamError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Blend + 'static,
{
    check_extents(image, seam, Direction::Horizontal, 1)?;
    let (width, height) = image.dimensions();
    Ok(ImageBuffer::from_fn(width, height + 1, |x, y| {
        let s = seam[x as usize];
        if y == s {
            image
                .get_pixel(x, y - 1)
                .map2(&image.get_pixel(x, y), S::blend)
        } else {
            image.get_pixel(x, cq!(y > s, y - 1, y))
        }
    }))
}

/// Insert a vertical seam, returning an image one column wider.  The
/// new pixel in each row is the average of the source pixels just left
/// of and at the seam's column.  Seams touching column zero are
/// rejected.
pub fn insert_vertical_seam<I, P, S>(
    image: &I,
    seam: &[u32],
) -> Result<ImageBuffer<P, Vec<S>>, SeamError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Blend + 'static,
{
    check_extents(image, seam, Direction::Vertical, 1)?;
    let (width, height) = image.dimensions();
    Ok(ImageBuffer::from_fn(width + 1, height, |x, y| {
        let s = seam[y as usize];
        if x == s {
            image
                .get_pixel(x - 1, y)
                .map2(&image.get_pixel(x, y), S::blend)
        } else {
            image.get_pixel(cq!(x > s, x - 1, x), y)
        }
    }))
}

pub(crate) fn color_pixel<P, S>(color: &[S]) -> Result<P, SeamError>
where
    P: Pixel<Subpixel = S>,
    S: Primitive,
{
    let expected = usize::from(P::CHANNEL_COUNT);
    if color.len() != expected {
        return Err(SeamError::ChannelCount {
            expected,
            actual: color.len(),
        });
    }
    Ok(*P::from_slice(color))
}

/// Paint a horizontal seam in place.  Exactly one pixel per column is
/// overwritten with `color`, which must have one value per channel.
pub fn mark_horizontal_seam<I, P, S>(
    image: &mut I,
    seam: &[u32],
    color: &[S],
) -> Result<(), SeamError>
where
    I: GenericImage<Pixel = P>,
    P: Pixel<Subpixel = S>,
    S: Primitive,
{
    let pixel = color_pixel::<P, S>(color)?;
    check_extents(image, seam, Direction::Horizontal, 0)?;
    for (x, &y) in seam.iter().enumerate() {
        image.put_pixel(x as u32, y, pixel);
    }
    Ok(())
}

/// Paint a vertical seam in place: one pixel per row.
pub fn mark_vertical_seam<I, P, S>(
    image: &mut I,
    seam: &[u32],
    color: &[S],
) -> Result<(), SeamError>
where
    I: GenericImage<Pixel = P>,
    P: Pixel<Subpixel = S>,
    S: Primitive,
{
    let pixel = color_pixel::<P, S>(color)?;
    check_extents(image, seam, Direction::Vertical, 0)?;
    for (y, &x) in seam.iter().enumerate() {
        image.put_pixel(x, y as u32, pixel);
    }
    Ok(())
}
