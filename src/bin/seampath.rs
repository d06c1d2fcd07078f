// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use image::{DynamicImage, EncodableLayout, ImageBuffer, Pixel, PixelWithColorType, Rgb};
use seampath::{calculate_energy, energy_to_image, Blend, Direction, SeamCarver};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Axis {
    Horizontal,
    Vertical,
}

impl From<Axis> for Direction {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Direction::Horizontal,
            Axis::Vertical => Direction::Vertical,
        }
    }
}

/// Content-aware image resizing by seam carving.
#[derive(Parser, Debug)]
#[command(name = "seampath", version)]
struct Args {
    /// The image to carve
    input: PathBuf,

    /// Where to write the result; the format follows the extension
    output: PathBuf,

    /// Target width (defaults to the current width)
    #[arg(long)]
    width: Option<u32>,

    /// Target height (defaults to the current height)
    #[arg(long)]
    height: Option<u32>,

    /// Write the energy map instead of resizing
    #[arg(long, conflicts_with_all = ["mark", "width", "height"])]
    energy: bool,

    /// Write a copy with the next seam in this direction painted in
    #[arg(long, value_enum, conflicts_with_all = ["width", "height"])]
    mark: Option<Axis>,

    /// Colour of the seam painted by --mark, as r,g,b
    #[arg(long, value_parser = parse_color, default_value = "255,0,0", requires = "mark")]
    color: [u8; 3],
}

fn parse_color(value: &str) -> Result<[u8; 3]> {
    let channels = value
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid colour {:?}", value))?;
    match channels.as_slice() {
        [r, g, b] => Ok([*r, *g, *b]),
        _ => Err(anyhow!("a colour needs three channels, got {:?}", value)),
    }
}

// The mark colour, widened to sixteen bits per channel.
fn widen(color: [u8; 3]) -> [u16; 3] {
    color.map(|c| u16::from(c) * 257)
}

fn luma(color: [u8; 3]) -> u8 {
    Rgb(color).to_luma()[0]
}

// Resize, mark or dump the energy of one image, keeping its pixel type.
// `color` holds one value per channel of that pixel type.
fn process<P, S>(image: &ImageBuffer<P, Vec<S>>, args: &Args, color: &[S]) -> Result<()>
where
    P: PixelWithColorType<Subpixel = S> + 'static,
    S: Blend + 'static,
    [S]: EncodableLayout,
{
    let carver = SeamCarver::new(image);
    let written = if args.energy {
        energy_to_image(&calculate_energy(image)).save(&args.output)
    } else if let Some(axis) = args.mark {
        carver.highlight(axis.into(), color)?.save(&args.output)
    } else {
        let (width, height) = image.dimensions();
        carver
            .carve(
                args.width.unwrap_or(width),
                args.height.unwrap_or(height),
            )?
            .save(&args.output)
    };
    written.with_context(|| format!("could not write {}", args.output.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let image = image::open(&args.input)
        .with_context(|| format!("could not read {}", args.input.display()))?;
    let [r, g, b] = args.color;
    let [wr, wg, wb] = widen(args.color);
    let wide_luma = u16::from(luma(args.color)) * 257;

    match image {
        DynamicImage::ImageLuma8(buf) => process(&buf, &args, &[luma(args.color)]),
        DynamicImage::ImageLumaA8(buf) => process(&buf, &args, &[luma(args.color), u8::MAX]),
        DynamicImage::ImageRgb8(buf) => process(&buf, &args, &[r, g, b]),
        DynamicImage::ImageRgba8(buf) => process(&buf, &args, &[r, g, b, u8::MAX]),
        DynamicImage::ImageLuma16(buf) => process(&buf, &args, &[wide_luma]),
        DynamicImage::ImageLumaA16(buf) => process(&buf, &args, &[wide_luma, u16::MAX]),
        DynamicImage::ImageRgb16(buf) => process(&buf, &args, &[wr, wg, wb]),
        DynamicImage::ImageRgba16(buf) => process(&buf, &args, &[wr, wg, wb, u16::MAX]),
        // Floating point images have no common file format to go back
        // to, so they are carved as sixteen bit RGBA.
        other => process(&other.to_rgba16(), &args, &[wr, wg, wb, u16::MAX]),
    }
}
