/*
Grayscale raster plus the simple per-pixel scans run on it: ASCII rendering, greedy brightness shift and
gradient edge strength. All scans are row-major over a single 8-bit channel.
*/

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::RasterError;

/// Dark-to-light character ramp.
pub const ASCII_CHARS: &str = "@%#*+=-:. ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: u8,
    pixels: Vec<u8>,
}

/// Decodes an image file and converts it to one 8-bit gray channel. The source channel count is kept for display.
pub fn load(path: &Path) -> Result<Raster, RasterError> {
    let img = image::open(path)?;
    let channels = img.color().channel_count();
    let gray = img.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    info!(
        "decoded {} ({}x{}, {} channels)",
        path.display(),
        width,
        height,
        channels
    );
    Raster::from_gray(width, height, channels, gray.into_raw())
}

impl Raster {
    pub fn from_gray(width: usize, height: usize, channels: u8, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty);
        }
        let expected = width.checked_mul(height).ok_or(RasterError::SizeMismatch {
            expected: usize::MAX,
            actual: pixels.len(),
        })?;
        if pixels.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.pixels.chunks(self.width)
    }

    pub fn metadata_report(&self) -> String {
        let rule = "==========================================";
        format!(
            "{rule}\n            IMAGE METADATA                \n{rule}\n\
             Width       : {} px\n\
             Height      : {} px\n\
             Channels    : {} (1=Grayscale, 3=RGB, 4=RGBA)\n{rule}",
            self.width, self.height, self.channels
        )
    }

    /// One ramp character per pixel, one line per row.
    pub fn ascii_art(&self) -> String {
        let ramp = ASCII_CHARS.as_bytes();
        let last = ramp.len() - 1;
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            for &p in row {
                out.push(char::from(ramp[usize::from(p) * last / 255]));
            }
            out.push('\n');
        }
        out
    }

    /// Greedy shift: starting from `requested`, clamp against every pixel so no value leaves [0, 255].
    pub fn brightness_shift(&self, requested: i32) -> i32 {
        self.pixels.iter().fold(requested, |shift, &p| {
            let p = i32::from(p);
            shift.min(255 - p).max(-p)
        })
    }

    /// Applies the greedy shift in place and returns the number of levels actually applied.
    pub fn adjust_brightness(&mut self, requested: i32) -> i32 {
        let shift = self.brightness_shift(requested);
        if shift != 0 {
            for p in self.pixels.iter_mut() {
                *p = (i32::from(*p) + shift).clamp(0, 255) as u8;
            }
        }
        info!("brightness shift requested {} applied {}", requested, shift);
        shift
    }

    /// |p(x,y) - p(x-1,y)| + |p(x,y) - p(x,y-1)|, with missing neighbours contributing 0.
    pub fn edge_strengths(&self) -> Vec<u32> {
        let w = self.width;
        let px = &self.pixels;
        (0..px.len())
            .map(|i| {
                let (x, y) = (i % w, i / w);
                let gx = if x > 0 { px[i].abs_diff(px[i - 1]) } else { 0 };
                let gy = if y > 0 { px[i].abs_diff(px[i - w]) } else { 0 };
                u32::from(gx) + u32::from(gy)
            })
            .collect()
    }

    pub fn write_ascii(&self, path: &Path) -> Result<(), RasterError> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(self.ascii_art().as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn write_edge_map(&self, path: &Path) -> Result<(), RasterError> {
        let mut out = BufWriter::new(File::create(path)?);
        write_grid(&mut out, self.width, self.edge_strengths())?;
        out.flush()?;
        Ok(())
    }
}

/// Writes `cells` row by row, every value followed by a space.
pub fn write_grid<W, T, I>(out: &mut W, width: usize, cells: I) -> io::Result<()>
where
    W: Write,
    T: Display,
    I: IntoIterator<Item = T>,
{
    for (i, cell) in cells.into_iter().enumerate() {
        write!(out, "{} ", cell)?;
        if (i + 1) % width == 0 {
            writeln!(out)?;
        }
    }
    Ok(())
}
