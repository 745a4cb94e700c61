// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel plane.
//!
//! The diagram is monochrome but leaves the renderer as RGB with
//! three equal channels.  Both types here store a single luminance
//! byte per pixel and expand it on the way out.
//!
//! The truncating blend is not associative, so two splats that
//! overlap a pixel give different answers depending on which lands
//! first.  Workers therefore never share pixels: each renders its
//! chunk of columns into a private `Strip`, and the strips are
//! multiplied into the `RasterBuffer` afterwards in sweep order.

use std::ops::Range;

/// Multiplicative blend of two luminances, truncated.  Never
/// brighter than either input; 255 is the identity.
#[inline]
pub fn multiply(existing: u8, intensity: u8) -> u8 {
    (u32::from(existing) * u32::from(intensity) / 255) as u8
}

/// Anything a splat can be deposited into: a run of whole columns,
/// `height` pixels tall.
pub trait Plane {
    /// The columns this plane covers, in raster coordinates.
    fn columns(&self) -> Range<usize>;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Darken a pixel by multiplying it with `intensity`.  Coordinates
    /// outside the plane are ignored.
    fn blend(&mut self, column: usize, row: usize, intensity: u8);
}

/// The finished image.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    luma: Vec<u8>,
}

impl RasterBuffer {
    /// A `width × height` plane with every pixel set to `background`.
    pub fn new(width: usize, height: usize, background: u8) -> Self {
        RasterBuffer {
            width,
            height,
            luma: vec![background; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The luminance plane, row-major.
    pub fn luma(&self) -> &[u8] {
        &self.luma
    }

    /// The three (equal) channels at a pixel, or None outside the plane.
    pub fn pixel(&self, column: usize, row: usize) -> Option<[u8; 3]> {
        if column < self.width && row < self.height {
            let v = self.luma[row * self.width + column];
            Some([v, v, v])
        } else {
            None
        }
    }

    /// Mutable rows of the plane, for workers that each take a row.
    pub fn rows_mut(&mut self) -> ::std::slice::ChunksMut<u8> {
        self.luma.chunks_mut(self.width.max(1))
    }

    /// The plane as interleaved 8-bit RGB, the layout the encoders want.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.luma.len() * 3);
        for &v in &self.luma {
            rgb.extend_from_slice(&[v, v, v]);
        }
        rgb
    }
}

impl Plane for RasterBuffer {
    fn columns(&self) -> Range<usize> {
        0..self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn blend(&mut self, column: usize, row: usize, intensity: u8) {
        if column < self.width && row < self.height {
            let pixel = &mut self.luma[row * self.width + column];
            *pixel = multiply(*pixel, intensity);
        }
    }
}

/// A private run of columns, starting out white, that one chunk of
/// the sweep splats into.
#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    columns: Range<usize>,
    height: usize,
    luma: Vec<u8>,
}

impl Strip {
    /// A white strip covering `columns` of a plane `height` tall.
    pub fn new(columns: Range<usize>, height: usize) -> Self {
        let width = columns.end.saturating_sub(columns.start);
        Strip {
            columns,
            height,
            luma: vec![255; width * height],
        }
    }

    fn width(&self) -> usize {
        self.columns.end.saturating_sub(self.columns.start)
    }

    /// Multiplies one row of this strip into the matching row of the
    /// full plane.  Columns of `target` past its end are ignored.
    pub fn merge_row(&self, row: usize, target: &mut [u8]) {
        if row >= self.height {
            return;
        }
        let width = self.width();
        let source = &self.luma[row * width..(row + 1) * width];
        for (column, &intensity) in self.columns.clone().zip(source) {
            if let Some(pixel) = target.get_mut(column) {
                *pixel = multiply(*pixel, intensity);
            }
        }
    }
}

impl Plane for Strip {
    fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    fn height(&self) -> usize {
        self.height
    }

    fn blend(&mut self, column: usize, row: usize, intensity: u8) {
        if self.columns.contains(&column) && row < self.height {
            let offset = row * self.width() + (column - self.columns.start);
            self.luma[offset] = multiply(self.luma[offset], intensity);
        }
    }
}
