// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Anti-aliased point deposits.
//!
//! A sample lands between pixel centers.  Rather than round it to
//! the nearest pixel, we darken every pixel center within `radius`
//! of it, by an amount that falls off quadratically from the full
//! strength at the sample to nothing at the rim of the disk.

use itertools::iproduct;
use num::clamp;

use config::RenderConfig;
use orbit::SamplePoint;
use raster::Plane;

/// The disk a single sample darkens, and how hard.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Splat {
    radius: f64,
    strength: u8,
}

impl Splat {
    /// Constructor.  A radius of zero or less (or NaN) makes every
    /// splat a no-op.
    pub fn new(radius: f64, strength: u8) -> Self {
        Splat { radius, strength }
    }

    /// The splat described by a render configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        Splat::new(config.aa_radius, config.splat_strength)
    }

    /// How many whole columns to either side of a sample the disk can
    /// reach.
    pub fn reach(&self) -> usize {
        if self.radius > 0.0 {
            self.radius.ceil() as usize
        } else {
            0
        }
    }

    /// The luminance a pixel center at squared distance `dist_squared`
    /// from the sample is multiplied by, or None if it lies outside
    /// the disk.
    pub fn intensity(&self, dist_squared: f64) -> Option<u8> {
        if !(self.radius > 0.0) || dist_squared > self.radius * self.radius {
            return None;
        }
        let alpha = 1.0 - dist_squared.sqrt() / self.radius;
        let alpha = alpha * alpha;
        let target = 255.0 - f64::from(self.strength) * alpha;
        Some(clamp(target, 0.0, 255.0) as u8)
    }

    /// Darken every pixel of `plane` whose center lies within the
    /// disk around `point`.  Pixels on the last row and column are
    /// included; pixels off the plane are not visited.
    pub fn apply<P: Plane>(&self, plane: &mut P, point: SamplePoint) {
        let columns = plane.columns();
        let height = plane.height();
        if !(self.radius > 0.0) || columns.start >= columns.end || height == 0 {
            return;
        }
        let (x, y) = (point.column, point.row);
        let x0 = (x - self.radius).floor().max(columns.start as f64);
        let y0 = (y - self.radius).floor().max(0.0);
        let x1 = (x + self.radius).ceil().min((columns.end - 1) as f64);
        let y1 = (y + self.radius).ceil().min((height - 1) as f64);
        if !(x0 <= x1 && y0 <= y1) {
            return;
        }
        let columns = (x0 as usize)..=(x1 as usize);
        let rows = (y0 as usize)..=(y1 as usize);

        for (py, px) in iproduct!(rows, columns) {
            let dx = px as f64 - x;
            let dy = py as f64 - y;
            if let Some(intensity) = self.intensity(dx * dx + dy * dy) {
                plane.blend(px, py, intensity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate rand;

    use self::rand::Rng;
    use super::*;
    use raster::{RasterBuffer, Strip};

    fn point(column: f64, row: f64) -> SamplePoint {
        SamplePoint { column, row }
    }

    fn snapshot(buffer: RasterBuffer) -> Vec<u8> {
        buffer.luma().to_vec()
    }

    #[test]
    fn falloff_is_full_at_center_and_gone_at_rim() {
        let splat = Splat::new(2.0, 3);
        assert_eq!(splat.intensity(0.0), Some(252));
        assert_eq!(splat.intensity(4.0), Some(255));
        assert_eq!(splat.intensity(4.01), None);
    }

    #[test]
    fn nonpositive_radius_is_a_noop() {
        for &radius in &[0.0, -1.0, ::std::f64::NAN] {
            let mut buffer = RasterBuffer::new(5, 5, 255);
            let splat = Splat::new(radius, 3);
            splat.apply(&mut buffer, point(2.0, 2.0));
            assert!(snapshot(buffer).iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn centered_unit_splat_darkens_one_pixel() {
        let mut buffer = RasterBuffer::new(5, 5, 255);
        Splat::new(1.0, 3).apply(&mut buffer, point(2.0, 2.0));
        let pixels = snapshot(buffer);
        assert_eq!(pixels[2 * 5 + 2], 252);
        assert_eq!(pixels.iter().filter(|&&v| v != 255).count(), 1);
    }

    #[test]
    fn off_center_splat_spreads() {
        let mut buffer = RasterBuffer::new(5, 5, 255);
        Splat::new(1.0, 3).apply(&mut buffer, point(2.0, 2.5));
        let pixels = snapshot(buffer);
        // alpha = 0.25 for both neighbours: 255 - 0.75 truncates to 254.
        assert_eq!(pixels[2 * 5 + 2], 254);
        assert_eq!(pixels[3 * 5 + 2], 254);
        assert_eq!(pixels.iter().filter(|&&v| v != 255).count(), 2);
    }

    #[test]
    fn border_pixels_are_included() {
        let mut buffer = RasterBuffer::new(4, 4, 255);
        Splat::new(1.0, 3).apply(&mut buffer, point(3.0, 3.0));
        Splat::new(1.0, 3).apply(&mut buffer, point(0.0, 0.0));
        let pixels = snapshot(buffer);
        assert_eq!(pixels[15], 252);
        assert_eq!(pixels[0], 252);
    }

    #[test]
    fn points_off_the_plane_touch_nothing_out_of_bounds() {
        let mut buffer = RasterBuffer::new(4, 4, 255);
        Splat::new(1.5, 3).apply(&mut buffer, point(-5.0, 1.0));
        Splat::new(1.5, 3).apply(&mut buffer, point(10.0, 1.0));
        assert!(snapshot(buffer).iter().all(|&v| v == 255));
    }

    #[test]
    fn strip_receives_the_part_of_the_disk_it_covers() {
        let splat = Splat::new(2.0, 255);
        let mut whole = RasterBuffer::new(8, 5, 255);
        splat.apply(&mut whole, point(3.0, 2.0));
        let mut strip = Strip::new(3..6, 5);
        splat.apply(&mut strip, point(3.0, 2.0));

        let mut merged = RasterBuffer::new(8, 5, 255);
        for (row, target) in merged.rows_mut().enumerate() {
            strip.merge_row(row, target);
        }
        for row in 0..5 {
            for column in 0..8 {
                let expected = if column >= 3 && column < 6 {
                    whole.pixel(column, row)
                } else {
                    Some([255, 255, 255])
                };
                assert_eq!(merged.pixel(column, row), expected);
            }
        }
    }

    #[test]
    fn splats_only_darken() {
        let mut rng = rand::thread_rng();
        let mut buffer = RasterBuffer::new(16, 16, 255);
        let splat = Splat::new(2.5, 3);
        let mut before: Vec<u8> = vec![255; 16 * 16];
        for _ in 0..500 {
            let p = point(rng.gen_range(0.0, 16.0), rng.gen_range(0.0, 16.0));
            splat.apply(&mut buffer, p);
            for (v, previous) in buffer.luma().iter().zip(before.iter_mut()) {
                assert!(*v <= *previous);
                *previous = *v;
            }
        }
        assert!(before.iter().any(|&v| v < 255));
    }
}
