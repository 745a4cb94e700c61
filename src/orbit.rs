// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The orbit of a single control parameter.
//!
//! The logistic map takes a value `x` in `[0, 1]` and replaces it
//! with `r·x·(1−x)`.  For small `r` the value settles on a single
//! fixed point; as `r` grows the fixed point splits into two, then
//! four, and eventually the orbit wanders chaotically.  We run the
//! map long enough to forget the starting value, then report every
//! later value as a point on the raster: the column is the sweep
//! index, the row is `x` flipped so that large values sit at the top.
//!
//! In the chaotic band every step roughly doubles the rounding error
//! already in `x`, so the iteration runs entirely in `Real` and only
//! the finished row is narrowed to a double.

use rug::ops::SubFrom;
use rug::{Assign, Float};
use std::iter::FusedIterator;

use config::Real;

/// A subpixel position on the raster.  `column` is always the sweep
/// index the point came from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplePoint {
    /// Horizontal position, in pixels.
    pub column: f64,
    /// Vertical position, in pixels, with row 0 at the top.
    pub row: f64,
}

/// An iterator over the post-transient orbit of one control
/// parameter.  It can be consumed once; ask for a new `Orbit` to
/// start over from the seed.
#[derive(Clone, Debug)]
pub struct Orbit {
    r: Real,
    x: Real,
    // Working storage for `1 - x`, kept to avoid an allocation per step.
    scratch: Real,
    column: f64,
    height: usize,
    remaining: usize,
}

impl Orbit {
    /// Seeds the orbit at `x0` and runs the `skip` transient
    /// iterations immediately; nothing from the transient is ever
    /// emitted.  At most `max - skip` points follow.  The orbit is
    /// iterated at the precision of `r`.
    pub fn new(
        r: Real,
        x0: &Real,
        skip: usize,
        max: usize,
        column: usize,
        height: usize,
    ) -> Self {
        let precision = r.prec();
        let mut orbit = Orbit {
            x: Float::with_val(precision, x0),
            scratch: Float::new(precision),
            r,
            column: column as f64,
            height,
            remaining: max.saturating_sub(skip),
        };
        for _ in 0..skip {
            orbit.step();
        }
        orbit
    }

    /// The current value of the orbit.
    pub fn state(&self) -> &Real {
        &self.x
    }

    /// One step of the logistic map, `x ← (r·x)·(1−x)`.
    fn step(&mut self) {
        self.scratch.assign(&self.x);
        self.scratch.sub_from(1.0);
        self.x *= &self.r;
        self.x *= &self.scratch;
    }

    /// Maps the current orbit value to a raster row.  Anything outside
    /// `[0, height)`, NaN included, is not a row at all.
    fn row(&mut self) -> Option<f64> {
        self.scratch.assign(&self.x);
        self.scratch.sub_from(1.0);
        self.scratch *= (self.height as f64) - 1.0;
        let row = self.scratch.to_f64();
        if row >= 0.0 && row < (self.height as f64) {
            Some(row)
        } else {
            None
        }
    }
}

impl Iterator for Orbit {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        while self.remaining > 0 {
            self.remaining -= 1;
            self.step();
            if let Some(row) = self.row() {
                return Some(SamplePoint {
                    column: self.column,
                    row,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for Orbit {}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{real, EXTENDED_BITS};

    fn orbit(r: f64, x0: f64, skip: usize, max: usize, height: usize) -> Orbit {
        Orbit::new(real(EXTENDED_BITS, r), &real(EXTENDED_BITS, x0), skip, max, 7, height)
    }

    fn settled(precision: u32, steps: usize) -> Real {
        let seed = real(precision, 0.5);
        Orbit::new(real(precision, 3.99), &seed, steps, steps, 0, 100)
            .state()
            .clone()
    }

    #[test]
    fn superstable_point_stays_put() {
        let points: Vec<SamplePoint> = orbit(2.0, 0.5, 4, 5, 10).collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].column, 7.0);
        assert!((points[0].row - 4.5).abs() < 1e-12);
    }

    #[test]
    fn emits_no_more_than_the_post_transient_count() {
        for &r in &[1.0, 2.9, 3.2, 3.5, 3.83, 3.99, 4.0] {
            let points: Vec<SamplePoint> = orbit(r, 0.5, 100, 1100, 480).collect();
            assert!(points.len() <= 1000);
            for p in &points {
                assert!(p.row >= 0.0 && p.row < 480.0, "r {} gave row {}", r, p.row);
            }
        }
    }

    #[test]
    fn skipping_everything_emits_nothing() {
        assert_eq!(orbit(3.5, 0.5, 50, 50, 100).count(), 0);
        assert_eq!(orbit(3.5, 0.5, 60, 50, 100).count(), 0);
    }

    #[test]
    fn diverging_orbits_are_dropped() {
        // Past r = 4 the orbit escapes [0, 1] and runs off to minus infinity.
        let points: Vec<SamplePoint> = orbit(4.5, 0.3, 0, 2000, 100).collect();
        assert!(points.len() < 2000);
        assert!(points.iter().all(|p| p.row >= 0.0 && p.row < 100.0));
    }

    #[test]
    fn period_two_visits_two_rows() {
        let mut rows: Vec<i64> = orbit(3.2, 0.5, 2000, 2100, 1000)
            .map(|p| p.row.round() as i64)
            .collect();
        rows.sort();
        rows.dedup();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn transient_is_run_at_construction() {
        let orbit = orbit(2.5, 0.1, 500, 500, 10);
        assert!((orbit.state().to_f64() - 0.6).abs() < 1e-9);
        assert_eq!(orbit.state().prec(), EXTENDED_BITS);
        assert_eq!(orbit.size_hint(), (0, Some(0)));
    }

    #[test]
    fn extended_precision_tracks_a_chaotic_orbit_further_than_doubles() {
        // Forty steps at r = 3.99 magnify a double's rounding error to
        // around 1e-6; eleven more mantissa bits should cut it ~2000x.
        let truth = settled(512, 40);
        let error = |precision: u32| {
            Float::with_val(512, &truth - &settled(precision, 40))
                .abs()
                .to_f64()
        };
        let double = error(53);
        let extended = error(EXTENDED_BITS);
        assert!(double > 0.0);
        assert!(
            extended * 100.0 < double,
            "extended error {} vs double error {}",
            extended,
            double
        );
    }
}
