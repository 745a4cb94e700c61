// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the ParameterSweep struct, which maps a column of the
//! image (a sweep index) onto a value of the control parameter `r`.
//!
//! The mapping is not linear.  The interesting structure of the
//! logistic map crowds together as `r` approaches 4, so the sweep
//! raises its normalized position to a power below one, spending
//! more columns near the end of the range.

use rug::ops::Pow;
use rug::Float;

use config::{real, Real, RenderConfig};

/// Describes the warped relationship between the integral sweep
/// indices `0..steps` and the real interval `[start, end]`.  Every
/// intermediate value is a `Real` of the sweep's precision.
///
/// Preconditions, checked by `RenderConfig::validate` rather than
/// here: `steps > 1` and `power > 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSweep {
    steps: usize,
    precision: u32,
    start: Real,
    span: Real,
    power: Real,
}

impl ParameterSweep {
    /// Constructor.
    pub fn new(steps: usize, start: f64, end: f64, power: f64, precision: u32) -> Self {
        let start = real(precision, start);
        let span = Float::with_val(precision, real(precision, end) - &start);
        ParameterSweep {
            steps,
            precision,
            start,
            span,
            power: real(precision, power),
        }
    }

    /// The sweep described by a render configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        ParameterSweep::new(
            config.r_steps,
            config.r_start,
            config.r_end,
            config.log_scale_power,
            config.precision_bits,
        )
    }

    /// The number of indices in the sweep.
    pub fn len(&self) -> usize {
        self.steps
    }

    /// Describes that the sweep has no indices.
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Mantissa bits of the parameters this sweep produces.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Given a sweep index, return the control parameter for that
    /// column.  Index 0 maps to `start`, index `steps - 1` to `end`.
    pub fn parameter(&self, index: usize) -> Real {
        let mut t = Float::with_val(self.precision, index as u64);
        t /= Float::with_val(self.precision, (self.steps - 1) as u64);
        let scaled_t = t.pow(&self.power);
        let mut r = Float::with_val(self.precision, &self.span * &scaled_t);
        r += &self.start;
        r
    }
}
