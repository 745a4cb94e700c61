// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the RenderConfig struct, every knob the renderer reads.
//! Once validated, a configuration is never changed during a render.

use errors::Error;
use num_cpus;
use rug::Float;

/// The float the orbit state, the control parameter and the sweep
/// position are computed in.  Chaotic orbits amplify rounding error
/// by roughly a factor of two per step, so the mantissa width decides
/// how many iterations stay meaningful.  Nothing narrows a `Real`
/// until the orbit value is turned into a raster row.
pub type Real = Float;

/// The mantissa of an x87 extended double, the default working
/// precision.
pub const EXTENDED_BITS: u32 = 64;

/// Narrowest precision a render will accept: an IEEE double.
pub const MIN_PRECISION_BITS: u32 = 53;

/// Widest precision a render will accept.
pub const MAX_PRECISION_BITS: u32 = 4096;

/// A `Real` of the given precision holding `value` exactly.
pub fn real(precision: u32, value: f64) -> Real {
    Float::with_val(precision, value)
}

/// The parameters by which a bifurcation diagram is generated.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
    /// Number of control-parameter values swept; one per column.
    pub r_steps: usize,
    /// Total iterations of the recurrence per parameter value.
    pub max_iterations: usize,
    /// Leading iterations discarded before plotting begins.
    pub skip_iterations: usize,
    /// Seed of every orbit.  The knobs below that feed the recurrence
    /// are read as doubles and widened, exactly, to `precision_bits`.
    pub x0: f64,
    /// Anti-aliasing radius of a splat, in pixels.
    pub aa_radius: f64,
    /// Exponent of the parameter warp.  Below one, resolution gathers
    /// near the end of the range, where the chaos lives.
    pub log_scale_power: f64,
    /// First control-parameter value.
    pub r_start: f64,
    /// Last control-parameter value.
    pub r_end: f64,
    /// Mantissa bits of every `Real` in the sweep.
    pub precision_bits: u32,
    /// How far the center of a splat darkens a white pixel, out of 255.
    pub splat_strength: u8,
    /// Tone-mapping exponent.
    pub gamma: f64,
    /// Tone-mapping output ceiling.
    pub tone_scale: f64,
    /// Initial value of every pixel.
    pub background: u8,
    /// Worker threads used by both parallel stages.
    pub threads: usize,
    /// Sweep indices handed to a worker each time it asks for work.
    /// Each chunk is splatted into its own strip, and the strips are
    /// merged in sweep order, so this also fixes how blends group at
    /// chunk borders.
    pub chunk_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let width = 3840 * 4;
        RenderConfig {
            width,
            height: 2160 * 4,
            r_steps: width,
            max_iterations: 50_000,
            skip_iterations: 4_000,
            x0: 0.5,
            aa_radius: 1.0,
            log_scale_power: 0.25,
            r_start: 1.0,
            r_end: 4.0,
            precision_bits: EXTENDED_BITS,
            splat_strength: 1,
            gamma: 0.7,
            tone_scale: 200.0,
            background: 255,
            threads: num_cpus::get(),
            chunk_size: 100,
        }
    }
}

macro_rules! require {
    ($condition: expr, $($message: tt)+) => {
        if !($condition) {
            return Err(Error::InvalidConfig(format!($($message)+)));
        }
    };
}

impl RenderConfig {
    /// A configuration with a different image size, sweeping one
    /// parameter value per column.
    pub fn with_size(width: usize, height: usize) -> Self {
        RenderConfig {
            width,
            height,
            r_steps: width,
            ..RenderConfig::default()
        }
    }

    /// Rejects configurations the pipeline would turn into garbage.
    /// The renderer always calls this before doing any work.
    pub fn validate(&self) -> Result<(), Error> {
        require!(self.width > 0 && self.height > 0, "image must not be empty");
        require!(self.r_steps > 1, "need at least two sweep steps, got {}", self.r_steps);
        require!(
            self.skip_iterations <= self.max_iterations,
            "cannot skip {} of {} iterations",
            self.skip_iterations,
            self.max_iterations
        );
        require!(
            self.aa_radius.is_finite() && self.aa_radius >= 0.0,
            "radius must be a non-negative number, got {}",
            self.aa_radius
        );
        require!(
            self.log_scale_power > 0.0 && self.log_scale_power.is_finite(),
            "scale power must be positive, got {}",
            self.log_scale_power
        );
        require!(
            self.r_start.is_finite() && self.r_end.is_finite() && self.r_start < self.r_end,
            "parameter range [{}, {}] is empty",
            self.r_start,
            self.r_end
        );
        require!(self.x0.is_finite(), "orbit seed must be finite");
        require!(
            self.precision_bits >= MIN_PRECISION_BITS && self.precision_bits <= MAX_PRECISION_BITS,
            "precision must lie in [{}, {}] bits, got {}",
            MIN_PRECISION_BITS,
            MAX_PRECISION_BITS,
            self.precision_bits
        );
        require!(self.gamma > 0.0 && self.gamma.is_finite(), "gamma must be positive");
        require!(
            self.tone_scale > 0.0 && self.tone_scale <= 255.0,
            "tone scale must lie in (0, 255], got {}",
            self.tone_scale
        );
        require!(self.threads > 0, "need at least one thread");
        require!(self.chunk_size > 0, "chunk size must be positive");
        Ok(())
    }
}
