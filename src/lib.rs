#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bifurcation diagram renderer
//!
//! The logistic map replaces a number `x` between zero and one with
//! `r·x·(1−x)`.  Depending on the control parameter `r`, repeating
//! that step either settles on one value, bounces between two, four,
//! eight values, or never settles at all.  A bifurcation diagram
//! plots, for every `r` in a range, the values the orbit keeps
//! visiting once it has forgotten where it started.
//!
//! Each column of the image is one value of `r`.  We iterate the map
//! for that column, throw away the transient, and darken a small
//! anti-aliased disk of pixels around every later value.  The plane
//! starts white; overlapping disks multiply, so often-visited rows
//! grow dark.  A final tone-mapping pass inverts the plane and lifts
//! the faint trails so the fine structure is visible.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rug;

pub mod config;
pub mod errors;
pub mod orbit;
pub mod raster;
pub mod sampler;
pub mod sink;
pub mod splat;
pub mod sweep;
pub mod tone;
pub mod work;

pub use config::{Real, RenderConfig};
pub use errors::Error;
pub use orbit::{Orbit, SamplePoint};
pub use raster::{Plane, RasterBuffer, Strip};
pub use sampler::ParameterSweep;
pub use sink::write_image;
pub use splat::Splat;
pub use sweep::{SweepDriver, SweepReport};
pub use tone::ToneMap;

use std::time::{Duration, Instant};
use sweep::duration_seconds;

/// A finished diagram and how long it took.
#[derive(Clone, Debug)]
pub struct Rendering {
    /// The tone-mapped plane, ready for `write_image`.
    pub image: RasterBuffer,
    /// Timing of the orbit-and-splat stage.
    pub sweep: SweepReport,
    /// Time spent tone mapping.
    pub tone_elapsed: Duration,
}

/// The main function, and primary entry point.  Validates the
/// configuration, sweeps every column into a fresh plane, and tone
/// maps the result once every sweep worker has finished.
pub fn render(config: &RenderConfig) -> Result<Rendering, Error> {
    config.validate()?;
    debug!("rendering with {:?}", config);
    info!("Using {} threads", config.threads);
    info!("Working precision: {} bits", config.precision_bits);

    let mut image = RasterBuffer::new(config.width, config.height, config.background);
    let sweep = SweepDriver::new(config).run(&mut image)?;
    info!("Computation time: {:.3} seconds", duration_seconds(sweep.elapsed));
    info!("Total iterations: {}", sweep.total_iterations);
    info!("{:.0} iterations/second", sweep.iterations_per_second());

    let start = Instant::now();
    ToneMap::from_config(config).apply(&mut image, config.threads)?;
    let tone_elapsed = start.elapsed();
    info!("Rendering time: {:.3} seconds", duration_seconds(tone_elapsed));
    info!(
        "Total time: {:.3} seconds",
        duration_seconds(sweep.elapsed + tone_elapsed)
    );

    Ok(Rendering {
        image,
        sweep,
        tone_elapsed,
    })
}
