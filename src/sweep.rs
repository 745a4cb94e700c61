// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel parameter sweep: every column of the diagram gets
//! its control parameter, its orbit, and its splats.
//!
//! The cost of a column varies a great deal with `r`.  Periodic
//! orbits keep landing on the same few rows, chaotic ones smear
//! across the whole height, so the columns are handed out in small
//! chunks from a shared queue instead of being split evenly up front.
//!
//! Each chunk is splatted into its own `Strip`, wide enough to hold
//! the disks that spill over its edges.  When every chunk is done the
//! strips are multiplied into the plane in chunk order, so the image
//! does not depend on which worker took which chunk, or when.

use crossbeam;
use crossbeam::thread::ScopedJoinHandle;
use std::ops::Range;
use std::time::{Duration, Instant};

use config::{real, Real, RenderConfig};
use errors::Error;
use orbit::{Orbit, SamplePoint};
use raster::{RasterBuffer, Strip};
use sampler::ParameterSweep;
use splat::Splat;
use work::{chunked, WorkQueue};

/// Timing of a completed sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepReport {
    /// Wall-clock time from the first job to the last worker exiting.
    pub elapsed: Duration,
    /// Iterations of the recurrence performed, transients included.
    pub total_iterations: u64,
}

impl SweepReport {
    /// Throughput of the sweep.  Zero if it took no measurable time.
    pub fn iterations_per_second(&self) -> f64 {
        let seconds = duration_seconds(self.elapsed);
        if seconds > 0.0 {
            self.total_iterations as f64 / seconds
        } else {
            0.0
        }
    }
}

/// A Duration as fractional seconds.
pub fn duration_seconds(elapsed: Duration) -> f64 {
    elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9
}

/// Everything a worker needs to turn a sweep index into splats.  Once
/// set, this object is never mutated.
#[derive(Clone, Debug)]
pub struct SweepDriver {
    sweep: ParameterSweep,
    splat: Splat,
    x0: Real,
    skip_iterations: usize,
    max_iterations: usize,
    threads: usize,
    chunk_size: usize,
}

impl SweepDriver {
    /// Builds the driver for an already validated configuration.
    pub fn new(config: &RenderConfig) -> Self {
        let sweep = ParameterSweep::from_config(config);
        SweepDriver {
            x0: real(sweep.precision(), config.x0),
            sweep,
            splat: Splat::from_config(config),
            skip_iterations: config.skip_iterations,
            max_iterations: config.max_iterations,
            threads: config.threads.max(1),
            chunk_size: config.chunk_size,
        }
    }

    /// The orbit of a single column, as it would be plotted into a
    /// plane `height` pixels tall.
    pub fn orbit(&self, index: usize, height: usize) -> Orbit {
        Orbit::new(
            self.sweep.parameter(index),
            &self.x0,
            self.skip_iterations,
            self.max_iterations,
            index,
            height,
        )
    }

    /// Computes and splats a chunk of columns into a fresh strip.  The
    /// orbit of a column is gathered into `points` before any of it
    /// is splatted.
    fn plot(
        &self,
        indices: Range<usize>,
        width: usize,
        height: usize,
        points: &mut Vec<SamplePoint>,
    ) -> Strip {
        let reach = self.splat.reach();
        let columns =
            indices.start.saturating_sub(reach)..indices.end.saturating_add(reach).min(width);
        let mut strip = Strip::new(columns, height);
        for index in indices {
            points.clear();
            points.extend(self.orbit(index, height));
            for point in points.iter() {
                self.splat.apply(&mut strip, *point);
            }
        }
        strip
    }

    /// Single-threaded sweep, mostly useful as a reference for the
    /// threaded one.  Chunks and merges exactly as `run` does, so the
    /// two leave identical planes.
    pub fn run_single(&self, buffer: &mut RasterBuffer) -> SweepReport {
        let start = Instant::now();
        let (width, height) = (buffer.width(), buffer.height());
        let mut points = Vec::new();
        let strips: Vec<Strip> = chunked(self.sweep.len(), self.chunk_size)
            .map(|indices| self.plot(indices, width, height, &mut points))
            .collect();
        for (row, target) in buffer.rows_mut().enumerate() {
            for strip in &strips {
                strip.merge_row(row, target);
            }
        }
        self.report(start.elapsed())
    }

    /// Sweeps every index exactly once across the worker threads, then
    /// merges the finished strips into `buffer`.
    pub fn run(&self, buffer: &mut RasterBuffer) -> Result<SweepReport, Error> {
        let start = Instant::now();
        let (width, height) = (buffer.width(), buffer.height());
        let queue = WorkQueue::new(chunked(self.sweep.len(), self.chunk_size).enumerate());

        let mut strips: Vec<(usize, Strip)> = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Vec<(usize, Strip)>>> = (0..self.threads)
                .map(|worker| {
                    let queue = &queue;
                    spawner.spawn(move |_| {
                        let mut points = Vec::with_capacity(
                            self.max_iterations.saturating_sub(self.skip_iterations),
                        );
                        let mut strips = Vec::new();
                        while let Some((order, indices)) = queue.next_job() {
                            strips.push((order, self.plot(indices, width, height, &mut points)));
                        }
                        debug!("sweep worker {} finished after {} chunks", worker, strips.len());
                        strips
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| Error::WorkerPanicked))
                .collect::<Result<Vec<_>, Error>>()
        })
        .map_err(|_| Error::WorkerPanicked)??
        .into_iter()
        .flatten()
        .collect();
        strips.sort_by_key(|&(order, _)| order);
        let strips: Vec<Strip> = strips.into_iter().map(|(_, strip)| strip).collect();

        self.merge(buffer, &strips)?;
        Ok(self.report(start.elapsed()))
    }

    /// Multiplies the strips into the plane, one row per job.  Every
    /// row takes the strips in chunk order.
    fn merge(&self, buffer: &mut RasterBuffer, strips: &[Strip]) -> Result<(), Error> {
        let queue = WorkQueue::new(buffer.rows_mut().enumerate());

        crossbeam::scope(|spawner| {
            for _ in 0..self.threads {
                let queue = &queue;
                spawner.spawn(move |_| {
                    while let Some((row, target)) = queue.next_job() {
                        for strip in strips {
                            strip.merge_row(row, target);
                        }
                    }
                });
            }
        })
        .map_err(|_| Error::WorkerPanicked)
    }

    fn report(&self, elapsed: Duration) -> SweepReport {
        SweepReport {
            elapsed,
            total_iterations: self.sweep.len() as u64 * self.max_iterations as u64,
        }
    }
}
