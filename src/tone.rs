// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The contrast pass run over the finished sweep.
//!
//! The sweep leaves a white plane with faint grey trails; most of
//! the structure is only a few tone levels off white.  The tone
//! map inverts the plane, lifts the faint values with a power below
//! one, and scales the result into `[0, scale]`.

use crossbeam;
use num::clamp;

use config::RenderConfig;
use errors::Error;
use raster::RasterBuffer;
use work::WorkQueue;

/// Parameters of the tone curve.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToneMap {
    gamma: f64,
    scale: f64,
}

impl ToneMap {
    /// Constructor.
    pub fn new(gamma: f64, scale: f64) -> Self {
        ToneMap { gamma, scale }
    }

    /// The tone curve described by a render configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        ToneMap::new(config.gamma, config.tone_scale)
    }

    /// Maps a single luminance.
    pub fn map(&self, channel: u8) -> u8 {
        let value = (255.0 - f64::from(channel)) / 255.0;
        let value = value.powf(self.gamma);
        clamp((value * self.scale).round(), 0.0, 255.0) as u8
    }

    /// Rewrites every pixel of `image` in place, one row per job.
    pub fn apply(&self, image: &mut RasterBuffer, threads: usize) -> Result<(), Error> {
        let lut: Vec<u8> = (0..=255u8).map(|v| self.map(v)).collect();
        let lut = &lut;
        let queue = WorkQueue::new(image.rows_mut());

        crossbeam::scope(|spawner| {
            for _ in 0..threads.max(1) {
                let queue = &queue;
                spawner.spawn(move |_| {
                    while let Some(row) = queue.next_job() {
                        for pixel in row.iter_mut() {
                            *pixel = lut[*pixel as usize];
                        }
                    }
                });
            }
        })
        .map_err(|_| Error::WorkerPanicked)
    }
}
