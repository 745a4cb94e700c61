// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A shared queue of jobs for scoped worker threads.
//!
//! Every worker pulls its next job from the same locked iterator, so
//! a worker that drew cheap jobs simply comes back for more.  Both
//! parallel stages of the renderer use it: the sweep hands out
//! chunks of column indices, the tone mapper hands out rows.

use std::ops::Range;
use std::sync::Mutex;

/// A locked iterator that any number of workers may drain.
pub struct WorkQueue<I: Iterator> {
    jobs: Mutex<I>,
}

impl<I: Iterator> WorkQueue<I> {
    /// Wraps an iterator of jobs.
    pub fn new(jobs: I) -> Self {
        WorkQueue {
            jobs: Mutex::new(jobs),
        }
    }

    /// Takes the next job, or None once the queue is drained.  A
    /// poisoned lock means another worker panicked; the scope will
    /// report that, so this worker just stops.
    pub fn next_job(&self) -> Option<I::Item> {
        match self.jobs.lock() {
            Ok(mut jobs) => jobs.next(),
            Err(_) => None,
        }
    }
}

/// Splits `0..len` into consecutive ranges of at most `chunk` indices.
pub fn chunked(len: usize, chunk: usize) -> impl Iterator<Item = Range<usize>> {
    let chunk = chunk.max(1);
    (0..len)
        .step_by(chunk)
        .map(move |start| start..(start + chunk).min(len))
}
