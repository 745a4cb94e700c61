// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type returned by the renderer.

use std::io;

/// Everything that can go wrong between reading a configuration and
/// writing the finished diagram to disk.
#[derive(Debug, Fail)]
pub enum Error {
    /// The configuration violates one of the renderer's preconditions.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A worker thread panicked; the buffer contents are not trustworthy.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// The output path names a format we have no encoder for.
    #[fail(display = "unsupported output format: {}", _0)]
    UnsupportedFormat(String),

    /// Writing the output failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
