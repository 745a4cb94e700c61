// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished diagram to disk.

use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use errors::Error;
use raster::RasterBuffer;

/// Encodes `image` as 8-bit RGB, choosing PNG or binary PPM from the
/// extension of `path`.  The image itself is left untouched whether
/// or not the write succeeds.
pub fn write_image<P: AsRef<Path>>(path: P, image: &RasterBuffer) -> Result<(), Error> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    let (width, height) = (image.width() as u32, image.height() as u32);

    match extension.as_str() {
        "png" => {
            let output = BufWriter::new(File::create(path)?);
            PNGEncoder::new(output).encode(&image.to_rgb(), width, height, ColorType::RGB(8))?;
        }
        "ppm" | "pnm" => {
            let output = BufWriter::new(File::create(path)?);
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
            encoder.encode(&image.to_rgb()[..], width, height, ColorType::RGB(8))?;
        }
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    }
    info!("Bifurcation diagram saved to {}", path.display());
    Ok(())
}
