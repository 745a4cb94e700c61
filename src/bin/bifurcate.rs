// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate bifurcation;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate num_cpus;

use bifurcation::config::{MAX_PRECISION_BITS, MIN_PRECISION_BITS};
use bifurcation::RenderConfig;
use clap::{App, Arg, ArgMatches};
use std::fmt::Display;
use std::str::FromStr;

/// Splits `text` at the first `separator` and parses both halves.
fn split_pair<T: FromStr>(text: &str, separator: char) -> Option<(T, T)> {
    let mut halves = text.splitn(2, separator);
    let first = halves.next()?.trim().parse().ok()?;
    let second = halves.next()?.trim().parse().ok()?;
    Some((first, second))
}

/// A validator accepting `<a><separator><b>`.
fn pair_of<T: FromStr>(
    separator: char,
    what: &'static str,
) -> impl Fn(String) -> Result<(), String> {
    move |text| {
        split_pair::<T>(&text, separator)
            .map(|_| ())
            .ok_or_else(|| format!("Could not parse {}", what))
    }
}

/// A validator accepting one number in `low..=high`.
fn within<T>(low: T, high: T, what: &'static str) -> impl Fn(String) -> Result<(), String>
where
    T: FromStr + PartialOrd + Display,
{
    move |text| match text.trim().parse::<T>() {
        Ok(v) if v >= low && v <= high => Ok(()),
        Ok(_) => Err(format!("{} must be between {} and {}", what, low, high)),
        Err(_) => Err(format!("Could not parse {}", what.to_lowercase())),
    }
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    matches.value_of(name).and_then(|s| T::from_str(s).ok())
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const STEPS: &str = "steps";
const ITERATIONS: &str = "iterations";
const SKIP: &str = "skip";
const RADIUS: &str = "radius";
const POWER: &str = "power";
const RANGE: &str = "range";
const STRENGTH: &str = "strength";
const GAMMA: &str = "gamma";
const THREADS: &str = "threads";
const CHUNK: &str = "chunk";
const PRECISION: &str = "precision";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("bifurcate")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Logistic map bifurcation diagram renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (.png or .ppm)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("15360x8640")
                .validator(pair_of::<u16>('x', "output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(STEPS)
                .long(STEPS)
                .takes_value(true)
                .validator(within(2usize, 1_000_000, "Step count"))
                .help("Number of r values swept (default: one per column)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("50000")
                .validator(within(1usize, 10_000_000, "Iteration count"))
                .help("Iterations per r value"),
        )
        .arg(
            Arg::with_name(SKIP)
                .long(SKIP)
                .takes_value(true)
                .default_value("4000")
                .validator(within(0usize, 10_000_000, "Skip count"))
                .help("Iterations discarded before plotting"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .short("a")
                .takes_value(true)
                .default_value("1.0")
                .validator(within(0.0f64, 16.0, "Radius"))
                .help("Anti-aliasing radius in pixels"),
        )
        .arg(
            Arg::with_name(POWER)
                .long(POWER)
                .short("p")
                .takes_value(true)
                .default_value("0.25")
                .validator(within(0.01f64, 10.0, "Scale power"))
                .help("Power of the r warp (lower = more detail at high r)"),
        )
        .arg(
            Arg::with_name(RANGE)
                .long(RANGE)
                .short("r")
                .takes_value(true)
                .default_value("1,4")
                .validator(pair_of::<f64>(',', "r range"))
                .help("First and last value of r"),
        )
        .arg(
            Arg::with_name(STRENGTH)
                .long(STRENGTH)
                .takes_value(true)
                .default_value("1")
                .validator(within(0u8, 255, "Strength"))
                .help("How much a single sample darkens a pixel"),
        )
        .arg(
            Arg::with_name(GAMMA)
                .long(GAMMA)
                .short("g")
                .takes_value(true)
                .default_value("0.7")
                .validator(within(0.01f64, 10.0, "Gamma"))
                .help("Tone-mapping exponent (lower = brighter trails)"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(within(1, max_threads, "Thread count"))
                .help("Number of threads to use in solver (default: all cores)"),
        )
        .arg(
            Arg::with_name(CHUNK)
                .long(CHUNK)
                .takes_value(true)
                .default_value("100")
                .validator(within(1usize, 1_000_000, "Chunk size"))
                .help("Columns handed to a thread at a time"),
        )
        .arg(
            Arg::with_name(PRECISION)
                .long(PRECISION)
                .takes_value(true)
                .default_value("64")
                .validator(within(MIN_PRECISION_BITS, MAX_PRECISION_BITS, "Precision"))
                .help("Mantissa bits of the orbit arithmetic"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> RenderConfig {
    let defaults = RenderConfig::default();
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| split_pair::<usize>(s, 'x'))
        .unwrap_or((defaults.width, defaults.height));
    let (r_start, r_end) = matches
        .value_of(RANGE)
        .and_then(|s| split_pair::<f64>(s, ','))
        .unwrap_or((defaults.r_start, defaults.r_end));

    RenderConfig {
        width,
        height,
        r_steps: value(matches, STEPS).unwrap_or(width),
        max_iterations: value(matches, ITERATIONS).unwrap_or(defaults.max_iterations),
        skip_iterations: value(matches, SKIP).unwrap_or(defaults.skip_iterations),
        aa_radius: value(matches, RADIUS).unwrap_or(defaults.aa_radius),
        log_scale_power: value(matches, POWER).unwrap_or(defaults.log_scale_power),
        r_start,
        r_end,
        splat_strength: value(matches, STRENGTH).unwrap_or(defaults.splat_strength),
        gamma: value(matches, GAMMA).unwrap_or(defaults.gamma),
        threads: value(matches, THREADS).unwrap_or(defaults.threads),
        chunk_size: value(matches, CHUNK).unwrap_or(defaults.chunk_size),
        precision_bits: value(matches, PRECISION).unwrap_or(defaults.precision_bits),
        ..defaults
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    let config = config(&matches);
    let output = matches.value_of(OUTPUT).unwrap_or("bifurcation.png");

    match bifurcation::render(&config) {
        Err(e) => {
            error!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(rendering) => {
            if let Err(e) = bifurcation::write_image(output, &rendering.image) {
                error!("Could not save {}: {}", output, e);
                std::process::exit(2);
            }
        }
    }
}
