// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate bifurcation;

use bifurcation::config::{real, EXTENDED_BITS};
use bifurcation::{render, Orbit, ParameterSweep, RasterBuffer, RenderConfig, SweepDriver};

fn small(threads: usize) -> RenderConfig {
    RenderConfig {
        max_iterations: 600,
        skip_iterations: 200,
        threads,
        chunk_size: 5,
        ..RenderConfig::with_size(120, 80)
    }
}

#[test]
fn linear_sweep_of_four_columns() {
    let sweep = ParameterSweep::new(4, 1.0, 4.0, 1.0, EXTENDED_BITS);
    let rs: Vec<f64> = (0..4).map(|i| sweep.parameter(i).to_f64()).collect();
    assert_eq!(rs[0], 1.0);
    assert_eq!(rs[1], 2.0);
    assert!((rs[2] - 2.666_666_666_666_667).abs() < 1e-12);
    assert_eq!(rs[3], 4.0);
}

#[test]
fn one_sample_after_four_skipped() {
    let r = real(EXTENDED_BITS, 2.0);
    let points: Vec<_> = Orbit::new(r, &real(EXTENDED_BITS, 0.5), 4, 5, 0, 10).collect();
    assert_eq!(points.len(), 1);
    assert!((points[0].row - 0.5 * 9.0).abs() < 1e-9);
}

#[test]
fn every_channel_stays_equal_and_in_range() {
    let rendering = render(&small(3)).unwrap();
    let image = &rendering.image;
    for row in 0..image.height() {
        for column in 0..image.width() {
            let [r, g, b] = image.pixel(column, row).unwrap();
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert!(r <= 200);
        }
    }
    let rgb = image.to_rgb();
    assert_eq!(rgb.len(), 120 * 80 * 3);
    assert!(rgb.chunks(3).all(|p| p[0] == p[1] && p[1] == p[2]));
}

#[test]
fn diagram_is_not_blank() {
    let rendering = render(&small(2)).unwrap();
    let lit = rendering.image.luma().iter().filter(|&&v| v > 0).count();
    assert!(lit > 120);
    assert_eq!(rendering.sweep.total_iterations, 120 * 600);
}

#[test]
fn unit_radius_renders_are_reproducible() {
    let once = render(&small(1)).unwrap().image;
    let twice = render(&small(4)).unwrap().image;
    assert_eq!(once, twice);
}

#[test]
fn wide_splats_render_the_same_on_every_run() {
    // Radius 2.5 reaches two columns either side, so with one column
    // per chunk every pixel is shared by up to five chunks.
    let config = RenderConfig {
        aa_radius: 2.5,
        splat_strength: 3,
        chunk_size: 1,
        ..small(8)
    };
    let driver = SweepDriver::new(&config);
    let mut reference = RasterBuffer::new(config.width, config.height, config.background);
    driver.run_single(&mut reference);
    let first = render(&config).unwrap().image;
    for _ in 0..4 {
        let mut threaded = RasterBuffer::new(config.width, config.height, config.background);
        driver.run(&mut threaded).unwrap();
        let again = render(&config).unwrap().image;
        for row in 0..config.height {
            for column in 0..config.width {
                let pairs = [
                    (reference.pixel(column, row), threaded.pixel(column, row)),
                    (first.pixel(column, row), again.pixel(column, row)),
                ];
                for &(a, b) in &pairs {
                    let (a, b) = (a.unwrap()[0], b.unwrap()[0]);
                    assert!(
                        (i16::from(a) - i16::from(b)).abs() <= 1,
                        "pixel {},{} went from {} to {}",
                        column,
                        row,
                        a,
                        b
                    );
                }
            }
        }
        assert_eq!(reference, threaded);
    }
}

#[test]
fn invalid_configurations_are_refused_before_rendering() {
    let config = RenderConfig {
        r_start: 3.0,
        r_end: 2.0,
        ..small(1)
    };
    assert!(render(&config).is_err());
}
