//! Validating a few hand-made paths.
//!
//! Run with: cargo run --example validate_paths

use territory_engine::geo_utils::offset_meters;
use territory_engine::{validate_territory, GpsPoint, TrackingConfig};

fn grid(cells: &[(f64, f64)], unit: f64) -> Vec<GpsPoint> {
    let origin = GpsPoint::new(40.4168, -3.7038); // Madrid
    cells
        .iter()
        .map(|&(x, y)| offset_meters(&origin, y * unit, x * unit))
        .collect()
}

fn main() {
    let config = TrackingConfig::default();

    let paths = [
        (
            "square (100 m)",
            grid(
                &[
                    (0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (3.0, 2.0),
                    (3.0, 3.0), (2.0, 3.0), (1.0, 3.0), (0.0, 3.0), (0.0, 2.0), (0.0, 1.0),
                ],
                100.0 / 3.0,
            ),
        ),
        (
            "figure-eight",
            grid(
                &[
                    (0.0, 0.0), (0.0, 0.5), (0.0, 1.0), (0.0, 1.5), (0.0, 2.0), (1.0, 1.5),
                    (4.0, 0.0), (4.0, 0.5), (4.0, 1.0), (4.0, 1.5), (4.0, 2.0), (3.0, 1.5),
                ],
                25.0,
            ),
        ),
        (
            "short line",
            grid(&(0..10).map(|i| (i as f64, 0.0)).collect::<Vec<_>>(), 5.0),
        ),
        ("triangle", grid(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)], 10.0)),
    ];

    println!("Config: min {} points, {}m path, {} m² area\n",
        config.min_path_points, config.min_total_distance_meters, config.min_enclosed_area_sq_meters);

    for (name, points) in &paths {
        let result = validate_territory(points, &config);
        match result.failure {
            None => println!("{name:<16} valid, {:.0} m² over {:.0}m", result.enclosed_area_sq_meters, result.path_length_meters),
            Some(reason) => println!("{name:<16} rejected: {reason}"),
        }
    }
}
