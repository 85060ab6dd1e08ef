//! Simulated walk around a park, driven by a fixed-interval tick.
//!
//! The "location source" produces a fix every second; every tick offers
//! whatever fix arrived last, as a session controller would.
//!
//! Run with: cargo run --example walk_loop

use territory_engine::geo_utils::offset_meters;
use territory_engine::{GeoSample, GpsPoint, OfferStatus, PathAccumulator, Territory, TrackingConfig};

/// Position on a 60 m radius loop (starting at `origin`, its southernmost point) after `seconds` of walking at ~5 km/h, with a little jitter.
fn location_at(origin: &GpsPoint, seconds: f64) -> GpsPoint {
    let radius = 60.0;
    let speed_mps = 1.4;
    let theta = speed_mps * seconds / radius - std::f64::consts::FRAC_PI_2;
    let jitter = 1.5 * (seconds * 0.7).sin();
    offset_meters(
        origin,
        (radius + jitter) * theta.sin() + radius,
        (radius + jitter) * theta.cos(),
    )
}

fn main() {
    let config = TrackingConfig::default();
    let tick_ms = config.tracking_interval().as_millis() as i64;
    let mut tracker = PathAccumulator::new(config.clone()).expect("default config is valid");

    let origin = GpsPoint::new(51.5313, -0.1570); // Regent's Park
    let start = GeoSample::new(location_at(&origin, 0.0), 0);
    tracker.start(start);
    println!("Started at ({:.6}, {:.6})", start.point.latitude, start.point.longitude);

    let mut now_ms = 0;
    while tracker.is_tracking() && !tracker.is_closed() && now_ms < 30 * 60_000 {
        now_ms += tick_ms;
        // Latest fix delivered by the location source (1 Hz)
        let fix_ms = now_ms - now_ms % 1_000;
        let fix = GeoSample::new(location_at(&origin, fix_ms as f64 / 1000.0), fix_ms);

        let update = tracker.offer(fix);
        match update.status {
            OfferStatus::Appended => {
                let to_start = tracker.distance_to_start_meters().unwrap_or(f64::NAN);
                println!("t={:>4}s  point {:>3}  {:>6.1}m from start", now_ms / 1000, update.point_count, to_start);
            }
            OfferStatus::StoppedForSpeed { speed_kmh } => {
                println!("Stopped: {:.1} km/h", speed_kmh);
            }
            _ => {}
        }
        if let Some(result) = &update.validation {
            match result.failure {
                None => println!("Loop closed: {:.0} m² enclosed", result.enclosed_area_sq_meters),
                Some(reason) => println!("Loop closed but rejected: {}", reason),
            }
        }
    }

    if let Some(session) = tracker.stop() {
        match Territory::claim(&session, &config) {
            Ok(territory) => println!(
                "Claimed {:.0} m² ({:.0}m perimeter) centred on ({:.5}, {:.5})",
                territory.area_sq_meters,
                territory.perimeter_meters,
                territory.center.latitude,
                territory.center.longitude
            ),
            Err(e) => println!("No territory: {}", e),
        }
    }
}
