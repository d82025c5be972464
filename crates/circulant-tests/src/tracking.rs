//! Integration tests for the tracking pipeline.
//!
//! Drives circulant-tracking end to end over synthetic frame sequences
//! built from circulant-core images.

use circulant_core::{GrayImage, TrackError};
use circulant_tracking::{CirculantConfig, CirculantTracker, Coordinates, TrackerState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Helpers ────────────────────────────────────────────────────

fn noise(rng: &mut StdRng, width: u32, height: u32) -> GrayImage {
    let luma: Vec<u8> = (0..width * height).map(|_| rng.random()).collect();
    GrayImage::from_luma8(width, height, &luma).unwrap()
}

/// `dst(x + dx, y + dy) = src(x, y)` wherever both sides are inside the image.
fn shift_copy(dx: i32, dy: i32, src: &GrayImage, dst: &mut GrayImage) {
    for y in 0..src.height as i32 {
        for x in 0..src.width as i32 {
            if dst.is_in_bounds(x + dx, y + dy) {
                dst.set((x + dx) as u32, (y + dy) as u32, src.get(x, y));
            }
        }
    }
}

fn shifted(rng: &mut StdRng, base: &GrayImage, dx: i32, dy: i32) -> GrayImage {
    let mut frame = noise(rng, base.width, base.height);
    shift_copy(dx, dy, base, &mut frame);
    frame
}

fn assert_near(tracker: &CirculantTracker, x: f32, y: f32, tol: f32) {
    let r = tracker.target_location();
    assert!(
        (r.x - x).abs() <= tol && (r.y - y).abs() <= tol,
        "expected near ({x}, {y}), got {r:?}"
    );
}

const MODES: [Coordinates; 2] = [Coordinates::SubPixel, Coordinates::Integer];

// ── Single step ────────────────────────────────────────────────

#[test]
fn follows_global_shift() {
    for coordinates in MODES {
        let mut rng = StdRng::seed_from_u64(234);
        let a = noise(&mut rng, 30, 35);
        let b = shifted(&mut rng, &a, 2, 4);

        let mut tracker = CirculantTracker::new(CirculantConfig {
            padding: 0.0,
            coordinates,
            ..Default::default()
        })
        .unwrap();
        tracker.initialize(&a, 5, 6, 20, 25).unwrap();
        tracker.perform_tracking(&b).unwrap();

        assert_near(&tracker, 7.0, 10.0, 1.0);
        let r = tracker.target_location();
        assert_eq!((r.width, r.height), (20.0, 25.0));
    }
}

#[test]
fn response_peaks_at_grid_center_without_motion() {
    let mut rng = StdRng::seed_from_u64(17);
    let a = noise(&mut rng, 30, 35);

    let mut tracker = CirculantTracker::new(CirculantConfig {
        padding: 0.0,
        coordinates: Coordinates::Integer,
        ..Default::default()
    })
    .unwrap();
    tracker.initialize(&a, 5, 6, 20, 25).unwrap();
    tracker.update_track_location(&a).unwrap();

    let peak = tracker.peak();
    assert_eq!((peak.x, peak.y), (10, 12));
    assert!(peak.value > 0.0);
}

// ── Sequences ──────────────────────────────────────────────────

#[test]
fn tracks_steady_motion_over_sequence() {
    for coordinates in MODES {
        let mut rng = StdRng::seed_from_u64(42);
        let base = noise(&mut rng, 100, 100);

        let mut tracker = CirculantTracker::new(CirculantConfig {
            coordinates,
            ..Default::default()
        })
        .unwrap();
        tracker.initialize(&base, 30, 30, 20, 20).unwrap();

        for i in 1..=5 {
            let frame = shifted(&mut rng, &base, 2 * i, i);
            tracker.perform_tracking(&frame).unwrap();
            assert_near(&tracker, (30 + 2 * i) as f32, (30 + i) as f32, 1.5);
        }
        assert_eq!(tracker.state(), TrackerState::Tracking);
    }
}

#[test]
fn separate_locate_and_learn_match_perform_tracking() {
    let mut rng = StdRng::seed_from_u64(9);
    let base = noise(&mut rng, 80, 80);
    let frames: Vec<GrayImage> = (1..=3).map(|i| shifted(&mut rng, &base, i, -i)).collect();

    let config = CirculantConfig {
        coordinates: Coordinates::Integer,
        ..Default::default()
    };
    let mut combined = CirculantTracker::new(config.clone()).unwrap();
    let mut split = CirculantTracker::new(config).unwrap();
    combined.initialize(&base, 30, 30, 16, 16).unwrap();
    split.initialize(&base, 30, 30, 16, 16).unwrap();

    for frame in &frames {
        combined.perform_tracking(frame).unwrap();
        split.update_track_location(frame).unwrap();
        split.perform_learning(frame).unwrap();

        assert_eq!(combined.target_location(), split.target_location());
        assert_eq!(combined.target_template(), split.target_template());
    }
}

#[test]
fn target_at_image_corner_stays_inside() {
    let mut rng = StdRng::seed_from_u64(3);
    let base = noise(&mut rng, 50, 50);

    let mut tracker = CirculantTracker::new(CirculantConfig::default()).unwrap();
    tracker.initialize(&base, 0, 0, 20, 20).unwrap();

    // content drifts off the top-left edge
    for i in 1..=4 {
        let frame = shifted(&mut rng, &base, -i, -i);
        tracker.perform_tracking(&frame).unwrap();
        let track = tracker.track_region();
        assert!(track.is_inside(50, 50), "{track:?}");
        assert_eq!((track.width, track.height), (40.0, 40.0));
    }
}

#[test]
fn reinitialize_restarts_on_new_target() {
    let mut rng = StdRng::seed_from_u64(5);
    let base = noise(&mut rng, 90, 90);

    let mut tracker = CirculantTracker::new(CirculantConfig {
        padding: 0.5,
        ..Default::default()
    })
    .unwrap();
    tracker.initialize(&base, 10, 10, 20, 20).unwrap();
    tracker.perform_tracking(&shifted(&mut rng, &base, 1, 1)).unwrap();

    tracker.initialize(&base, 50, 40, 20, 20).unwrap();
    assert_near(&tracker, 50.0, 40.0, 0.0);
    tracker.perform_tracking(&shifted(&mut rng, &base, -2, 3)).unwrap();
    assert_near(&tracker, 48.0, 43.0, 1.0);
}

// ── Configuration & errors ─────────────────────────────────────

#[test]
fn tracker_from_json_config() {
    let config = CirculantConfig::from_json(
        r#"{ "padding": 0.0, "coordinates": "Integer", "interpolation": "NearestNeighbor" }"#,
    )
    .unwrap();
    assert_eq!(config.lambda, 1e-2);

    let mut rng = StdRng::seed_from_u64(234);
    let a = noise(&mut rng, 30, 35);
    let b = shifted(&mut rng, &a, 2, 4);

    let mut tracker = CirculantTracker::new(config).unwrap();
    tracker.initialize(&a, 5, 6, 20, 25).unwrap();
    assert_eq!(tracker.grid_size(), (20, 25));
    tracker.perform_tracking(&b).unwrap();
    assert_near(&tracker, 7.0, 10.0, 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let err = CirculantTracker::new(CirculantConfig {
        lambda: -1.0,
        ..Default::default()
    })
    .err();
    assert!(matches!(err, Some(TrackError::InvalidConfig(_))));

    assert!(matches!(
        CirculantConfig::from_json("{ not json"),
        Err(TrackError::Serialization(_))
    ));
}

#[test]
fn tracking_before_initialize_fails() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = noise(&mut rng, 30, 35);
    let mut tracker = CirculantTracker::new(CirculantConfig::default()).unwrap();

    assert!(matches!(
        tracker.perform_tracking(&a),
        Err(TrackError::NotInitialized)
    ));
    assert!(matches!(
        tracker.perform_learning(&a),
        Err(TrackError::NotInitialized)
    ));
}
