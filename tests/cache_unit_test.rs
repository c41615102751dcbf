//! Unit tests for cache keys and the depot distance helper.
//!
//! Run with: cargo test --test cache_unit_test

use fleet_db::common::geo::haversine_meters;
use fleet_db::routes::cache;

#[test]
fn cache_key_builds_correctly() {
    // Basic key building
    assert_eq!(cache::cache_key("usage-report", &[]), "usage-report");
    assert_eq!(
        cache::cache_key("usage-report", &["abc", "2026-01-01"]),
        "usage-report:abc:2026-01-01"
    );

    // Empty components preserved (ensures query uniqueness)
    assert_ne!(
        cache::cache_key("usage-report", &["abc", "", "json"]),
        cache::cache_key("usage-report", &["abc", "json"])
    );
}

#[test]
fn haversine_zero_for_identical_points() {
    let d = haversine_meters(53.3845, -6.2960, 53.3845, -6.2960);
    assert!(d.abs() < 1e-6);
}

#[test]
fn haversine_matches_known_scale() {
    // One thousandth of a degree of latitude is about 111 meters
    let d = haversine_meters(53.3845, -6.2960, 53.3855, -6.2960);
    assert!((d - 111.2).abs() < 1.0, "got {d}");

    // Well past the 200 m depot alert threshold
    let d = haversine_meters(53.3845, -6.2960, 53.3900, -6.2960);
    assert!(d > 200.0, "got {d}");
}

#[test]
fn haversine_is_symmetric() {
    let a = haversine_meters(53.3845, -6.2960, 53.35, -6.26);
    let b = haversine_meters(53.35, -6.26, 53.3845, -6.2960);
    assert!((a - b).abs() < 1e-9);
}
