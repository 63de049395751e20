// Host-side tests for tuning constants and the easing law.

use app_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn clamp_bands_are_ordered_and_contain_initial_orbit() {
    assert!(ORBIT_POLAR_MIN < ORBIT_POLAR_MAX);
    assert!(ORBIT_RADIUS_MIN < ORBIT_RADIUS_MAX);
    assert!((ORBIT_POLAR_MIN..=ORBIT_POLAR_MAX).contains(&ORBIT_INITIAL_POLAR));
    assert!((ORBIT_RADIUS_MIN..=ORBIT_RADIUS_MAX).contains(&ORBIT_INITIAL_RADIUS));
    assert!(ORBIT_POLAR_MAX < std::f32::consts::PI);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pose_thresholds_leave_a_hold_band() {
    assert!(FIST_MAX_EXTENDED + 1 < OPEN_MIN_EXTENDED);
    assert!(OPEN_MIN_EXTENDED <= 5);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn media_bands_nest() {
    assert!(MEDIA_VOLUME_FALLOFF <= MEDIA_NEAR_DISTANCE);
    assert!(RING_RADIUS < ORBIT_INITIAL_RADIUS);
    assert!(MEDIA_FALLBACK_ASPECT > 1.0);
}

#[test]
fn frame_alpha_matches_rate_at_reference_fps() {
    for rate in [0.02, 0.05, 0.08, 0.1, 0.5] {
        let a = frame_alpha(rate, 1.0 / REFERENCE_FPS);
        assert!((a - rate).abs() < 1e-5, "{} vs {}", a, rate);
    }
}

#[test]
fn two_half_steps_equal_one_full_step() {
    let rate = 0.1;
    let dt = 1.0 / 30.0;
    let full = frame_alpha(rate, dt);
    let half = frame_alpha(rate, dt * 0.5);
    let remaining_after_halves = (1.0 - half) * (1.0 - half);
    assert!(((1.0 - full) - remaining_after_halves).abs() < 1e-5);
}

#[test]
fn frame_alpha_is_zero_without_time_and_bounded() {
    assert_eq!(frame_alpha(0.1, 0.0), 0.0);
    assert_eq!(frame_alpha(0.1, -1.0), 0.0);
    assert!(frame_alpha(0.1, 10.0) <= 1.0);
    assert_eq!(frame_alpha(1.0, 1.0 / 60.0), 1.0);
}
