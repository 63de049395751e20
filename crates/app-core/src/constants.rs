use glam::Vec3;

// Shared tuning constants for the scene. Per-frame rates are expressed for a
// 60 Hz frame and rescaled by `frame_alpha` at runtime.

pub const REFERENCE_FPS: f32 = 60.0;

// Hand classification
pub const HAND_POSITION_SCALE: f32 = 3.0; // image-space [-0.5, 0.5] -> scene units
pub const OPEN_MIN_EXTENDED: usize = 4; // >= this many digits -> OPEN
pub const FIST_MAX_EXTENDED: usize = 1; // <= this many digits -> FIST

// Camera orbit
pub const ORBIT_INITIAL_RADIUS: f32 = 50.0;
pub const ORBIT_INITIAL_POLAR: f32 = std::f32::consts::FRAC_PI_2 - 0.1; // slightly above the horizon
pub const ORBIT_INITIAL_AZIMUTH: f32 = 0.0;
pub const ORBIT_LOOK_AT: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const ORBIT_ROTATE_SENSITIVITY: f32 = 1.2;
pub const ORBIT_ELEVATE_SENSITIVITY: f32 = 0.8;
pub const ORBIT_ZOOM_SENSITIVITY: f32 = 120.0;
pub const ORBIT_POLAR_MIN: f32 = 0.1;
pub const ORBIT_POLAR_MAX: f32 = 2.0;
pub const ORBIT_RADIUS_MIN: f32 = 10.0;
pub const ORBIT_RADIUS_MAX: f32 = 90.0;
pub const ORBIT_POSITION_EASING: f32 = 0.1;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 0.0, 60.0);
pub const CAMERA_FOVY_DEGREES: f32 = 45.0;

// Particle pools
pub const TREE_COUNT: usize = 12_000;
pub const CORE_COUNT: usize = 2_000;
pub const HEART_COUNT: usize = 800;
pub const BACKGROUND_COUNT: usize = 4_000;
pub const STAR_FIELD_COUNT: usize = 6_000;

// Tree shape
pub const TREE_HEIGHT: f32 = 18.0;
pub const TREE_BASE_Y: f32 = -11.5; // tree spans [-11.5, 6.5]
pub const TREE_BASE_RADIUS: f32 = 9.0;
pub const TREE_LAYERS: f32 = 10.0;
pub const TREE_TURNS: f32 = 15.0;
pub const TREE_ORNAMENT_CHANCE: f32 = 0.1;

// Particle sizing
pub const TREE_LEAF_SCALE: f32 = 0.04;
pub const TREE_ORNAMENT_SCALE: f32 = 0.08;
pub const TREE_DISPERSED_SCALE_BOOST: f32 = 1.5;
pub const TREE_SPARKLE_SCALE: f32 = 2.5;
pub const CORE_FORMED_SCALE: f32 = 0.03;
pub const CORE_DISPERSED_SCALE: f32 = 0.05;
pub const CORE_SPARKLE_SCALE: f32 = 3.0;
pub const HEART_BASE_SCALE: f32 = 0.1;
pub const HEART_PULSE_SCALE: f32 = 0.06;
pub const BACKGROUND_SCALE: f32 = 0.08;

// Particle motion
pub const NEBULA_SWIRL_SPEED: f32 = 0.3; // radians per second
pub const NEBULA_BOB_AMPLITUDE: f32 = 0.5;
pub const HEART_EASING_MULTIPLIER: f32 = 2.0;
pub const HEART_TOP: Vec3 = Vec3::new(0.0, 7.0, 0.0);
pub const HEART_SPIN_SPEED: f32 = 0.5;
pub const HEART_BEAT_FREQUENCY: f32 = 8.0;
pub const BACKGROUND_SPIN_SPEED: f32 = 0.015;

// Parallax (scene units per unit of hand position)
pub const TREE_PARALLAX: f32 = 0.15;
pub const CORE_PARALLAX: f32 = 0.10;
pub const HEART_PARALLAX: f32 = 0.02;

// Star field
pub const STAR_SHELL_MIN_RADIUS: f32 = 40.0;
pub const STAR_SHELL_MAX_RADIUS: f32 = 200.0;
pub const STAR_SPIN_SPEED: f32 = 0.02;
pub const STAR_OPACITY_FORMED: f32 = 1.0;
pub const STAR_OPACITY_DISPERSED: f32 = 0.2;
pub const STAR_OPACITY_EASING: f32 = 0.05;

// Media ring
pub const RING_RADIUS: f32 = 16.0;
pub const RING_OFFSET_AMPLITUDE: f32 = 2.5;
pub const RING_OFFSET_FREQUENCY: f32 = 132.0;
pub const MEDIA_NEAR_DISTANCE: f32 = 20.0;
pub const MEDIA_VOLUME_FALLOFF: f32 = 15.0; // full volume at 0, silent at this distance
pub const MEDIA_SCALE_EASING: f32 = 0.1;
pub const MEDIA_POSITION_EASING: f32 = 0.08;
pub const MEDIA_PLANE_HEIGHT: f32 = 2.5;
pub const MEDIA_BORDER: f32 = 0.15;
pub const MEDIA_FALLBACK_ASPECT: f32 = 16.0 / 9.0;
pub const MEDIA_HIDDEN_ANCHOR: Vec3 = Vec3::ZERO;
pub const MEDIA_TINT: [f32; 4] = [0.69, 0.69, 0.69, 1.0];
pub const MEDIA_BORDER_COLOR: [f32; 4] = [0.83, 0.83, 0.83, 1.0];

// Background music
pub const INTRO_TRACK: &str = "/music/intro.mp3"; // loops on the cover screen
pub const PLAYLIST_TRACKS: [&str; 4] = [
    "/music/song1.mp3",
    "/music/song2.mp3",
    "/music/song3.mp3",
    "/music/song4.mp3",
];
pub const INTRO_VOLUME: f64 = 0.6;
pub const PLAYLIST_VOLUME: f64 = 0.5;

// Palettes (linear RGB with HDR intensity baked in)
pub const ORNAMENT_PALETTE: [[f32; 3]; 5] = [
    [1.5, 0.088, 0.088], // red
    [0.0, 1.2, 0.198],   // green
    [2.0, 1.5, 0.0],     // gold
    [1.5, 1.5, 1.5],     // white
    [0.0, 1.104, 1.2],   // cyan
];

pub const LEAF_PALETTE: [[f32; 3]; 3] = [
    [0.0, 0.8, 0.132],
    [0.0, 0.5, 0.083],
    [0.8, 0.8, 0.8],
];

pub const CORE_PALETTE: [[f32; 3]; 3] = [
    [2.5, 1.667, 0.0],
    [1.8, 1.557, 0.96],
    [2.0, 2.0, 2.0],
];

pub const HEART_PALETTE: [[f32; 3]; 3] = [
    [3.0, 0.0, 0.999],
    [4.0, 0.0, 0.0],
    [2.0, 1.6, 1.6],
];

pub const STAR_PALETTE: [[f32; 3]; 3] = [
    [1.0, 1.0, 1.0],   // white
    [0.667, 0.867, 1.0], // young blue
    [1.0, 0.867, 0.667], // old yellow
];

pub const BACKGROUND_COLOR: [f32; 3] = [0.2, 0.2, 0.2];

/// Convert a per-60Hz-frame easing rate into the blend factor for `dt_sec`.
#[inline]
pub fn frame_alpha(rate_per_frame: f32, dt_sec: f32) -> f32 {
    let rate = rate_per_frame.clamp(0.0, 1.0);
    let frames = (dt_sec * REFERENCE_FPS).max(0.0);
    1.0 - (1.0 - rate).powf(frames)
}
