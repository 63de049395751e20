// Front-end wiring and render tuning constants

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const ENABLE_AUDIO_ID: &str = "enable-audio";
pub const ENTER_WORLD_ID: &str = "enter-world";
pub const STATUS_LINE_ID: &str = "status-line";
pub const TRACK_LABEL_ID: &str = "track-label";
pub const COVER_ID: &str = "cover";

// Frame step clamp (seconds); large gaps come from hidden tabs
pub const MAX_FRAME_DT: f32 = 0.1;

// Bloom
pub const BLOOM_THRESHOLD: f32 = 0.9;
pub const BLOOM_STRENGTH: f32 = 1.2; // mixes the blurred bright pass into the scene
pub const EXPOSURE: f32 = 1.0;

// Scene clear colour (near-black blue)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.02,
    a: 1.0,
};

// Media textures
pub const MEDIA_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const VIDEO_HAVE_CURRENT_DATA: u16 = 2; // HTMLMediaElement.readyState
