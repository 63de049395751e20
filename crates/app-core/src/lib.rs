pub mod camera;
pub mod constants;
pub mod error;
pub mod gesture;
pub mod hand;
pub mod manifest;
pub mod media;
pub mod music;
pub mod particles;
pub mod scene;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static MEDIA_WGSL: &str = include_str!("../shaders/media.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use camera::*;
pub use error::*;
pub use gesture::*;
pub use hand::*;
pub use manifest::*;
pub use media::*;
pub use music::*;
pub use particles::*;
pub use scene::*;
