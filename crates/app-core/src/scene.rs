//! Scene composition: ring layout plus the single per-frame update.

use crate::camera::{OrbitConfig, OrbitRig};
use crate::constants::*;
use crate::gesture::{GestureState, GestureStore, Pose};
use crate::hand::{ClassifierConfig, LandmarkFeed};
use crate::media::{MediaConfig, MediaDescriptor, MediaGallery, ProximityEvent};
use crate::particles::{ParallaxConfig, ParticleField, PoolSizes};
use glam::Vec3;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Vertical placement of items around the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RingLayout {
    Flat,
    /// `y = sin(i * 132) * amplitude`, deterministic per index.
    Offset { amplitude: f32 },
}

impl Default for RingLayout {
    fn default() -> Self {
        RingLayout::Offset {
            amplitude: RING_OFFSET_AMPLITUDE,
        }
    }
}

impl RingLayout {
    pub fn height(self, index: usize) -> f32 {
        match self {
            RingLayout::Flat => 0.0,
            RingLayout::Offset { amplitude } => {
                (index as f32 * RING_OFFSET_FREQUENCY).sin() * amplitude
            }
        }
    }
}

/// Evenly spaced positions on a circle of `radius` around the origin.
pub fn ring_positions(count: usize, radius: f32, layout: RingLayout) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            Vec3::new(angle.cos() * radius, layout.height(i), angle.sin() * radius)
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub classifier: ClassifierConfig,
    pub orbit: OrbitConfig,
    pub parallax: ParallaxConfig,
    pub media: MediaConfig,
    pub pools: PoolSizes,
    pub ring_layout: RingLayout,
    pub ring_radius: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            orbit: OrbitConfig::default(),
            parallax: ParallaxConfig::default(),
            media: MediaConfig::default(),
            pools: PoolSizes::default(),
            ring_layout: RingLayout::default(),
            ring_radius: RING_RADIUS,
            seed: 0x5eed_c0de,
        }
    }
}

impl SceneConfig {
    /// Landmark feed publishing into `store` with this config's classifier settings.
    pub fn landmark_feed(&self, store: GestureStore) -> LandmarkFeed {
        LandmarkFeed::new(self.classifier, store)
    }
}

/// What one tick observed and produced.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub gesture: GestureState,
    pub eye: Vec3,
    pub proximity: SmallVec<[ProximityEvent; 4]>,
}

pub struct Scene {
    pub particles: ParticleField,
    pub rig: OrbitRig,
    pub gallery: MediaGallery,
    elapsed: f32,
    frame_count: u64,
}

impl Scene {
    pub fn new(config: &SceneConfig, descriptors: Vec<MediaDescriptor>) -> Self {
        let positions = ring_positions(descriptors.len(), config.ring_radius, config.ring_layout);
        let particles = ParticleField::new(config.pools, config.parallax, config.seed);
        let rig = OrbitRig::new(config.orbit);
        let gallery = MediaGallery::new(descriptors, &positions, config.media);
        log::info!(
            "[scene] {} media items on a ring of radius {} ({:?})",
            gallery.len(),
            config.ring_radius,
            config.ring_layout
        );
        Self {
            particles,
            rig,
            gallery,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advance every component from one gesture snapshot.
    pub fn tick(&mut self, store: &GestureStore, dt_sec: f32) -> FrameReport {
        let gesture = store.snapshot();
        self.elapsed += dt_sec;
        self.frame_count += 1;

        self.particles.update(&gesture, self.elapsed, dt_sec);
        let eye = self.rig.update(&gesture, dt_sec);
        let proximity = self.gallery.update(&gesture, eye, dt_sec);

        FrameReport {
            gesture,
            eye,
            proximity,
        }
    }
}

/// Caption shown under the scene.
pub fn status_text(pose: Pose) -> &'static str {
    match pose {
        Pose::Fist => "Gathering stardust...",
        Pose::Open => "Magic is unfolding",
    }
}
