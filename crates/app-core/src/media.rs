//! Photo and video planes on the memory ring.
//!
//! Visibility follows the pose; audio follows camera distance. The two are
//! gated independently per item, and near/far changes are reported only on
//! the frame the boolean flips.

use crate::constants::*;
use crate::gesture::{GestureState, Pose};
use glam::{Mat3, Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    pub source_ref: String,
}

impl MediaDescriptor {
    pub fn image(source_ref: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            source_ref: source_ref.into(),
        }
    }

    pub fn video(source_ref: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            source_ref: source_ref.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Pending,
    Ready {
        width: u32,
        height: u32,
    },
    Failed,
}

/// What the playback element should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioGate {
    pub muted: bool,
    pub volume: f32,
}

impl AudioGate {
    pub const SILENT: AudioGate = AudioGate {
        muted: true,
        volume: 0.0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaConfig {
    pub near_distance: f32,
    pub volume_falloff: f32,
    pub scale_easing: f32,
    pub position_easing: f32,
    pub plane_height: f32,
    pub border: f32,
    pub fallback_aspect: f32,
    pub hidden_anchor: Vec3,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            near_distance: MEDIA_NEAR_DISTANCE,
            volume_falloff: MEDIA_VOLUME_FALLOFF,
            scale_easing: MEDIA_SCALE_EASING,
            position_easing: MEDIA_POSITION_EASING,
            plane_height: MEDIA_PLANE_HEIGHT,
            border: MEDIA_BORDER,
            fallback_aspect: MEDIA_FALLBACK_ASPECT,
            hidden_anchor: MEDIA_HIDDEN_ANCHOR,
        }
    }
}

impl MediaConfig {
    /// Linear falloff inside the near band, hard mute outside it.
    pub fn audio_gate(&self, distance: f32) -> AudioGate {
        if distance < self.near_distance {
            AudioGate {
                muted: false,
                volume: (1.0 - distance / self.volume_falloff).clamp(0.0, 1.0),
            }
        } else {
            AudioGate::SILENT
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProximityEvent {
    pub item: usize,
    pub near: bool,
}

#[derive(Clone, Debug)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub source_ref: String,
    pub ring_position: Vec3,
    pub is_near: bool,
    pub current_scale: f32,
    pub current_position: Vec3,
    pub orientation: Quat,
    pub load_state: LoadState,
    pub audio: AudioGate,
}

impl MediaItem {
    pub fn new(descriptor: MediaDescriptor, ring_position: Vec3, anchor: Vec3) -> Self {
        Self {
            kind: descriptor.kind,
            source_ref: descriptor.source_ref,
            ring_position,
            is_near: false,
            current_scale: 0.0,
            current_position: anchor,
            orientation: Quat::IDENTITY,
            load_state: LoadState::Pending,
            audio: AudioGate::SILENT,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Width over height; anything not loaded with real dimensions uses the fallback.
    pub fn aspect(&self, fallback: f32) -> f32 {
        match self.load_state {
            LoadState::Ready { width, height } if width > 0 && height > 0 => {
                width as f32 / height as f32
            }
            _ => fallback,
        }
    }

    /// Content plane size (width, height) in scene units.
    pub fn plane_size(&self, config: &MediaConfig) -> (f32, f32) {
        let h = config.plane_height;
        (h * self.aspect(config.fallback_aspect), h)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.current_scale),
            self.orientation,
            self.current_position,
        )
    }

    /// Advance one frame. Returns the new `is_near` only when it flips.
    pub fn update(
        &mut self,
        pose: Pose,
        camera_eye: Vec3,
        config: &MediaConfig,
        dt_sec: f32,
    ) -> Option<bool> {
        let shown = pose.is_open();
        let (target_scale, target_position) = if shown {
            (1.0, self.ring_position)
        } else {
            (0.0, config.hidden_anchor)
        };
        self.current_scale +=
            (target_scale - self.current_scale) * frame_alpha(config.scale_easing, dt_sec);
        self.current_position = self
            .current_position
            .lerp(target_position, frame_alpha(config.position_easing, dt_sec));
        self.orientation = if shown {
            billboard(self.current_position, camera_eye)
        } else {
            Quat::IDENTITY
        };

        if !self.is_video() {
            return None;
        }
        let distance = camera_eye.distance(self.current_position);
        self.audio = config.audio_gate(distance);
        let near = distance < config.near_distance;
        if near == self.is_near {
            return None;
        }
        self.is_near = near;
        Some(near)
    }
}

/// Rotation that points the plane's +Z axis at `eye`.
pub fn billboard(position: Vec3, eye: Vec3) -> Quat {
    let forward = eye - position;
    if forward.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    let z = forward.normalize();
    let up = if z.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    let x = up.cross(z).normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

pub type ProximityListener = Box<dyn FnMut(ProximityEvent)>;

/// All media items plus the optional near/far listener.
pub struct MediaGallery {
    pub items: Vec<MediaItem>,
    pub config: MediaConfig,
    listener: Option<ProximityListener>,
}

impl MediaGallery {
    pub fn new(
        descriptors: Vec<MediaDescriptor>,
        ring_positions: &[Vec3],
        config: MediaConfig,
    ) -> Self {
        let items = descriptors
            .into_iter()
            .zip(ring_positions.iter().copied())
            .map(|(d, pos)| MediaItem::new(d, pos, config.hidden_anchor))
            .collect();
        Self {
            items,
            config,
            listener: None,
        }
    }

    pub fn set_proximity_listener(&mut self, listener: ProximityListener) {
        self.listener = Some(listener);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_load_state(&mut self, item: usize, state: LoadState) {
        if let Some(it) = self.items.get_mut(item) {
            if state == LoadState::Failed {
                log::warn!(
                    "[media] {} failed to load; using fallback aspect",
                    it.source_ref
                );
            }
            it.load_state = state;
        }
    }

    pub fn update(
        &mut self,
        gesture: &GestureState,
        camera_eye: Vec3,
        dt_sec: f32,
    ) -> SmallVec<[ProximityEvent; 4]> {
        let mut events = SmallVec::new();
        for (i, item) in self.items.iter_mut().enumerate() {
            if let Some(near) = item.update(gesture.pose, camera_eye, &self.config, dt_sec) {
                let ev = ProximityEvent { item: i, near };
                log::info!(
                    "[media] {} is now {}",
                    item.source_ref,
                    if ev.near { "near" } else { "far" }
                );
                if let Some(listener) = self.listener.as_mut() {
                    listener(ev);
                }
                events.push(ev);
            }
        }
        events
    }
}
