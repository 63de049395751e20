//! Landmark classification: 21 normalized hand landmarks in, [`GestureState`] out.

use crate::constants::{FIST_MAX_EXTENDED, HAND_POSITION_SCALE, OPEN_MIN_EXTENDED};
use crate::error::LandmarkError;
use crate::gesture::{GestureState, GestureStore, Pose};
use glam::Vec2;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// (tip, pip) pairs for the four fingers.
pub const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Landmark used as the hand centroid.
pub const CENTROID: usize = MIDDLE_MCP;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; carried for completeness, never read by the classifier.
    pub z: f32,
}

impl Landmark {
    #[inline]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// One detection cycle's worth of landmarks for a single hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build a frame from a flat buffer of `x,y,z` triples (63 values) or
    /// `x,y` pairs (42 values).
    pub fn from_flat(data: &[f32]) -> Result<Self, LandmarkError> {
        let stride = match data.len() {
            n if n == LANDMARK_COUNT * 3 => 3,
            n if n == LANDMARK_COUNT * 2 => 2,
            n => return Err(LandmarkError::BadLength(n)),
        };
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (index, (lm, chunk)) in landmarks
            .iter_mut()
            .zip(data.chunks_exact(stride))
            .enumerate()
        {
            if chunk.iter().any(|v| !v.is_finite()) {
                return Err(LandmarkError::NonFinite { index });
            }
            lm.x = chunk[0];
            lm.y = chunk[1];
            lm.z = if stride == 3 { chunk[2] } else { 0.0 };
        }
        Ok(Self { landmarks })
    }

    #[inline]
    fn point(&self, index: usize) -> Vec2 {
        self.landmarks[index].planar()
    }

    /// Finger counts as extended when its tip sits above (smaller y) its PIP joint.
    pub fn finger_extended(&self, tip: usize, pip: usize) -> bool {
        self.landmarks[tip].y < self.landmarks[pip].y
    }

    /// Thumb abduction proxy: tip farther from the pinky base than the MCP joint is.
    pub fn thumb_extended(&self) -> bool {
        let pinky_base = self.point(PINKY_MCP);
        let tip_dist = self.point(THUMB_TIP).distance(pinky_base);
        let joint_dist = self.point(THUMB_MCP).distance(pinky_base);
        tip_dist > joint_dist
    }

    /// Number of extended digits, 0..=5.
    pub fn extended_count(&self) -> usize {
        let fingers = FINGER_JOINTS
            .iter()
            .filter(|(tip, pip)| self.finger_extended(*tip, *pip))
            .count();
        fingers + usize::from(self.thumb_extended())
    }

    pub fn pinch_distance(&self) -> f32 {
        self.point(THUMB_TIP).distance(self.point(INDEX_TIP))
    }

    pub fn centroid(&self) -> Vec2 {
        self.point(CENTROID)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    /// Scale applied after centring image coordinates on 0.5.
    pub position_scale: f32,
    pub open_min_extended: usize,
    pub fist_max_extended: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            position_scale: HAND_POSITION_SCALE,
            open_min_extended: OPEN_MIN_EXTENDED,
            fist_max_extended: FIST_MAX_EXTENDED,
        }
    }
}

/// Pose for an extension count, holding `previous` inside the ambiguous band.
#[inline]
pub fn pose_for_count(count: usize, previous: Pose, config: &ClassifierConfig) -> Pose {
    if count >= config.open_min_extended {
        Pose::Open
    } else if count <= config.fist_max_extended {
        Pose::Fist
    } else {
        previous
    }
}

/// Map an image-space point to scene space: centred, scaled, Y flipped.
#[inline]
pub fn image_to_scene(point: Vec2, scale: f32) -> Vec2 {
    Vec2::new((point.x - 0.5) * scale, -(point.y - 0.5) * scale)
}

/// Classify one detection cycle. `None` means no usable hand this cycle.
pub fn classify(frame: Option<&HandFrame>, previous: Pose, config: &ClassifierConfig) -> GestureState {
    match frame {
        Some(frame) => GestureState {
            position: image_to_scene(frame.centroid(), config.position_scale),
            pose: pose_for_count(frame.extended_count(), previous, config),
            pinch_distance: frame.pinch_distance(),
            hand_present: true,
        },
        None => GestureState::absent(previous),
    }
}

/// Stateful wrapper remembering the last committed pose between cycles.
#[derive(Clone, Debug, Default)]
pub struct HandClassifier {
    config: ClassifierConfig,
    last_pose: Pose,
}

impl HandClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            last_pose: Pose::Fist,
        }
    }

    pub fn last_pose(&self) -> Pose {
        self.last_pose
    }

    pub fn observe(&mut self, frame: Option<&HandFrame>) -> GestureState {
        let state = classify(frame, self.last_pose, &self.config);
        if state.pose != self.last_pose {
            log::debug!("[gesture] pose {:?} -> {:?}", self.last_pose, state.pose);
        }
        self.last_pose = state.pose;
        state
    }

    /// Classify a raw landmark buffer; malformed data counts as "no hand".
    pub fn observe_flat(&mut self, data: &[f32]) -> GestureState {
        match HandFrame::from_flat(data) {
            Ok(frame) => self.observe(Some(&frame)),
            Err(e) => {
                log::warn!("[gesture] dropping landmark frame: {}", e);
                self.observe(None)
            }
        }
    }
}

/// Classifier wired to the store it publishes to.
///
/// Closed until [`LandmarkFeed::open`]; frames pushed before that are dropped,
/// so nothing moves behind the cover screen.
#[derive(Clone, Debug)]
pub struct LandmarkFeed {
    classifier: HandClassifier,
    store: GestureStore,
    open: bool,
}

impl LandmarkFeed {
    pub fn new(config: ClassifierConfig, store: GestureStore) -> Self {
        Self {
            classifier: HandClassifier::new(config),
            store,
            open: false,
        }
    }

    pub fn store(&self) -> &GestureStore {
        &self.store
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            log::info!("[gesture] landmark feed open");
        }
    }

    /// Classify and publish one buffer. `None` while the feed is closed.
    pub fn push_flat(&mut self, data: &[f32]) -> Option<GestureState> {
        if !self.open {
            return None;
        }
        let state = self.classifier.observe_flat(data);
        self.store.publish(state);
        Some(state)
    }

    /// Publish a cycle without a hand. `None` while the feed is closed.
    pub fn push_absent(&mut self) -> Option<GestureState> {
        if !self.open {
            return None;
        }
        let state = self.classifier.observe(None);
        self.store.publish(state);
        Some(state)
    }
}
