//! Particle formations.
//!
//! Every group is a fixed pool allocated once at construction. Each particle
//! carries two targets, its place in the formation (tree, core, heart) and its
//! place in the dispersed nebula, and eases toward whichever one the current
//! pose selects at its own rate. Only `current_position`, the core flow
//! coordinate and the output instances change after construction.

use crate::constants::*;
use crate::gesture::{GestureState, Pose};
use glam::{Quat, Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

/// Per-instance record pushed to the renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub scale: f32,
    /// Linear RGB with HDR intensity; alpha is layer opacity.
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    Tree,
    Core,
    Heart,
    Background,
}

/// Group-specific per-particle data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decoration {
    Tree {
        ornament: bool,
        color_index: u8,
        swirl_offset: f32,
    },
    Core {
        fall_speed: f32,
    },
    Heart {
        phase_offset: f32,
    },
    Background,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub formation_target: Vec3,
    pub drift_base: Vec3,
    pub current_position: Vec3,
    /// Fraction of the remaining distance covered per 60 Hz frame.
    pub easing_rate: f32,
    pub color: [f32; 3],
    pub decoration: Decoration,
}

impl Particle {
    /// Target for the given pose at `time`. `index` decorrelates the bob.
    pub fn target(&self, pose: Pose, time: f32, index: usize) -> Vec3 {
        match (pose, self.decoration) {
            (_, Decoration::Background) => self.formation_target,
            (Pose::Fist, _) => self.formation_target,
            (Pose::Open, decoration) => {
                let offset = match decoration {
                    Decoration::Tree { swirl_offset, .. } => swirl_offset,
                    _ => 0.0,
                };
                nebula_point(self.drift_base, time, offset, index)
            }
        }
    }
}

/// Point on the slowly revolving, bobbing nebula for a drift base.
#[inline]
pub fn nebula_point(base: Vec3, time: f32, swirl_offset: f32, index: usize) -> Vec3 {
    let angle = base.z.atan2(base.x) + time * NEBULA_SWIRL_SPEED + swirl_offset;
    let radius = Vec2::new(base.x, base.z).length();
    Vec3::new(
        angle.cos() * radius,
        base.y + (time + index as f32).sin() * NEBULA_BOB_AMPLITUDE,
        angle.sin() * radius,
    )
}

/// Momentary enlargement driven by `sin(time * frequency + index)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    pub frequency: f32,
    pub threshold_formed: f32,
    pub threshold_dispersed: f32,
    pub multiplier: f32,
}

impl Sparkle {
    #[inline]
    pub fn factor(&self, pose: Pose, time: f32, index: usize) -> f32 {
        let threshold = if pose.is_fist() {
            self.threshold_formed
        } else {
            self.threshold_dispersed
        };
        if (time * self.frequency + index as f32).sin() > threshold {
            self.multiplier
        } else {
            1.0
        }
    }
}

/// Hand-driven offset applied on output, per group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxConfig {
    pub tree: f32,
    pub core: f32,
    pub heart: f32,
    pub background: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            tree: TREE_PARALLAX,
            core: CORE_PARALLAX,
            heart: HEART_PARALLAX,
            background: 0.0,
        }
    }
}

impl ParallaxConfig {
    pub fn for_kind(&self, kind: GroupKind) -> f32 {
        match kind {
            GroupKind::Tree => self.tree,
            GroupKind::Core => self.core,
            GroupKind::Heart => self.heart,
            GroupKind::Background => self.background,
        }
    }
}

pub struct ParticleGroup {
    pub kind: GroupKind,
    particles: Vec<Particle>,
    instances: Vec<ParticleInstance>,
    parallax: f32,
    /// Whole-group rotation about Y, radians per second.
    spin_speed: f32,
}

impl ParticleGroup {
    fn from_particles(kind: GroupKind, particles: Vec<Particle>, parallax: f32) -> Self {
        let spin_speed = match kind {
            GroupKind::Heart => HEART_SPIN_SPEED,
            GroupKind::Background => BACKGROUND_SPIN_SPEED,
            _ => 0.0,
        };
        let instances = vec![ParticleInstance::default(); particles.len()];
        let mut group = Self {
            kind,
            particles,
            instances,
            parallax,
            spin_speed,
        };
        group.write_instances(&GestureState::default(), 0.0);
        group
    }

    pub fn tree(count: usize, parallax: f32, rng: &mut StdRng) -> Self {
        let particles = (0..count)
            .map(|_| {
                let t: f32 = rng.gen();
                let angle = t * TAU * TREE_TURNS + rng.gen::<f32>() * 0.5;
                let layer_progress = (t * TREE_LAYERS).fract();
                let cone_radius = (1.0 - t) * TREE_BASE_RADIUS;
                let branch_radius = cone_radius * (0.3 + 0.7 * layer_progress.powf(0.8));
                let radius = branch_radius + (rng.gen::<f32>() - 0.5) * 1.5;
                let droop = radius * 0.2;
                let y = t * TREE_HEIGHT + TREE_BASE_Y - droop * 0.5;
                let formation_target = Vec3::new(angle.cos() * radius, y, angle.sin() * radius);
                let drift_base = random_direction(rng) * (rng.gen::<f32>() * 15.0 + 5.0);
                let easing_rate = rng.gen::<f32>() * 0.03 + 0.02;
                let ornament = rng.gen::<f32>() < TREE_ORNAMENT_CHANCE;
                let (color_index, color) = if ornament {
                    let i = rng.gen_range(0..ORNAMENT_PALETTE.len());
                    (i, ORNAMENT_PALETTE[i])
                } else {
                    let i = rng.gen_range(0..LEAF_PALETTE.len());
                    (i, LEAF_PALETTE[i])
                };
                Particle {
                    formation_target,
                    drift_base,
                    current_position: drift_base,
                    easing_rate,
                    color,
                    decoration: Decoration::Tree {
                        ornament,
                        color_index: color_index as u8,
                        swirl_offset: rng.gen::<f32>() * TAU,
                    },
                }
            })
            .collect();
        Self::from_particles(GroupKind::Tree, particles, parallax)
    }

    pub fn core(count: usize, parallax: f32, rng: &mut StdRng) -> Self {
        let particles = (0..count)
            .map(|_| {
                let t: f32 = rng.gen();
                let core_radius = t * t * 1.2;
                let angle = rng.gen::<f32>() * TAU;
                let formation_target = Vec3::new(
                    angle.cos() * core_radius,
                    (1.0 - t) * TREE_HEIGHT + TREE_BASE_Y,
                    angle.sin() * core_radius,
                );
                let drift_base = random_direction(rng) * (rng.gen::<f32>() * 5.0);
                let easing_rate = rng.gen::<f32>() * 0.03 + 0.02;
                let fall_speed = rng.gen::<f32>() * 0.05 + 0.02;
                let color = CORE_PALETTE[rng.gen_range(0..CORE_PALETTE.len())];
                Particle {
                    formation_target,
                    drift_base,
                    current_position: drift_base,
                    easing_rate,
                    color,
                    decoration: Decoration::Core { fall_speed },
                }
            })
            .collect();
        Self::from_particles(GroupKind::Core, particles, parallax)
    }

    pub fn heart(count: usize, parallax: f32, rng: &mut StdRng) -> Self {
        let jitter = 0.05;
        let particles = (0..count)
            .map(|_| {
                let t = rng.gen::<f32>() * TAU;
                let hx = 16.0 * t.sin().powi(3) / 15.0;
                let hy = (13.0 * t.cos()
                    - 5.0 * (2.0 * t).cos()
                    - 2.0 * (3.0 * t).cos()
                    - (4.0 * t).cos())
                    / 15.0;
                let hz = (rng.gen::<f32>() - 0.5) * 0.5;
                let local = Vec3::new(
                    hx + (rng.gen::<f32>() - 0.5) * jitter,
                    hy + (rng.gen::<f32>() - 0.5) * jitter,
                    hz + (rng.gen::<f32>() - 0.5) * jitter,
                );
                let drift_base = Vec3::new(local.x * 8.0, 25.0 + rng.gen::<f32>() * 10.0, local.z * 8.0);
                let easing_rate = rng.gen::<f32>() * 0.05 + 0.03;
                let color = HEART_PALETTE[rng.gen_range(0..HEART_PALETTE.len())];
                Particle {
                    formation_target: HEART_TOP + local,
                    drift_base,
                    current_position: drift_base,
                    easing_rate,
                    color,
                    decoration: Decoration::Heart {
                        phase_offset: rng.gen::<f32>() * PI,
                    },
                }
            })
            .collect();
        Self::from_particles(GroupKind::Heart, particles, parallax)
    }

    pub fn background(count: usize, parallax: f32, rng: &mut StdRng) -> Self {
        let particles = (0..count)
            .map(|_| {
                let p = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 120.0,
                    (rng.gen::<f32>() - 0.5) * 120.0,
                    (rng.gen::<f32>() - 0.5) * 100.0 - 20.0,
                );
                Particle {
                    formation_target: p,
                    drift_base: p,
                    current_position: p,
                    easing_rate: 1.0,
                    color: BACKGROUND_COLOR,
                    decoration: Decoration::Background,
                }
            })
            .collect();
        Self::from_particles(GroupKind::Background, particles, parallax)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    fn sparkle(&self) -> Option<Sparkle> {
        match self.kind {
            GroupKind::Tree => Some(Sparkle {
                frequency: 5.0,
                threshold_formed: 0.99,
                threshold_dispersed: 0.98,
                multiplier: TREE_SPARKLE_SCALE,
            }),
            GroupKind::Core => Some(Sparkle {
                frequency: 10.0,
                threshold_formed: 0.95,
                threshold_dispersed: 0.95,
                multiplier: CORE_SPARKLE_SCALE,
            }),
            _ => None,
        }
    }

    /// Advance every particle by `dt_sec` using one gesture snapshot.
    pub fn update(&mut self, gesture: &GestureState, time: f32, dt_sec: f32) {
        let pose = gesture.pose;
        let frames = dt_sec * REFERENCE_FPS;
        let flow_top = TREE_BASE_Y + TREE_HEIGHT;
        let rate_multiplier = if self.kind == GroupKind::Heart {
            HEART_EASING_MULTIPLIER
        } else {
            1.0
        };
        for (i, p) in self.particles.iter_mut().enumerate() {
            if let (Pose::Fist, Decoration::Core { fall_speed }) = (pose, p.decoration) {
                p.formation_target.y -= fall_speed * frames;
                if p.formation_target.y < TREE_BASE_Y {
                    p.formation_target.y = flow_top;
                }
            }
            let target = p.target(pose, time, i);
            let alpha = frame_alpha(p.easing_rate * rate_multiplier, dt_sec);
            p.current_position = p.current_position.lerp(target, alpha);
        }
        self.write_instances(gesture, time);
    }

    fn write_instances(&mut self, gesture: &GestureState, time: f32) {
        let pose = gesture.pose;
        let shift = Vec3::new(gesture.position.x, gesture.position.y, 0.0) * self.parallax;
        let spin = Quat::from_rotation_y(time * self.spin_speed);
        let sparkle = self.sparkle();
        for (i, (p, out)) in self.particles.iter().zip(self.instances.iter_mut()).enumerate() {
            let base = match p.decoration {
                Decoration::Tree { ornament, .. } => {
                    let s = if ornament {
                        TREE_ORNAMENT_SCALE
                    } else {
                        TREE_LEAF_SCALE
                    };
                    if pose.is_open() {
                        s * TREE_DISPERSED_SCALE_BOOST
                    } else {
                        s
                    }
                }
                Decoration::Core { .. } => {
                    if pose.is_fist() {
                        CORE_FORMED_SCALE
                    } else {
                        CORE_DISPERSED_SCALE
                    }
                }
                Decoration::Heart { phase_offset } => {
                    let beat = (time * HEART_BEAT_FREQUENCY + phase_offset).sin().powi(2);
                    HEART_BASE_SCALE + beat * HEART_PULSE_SCALE
                }
                Decoration::Background => BACKGROUND_SCALE,
            };
            let scale = match sparkle {
                Some(s) => base * s.factor(pose, time, i),
                None => base,
            };
            let world = spin * (p.current_position + shift);
            *out = ParticleInstance {
                position: world.to_array(),
                scale,
                color: [p.color[0], p.color[1], p.color[2], 1.0],
            };
        }
    }
}

/// Distant star shell; dims while the nebula is out so the media stands forward.
pub struct StarField {
    positions: Vec<Vec3>,
    sizes: Vec<f32>,
    colors: Vec<[f32; 3]>,
    opacity: f32,
    instances: Vec<ParticleInstance>,
}

impl StarField {
    pub fn new(count: usize, rng: &mut StdRng) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut sizes = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let r = STAR_SHELL_MIN_RADIUS
                + rng.gen::<f32>() * (STAR_SHELL_MAX_RADIUS - STAR_SHELL_MIN_RADIUS);
            let theta = rng.gen::<f32>() * TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            positions.push(Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            ));
            sizes.push(0.25 + rng.gen::<f32>() * 0.5);
            colors.push(STAR_PALETTE[rng.gen_range(0..STAR_PALETTE.len())]);
        }
        let instances = vec![ParticleInstance::default(); count];
        let mut field = Self {
            positions,
            sizes,
            colors,
            opacity: STAR_OPACITY_FORMED,
            instances,
        };
        field.write_instances(0.0);
        field
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn update(&mut self, pose: Pose, time: f32, dt_sec: f32) {
        let target = if pose.is_fist() {
            STAR_OPACITY_FORMED
        } else {
            STAR_OPACITY_DISPERSED
        };
        self.opacity += (target - self.opacity) * frame_alpha(STAR_OPACITY_EASING, dt_sec);
        self.write_instances(time);
    }

    fn write_instances(&mut self, time: f32) {
        let rotation = Quat::from_rotation_y(time * STAR_SPIN_SPEED)
            * Quat::from_rotation_x((time * 0.1).sin() * 0.05);
        let breathe = 1.0 + (time * 2.0).sin() * 0.1;
        for (((pos, size), color), out) in self
            .positions
            .iter()
            .zip(&self.sizes)
            .zip(&self.colors)
            .zip(self.instances.iter_mut())
        {
            *out = ParticleInstance {
                position: (rotation * (*pos * breathe)).to_array(),
                scale: size * breathe,
                color: [color[0], color[1], color[2], self.opacity],
            };
        }
    }
}

/// Pool sizes for each layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSizes {
    pub tree: usize,
    pub core: usize,
    pub heart: usize,
    pub background: usize,
    pub stars: usize,
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            tree: TREE_COUNT,
            core: CORE_COUNT,
            heart: HEART_COUNT,
            background: BACKGROUND_COUNT,
            stars: STAR_FIELD_COUNT,
        }
    }
}

/// All particle layers, built once from a seed.
pub struct ParticleField {
    pub groups: Vec<ParticleGroup>,
    pub stars: StarField,
}

impl ParticleField {
    pub fn new(sizes: PoolSizes, parallax: ParallaxConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let groups = vec![
            ParticleGroup::background(sizes.background, parallax.background, &mut rng),
            ParticleGroup::tree(sizes.tree, parallax.tree, &mut rng),
            ParticleGroup::core(sizes.core, parallax.core, &mut rng),
            ParticleGroup::heart(sizes.heart, parallax.heart, &mut rng),
        ];
        let stars = StarField::new(sizes.stars, &mut rng);
        log::info!(
            "[scene] particle pools: {} groups, {} particles, {} stars",
            groups.len(),
            groups.iter().map(|g| g.len()).sum::<usize>(),
            stars.len()
        );
        Self { groups, stars }
    }

    pub fn group(&self, kind: GroupKind) -> Option<&ParticleGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    pub fn update(&mut self, gesture: &GestureState, time: f32, dt_sec: f32) {
        self.stars.update(gesture.pose, time, dt_sec);
        for group in &mut self.groups {
            group.update(gesture, time, dt_sec);
        }
    }

    /// Total instance count across every layer; fixed for the session.
    pub fn instance_count(&self) -> usize {
        self.stars.len() + self.groups.iter().map(|g| g.len()).sum::<usize>()
    }

    /// Layers in draw order: star shell first, then the groups.
    pub fn layers(&self) -> impl Iterator<Item = &[ParticleInstance]> {
        std::iter::once(self.stars.instances()).chain(self.groups.iter().map(|g| g.instances()))
    }
}

/// Uniformly distributed unit vector.
fn random_direction(rng: &mut StdRng) -> Vec3 {
    let z = rng.gen::<f32>() * 2.0 - 1.0;
    let theta = rng.gen::<f32>() * TAU;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), z, r * theta.sin())
}
