// Host-side tests for particle formations.

use app_core::constants::*;
use app_core::*;
use glam::Vec2;
use rand::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn small_pools() -> PoolSizes {
    PoolSizes {
        tree: 600,
        core: 200,
        heart: 120,
        background: 100,
        stars: 150,
    }
}

fn fist() -> GestureState {
    GestureState::default()
}

fn open() -> GestureState {
    GestureState {
        pose: Pose::Open,
        ..GestureState::default()
    }
}

#[test]
fn pools_are_sized_once_and_never_resized() {
    let sizes = small_pools();
    let mut field = ParticleField::new(sizes, ParallaxConfig::default(), 1);
    let expected = sizes.tree + sizes.core + sizes.heart + sizes.background + sizes.stars;
    assert_eq!(field.instance_count(), expected);
    let mut t = 0.0;
    for i in 0..120 {
        t += DT;
        let g = if i % 2 == 0 { fist() } else { open() };
        field.update(&g, t, DT);
    }
    assert_eq!(field.instance_count(), expected);
    let layered: usize = field.layers().map(|l| l.len()).sum();
    assert_eq!(layered, expected);
}

#[test]
fn same_seed_builds_same_layout() {
    let a = ParticleField::new(small_pools(), ParallaxConfig::default(), 42);
    let b = ParticleField::new(small_pools(), ParallaxConfig::default(), 42);
    let ta = a.group(GroupKind::Tree).unwrap();
    let tb = b.group(GroupKind::Tree).unwrap();
    assert_eq!(ta.particles(), tb.particles());
}

#[test]
fn tree_targets_sit_inside_the_cone_band() {
    let mut rng = StdRng::seed_from_u64(3);
    let tree = ParticleGroup::tree(2000, 0.0, &mut rng);
    for p in tree.particles() {
        let y = p.formation_target.y;
        assert!(y >= TREE_BASE_Y - 2.0 && y <= TREE_BASE_Y + TREE_HEIGHT + 0.1, "{}", y);
        assert!((0.02..0.05).contains(&p.easing_rate));
    }
}

#[test]
fn distance_to_constant_target_never_increases() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree = ParticleGroup::tree(300, 0.0, &mut rng);
    let mut heart = ParticleGroup::heart(200, 0.0, &mut rng);
    for group in [&mut tree, &mut heart] {
        let mut last: Vec<f32> = group
            .particles()
            .iter()
            .map(|p| p.current_position.distance(p.formation_target))
            .collect();
        let mut t = 0.0;
        for _ in 0..240 {
            t += DT;
            group.update(&fist(), t, DT);
            for (p, prev) in group.particles().iter().zip(last.iter_mut()) {
                let d = p.current_position.distance(p.formation_target);
                assert!(d <= *prev + 1e-4, "{:?}: {} > {}", group.kind, d, prev);
                *prev = d;
            }
        }
    }
}

#[test]
fn sustained_fist_for_five_seconds_assembles_the_tree() {
    let mut field = ParticleField::new(small_pools(), ParallaxConfig::default(), 9);
    let mut t = 0.0;
    for _ in 0..300 {
        t += DT;
        field.update(&fist(), t, DT);
    }
    let tree = field.group(GroupKind::Tree).unwrap();
    for p in tree.particles() {
        let d = p.current_position.distance(p.formation_target);
        assert!(d < 0.1, "tree particle still {} away", d);
    }
}

#[test]
fn open_pose_moves_tree_toward_the_nebula() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut tree = ParticleGroup::tree(200, 0.0, &mut rng);
    let mut t = 0.0;
    for _ in 0..300 {
        t += DT;
        tree.update(&fist(), t, DT);
    }
    for _ in 0..60 {
        t += DT;
        tree.update(&open(), t, DT);
    }
    let moved = tree
        .particles()
        .iter()
        .filter(|p| p.current_position.distance(p.formation_target) > 0.5)
        .count();
    assert!(moved > tree.len() / 2);
}

#[test]
fn background_ignores_pose() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut bg = ParticleGroup::background(50, 0.0, &mut rng);
    let before: Vec<_> = bg.particles().iter().map(|p| p.current_position).collect();
    bg.update(&open(), 1.0, DT);
    let after: Vec<_> = bg.particles().iter().map(|p| p.current_position).collect();
    assert_eq!(before, after);
}

#[test]
fn core_flows_down_and_wraps_under_fist() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut core = ParticleGroup::core(100, 0.0, &mut rng);
    let mut t = 0.0;
    for _ in 0..3000 {
        t += DT;
        core.update(&fist(), t, DT);
        for p in core.particles() {
            let y = p.formation_target.y;
            assert!(y >= TREE_BASE_Y && y <= TREE_BASE_Y + TREE_HEIGHT + 1e-3, "{}", y);
        }
    }
}

#[test]
fn parallax_shifts_output_not_state() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut tree = ParticleGroup::tree(10, 0.5, &mut rng);
    let g = GestureState {
        position: Vec2::new(2.0, -1.0),
        hand_present: true,
        ..GestureState::default()
    };
    tree.update(&g, 0.0, 0.0);
    for (p, inst) in tree.particles().iter().zip(tree.instances()) {
        let expected = p.current_position + glam::Vec3::new(1.0, -0.5, 0.0);
        assert!((glam::Vec3::from(inst.position) - expected).length() < 1e-4);
    }
}

#[test]
fn star_opacity_eases_between_pose_levels() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut stars = StarField::new(50, &mut rng);
    assert_eq!(stars.opacity(), STAR_OPACITY_FORMED);
    let mut t = 0.0;
    let mut last = stars.opacity();
    for _ in 0..600 {
        t += DT;
        stars.update(Pose::Open, t, DT);
        assert!(stars.opacity() <= last);
        last = stars.opacity();
    }
    assert!((last - STAR_OPACITY_DISPERSED).abs() < 0.01);
    assert!(stars.instances().iter().all(|i| (i.color[3] - last).abs() < 1e-6));
}

#[test]
fn instances_are_plain_gpu_records() {
    assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
    let inst = ParticleInstance {
        position: [1.0, 2.0, 3.0],
        scale: 0.5,
        color: [1.0, 0.0, 0.0, 1.0],
    };
    let bytes: &[u8] = bytemuck::bytes_of(&inst);
    assert_eq!(bytes.len(), 32);
}

/// Base size a tree particle should have with no sparkle.
fn tree_base(p: &Particle, pose: Pose) -> f32 {
    let base = match p.decoration {
        Decoration::Tree { ornament: true, .. } => TREE_ORNAMENT_SCALE,
        Decoration::Tree { ornament: false, .. } => TREE_LEAF_SCALE,
        other => panic!("not a tree particle: {:?}", other),
    };
    if pose.is_open() {
        base * TREE_DISPERSED_SCALE_BOOST
    } else {
        base
    }
}

/// Time at which `sin(time * frequency + index)` sits at its minimum.
fn trough_time(frequency: f32, index: usize) -> f32 {
    (1.5 * std::f32::consts::PI - index as f32).rem_euclid(std::f32::consts::TAU) / frequency
}

#[test]
fn ornaments_are_drawn_larger_than_leaves() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut tree = ParticleGroup::tree(300, 0.0, &mut rng);
    let (mut ornaments, mut leaves) = (0, 0);
    for i in 0..tree.len() {
        tree.update(&fist(), trough_time(5.0, i), 0.0);
        let p = &tree.particles()[i];
        let scale = tree.instances()[i].scale;
        match p.decoration {
            Decoration::Tree { ornament: true, .. } => {
                ornaments += 1;
                assert!((scale - 0.08).abs() < 1e-6, "ornament {} scale {}", i, scale);
            }
            _ => {
                leaves += 1;
                assert!((scale - 0.04).abs() < 1e-6, "leaf {} scale {}", i, scale);
            }
        }
    }
    assert!(ornaments > 0 && leaves > ornaments);
}

#[test]
fn dispersed_tree_particles_grow_by_half() {
    let mut rng = StdRng::seed_from_u64(22);
    let mut tree = ParticleGroup::tree(100, 0.0, &mut rng);
    for i in 0..tree.len() {
        let t = trough_time(5.0, i);
        tree.update(&fist(), t, 0.0);
        let formed = tree.instances()[i].scale;
        tree.update(&open(), t, 0.0);
        let dispersed = tree.instances()[i].scale;
        assert!((dispersed - formed * 1.5).abs() < 1e-6);
        assert!((dispersed - tree_base(&tree.particles()[i], Pose::Open)).abs() < 1e-6);
    }
}

#[test]
fn tree_sparkle_fires_at_the_peak_and_uses_pose_thresholds() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut tree = ParticleGroup::tree(4, 0.0, &mut rng);

    // 5t + 0 = pi/2 puts particle 0 on the crest.
    let peak = std::f32::consts::FRAC_PI_2 / 5.0;
    tree.update(&fist(), peak, 0.0);
    let base = tree_base(&tree.particles()[0], Pose::Fist);
    assert!((tree.instances()[0].scale - base * TREE_SPARKLE_SCALE).abs() < 1e-6);

    // sin = 0.985 is above the dispersed threshold (0.98) but below the formed one (0.99).
    let between = 0.985f32.asin() / 5.0;
    tree.update(&fist(), between, 0.0);
    let formed_base = tree_base(&tree.particles()[0], Pose::Fist);
    assert!((tree.instances()[0].scale - formed_base).abs() < 1e-6);
    tree.update(&open(), between, 0.0);
    let open_base = tree_base(&tree.particles()[0], Pose::Open);
    assert!((tree.instances()[0].scale - open_base * TREE_SPARKLE_SCALE).abs() < 1e-6);
}

#[test]
fn core_sparkle_multiplies_the_formed_size() {
    let mut rng = StdRng::seed_from_u64(24);
    let mut core = ParticleGroup::core(4, 0.0, &mut rng);
    let peak = std::f32::consts::FRAC_PI_2 / 10.0;
    core.update(&fist(), peak, 0.0);
    assert!((core.instances()[0].scale - CORE_FORMED_SCALE * CORE_SPARKLE_SCALE).abs() < 1e-6);

    core.update(&fist(), trough_time(10.0, 0), 0.0);
    assert!((core.instances()[0].scale - CORE_FORMED_SCALE).abs() < 1e-6);
    core.update(&open(), trough_time(10.0, 0), 0.0);
    assert!((core.instances()[0].scale - CORE_DISPERSED_SCALE).abs() < 1e-6);
}

#[test]
fn heart_pulse_stays_inside_its_band_and_reaches_the_top() {
    let mut rng = StdRng::seed_from_u64(25);
    let mut heart = ParticleGroup::heart(60, 0.0, &mut rng);
    let mut t = 0.0;
    while t < 2.0 {
        heart.update(&fist(), t, 0.0);
        for inst in heart.instances() {
            assert!(inst.scale >= 0.1 - 1e-6 && inst.scale <= 0.16 + 1e-6, "scale {}", inst.scale);
        }
        t += 0.01;
    }

    let phase = match heart.particles()[0].decoration {
        Decoration::Heart { phase_offset } => phase_offset,
        other => panic!("not a heart particle: {:?}", other),
    };
    let crest = (std::f32::consts::FRAC_PI_2 - phase).rem_euclid(std::f32::consts::PI) / 8.0;
    heart.update(&fist(), crest, 0.0);
    assert!((heart.instances()[0].scale - 0.16).abs() < 1e-4);
    let rest = (-phase).rem_euclid(std::f32::consts::PI) / 8.0;
    heart.update(&fist(), rest, 0.0);
    assert!((heart.instances()[0].scale - 0.1).abs() < 1e-4);
}

#[test]
fn heart_and_background_spin_about_y_while_tree_stays_put() {
    let mut rng = StdRng::seed_from_u64(26);
    let mut heart = ParticleGroup::heart(20, 0.0, &mut rng);
    let mut bg = ParticleGroup::background(20, 0.0, &mut rng);
    let mut tree = ParticleGroup::tree(20, 0.0, &mut rng);
    let t = std::f32::consts::PI;
    heart.update(&fist(), t, 0.0);
    bg.update(&fist(), t, 0.0);
    tree.update(&fist(), t, 0.0);

    let cases = [
        (&heart, HEART_SPIN_SPEED),
        (&bg, BACKGROUND_SPIN_SPEED),
        (&tree, 0.0),
    ];
    for (group, speed) in cases {
        let spin = glam::Quat::from_rotation_y(t * speed);
        for (p, inst) in group.particles().iter().zip(group.instances()) {
            let expected = spin * p.current_position;
            assert!(
                (glam::Vec3::from(inst.position) - expected).length() < 1e-3,
                "{:?}",
                group.kind
            );
        }
    }
    // A quarter turn for the heart at t = pi.
    let p = heart.particles()[0].current_position;
    let inst = glam::Vec3::from(heart.instances()[0].position);
    assert!((inst.y - p.y).abs() < 1e-4);
    assert!((inst.x - p.z).abs() < 1e-3 && (inst.z + p.x).abs() < 1e-3);
}

#[test]
fn core_and_heart_follow_the_revolving_nebula_when_open() {
    let mut rng = StdRng::seed_from_u64(27);
    let core = ParticleGroup::core(10, 0.0, &mut rng);
    let heart = ParticleGroup::heart(10, 0.0, &mut rng);
    for group in [&core, &heart] {
        for (i, p) in group.particles().iter().enumerate() {
            let early = p.target(Pose::Open, 1.0, i);
            let later = p.target(Pose::Open, 3.0, i);
            assert_eq!(early, nebula_point(p.drift_base, 1.0, 0.0, i));
            if glam::Vec2::new(p.drift_base.x, p.drift_base.z).length() > 0.1 {
                assert!((early - later).length() > 1e-3, "{:?} {}", group.kind, i);
            }
            assert_eq!(p.target(Pose::Fist, 3.0, i), p.formation_target);
        }
    }
}
