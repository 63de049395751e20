// Host-side tests for ring layout and the per-frame scene tick.

use app_core::constants::*;
use app_core::*;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

fn small_config() -> SceneConfig {
    SceneConfig {
        pools: PoolSizes {
            tree: 300,
            core: 100,
            heart: 60,
            background: 50,
            stars: 80,
        },
        ..SceneConfig::default()
    }
}

#[test]
fn ring_of_nineteen_is_evenly_spaced_at_radius() {
    let r = 16.0;
    for layout in [RingLayout::Flat, RingLayout::default()] {
        let positions = ring_positions(19, r, layout);
        assert_eq!(positions.len(), 19);
        let angles: Vec<f32> = positions.iter().map(|p| p.z.atan2(p.x)).collect();
        for (i, p) in positions.iter().enumerate() {
            let planar = (p.x * p.x + p.z * p.z).sqrt();
            assert!((planar - r).abs() < 1e-4, "item {} at {}", i, planar);
        }
        for i in 0..19 {
            let a = angles[i];
            let b = angles[(i + 1) % 19];
            let step = (b - a).rem_euclid(TAU);
            assert!((step - TAU / 19.0).abs() < 1e-4, "step {} -> {}", i, step);
        }
    }
}

#[test]
fn flat_ring_has_zero_height_and_offset_ring_is_index_derived() {
    assert!(ring_positions(19, 16.0, RingLayout::Flat)
        .iter()
        .all(|p| p.y == 0.0));

    let offset = ring_positions(19, 16.0, RingLayout::Offset { amplitude: 2.5 });
    for (i, p) in offset.iter().enumerate() {
        assert!((p.y - (i as f32 * 132.0).sin() * 2.5).abs() < 1e-5);
        assert!(p.y.abs() <= 2.5);
    }
    assert_eq!(offset, ring_positions(19, 16.0, RingLayout::default()));
}

#[test]
fn scene_places_manifest_items_on_the_ring() {
    let descriptors = parse_manifest(DEFAULT_MANIFEST).unwrap();
    let config = small_config();
    let scene = Scene::new(&config, descriptors);
    let expected = ring_positions(19, config.ring_radius, config.ring_layout);
    let actual: Vec<Vec3> = scene.gallery.items.iter().map(|i| i.ring_position).collect();
    assert_eq!(actual, expected);
}

#[test]
fn tick_uses_one_snapshot_for_every_component() {
    let store = GestureStore::new();
    let mut scene = Scene::new(&small_config(), vec![MediaDescriptor::image("a.jpg")]);
    let g = GestureState {
        position: Vec2::new(0.4, -0.2),
        pose: Pose::Open,
        pinch_distance: 0.1,
        hand_present: true,
    };
    store.publish(g);
    let report = scene.tick(&store, 1.0 / 60.0);
    assert_eq!(report.gesture, g);
    assert_eq!(report.eye, scene.rig.eye());
    assert_eq!(scene.rig.previous_hand(), Some(g.position));
    assert!(scene.gallery.items[0].current_scale > 0.0);
    assert_eq!(scene.frame_count(), 1);
    assert!((scene.elapsed() - 1.0 / 60.0).abs() < 1e-6);
}

#[test]
fn default_orbit_keeps_videos_out_of_the_near_band() {
    let config = SceneConfig {
        ring_radius: 0.0,
        ..small_config()
    };
    let store = GestureStore::new();
    let mut scene = Scene::new(&config, vec![MediaDescriptor::video("v.mp4")]);
    store.publish(GestureState {
        pose: Pose::Open,
        ..GestureState::default()
    });
    let mut edges = Vec::new();
    for _ in 0..600 {
        edges.extend(scene.tick(&store, 1.0 / 60.0).proximity);
    }
    assert!(edges.is_empty());
    assert!(scene.rig.eye().length() > MEDIA_NEAR_DISTANCE);
}

#[test]
fn status_text_tracks_pose() {
    assert_eq!(status_text(Pose::Fist), "Gathering stardust...");
    assert_eq!(status_text(Pose::Open), "Magic is unfolding");
}
