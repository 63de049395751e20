// Host-side tests for landmark classification and the gesture store.

use app_core::*;
use glam::Vec2;

/// Hand with `count` extended digits: the thumb first, then index..pinky.
fn hand_with(count: usize) -> HandFrame {
    let mut lms = [Landmark {
        x: 0.5,
        y: 0.5,
        z: 0.0,
    }; LANDMARK_COUNT];
    lms[PINKY_MCP] = Landmark { x: 0.6, y: 0.5, z: 0.0 };
    lms[THUMB_MCP] = Landmark { x: 0.45, y: 0.5, z: 0.0 };
    lms[THUMB_TIP] = if count >= 1 {
        Landmark { x: 0.3, y: 0.5, z: 0.0 }
    } else {
        Landmark { x: 0.55, y: 0.5, z: 0.0 }
    };
    for (i, (tip, pip)) in FINGER_JOINTS.iter().enumerate() {
        lms[*pip].y = 0.5;
        lms[*tip].y = if count >= i + 2 { 0.3 } else { 0.7 };
    }
    lms[MIDDLE_MCP] = Landmark { x: 0.7, y: 0.2, z: 0.0 };
    HandFrame::new(lms)
}

fn flatten(frame: &HandFrame) -> Vec<f32> {
    frame
        .landmarks
        .iter()
        .flat_map(|l| [l.x, l.y, l.z])
        .collect()
}

#[test]
fn extension_count_matches_constructed_hand() {
    for n in 0..=5 {
        assert_eq!(hand_with(n).extended_count(), n, "count {}", n);
    }
}

#[test]
fn thumb_uses_distance_to_pinky_base() {
    let open = hand_with(1);
    assert!(open.thumb_extended());
    let closed = hand_with(0);
    assert!(!closed.thumb_extended());
}

#[test]
fn pose_changes_only_at_thresholds_and_holds_in_between() {
    let config = ClassifierConfig::default();
    // Every count sequence of length 4 over 0..=5
    for a in 0..=5usize {
        for b in 0..=5usize {
            for c in 0..=5usize {
                for d in 0..=5usize {
                    let mut prev = Pose::Fist;
                    for count in [a, b, c, d] {
                        let next = pose_for_count(count, prev, &config);
                        match count {
                            0 | 1 => assert_eq!(next, Pose::Fist),
                            2 | 3 => assert_eq!(next, prev),
                            _ => assert_eq!(next, Pose::Open),
                        }
                        prev = next;
                    }
                }
            }
        }
    }
}

#[test]
fn classifier_holds_pose_through_ambiguous_counts() {
    let mut classifier = HandClassifier::new(ClassifierConfig::default());
    assert_eq!(classifier.last_pose(), Pose::Fist);
    assert_eq!(classifier.observe(Some(&hand_with(5))).pose, Pose::Open);
    assert_eq!(classifier.observe(Some(&hand_with(3))).pose, Pose::Open);
    assert_eq!(classifier.observe(Some(&hand_with(2))).pose, Pose::Open);
    assert_eq!(classifier.observe(Some(&hand_with(1))).pose, Pose::Fist);
    assert_eq!(classifier.observe(Some(&hand_with(3))).pose, Pose::Fist);
    assert_eq!(classifier.observe(Some(&hand_with(4))).pose, Pose::Open);
}

#[test]
fn absent_hand_zeroes_position_and_pinch_and_keeps_pose() {
    let mut classifier = HandClassifier::new(ClassifierConfig::default());
    classifier.observe(Some(&hand_with(5)));
    for _ in 0..3 {
        let state = classifier.observe(None);
        assert!(!state.hand_present);
        assert_eq!(state.position, Vec2::ZERO);
        assert_eq!(state.pinch_distance, 0.0);
        assert_eq!(state.pose, Pose::Open);
    }
}

#[test]
fn centroid_maps_to_centred_scaled_scene_space() {
    let state = classify(Some(&hand_with(5)), Pose::Fist, &ClassifierConfig::default());
    // middle MCP at (0.7, 0.2): x = 0.2 * 3, y = -(-0.3) * 3
    assert!((state.position.x - 0.6).abs() < 1e-5);
    assert!((state.position.y - 0.9).abs() < 1e-5);
    assert!(state.hand_present);
}

#[test]
fn pinch_is_thumb_tip_to_index_tip() {
    let frame = hand_with(5);
    let expected = frame.landmarks[THUMB_TIP]
        .planar()
        .distance(frame.landmarks[INDEX_TIP].planar());
    assert!((frame.pinch_distance() - expected).abs() < 1e-6);
    assert!(frame.pinch_distance() > 0.0);
}

#[test]
fn from_flat_accepts_xyz_and_xy_layouts() {
    let frame = hand_with(4);
    let xyz = flatten(&frame);
    assert_eq!(HandFrame::from_flat(&xyz).unwrap(), frame);

    let xy: Vec<f32> = frame.landmarks.iter().flat_map(|l| [l.x, l.y]).collect();
    let parsed = HandFrame::from_flat(&xy).unwrap();
    assert_eq!(parsed.extended_count(), 4);
}

#[test]
fn malformed_buffers_are_rejected() {
    assert_eq!(
        HandFrame::from_flat(&[0.0f32; 10]),
        Err(LandmarkError::BadLength(10))
    );
    let mut data = flatten(&hand_with(5));
    data[3 * 7 + 1] = f32::NAN;
    assert_eq!(
        HandFrame::from_flat(&data),
        Err(LandmarkError::NonFinite { index: 7 })
    );
}

#[test]
fn malformed_frame_counts_as_no_hand() {
    let mut classifier = HandClassifier::new(ClassifierConfig::default());
    classifier.observe_flat(&flatten(&hand_with(5)));
    let state = classifier.observe_flat(&[1.0, 2.0, 3.0]);
    assert!(!state.hand_present);
    assert_eq!(state.pose, Pose::Open);
    assert_eq!(state.position, Vec2::ZERO);
}

#[test]
fn store_starts_at_fist_without_hand_and_last_write_wins() {
    let store = GestureStore::new();
    assert_eq!(store.snapshot(), GestureState::default());
    assert_eq!(store.snapshot().pose, Pose::Fist);

    let reader = store.clone();
    let first = GestureState {
        position: Vec2::new(1.0, 2.0),
        pose: Pose::Open,
        pinch_distance: 0.1,
        hand_present: true,
    };
    store.publish(first);
    store.publish(GestureState::absent(Pose::Open));
    assert_eq!(reader.snapshot(), GestureState::absent(Pose::Open));
}

#[test]
fn position_scale_from_scene_config_reaches_the_store() {
    let frame = flatten(&hand_with(5));

    let default_store = GestureStore::new();
    let mut feed = SceneConfig::default().landmark_feed(default_store.clone());
    feed.open();
    feed.push_flat(&frame);
    let p = default_store.snapshot().position;
    assert!((p - Vec2::new(0.6, 0.9)).length() < 1e-5, "{:?}", p);

    let mut config = SceneConfig::default();
    config.classifier.position_scale = 6.0;
    let store = GestureStore::new();
    let mut feed = config.landmark_feed(store.clone());
    feed.open();
    let state = feed.push_flat(&frame).unwrap();
    assert!((state.position - Vec2::new(1.2, 1.8)).length() < 1e-5, "{:?}", state.position);
    assert_eq!(store.snapshot(), state);
}

#[test]
fn closed_feed_drops_frames_until_opened() {
    let store = GestureStore::new();
    let mut feed = LandmarkFeed::new(ClassifierConfig::default(), store.clone());
    assert!(!feed.is_open());
    assert_eq!(feed.push_flat(&flatten(&hand_with(5))), None);
    assert_eq!(feed.push_absent(), None);
    assert_eq!(store.snapshot(), GestureState::default());

    feed.open();
    let state = feed.push_flat(&flatten(&hand_with(5))).unwrap();
    assert_eq!(state.pose, Pose::Open);
    assert!(state.hand_present);
    assert_eq!(store.snapshot(), state);
    let gone = feed.push_absent().unwrap();
    assert_eq!(gone, GestureState::absent(Pose::Open));
}

#[test]
fn hands_behind_the_cover_leave_the_orbit_untouched() {
    let mut config = SceneConfig::default();
    config.pools = PoolSizes {
        tree: 20,
        core: 10,
        heart: 10,
        background: 10,
        stars: 10,
    };
    let store = GestureStore::new();
    let mut feed = config.landmark_feed(store.clone());
    let mut scene = Scene::new(&config, vec![MediaDescriptor::video("/videos/2.mp4")]);
    let initial = scene.rig.spherical();

    for i in 0..120 {
        let mut hand = hand_with(5);
        hand.landmarks[MIDDLE_MCP].x = 0.2 + 0.005 * i as f32;
        hand.landmarks[MIDDLE_MCP].y = 0.8 - 0.004 * i as f32;
        feed.push_flat(&flatten(&hand));
        let report = scene.tick(&store, 1.0 / 60.0);
        assert!(report.proximity.is_empty());
    }
    assert_eq!(scene.rig.spherical(), initial);
    assert_eq!(scene.rig.spherical().radius, 50.0);
    assert_eq!(store.snapshot().pose, Pose::Fist);
    assert!(scene.gallery.items[0].current_scale < 1e-6);
}
