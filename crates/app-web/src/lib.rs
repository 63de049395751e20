#![cfg(target_arch = "wasm32")]
//! Browser front end: WebGPU renderer, HTML media and audio, and the
//! JS-callable landmark entry points that feed the gesture store.

mod audio;
mod constants;
mod dom;
mod frame;
mod media;
mod overlay;
mod render;

use app_core::{
    parse_manifest, AudioDirector, GestureStore, LandmarkFeed, Phase, Playlist, Scene,
    SceneConfig, DEFAULT_MANIFEST,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::audio::MusicPlayer;
use app_core::constants::{INTRO_TRACK, PLAYLIST_TRACKS};
use crate::constants::{CANVAS_ID, ENABLE_AUDIO_ID, ENTER_WORLD_ID};
use crate::media::MediaElement;
use crate::overlay::Overlay;

/// Handles needed to stop a running session.
struct Session {
    running: Rc<Cell<bool>>,
    director: Rc<RefCell<AudioDirector>>,
    player: Rc<MusicPlayer>,
    elements: Rc<Vec<MediaElement>>,
}

thread_local! {
    static FEED: RefCell<Option<LandmarkFeed>> = const { RefCell::new(None) };
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let (window, document) = dom::window_document()?;
    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;
    dom::sync_canvas_backing_size(&canvas);
    dom::watch_resize(&window, &canvas);

    let descriptors = parse_manifest(DEFAULT_MANIFEST)?;
    let loads = Rc::new(RefCell::new(Vec::new()));
    let elements = Rc::new(media::create_elements(&document, &descriptors, &loads)?);
    let config = SceneConfig::default();
    let scene = Scene::new(&config, descriptors);
    let store = GestureStore::new();
    FEED.with(|f| *f.borrow_mut() = Some(config.landmark_feed(store.clone())));

    let tracks: Vec<String> = PLAYLIST_TRACKS.iter().map(|s| s.to_string()).collect();
    let director = Rc::new(RefCell::new(AudioDirector::new(Playlist::new(tracks.clone())?)));
    let audio_events = Rc::new(RefCell::new(VecDeque::new()));
    let player = Rc::new(MusicPlayer::new(INTRO_TRACK, tracks, audio_events.clone())?);

    let overlay = Rc::new(RefCell::new(Overlay::new(&document)));
    overlay.borrow().show_phase(director.borrow().phase());
    {
        let (director, player, overlay, elements) =
            (director.clone(), player.clone(), overlay.clone(), elements.clone());
        dom::add_click_listener(&document, ENABLE_AUDIO_ID, move || {
            let cmds = director.borrow_mut().enable_audio();
            player.execute(&cmds);
            overlay.borrow().show_phase(director.borrow().phase());
            media::resume_videos(&elements);
        });
    }
    {
        let (director, player, overlay, elements) =
            (director.clone(), player.clone(), overlay.clone(), elements.clone());
        dom::add_click_listener(&document, ENTER_WORLD_ID, move || {
            let cmds = director.borrow_mut().enter_world();
            player.execute(&cmds);
            let phase = director.borrow().phase();
            overlay.borrow().show_phase(phase);
            if phase == Phase::World {
                FEED.with(|f| {
                    if let Some(feed) = f.borrow_mut().as_mut() {
                        feed.open();
                    }
                });
            }
            media::resume_videos(&elements);
        });
    }

    let gpu = frame::init_gpu(&canvas, &scene).await;
    if gpu.is_none() {
        log::warn!("[scene] continuing without WebGPU; audio and overlay stay live");
    }

    let running = Rc::new(Cell::new(true));
    SESSION.with(|s| {
        *s.borrow_mut() = Some(Session {
            running: running.clone(),
            director: director.clone(),
            player: player.clone(),
            elements: elements.clone(),
        })
    });

    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        store,
        director,
        player,
        audio_events,
        elements,
        loads,
        overlay,
        canvas,
        gpu,
        last_instant: Instant::now(),
    }));
    frame::start_loop(ctx, running);
    Ok(())
}

/// One detection cycle with a hand: 21 landmarks as `x,y,z` triples or `x,y` pairs.
/// Ignored until the world has been entered.
#[wasm_bindgen]
pub fn push_hand_landmarks(data: &[f32]) {
    FEED.with(|f| {
        if let Some(feed) = f.borrow_mut().as_mut() {
            feed.push_flat(data);
        }
    });
}

/// One detection cycle without a hand.
#[wasm_bindgen]
pub fn push_no_hand() {
    FEED.with(|f| {
        if let Some(feed) = f.borrow_mut().as_mut() {
            feed.push_absent();
        }
    });
}

/// Stop the render loop and silence every audio and video element.
#[wasm_bindgen]
pub fn shutdown() {
    let Some(session) = SESSION.with(|s| s.borrow_mut().take()) else {
        return;
    };
    session.running.set(false);
    let cmds = session.director.borrow_mut().shutdown();
    session.player.execute(&cmds);
    for el in session.elements.iter() {
        el.silence();
    }
    log::info!("[scene] session shut down");
}
