//! HTML audio elements driven by [`app_core::AudioDirector`] commands.

use app_core::constants::{INTRO_VOLUME, PLAYLIST_VOLUME};
use app_core::{AudioCommand, Channel};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Element callbacks push here; the frame loop feeds them back to the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    TrackEnded,
    Rejected(Channel),
}

pub type AudioEvents = Rc<RefCell<VecDeque<AudioEvent>>>;

pub struct MusicPlayer {
    intro: web::HtmlAudioElement,
    playlist: web::HtmlAudioElement,
    tracks: Vec<String>,
    events: AudioEvents,
}

impl MusicPlayer {
    pub fn new(intro_src: &str, tracks: Vec<String>, events: AudioEvents) -> anyhow::Result<Self> {
        let intro = web::HtmlAudioElement::new_with_src(intro_src)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        intro.set_loop(true);
        intro.set_volume(INTRO_VOLUME);
        intro.set_preload("auto");

        let playlist =
            web::HtmlAudioElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        playlist.set_volume(PLAYLIST_VOLUME);
        {
            let events = events.clone();
            let closure = Closure::wrap(Box::new(move || {
                events.borrow_mut().push_back(AudioEvent::TrackEnded);
            }) as Box<dyn FnMut()>);
            playlist
                .add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref())
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            closure.forget();
        }
        Ok(Self {
            intro,
            playlist,
            tracks,
            events,
        })
    }

    pub fn execute(&self, commands: &[AudioCommand]) {
        for cmd in commands {
            log::debug!("[audio] {:?}", cmd);
            match *cmd {
                AudioCommand::PlayIntro => self.play(&self.intro, Channel::Intro),
                AudioCommand::StopIntro => stop(&self.intro),
                AudioCommand::PlayTrack(i) => match self.tracks.get(i) {
                    Some(src) => {
                        self.playlist.set_src(src);
                        self.playlist.set_volume(PLAYLIST_VOLUME);
                        self.play(&self.playlist, Channel::Playlist);
                    }
                    None => log::error!("[audio] no track at index {}", i),
                },
                AudioCommand::PauseTrack => {
                    let _ = self.playlist.pause();
                }
                AudioCommand::ResumeTrack => self.play(&self.playlist, Channel::Playlist),
                AudioCommand::StopTrack => stop(&self.playlist),
            }
        }
    }

    /// `play()` resolves asynchronously; a rejection is queued for the director.
    fn play(&self, element: &web::HtmlAudioElement, channel: Channel) {
        let events = self.events.clone();
        match element.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    // AbortError only means a pause() overtook the pending play().
                    if is_autoplay_block(&e) {
                        log::warn!("[audio] {:?} playback rejected: {:?}", channel, e);
                        events.borrow_mut().push_back(AudioEvent::Rejected(channel));
                    }
                }
            }),
            Err(e) => {
                log::warn!("[audio] {:?} play() threw: {:?}", channel, e);
                events.borrow_mut().push_back(AudioEvent::Rejected(channel));
            }
        }
    }
}

fn stop(element: &web::HtmlAudioElement) {
    let _ = element.pause();
    element.set_current_time(0.0);
}

fn is_autoplay_block(err: &wasm_bindgen::JsValue) -> bool {
    js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .map_or(true, |name| name == "NotAllowedError")
}
