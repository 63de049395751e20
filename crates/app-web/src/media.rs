//! DOM side of the memory gallery: one `<img>` or `<video>` per manifest item.

use app_core::{AudioGate, LoadState, MediaDescriptor, MediaKind};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::VIDEO_HAVE_CURRENT_DATA;

/// Load results land here from element callbacks and are drained by the frame.
pub type LoadQueue = Rc<RefCell<Vec<(usize, LoadState)>>>;

pub enum MediaElement {
    Image(web::HtmlImageElement),
    Video(web::HtmlVideoElement),
}

impl MediaElement {
    /// Decoded frame size, once there is something to copy.
    pub fn ready_size(&self) -> Option<(u32, u32)> {
        match self {
            MediaElement::Image(img) if img.complete() && img.natural_width() > 0 => {
                Some((img.natural_width(), img.natural_height()))
            }
            MediaElement::Video(v)
                if v.ready_state() >= VIDEO_HAVE_CURRENT_DATA && v.video_width() > 0 =>
            {
                Some((v.video_width(), v.video_height()))
            }
            _ => None,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaElement::Video(_))
    }

    pub fn external_source(&self) -> wgpu::ExternalImageSource {
        match self {
            MediaElement::Image(img) => wgpu::ExternalImageSource::HTMLImageElement(img.clone()),
            MediaElement::Video(v) => wgpu::ExternalImageSource::HTMLVideoElement(v.clone()),
        }
    }

    pub fn apply_gate(&self, gate: AudioGate) {
        if let MediaElement::Video(v) = self {
            if v.muted() != gate.muted {
                v.set_muted(gate.muted);
            }
            v.set_volume(gate.volume as f64);
        }
    }

    pub fn silence(&self) {
        if let MediaElement::Video(v) = self {
            let _ = v.pause();
            v.set_muted(true);
        }
    }
}

/// Create detached elements for every descriptor and start loading them.
pub fn create_elements(
    document: &web::Document,
    descriptors: &[MediaDescriptor],
    loads: &LoadQueue,
) -> anyhow::Result<Vec<MediaElement>> {
    let mut out = Vec::with_capacity(descriptors.len());
    for (index, d) in descriptors.iter().enumerate() {
        let el = match d.kind {
            MediaKind::Image => {
                let img = document
                    .create_element("img")
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?
                    .dyn_into::<web::HtmlImageElement>()
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                img.set_cross_origin(Some("anonymous"));
                let ok = img.clone();
                on_event(&img, "load", index, loads, move || LoadState::Ready {
                    width: ok.natural_width(),
                    height: ok.natural_height(),
                });
                on_event(&img, "error", index, loads, || LoadState::Failed);
                img.set_src(&d.source_ref);
                MediaElement::Image(img)
            }
            MediaKind::Video => {
                let video = document
                    .create_element("video")
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?
                    .dyn_into::<web::HtmlVideoElement>()
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                video.set_cross_origin(Some("anonymous"));
                video.set_loop(true);
                video.set_muted(true);
                video.set_autoplay(true);
                let _ = video.set_attribute("playsinline", "");
                let ok = video.clone();
                on_event(&video, "loadedmetadata", index, loads, move || {
                    LoadState::Ready {
                        width: ok.video_width(),
                        height: ok.video_height(),
                    }
                });
                on_event(&video, "error", index, loads, || LoadState::Failed);
                video.set_src(&d.source_ref);
                play_muted(&video, &d.source_ref);
                MediaElement::Video(video)
            }
        };
        out.push(el);
    }
    log::info!("[media] created {} elements", out.len());
    Ok(out)
}

fn on_event(
    target: &web::EventTarget,
    event: &str,
    index: usize,
    loads: &LoadQueue,
    state: impl Fn() -> LoadState + 'static,
) {
    let loads = loads.clone();
    let closure = Closure::wrap(Box::new(move || {
        loads.borrow_mut().push((index, state()));
    }) as Box<dyn FnMut()>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Muted autoplay is allowed without a user gesture; a refusal only means a
/// still frame until the next attempt.
fn play_muted(video: &web::HtmlVideoElement, source_ref: &str) {
    match video.play() {
        Ok(promise) => {
            let source_ref = source_ref.to_string();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::warn!("[media] {} refused to play: {:?}", source_ref, e);
                }
            });
        }
        Err(e) => log::warn!("[media] {} play() threw: {:?}", source_ref, e),
    }
}

/// Retry any paused videos; called from user clicks.
pub fn resume_videos(elements: &[MediaElement]) {
    for el in elements {
        if let MediaElement::Video(v) = el {
            if v.paused() {
                play_muted(v, &v.src());
            }
        }
    }
}
