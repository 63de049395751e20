use app_core::{status_text, Phase, Pose};
use web_sys as web;

use crate::constants::{COVER_ID, ENABLE_AUDIO_ID, ENTER_WORLD_ID, STATUS_LINE_ID, TRACK_LABEL_ID};

/// Cover buttons, status caption and now-playing label.
///
/// Text is written only when it changes.
pub struct Overlay {
    enable_audio: Option<web::Element>,
    enter_world: Option<web::Element>,
    cover: Option<web::Element>,
    status_line: Option<web::Element>,
    track_label: Option<web::Element>,
    shown_pose: Option<Pose>,
    shown_track: String,
}

impl Overlay {
    pub fn new(document: &web::Document) -> Self {
        Self {
            enable_audio: document.get_element_by_id(ENABLE_AUDIO_ID),
            enter_world: document.get_element_by_id(ENTER_WORLD_ID),
            cover: document.get_element_by_id(COVER_ID),
            status_line: document.get_element_by_id(STATUS_LINE_ID),
            track_label: document.get_element_by_id(TRACK_LABEL_ID),
            shown_pose: None,
            shown_track: String::new(),
        }
    }

    pub fn show_phase(&self, phase: Phase) {
        let (audio_btn, enter_btn, cover, hud) = match phase {
            Phase::AwaitingInteraction => (true, false, true, false),
            Phase::Cover => (false, true, true, false),
            Phase::World => (false, false, false, true),
        };
        set_visible(self.enable_audio.as_ref(), audio_btn);
        set_visible(self.enter_world.as_ref(), enter_btn);
        set_visible(self.cover.as_ref(), cover);
        set_visible(self.status_line.as_ref(), hud);
        set_visible(self.track_label.as_ref(), hud);
    }

    pub fn set_pose(&mut self, pose: Pose) {
        if self.shown_pose == Some(pose) {
            return;
        }
        self.shown_pose = Some(pose);
        if let Some(el) = &self.status_line {
            el.set_text_content(Some(status_text(pose)));
        }
    }

    pub fn set_track_label(&mut self, label: String) {
        if self.shown_track == label {
            return;
        }
        if let Some(el) = &self.track_label {
            el.set_text_content(Some(&label));
        }
        self.shown_track = label;
    }
}

#[inline]
fn set_visible(el: Option<&web::Element>, visible: bool) {
    if let Some(el) = el {
        let _ = el.set_attribute("style", if visible { "" } else { "display:none" });
    }
}
