//! Background music sequencing.
//!
//! The director owns no audio elements. It turns user actions, track-end
//! notifications and proximity edges into [`AudioCommand`]s that the front
//! end executes, which keeps the sequencing testable on the host.

use crate::error::AudioError;
use crate::media::ProximityEvent;
use smallvec::{smallvec, SmallVec};

/// Circular track index.
#[derive(Clone, Debug)]
pub struct Playlist {
    tracks: Vec<String>,
    index: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<String>) -> Result<Self, AudioError> {
        if tracks.is_empty() {
            return Err(AudioError::EmptyPlaylist);
        }
        Ok(Self { tracks, index: 0 })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current(&self) -> &str {
        &self.tracks[self.index]
    }

    pub fn track(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(String::as_str)
    }

    /// One step forward, wrapping to the first track.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.tracks.len();
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has been clicked yet; the browser will refuse playback.
    #[default]
    AwaitingInteraction,
    /// Cover screen with the looping intro.
    Cover,
    /// The 3D scene with the playlist.
    World,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Intro,
    Playlist,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    PlayIntro,
    StopIntro,
    PlayTrack(usize),
    PauseTrack,
    ResumeTrack,
    StopTrack,
}

pub type Commands = SmallVec<[AudioCommand; 4]>;

#[derive(Clone, Debug)]
pub struct AudioDirector {
    phase: Phase,
    playlist: Playlist,
    intro_active: bool,
    track_active: bool,
    track_paused: bool,
    near_videos: usize,
    retry: Option<Channel>,
}

impl AudioDirector {
    pub fn new(playlist: Playlist) -> Self {
        Self {
            phase: Phase::AwaitingInteraction,
            playlist,
            intro_active: false,
            track_active: false,
            track_paused: false,
            near_videos: 0,
            retry: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn is_ducked(&self) -> bool {
        self.track_paused
    }

    /// First user click: start the intro loop.
    pub fn enable_audio(&mut self) -> Commands {
        if self.phase != Phase::AwaitingInteraction {
            return self.take_retry();
        }
        self.phase = Phase::Cover;
        self.intro_active = true;
        log::info!("[audio] phase -> cover");
        smallvec![AudioCommand::PlayIntro]
    }

    /// "Enter" click: release the intro, start the playlist from the top.
    pub fn enter_world(&mut self) -> Commands {
        if self.phase == Phase::World {
            return self.take_retry();
        }
        self.phase = Phase::World;
        self.retry = None;
        let mut out = Commands::new();
        if self.intro_active {
            self.intro_active = false;
            out.push(AudioCommand::StopIntro);
        }
        if self.track_active {
            out.push(AudioCommand::StopTrack);
        }
        self.playlist.reset();
        self.track_active = true;
        self.track_paused = self.near_videos > 0;
        out.push(AudioCommand::PlayTrack(self.playlist.index()));
        if self.track_paused {
            out.push(AudioCommand::PauseTrack);
        }
        log::info!("[audio] phase -> world, track {}", self.playlist.index());
        out
    }

    /// The active playlist track finished; queue the next one.
    pub fn track_ended(&mut self) -> Commands {
        if self.phase != Phase::World || !self.track_active {
            return Commands::new();
        }
        let next = self.playlist.advance();
        log::info!("[audio] track ended, advancing to {}", next);
        smallvec![AudioCommand::StopTrack, AudioCommand::PlayTrack(next)]
    }

    /// The browser refused to start playback; retry on the next user action.
    pub fn playback_rejected(&mut self, channel: Channel) {
        log::warn!("[audio] playback rejected on {:?}; will retry on next click", channel);
        self.retry = Some(channel);
    }

    fn take_retry(&mut self) -> Commands {
        match self.retry.take() {
            Some(Channel::Intro) if self.intro_active => smallvec![AudioCommand::PlayIntro],
            Some(Channel::Playlist) if self.track_active => {
                smallvec![AudioCommand::PlayTrack(self.playlist.index())]
            }
            _ => Commands::new(),
        }
    }

    /// Pause the playlist while any video is close enough to be heard.
    pub fn on_proximity(&mut self, event: ProximityEvent) -> Commands {
        if event.near {
            self.near_videos += 1;
        } else {
            self.near_videos = self.near_videos.saturating_sub(1);
        }
        if !self.track_active {
            return Commands::new();
        }
        match (self.near_videos > 0, self.track_paused) {
            (true, false) => {
                self.track_paused = true;
                smallvec![AudioCommand::PauseTrack]
            }
            (false, true) => {
                self.track_paused = false;
                smallvec![AudioCommand::ResumeTrack]
            }
            _ => Commands::new(),
        }
    }

    /// Stop whatever is playing.
    pub fn shutdown(&mut self) -> Commands {
        let mut out = Commands::new();
        if self.intro_active {
            self.intro_active = false;
            out.push(AudioCommand::StopIntro);
        }
        if self.track_active {
            self.track_active = false;
            self.track_paused = false;
            out.push(AudioCommand::StopTrack);
        }
        out
    }

    /// Label for the now-playing line, 1-based.
    pub fn now_playing_label(&self) -> String {
        format!("Playing: Song #{}", self.playlist.index() + 1)
    }
}
