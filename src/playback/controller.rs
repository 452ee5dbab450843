//! Playback controller: owns exactly one audio asset for the open preview.
//!
//! Without playable audio the controller runs in silent mode: `duration` falls back to the
//! slide's declared length and play/pause do nothing.

use crate::foundation::core::HostTime;
use crate::foundation::error::Recovery;
use crate::playback::audio::{AudioAsset, AudioBackend, AudioEvent, AudioSource};
use crate::playback::state::{PlayOutcome, PlaybackEvent, PlaybackState};

/// Keeps one audio asset's state consistent with user controls.
pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    asset: Option<B::Asset>,
    state: PlaybackState,
    declared_duration: f64,
    decoded_duration: Option<f64>,
    recovery: Option<Recovery>,
    outbox: Vec<PlaybackEvent>,
    scratch: Vec<AudioEvent>,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Controller with nothing bound.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            asset: None,
            state: PlaybackState::default(),
            declared_duration: 0.0,
            decoded_duration: None,
            recovery: None,
            outbox: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Attach `source`, tearing down any previously bound asset first.
    ///
    /// `declared_duration` is the slide's own length, used until the audio reports its decoded
    /// duration. A missing, empty or unopenable source leaves the controller in silent mode.
    #[tracing::instrument(skip(self, source), fields(has_source = source.is_some()))]
    pub fn bind(&mut self, source: Option<&AudioSource>, declared_duration: f64) {
        self.teardown();
        self.declared_duration = if declared_duration.is_finite() {
            declared_duration.max(0.0)
        } else {
            0.0
        };
        self.decoded_duration = None;
        self.recovery = None;
        self.state = PlaybackState {
            is_playing: false,
            current_time: 0.0,
            duration: self.declared_duration,
        };

        let Some(source) = source.filter(|s| !s.is_empty()) else {
            tracing::debug!("no audio source; silent mode");
            self.outbox.push(PlaybackEvent::AudioUnavailable {
                reason: "no audio source".to_owned(),
            });
            return;
        };
        match self.backend.open(source) {
            Ok(asset) => {
                tracing::debug!("audio bound");
                self.asset = Some(asset);
            }
            Err(e) => self.audio_failed(e.to_string()),
        }
    }

    /// Start or resume playback.
    ///
    /// Returns `None` when nothing plays (silent mode or the host refused); otherwise whether
    /// this was a fresh start from zero, which the caller uses to restart the animation timeline.
    pub fn play(&mut self, now: HostTime) -> Option<PlayOutcome> {
        if self.state.is_playing {
            return Some(PlayOutcome::Resume);
        }
        let asset = self.asset.as_mut()?;
        let fresh = self.state.current_time <= 0.0;
        if let Err(e) = asset.play(now) {
            self.audio_failed(e.to_string());
            return None;
        }
        self.state.is_playing = true;
        self.outbox.push(PlaybackEvent::Started { fresh });
        Some(if fresh {
            PlayOutcome::FreshStart
        } else {
            PlayOutcome::Resume
        })
    }

    /// Stop advancing without resetting elapsed time.
    pub fn pause(&mut self, now: HostTime) {
        if !self.state.is_playing {
            return;
        }
        if let Some(asset) = self.asset.as_mut() {
            let at = asset.pause(now);
            self.set_time(at);
        }
        self.state.is_playing = false;
        self.outbox.push(PlaybackEvent::Paused);
    }

    /// Pause if playing. Otherwise play, restarting from zero when the previous playthrough
    /// reached the end.
    ///
    /// Returns the play outcome when playback started.
    pub fn toggle_play_pause(&mut self, now: HostTime) -> Option<PlayOutcome> {
        if self.state.is_playing {
            self.pause(now);
            return None;
        }
        if self.state.at_end() {
            self.reset();
        }
        self.play(now)
    }

    /// Stop playback and return to zero.
    pub fn reset(&mut self) {
        if let Some(asset) = self.asset.as_mut() {
            asset.stop();
        }
        self.state.is_playing = false;
        self.state.current_time = 0.0;
    }

    /// Jump to `secs`, clamped to `[0, duration]`.
    pub fn seek(&mut self, secs: f64, now: HostTime) {
        let target = if secs.is_finite() {
            secs.clamp(0.0, self.state.duration.max(0.0))
        } else {
            0.0
        };
        if let Some(asset) = self.asset.as_mut() {
            asset.seek(target, now);
        }
        self.state.current_time = target;
        self.outbox.push(PlaybackEvent::TimeUpdate(target));
    }

    /// Handle buffered audio events.
    pub fn poll(&mut self, now: HostTime) {
        let Some(asset) = self.asset.as_mut() else {
            return;
        };
        let mut events = std::mem::take(&mut self.scratch);
        asset.poll_events(now, &mut events);
        for ev in events.drain(..) {
            match ev {
                AudioEvent::DurationKnown(d) => {
                    if d.is_finite() && d > 0.0 {
                        tracing::debug!(duration = d, "decoded duration known");
                        self.decoded_duration = Some(d);
                        self.state.duration = d;
                    }
                }
                AudioEvent::TimeUpdate(t) => {
                    if self.state.is_playing {
                        self.set_time(t);
                        self.outbox.push(PlaybackEvent::TimeUpdate(self.state.current_time));
                    }
                }
                AudioEvent::Ended => {
                    // Only a running playthrough can end; stragglers after a reset are dropped.
                    if self.state.is_playing {
                        self.outbox.push(PlaybackEvent::Ended);
                        self.reset();
                    }
                }
                AudioEvent::Error(reason) => {
                    self.audio_failed(reason);
                    break;
                }
            }
        }
        events.clear();
        self.scratch = events;
    }

    /// Stop and release the bound asset, if any.
    pub fn teardown(&mut self) {
        if let Some(mut asset) = self.asset.take() {
            asset.stop();
            asset.release();
            tracing::debug!("audio released");
        }
        self.state.is_playing = false;
    }

    /// Current state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether playback is advancing.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Elapsed seconds.
    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    /// Resolved duration: decoded audio length once known, else the declared slide length.
    pub fn duration(&self) -> f64 {
        self.decoded_duration.unwrap_or(self.declared_duration)
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Whether an asset is bound.
    pub fn has_audio(&self) -> bool {
        self.asset.is_some()
    }

    /// The audio failure absorbed for the current binding, if any.
    pub fn recovery(&self) -> Option<&Recovery> {
        self.recovery.as_ref()
    }

    /// Take buffered activity, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Borrow the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn set_time(&mut self, t: f64) {
        if t.is_finite() {
            self.state.current_time = t.max(0.0);
        }
    }

    fn audio_failed(&mut self, reason: String) {
        tracing::warn!(%reason, "audio unavailable; continuing silently");
        if let Some(mut asset) = self.asset.take() {
            asset.stop();
            asset.release();
        }
        self.state.is_playing = false;
        self.state.duration = self.declared_duration;
        self.decoded_duration = None;
        self.recovery = Some(Recovery::AudioBindFailure {
            reason: reason.clone(),
        });
        self.outbox.push(PlaybackEvent::AudioUnavailable { reason });
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
