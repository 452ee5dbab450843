use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::HostTime;
use crate::foundation::error::{SlideError, SlideResult};
use crate::playback::audio::{AudioAsset, AudioBackend, AudioEvent, AudioSource};
use crate::provider::audio::{AudioFormat, wav_duration_secs};

/// Counters shared by every asset a [`HeadlessAudioBackend`] opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AudioStats {
    /// Assets opened.
    pub opened: u32,
    /// Assets released.
    pub released: u32,
    /// Assets currently playing.
    pub audible: u32,
    /// Highest number of assets ever playing at once.
    pub max_audible: u32,
}

/// Audio backend that decodes WAV durations and advances playback from host time.
///
/// MP3 cannot be decoded headlessly and fails to open, like a decode error would.
#[derive(Debug, Default)]
pub struct HeadlessAudioBackend {
    stats: Rc<RefCell<AudioStats>>,
    /// Plays each asset accepts before refusing; unlimited when `None`.
    play_budget: Option<u32>,
}

impl HeadlessAudioBackend {
    /// New backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose assets refuse to start, like a host enforcing an autoplay policy.
    pub fn refusing_play() -> Self {
        Self::refusing_play_after(0)
    }

    /// Backend whose assets start `plays` times and refuse every later play.
    pub fn refusing_play_after(plays: u32) -> Self {
        Self {
            play_budget: Some(plays),
            ..Self::default()
        }
    }

    /// Snapshot of the shared counters.
    pub fn stats(&self) -> AudioStats {
        *self.stats.borrow()
    }
}

impl AudioBackend for HeadlessAudioBackend {
    type Asset = HeadlessAudioAsset;

    fn open(&mut self, source: &AudioSource) -> SlideResult<HeadlessAudioAsset> {
        let duration = match source {
            AudioSource::Speech(speech) => match speech.format {
                AudioFormat::Wav => wav_duration_secs(&speech.bytes),
                AudioFormat::Mp3 => None,
            },
            AudioSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    SlideError::audio(format!("read audio '{}': {e}", path.display()))
                })?;
                wav_duration_secs(&bytes)
            }
        };
        let duration = duration
            .filter(|d| *d > 0.0)
            .ok_or_else(|| SlideError::audio("cannot decode audio"))?;
        self.stats.borrow_mut().opened += 1;
        Ok(HeadlessAudioAsset {
            stats: Rc::clone(&self.stats),
            play_budget: self.play_budget,
            duration,
            position: 0.0,
            started: None,
            announced: false,
            released: false,
        })
    }
}

/// Asset produced by [`HeadlessAudioBackend`].
#[derive(Debug)]
pub struct HeadlessAudioAsset {
    stats: Rc<RefCell<AudioStats>>,
    play_budget: Option<u32>,
    duration: f64,
    position: f64,
    /// Host time playback last (re)started, with the position at that moment.
    started: Option<(HostTime, f64)>,
    announced: bool,
    released: bool,
}

impl HeadlessAudioAsset {
    fn position_at(&self, now: HostTime) -> f64 {
        match self.started {
            Some((at, base)) => (base + now.since(at).as_secs_f64()).min(self.duration),
            None => self.position,
        }
    }

    fn set_audible(&mut self, audible: bool) {
        let was = self.started.is_some();
        if was == audible {
            return;
        }
        let mut stats = self.stats.borrow_mut();
        if audible {
            stats.audible += 1;
            stats.max_audible = stats.max_audible.max(stats.audible);
        } else {
            stats.audible = stats.audible.saturating_sub(1);
        }
    }
}

impl AudioAsset for HeadlessAudioAsset {
    fn play(&mut self, now: HostTime) -> SlideResult<()> {
        if self.released {
            return Err(SlideError::audio("asset was released"));
        }
        if let Some(left) = self.play_budget.as_mut() {
            if *left == 0 {
                return Err(SlideError::audio("playback was not allowed"));
            }
            *left -= 1;
        }
        if self.started.is_none() {
            self.set_audible(true);
            self.started = Some((now, self.position));
        }
        Ok(())
    }

    fn pause(&mut self, now: HostTime) -> f64 {
        self.position = self.position_at(now);
        self.set_audible(false);
        self.started = None;
        self.position
    }

    fn seek(&mut self, secs: f64, now: HostTime) {
        self.position = secs.clamp(0.0, self.duration);
        if self.started.is_some() {
            self.started = Some((now, self.position));
        }
    }

    fn stop(&mut self) {
        self.set_audible(false);
        self.started = None;
        self.position = 0.0;
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.stop();
        self.released = true;
        self.stats.borrow_mut().released += 1;
    }

    fn poll_events(&mut self, now: HostTime, out: &mut Vec<AudioEvent>) {
        if self.released {
            return;
        }
        if !self.announced {
            self.announced = true;
            out.push(AudioEvent::DurationKnown(self.duration));
        }
        if self.started.is_none() {
            return;
        }
        let t = self.position_at(now);
        out.push(AudioEvent::TimeUpdate(t));
        if t >= self.duration {
            self.position = self.duration;
            self.set_audible(false);
            self.started = None;
            out.push(AudioEvent::Ended);
        }
    }
}
