use std::path::PathBuf;

use crate::foundation::core::HostTime;
use crate::foundation::error::SlideResult;
use crate::provider::audio::SpeechAudio;

/// Where a slide's narration comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioSource {
    /// Synthesized audio held in memory.
    Speech(SpeechAudio),
    /// An audio file on disk.
    File(PathBuf),
}

impl AudioSource {
    /// Whether the source obviously has nothing to play.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Speech(s) => s.bytes.is_empty(),
            Self::File(p) => p.as_os_str().is_empty(),
        }
    }
}

/// Signals an audio asset delivers back to its owner.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioEvent {
    /// The decoded length became known, in seconds.
    DurationKnown(f64),
    /// Playback position advanced, in seconds.
    TimeUpdate(f64),
    /// Playback reached the end.
    Ended,
    /// Loading or decoding failed after the asset was opened.
    Error(String),
}

/// Opens audio assets for sources. One backend serves a whole preview session.
pub trait AudioBackend {
    /// Asset type produced by this backend.
    type Asset: AudioAsset;

    /// Attach `source`. Fails when it cannot be opened or decoded.
    fn open(&mut self, source: &AudioSource) -> SlideResult<Self::Asset>;
}

/// One playable narration track.
///
/// Like a rendering surface, an asset buffers its events and hands them out from `poll_events`.
/// After `release` it must not produce sound or events.
pub trait AudioAsset {
    /// Start or resume playback. May be refused by the host (for example autoplay policy).
    fn play(&mut self, now: HostTime) -> SlideResult<()>;

    /// Stop advancing; returns the position playback stopped at, in seconds.
    fn pause(&mut self, now: HostTime) -> f64;

    /// Jump to `secs`.
    fn seek(&mut self, secs: f64, now: HostTime);

    /// Stop playback and rewind to the start.
    fn stop(&mut self);

    /// Detach listeners and free the underlying resource.
    fn release(&mut self);

    /// Move buffered events into `out`, oldest first.
    fn poll_events(&mut self, now: HostTime, out: &mut Vec<AudioEvent>);
}
