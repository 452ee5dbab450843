//! Slidereel is the playback core of a narrated slide-video generator.
//!
//! Generated slide scripts are normalized into [`SlideScript`]s, each slide is presented inside an
//! isolated [`RenderSurface`] scaled to fit its container, and reveal animations are kept in
//! step with narration audio. The public API is session-oriented:
//!
//! - Normalize a generation response with [`normalize_response`] or [`normalize_json`]
//! - Create a [`PreviewSession`] over a surface and an audio backend
//! - `open` a slide, then `tick` from the host event loop
//!
//! Reveals are driven from the playback clock by default ([`TimingMode::ClockDriven`]).
//! [`TimingMode::DocumentTimers`] leaves them on the document's own CSS timers, which keep
//! running while audio is paused.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod headless;
pub(crate) mod playback;
pub(crate) mod preview;
pub(crate) mod provider;
pub(crate) mod script;
pub(crate) mod surface;

pub use crate::foundation::config::{DurationBounds, PreviewConfig, TimingMode};
pub use crate::foundation::core::{
    Affine, HostTime, Resolution, Size, Vec2, format_clock, secs_to_millis,
};
pub use crate::foundation::error::{Recovery, SlideError, SlideResult};

pub use crate::headless::audio::{AudioStats, HeadlessAudioAsset, HeadlessAudioBackend};
pub use crate::headless::surface::HeadlessSurface;
pub use crate::playback::audio::{AudioAsset, AudioBackend, AudioEvent, AudioSource};
pub use crate::playback::controller::PlaybackController;
pub use crate::playback::state::{PlayOutcome, PlaybackEvent, PlaybackState};
pub use crate::preview::session::{PreviewEvent, PreviewSession};
pub use crate::provider::audio::{
    AudioFormat, PcmSpec, SpeechAudio, WORDS_PER_MINUTE, estimate_duration_secs, pcm_to_wav,
    wav_duration_secs,
};
pub use crate::provider::contract::{
    DEFAULT_SLIDE_COUNT, MAX_DOCUMENT_CHARS, NARRATION_JOINER, ScriptGenerator, ScriptRequest,
    SpeechSynthesizer, VoiceProvider, VoiceRequest,
};
pub use crate::provider::error::ProviderError;
pub use crate::script::markup::{
    CLOCK_HOLD_STYLE, HELD_CLASS, MarkupKind, REVEALED_CLASS, SCALING_STYLE, escape_html,
    inject_head_styles, placeholder_document, prepare_document, wrap_fragment,
};
pub use crate::script::model::{SlideRecord, SlideScript};
pub use crate::script::normalize::{normalize_json, normalize_response};
pub use crate::script::reveal::{RevealCue, RevealSchedule, ScheduleWarning};
pub use crate::script::theme::{
    BackgroundPattern, Entrance, PACINGS, Pacing, SlideTheme, THEMES, effective_stagger_ms,
    pacing_by_id, theme_by_id,
};
pub use crate::surface::fit::ScaleFit;
pub use crate::surface::host::{LoadTicket, RenderSurface, SurfaceEvent};
pub use crate::surface::renderer::{RenderEvent, RenderPhase, TimelineRenderer};
pub use crate::surface::sandbox::SandboxPolicy;
