//! Request/response contracts for the external script-generation and speech-synthesis services.
//!
//! Only the seams live here; no network client ships with the crate.

use crate::foundation::error::{SlideError, SlideResult};
use crate::provider::audio::SpeechAudio;
use crate::provider::error::ProviderError;
use crate::script::theme::{Pacing, SlideTheme, pacing_by_id, theme_by_id};

/// Longest document accepted for script generation, in characters.
pub const MAX_DOCUMENT_CHARS: usize = 50_000;

/// Slide count used when the caller does not ask for one.
pub const DEFAULT_SLIDE_COUNT: u32 = 3;

/// Separator placed between slide narrations when synthesizing a whole script at once.
pub const NARRATION_JOINER: &str = " ... ";

/// Input to the script-generation service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptRequest {
    /// Source document text.
    pub document: String,
    /// Number of slides to produce.
    #[serde(default = "default_slide_count")]
    pub slide_count: u32,
    /// Optional free-form steering text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering: Option<String>,
    /// Theme id; unknown ids resolve to the default theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Pacing id; unknown ids resolve to the default pacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing: Option<String>,
}

fn default_slide_count() -> u32 {
    DEFAULT_SLIDE_COUNT
}

impl ScriptRequest {
    /// Request for `document` with default slide count and no steering.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            slide_count: DEFAULT_SLIDE_COUNT,
            steering: None,
            theme: None,
            pacing: None,
        }
    }

    /// Reject requests the service would refuse anyway.
    pub fn validate(&self) -> SlideResult<()> {
        if self.document.trim().is_empty() {
            return Err(SlideError::validation("document text is required"));
        }
        let chars = self.document.chars().count();
        if chars > MAX_DOCUMENT_CHARS {
            return Err(SlideError::validation(format!(
                "document is {chars} characters; the limit is {MAX_DOCUMENT_CHARS}"
            )));
        }
        if self.slide_count == 0 {
            return Err(SlideError::validation("slide count must be >= 1"));
        }
        Ok(())
    }

    /// Resolved theme preset.
    pub fn theme(&self) -> &'static SlideTheme {
        theme_by_id(self.theme.as_deref().unwrap_or_default())
    }

    /// Resolved pacing preset.
    pub fn pacing(&self) -> &'static Pacing {
        pacing_by_id(self.pacing.as_deref().unwrap_or_default())
    }
}

/// Speech provider selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceProvider {
    /// Cartesia streaming TTS (WAV output).
    #[default]
    Cartesia,
    /// Gemini TTS (raw PCM wrapped into WAV).
    Gemini,
}

/// Input to the speech-synthesis service.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VoiceRequest {
    /// Text to speak.
    pub narration: String,
    /// Provider-specific voice id; `None` uses the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    /// Which provider to call.
    #[serde(default)]
    pub provider: VoiceProvider,
}

impl VoiceRequest {
    /// Request for `narration` with the default provider and voice.
    pub fn new(narration: impl Into<String>) -> Self {
        Self {
            narration: narration.into(),
            voice_id: None,
            provider: VoiceProvider::default(),
        }
    }

    /// One request covering several slides, their narrations joined by a spoken pause.
    ///
    /// Blank narrations are skipped.
    pub fn for_slides<'a>(narrations: impl IntoIterator<Item = &'a str>) -> Self {
        let joined = narrations
            .into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(NARRATION_JOINER);
        Self::new(joined)
    }

    /// Narration must contain something to speak.
    pub fn validate(&self) -> SlideResult<()> {
        if self.narration.trim().is_empty() {
            return Err(SlideError::validation("narration text is required"));
        }
        Ok(())
    }
}

/// Produces a raw slide-script response for a document.
///
/// Implementations return the service's JSON untouched; callers run it through
/// [`crate::normalize_response`].
pub trait ScriptGenerator {
    /// Ask the service for slides.
    fn generate(&mut self, request: &ScriptRequest) -> Result<serde_json::Value, ProviderError>;
}

/// Turns narration text into audio.
pub trait SpeechSynthesizer {
    /// Synthesize `request.narration`.
    fn synthesize(&mut self, request: &VoiceRequest) -> Result<SpeechAudio, ProviderError>;
}
