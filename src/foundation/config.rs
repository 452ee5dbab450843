use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::Resolution;
use crate::foundation::error::{SlideError, SlideResult};
use crate::surface::sandbox::SandboxPolicy;

/// How reveal animations are timed against narration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Reveals are driven from the playback clock; pausing audio freezes the reveal sequence.
    #[default]
    ClockDriven,
    /// Reveals run on the document's own CSS timers from load; pausing audio does not stop them.
    DocumentTimers,
}

/// Slide duration bounds, in whole seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DurationBounds {
    /// Lower clamp bound.
    pub min_secs: f64,
    /// Upper clamp bound.
    pub max_secs: f64,
    /// Used when the provider gave no numeric duration.
    pub default_secs: f64,
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min_secs: 15.0,
            max_secs: 30.0,
            default_secs: 20.0,
        }
    }
}

impl DurationBounds {
    /// Clamp an optional raw duration into the configured range.
    pub fn clamp(&self, raw: Option<f64>) -> f64 {
        let v = raw.filter(|v| v.is_finite()).unwrap_or(self.default_secs);
        v.clamp(self.min_secs, self.max_secs)
    }
}

/// Configuration for normalization, rendering and preview playback.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Canvas every slide document is authored against.
    pub resolution: Resolution,
    /// Slide duration clamp.
    pub durations: DurationBounds,
    /// Delay before the single content-injection retry, in milliseconds.
    pub load_retry_ms: u64,
    /// Reveal timing strategy.
    pub timing: TimingMode,
    /// Time the last reveal should leave before the slide ends, in milliseconds.
    pub trailing_margin_ms: u64,
    /// Stagger used for `element-N` nodes that declare no delay, in milliseconds.
    pub fallback_stagger_ms: u64,
    /// Capabilities granted to the rendering surface.
    pub sandbox: SandboxPolicy,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::AUTHORING,
            durations: DurationBounds::default(),
            load_retry_ms: 100,
            timing: TimingMode::ClockDriven,
            trailing_margin_ms: 2000,
            fallback_stagger_ms: 800,
            sandbox: SandboxPolicy::default(),
        }
    }
}

impl PreviewConfig {
    /// Parse a configuration from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlideResult<Self> {
        let cfg: PreviewConfig = serde_json::from_reader(r)
            .map_err(|e| SlideError::serde(format!("parse preview config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlideError::validation(format!("open preview config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check internal consistency.
    pub fn validate(&self) -> SlideResult<()> {
        Resolution::new(self.resolution.width, self.resolution.height)?;
        let d = &self.durations;
        if !(d.min_secs.is_finite() && d.max_secs.is_finite() && d.default_secs.is_finite()) {
            return Err(SlideError::validation("duration bounds must be finite"));
        }
        if d.min_secs <= 0.0 || d.min_secs > d.max_secs {
            return Err(SlideError::validation(
                "duration bounds must satisfy 0 < min <= max",
            ));
        }
        if d.default_secs < d.min_secs || d.default_secs > d.max_secs {
            return Err(SlideError::validation(
                "default duration must lie within the bounds",
            ));
        }
        self.sandbox.check()?;
        Ok(())
    }

    /// Retry delay as a [`Duration`].
    pub fn load_retry(&self) -> Duration {
        Duration::from_millis(self.load_retry_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
