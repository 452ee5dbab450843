use std::time::Duration;

use crate::foundation::error::{SlideError, SlideResult};

pub use kurbo::{Affine, Size, Vec2};

/// Fixed authoring resolution of a slide document, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// The 16:9 canvas every slide document is authored against.
    pub const AUTHORING: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    /// Build a resolution; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> SlideResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlideError::validation("resolution sides must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Resolution as a floating point size.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::AUTHORING
    }
}

/// Monotonic host timestamp, measured from an arbitrary origin.
///
/// All event-loop entry points take the host's "now" explicitly so that no component ever reads a
/// clock on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostTime(pub Duration);

impl HostTime {
    /// Timestamp from milliseconds since the origin.
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Time elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: HostTime) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// This timestamp shifted forward by `d`.
    pub fn after(self, d: Duration) -> HostTime {
        HostTime(self.0.saturating_add(d))
    }

    /// This timestamp shifted back by `d`, saturating at the origin.
    pub fn before(self, d: Duration) -> HostTime {
        HostTime(self.0.saturating_sub(d))
    }
}

/// Format seconds as `m:ss` for progress displays.
pub fn format_clock(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Convert seconds to whole milliseconds, treating non-finite and negative input as zero.
pub fn secs_to_millis(secs: f64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    (secs * 1000.0).round() as u64
}
