use crate::foundation::core::format_clock;

/// Playback state of the open preview. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Whether audio is advancing.
    pub is_playing: bool,
    /// Elapsed seconds; back to zero on restart.
    pub current_time: f64,
    /// Resolved playable length in seconds.
    pub duration: f64,
}

impl PlaybackState {
    /// Elapsed fraction in `[0, 1]`; zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 && self.duration.is_finite() {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether the position has reached the end.
    pub fn at_end(&self) -> bool {
        self.duration > 0.0 && self.current_time >= self.duration
    }

    /// `m:ss / m:ss` progress label.
    pub fn clock_label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.current_time),
            format_clock(self.duration)
        )
    }
}

/// How a successful `play` began.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayOutcome {
    /// Started from zero; the animation timeline restarts too.
    FreshStart,
    /// Continued from a non-zero position.
    Resume,
}

/// Observable playback activity, drained by the owner.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum PlaybackEvent {
    /// Elapsed time changed, in seconds.
    TimeUpdate(f64),
    /// Playback started.
    Started {
        /// True for a start from zero.
        fresh: bool,
    },
    /// Playback paused.
    Paused,
    /// A full playthrough finished; the controller has reset itself.
    Ended,
    /// No playable audio; the slide plays silently.
    AudioUnavailable {
        /// Why audio is unavailable.
        reason: String,
    },
}
