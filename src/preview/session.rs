use std::time::Duration;

use crate::foundation::config::PreviewConfig;
use crate::foundation::core::{HostTime, secs_to_millis};
use crate::foundation::error::{Recovery, SlideResult};
use crate::playback::audio::{AudioBackend, AudioSource};
use crate::playback::controller::PlaybackController;
use crate::playback::state::{PlayOutcome, PlaybackEvent, PlaybackState};
use crate::script::model::SlideRecord;
use crate::surface::host::RenderSurface;
use crate::surface::renderer::{RenderEvent, RenderPhase, TimelineRenderer};

/// Everything observable that happened in a preview, in the order it was collected.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewEvent {
    /// Renderer activity.
    Render(RenderEvent),
    /// Playback activity.
    Playback(PlaybackEvent),
}

/// One open preview: exactly one rendering surface and one audio asset.
///
/// All entry points take the host's current time; the host calls [`PreviewSession::tick`] from
/// its event loop to deliver load, resize and audio signals.
pub struct PreviewSession<S: RenderSurface, B: AudioBackend> {
    renderer: TimelineRenderer<S>,
    controller: PlaybackController<B>,
    open_slide: Option<u32>,
    /// Wall-clock origin of the reveal timeline when no audio drives it.
    standalone_origin: Option<HostTime>,
    log: Vec<PreviewEvent>,
}

impl<S: RenderSurface, B: AudioBackend> PreviewSession<S, B> {
    /// Create a session over `surface` and `backend`.
    pub fn new(surface: S, backend: B, config: &PreviewConfig) -> SlideResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer: TimelineRenderer::new(surface, config)?,
            controller: PlaybackController::new(backend),
            open_slide: None,
            standalone_origin: None,
            log: Vec::new(),
        })
    }

    /// Open `slide` with its narration and start playing.
    ///
    /// Any open preview is closed first.
    #[tracing::instrument(skip(self, slide, audio), fields(slide_id = slide.id))]
    pub fn open(
        &mut self,
        slide: &SlideRecord,
        audio: Option<&AudioSource>,
        now: HostTime,
    ) -> SlideResult<()> {
        self.close();
        self.renderer.assign(slide, now)?;
        self.controller.bind(audio, slide.duration);
        self.open_slide = Some(slide.id);
        self.play(now)?;
        self.collect();
        Ok(())
    }

    /// Switch to another slide: full teardown, then a fresh open.
    pub fn switch(
        &mut self,
        slide: &SlideRecord,
        audio: Option<&AudioSource>,
        now: HostTime,
    ) -> SlideResult<()> {
        self.open(slide, audio, now)
    }

    /// Tear down audio and surface synchronously.
    pub fn close(&mut self) {
        if self.open_slide.take().is_some() {
            tracing::debug!("closing preview");
        }
        self.controller.teardown();
        self.renderer.teardown();
        self.standalone_origin = None;
        self.collect();
    }

    /// Start or resume playback; a fresh start also restarts the reveal timeline.
    pub fn play(&mut self, now: HostTime) -> SlideResult<Option<PlayOutcome>> {
        let had_audio = self.controller.has_audio();
        let outcome = self.controller.play(now);
        self.hand_off_if_silenced(had_audio, now)?;
        self.follow(outcome, now)?;
        self.collect();
        Ok(outcome)
    }

    /// Pause playback and hold the reveal timeline.
    pub fn pause(&mut self, now: HostTime) -> SlideResult<()> {
        if self.controller.is_playing() {
            self.controller.pause(now);
            self.renderer.set_held(true)?;
        }
        self.collect();
        Ok(())
    }

    /// Pause if playing, else play (restarting after the end).
    pub fn toggle_play_pause(&mut self, now: HostTime) -> SlideResult<Option<PlayOutcome>> {
        if self.controller.is_playing() {
            self.pause(now)?;
            return Ok(None);
        }
        let had_audio = self.controller.has_audio();
        let outcome = self.controller.toggle_play_pause(now);
        self.hand_off_if_silenced(had_audio, now)?;
        self.follow(outcome, now)?;
        self.collect();
        Ok(outcome)
    }

    /// Return to zero without playing.
    pub fn reset(&mut self, now: HostTime) -> SlideResult<()> {
        self.controller.reset();
        if self.controller.has_audio() {
            self.renderer.set_held(true)?;
            self.renderer.sync(0)?;
        } else {
            self.renderer.restart_timeline(now)?;
            self.standalone_origin = None;
        }
        self.collect();
        Ok(())
    }

    /// Jump to `secs` of the narration and re-derive the revealed elements.
    pub fn seek(&mut self, secs: f64, now: HostTime) -> SlideResult<()> {
        if self.controller.has_audio() {
            self.controller.seek(secs, now);
            self.renderer
                .sync(secs_to_millis(self.controller.current_time()))?;
        }
        self.collect();
        Ok(())
    }

    /// Deliver surface and audio signals and advance clock-driven reveals.
    pub fn tick(&mut self, now: HostTime) -> SlideResult<()> {
        self.renderer.tick(now)?;

        let had_audio = self.controller.has_audio();
        self.controller.poll(now);
        self.hand_off_if_silenced(had_audio, now)?;

        let elapsed_ms = if self.controller.has_audio() {
            self.controller
                .is_playing()
                .then(|| secs_to_millis(self.controller.current_time()))
        } else if self.renderer.phase() == RenderPhase::Rendered {
            let origin = *self.standalone_origin.get_or_insert(now);
            Some(u64::try_from(now.since(origin).as_millis()).unwrap_or(u64::MAX))
        } else {
            None
        };
        if let Some(ms) = elapsed_ms {
            self.renderer.sync(ms)?;
        }
        self.collect();
        Ok(())
    }

    /// Take collected activity, oldest first.
    pub fn drain_events(&mut self) -> Vec<PreviewEvent> {
        self.collect();
        std::mem::take(&mut self.log)
    }

    /// Id of the open slide.
    pub fn open_slide(&self) -> Option<u32> {
        self.open_slide
    }

    /// Playback state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    /// Faults absorbed for the open slide.
    pub fn recoveries(&self) -> Vec<Recovery> {
        let mut out = self.renderer.recoveries().to_vec();
        out.extend(self.controller.recovery().cloned());
        out
    }

    /// Borrow the renderer.
    pub fn renderer(&self) -> &TimelineRenderer<S> {
        &self.renderer
    }

    /// Mutably borrow the renderer's surface (host-side resize, attach).
    pub fn surface_mut(&mut self) -> &mut S {
        self.renderer.surface_mut()
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &PlaybackController<B> {
        &self.controller
    }

    /// When audio was lost since `had_audio` was sampled, keep the timeline where it was and
    /// continue it on wall-clock time.
    fn hand_off_if_silenced(&mut self, had_audio: bool, now: HostTime) -> SlideResult<()> {
        if !had_audio || self.controller.has_audio() {
            return Ok(());
        }
        let at = self.controller.current_time();
        if at > 0.0 {
            self.standalone_origin = Some(now.before(Duration::from_secs_f64(at)));
        }
        self.renderer.set_held(false)
    }

    fn follow(&mut self, outcome: Option<PlayOutcome>, now: HostTime) -> SlideResult<()> {
        match outcome {
            Some(PlayOutcome::FreshStart) => {
                self.renderer.restart_timeline(now)?;
                self.renderer.set_held(false)?;
                self.renderer.sync(0)?;
            }
            Some(PlayOutcome::Resume) => self.renderer.set_held(false)?,
            None => {}
        }
        Ok(())
    }

    fn collect(&mut self) {
        self.log
            .extend(self.renderer.drain_events().into_iter().map(PreviewEvent::Render));
        self.log.extend(
            self.controller
                .drain_events()
                .into_iter()
                .map(PreviewEvent::Playback),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/session.rs"]
mod tests;
