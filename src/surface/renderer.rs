//! Timeline renderer: presents one slide document inside a [`RenderSurface`].
//!
//! Phases move `Empty -> Loading -> Rendered`. Assigning another slide always goes back through
//! `Loading` with a full document replace, so every slide starts its own timeline exactly once.
//! Scale is applied on load completion and on later resizes; a resize never reloads content.

use std::time::Duration;

use crate::foundation::config::{PreviewConfig, TimingMode};
use crate::foundation::core::{HostTime, Resolution, Size};
use crate::foundation::error::{Recovery, SlideResult};
use crate::script::markup::{placeholder_document, prepare_document};
use crate::script::model::SlideRecord;
use crate::script::reveal::{RevealCue, RevealSchedule};
use crate::surface::fit::ScaleFit;
use crate::surface::host::{LoadTicket, RenderSurface, SurfaceEvent};

/// Lifecycle phase of a [`TimelineRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RenderPhase {
    /// No slide bound; the surface shows nothing.
    Empty,
    /// A document is being written into the surface.
    Loading,
    /// Content loaded and scale applied at least once (or skipped for a zero-size container).
    Rendered,
}

/// Observable renderer activity, drained by the owner.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum RenderEvent {
    /// A slide finished loading.
    Rendered {
        /// Slide id.
        slide_id: u32,
    },
    /// A new scale-to-fit transform was applied.
    Fitted(ScaleFit),
    /// A reveal cue became visible.
    Revealed(RevealCue),
    /// All revealed nodes were hidden again (restart or backwards seek).
    Concealed,
    /// A fault was absorbed locally.
    Recovered(Recovery),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
    Placeholder,
}

#[derive(Clone, Copy, Debug)]
enum Pending {
    /// Waiting for the surface to report `Loaded(ticket)`.
    Awaiting { ticket: LoadTicket, attempt: Attempt },
    /// The first injection failed; try again at `at`.
    RetryAt { at: HostTime },
}

#[derive(Clone, Debug)]
struct BoundSlide {
    id: u32,
    title: String,
    surface_title: String,
    document: String,
    schedule: RevealSchedule,
}

/// Drives one rendering surface through slide assignments, load completion, scaling and reveals.
pub struct TimelineRenderer<S: RenderSurface> {
    surface: S,
    canvas: Resolution,
    timing: TimingMode,
    load_retry: Duration,
    fallback_stagger_ms: u64,

    phase: RenderPhase,
    slide: Option<BoundSlide>,
    pending: Option<Pending>,
    next_ticket: u64,
    fit: Option<ScaleFit>,
    revealed: usize,
    observing: bool,

    recoveries: Vec<Recovery>,
    outbox: Vec<RenderEvent>,
    scratch: Vec<SurfaceEvent>,
}

impl<S: RenderSurface> TimelineRenderer<S> {
    /// Wrap `surface`, applying the configured sandbox policy.
    pub fn new(mut surface: S, config: &PreviewConfig) -> SlideResult<Self> {
        config.sandbox.check()?;
        surface.apply_sandbox(&config.sandbox)?;
        Ok(Self {
            surface,
            canvas: config.resolution,
            timing: config.timing,
            load_retry: config.load_retry(),
            fallback_stagger_ms: config.fallback_stagger_ms,
            phase: RenderPhase::Empty,
            slide: None,
            pending: None,
            next_ticket: 0,
            fit: None,
            revealed: 0,
            observing: false,
            recoveries: Vec::new(),
            outbox: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Bind `slide` and start loading its document.
    ///
    /// Slides without markup load the placeholder instead. A failed injection is retried once on
    /// a later [`Self::tick`]; the error is only returned when even the placeholder cannot be
    /// loaded.
    #[tracing::instrument(skip(self, slide), fields(slide_id = slide.id))]
    pub fn assign(&mut self, slide: &SlideRecord, now: HostTime) -> SlideResult<()> {
        self.recoveries.clear();
        let (document, schedule) = if slide.has_markup() {
            (
                prepare_document(&slide.html, self.timing),
                RevealSchedule::extract(&slide.html, self.fallback_stagger_ms),
            )
        } else {
            tracing::warn!(slide_id = slide.id, "slide has no markup; showing placeholder");
            self.recover(Recovery::ContentMissing { slide_id: slide.id });
            (
                placeholder_document(slide.id, &slide.title),
                RevealSchedule::default(),
            )
        };
        tracing::debug!(cues = schedule.len(), "assigned slide");

        self.slide = Some(BoundSlide {
            id: slide.id,
            title: slide.title.clone(),
            surface_title: slide.surface_title(),
            document,
            schedule,
        });
        if !self.observing {
            self.surface.observe_resize();
            self.observing = true;
        }
        self.begin_load(Attempt::First, now)
    }

    /// Restart the slide timeline from its first reveal.
    ///
    /// Clock-driven reveals are concealed and re-derived from the playback clock. Document-timer
    /// slides reload, since their timers can only start at load.
    pub fn restart_timeline(&mut self, now: HostTime) -> SlideResult<()> {
        if self.phase != RenderPhase::Rendered {
            return Ok(());
        }
        match self.timing {
            TimingMode::ClockDriven => self.conceal(),
            TimingMode::DocumentTimers => {
                tracing::debug!("reloading document to restart its timers");
                self.begin_load(Attempt::First, now)
            }
        }
    }

    /// Reveal every cue due at `elapsed_ms` of the playback clock and return the newly revealed
    /// ones. Moving backwards conceals first. No-op unless clock-driven and rendered.
    pub fn sync(&mut self, elapsed_ms: u64) -> SlideResult<Vec<RevealCue>> {
        if self.timing != TimingMode::ClockDriven || self.phase != RenderPhase::Rendered {
            return Ok(Vec::new());
        }
        let Some(slide) = self.slide.as_ref() else {
            return Ok(Vec::new());
        };
        let due = slide.schedule.due_count(elapsed_ms);
        if due < self.revealed {
            self.conceal()?;
        }
        let Some(slide) = self.slide.as_ref() else {
            return Ok(Vec::new());
        };
        let fresh: Vec<RevealCue> = slide.schedule.cues()[self.revealed..due].to_vec();
        for cue in &fresh {
            self.surface.reveal(cue)?;
            self.outbox.push(RenderEvent::Revealed(*cue));
        }
        self.revealed = due;
        Ok(fresh)
    }

    /// Freeze or release running entrance animations while playback is paused.
    ///
    /// Document-timer slides keep running regardless.
    pub fn set_held(&mut self, held: bool) -> SlideResult<()> {
        if self.timing == TimingMode::ClockDriven && self.phase == RenderPhase::Rendered {
            self.surface.set_animations_running(!held)?;
        }
        Ok(())
    }

    /// Drive pending retries and handle buffered surface events.
    pub fn tick(&mut self, now: HostTime) -> SlideResult<()> {
        if let Some(Pending::RetryAt { at }) = self.pending
            && now >= at
        {
            self.begin_load(Attempt::Retry, now)?;
        }

        let mut events = std::mem::take(&mut self.scratch);
        self.surface.poll_events(&mut events);
        for ev in events.drain(..) {
            match ev {
                SurfaceEvent::Loaded(ticket) => self.on_loaded(ticket)?,
                SurfaceEvent::Resized(size) => {
                    if self.phase == RenderPhase::Rendered {
                        self.refit(size)?;
                    }
                }
            }
        }
        self.scratch = events;
        Ok(())
    }

    /// Unbind the slide, clear the surface and stop observing resizes.
    pub fn teardown(&mut self) {
        if self.observing {
            self.surface.unobserve_resize();
            self.observing = false;
        }
        if self.phase != RenderPhase::Empty || self.slide.is_some() {
            self.surface.clear();
        }
        self.phase = RenderPhase::Empty;
        self.slide = None;
        self.pending = None;
        self.fit = None;
        self.revealed = 0;
    }

    /// Current phase.
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Id of the bound slide.
    pub fn slide_id(&self) -> Option<u32> {
        self.slide.as_ref().map(|s| s.id)
    }

    /// Title of the bound slide.
    pub fn slide_title(&self) -> Option<&str> {
        self.slide.as_ref().map(|s| s.title.as_str())
    }

    /// Reveal schedule of the bound slide.
    pub fn schedule(&self) -> Option<&RevealSchedule> {
        self.slide.as_ref().map(|s| &s.schedule)
    }

    /// Last applied fit.
    pub fn fit(&self) -> Option<&ScaleFit> {
        self.fit.as_ref()
    }

    /// Number of cues currently revealed.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Faults absorbed since the current slide was assigned.
    pub fn recoveries(&self) -> &[Recovery] {
        &self.recoveries
    }

    /// Take buffered activity, oldest first.
    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Borrow the surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn begin_load(&mut self, attempt: Attempt, now: HostTime) -> SlideResult<()> {
        let Some(slide) = self.slide.as_ref() else {
            return Ok(());
        };
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = RenderPhase::Loading;
        self.fit = None;
        self.revealed = 0;

        let document = match attempt {
            Attempt::Placeholder => placeholder_document(slide.id, &slide.title),
            Attempt::First | Attempt::Retry => slide.document.clone(),
        };
        match self
            .surface
            .load_document(ticket, &slide.surface_title, &document)
        {
            Ok(()) => {
                self.pending = Some(Pending::Awaiting { ticket, attempt });
                Ok(())
            }
            Err(e) => match attempt {
                Attempt::First => {
                    tracing::warn!(error = %e, "content injection failed; retrying once");
                    self.pending = Some(Pending::RetryAt {
                        at: now.after(self.load_retry),
                    });
                    Ok(())
                }
                Attempt::Retry => {
                    let slide_id = slide.id;
                    tracing::warn!(error = %e, "content injection failed again; loading placeholder");
                    self.recover(Recovery::LoadFallback { slide_id });
                    self.begin_load(Attempt::Placeholder, now)
                }
                Attempt::Placeholder => {
                    self.pending = None;
                    Err(e)
                }
            },
        }
    }

    fn on_loaded(&mut self, ticket: LoadTicket) -> SlideResult<()> {
        let current = matches!(
            self.pending,
            Some(Pending::Awaiting { ticket: t, .. }) if t == ticket
        );
        if !current {
            tracing::debug!(ticket = ticket.0, "ignoring load signal for a replaced document");
            return Ok(());
        }
        self.pending = None;
        self.phase = RenderPhase::Rendered;
        if let Some(slide_id) = self.slide_id() {
            tracing::debug!(slide_id, "rendered");
            self.outbox.push(RenderEvent::Rendered { slide_id });
        }
        let size = self.surface.container_size();
        self.refit(size)
    }

    fn refit(&mut self, size: Size) -> SlideResult<()> {
        match ScaleFit::compute(size, self.canvas) {
            Some(fit) => {
                if self.fit.as_ref() == Some(&fit) {
                    return Ok(());
                }
                self.surface.apply_fit(&fit)?;
                tracing::debug!(scale = fit.scale, x = fit.offset.x, y = fit.offset.y, "fit");
                self.fit = Some(fit);
                self.outbox.push(RenderEvent::Fitted(fit));
            }
            None => {
                tracing::debug!(
                    width = size.width,
                    height = size.height,
                    "container has no area; waiting for resize"
                );
                if self.recoveries.last() != Some(&Recovery::ScaleComputeSkipped) {
                    self.recover(Recovery::ScaleComputeSkipped);
                }
            }
        }
        Ok(())
    }

    fn conceal(&mut self) -> SlideResult<()> {
        if self.revealed > 0 {
            self.surface.conceal_all()?;
            self.outbox.push(RenderEvent::Concealed);
        }
        self.revealed = 0;
        Ok(())
    }

    fn recover(&mut self, r: Recovery) {
        self.outbox.push(RenderEvent::Recovered(r.clone()));
        self.recoveries.push(r);
    }
}

impl<S: RenderSurface> Drop for TimelineRenderer<S> {
    fn drop(&mut self) {
        if self.observing {
            self.surface.unobserve_resize();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/renderer.rs"]
mod tests;
