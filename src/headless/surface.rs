use std::collections::VecDeque;

use crate::foundation::core::Size;
use crate::foundation::error::{SlideError, SlideResult};
use crate::script::reveal::RevealCue;
use crate::surface::fit::ScaleFit;
use crate::surface::host::{LoadTicket, RenderSurface, SurfaceEvent};
use crate::surface::sandbox::SandboxPolicy;

/// In-memory rendering surface for tests and headless simulation.
///
/// Records every document, fit and reveal it is given. Loads complete on the next poll unless
/// completion is held back with [`HeadlessSurface::hold_loads`].
#[derive(Debug)]
pub struct HeadlessSurface {
    container: Size,
    attached: bool,
    failing_loads: u32,
    hold_loads: bool,
    observing: bool,
    animations_running: bool,
    sandbox: Option<String>,

    load_attempts: u32,
    documents: Vec<(String, String)>,
    held: VecDeque<LoadTicket>,
    fits: Vec<ScaleFit>,
    revealed: Vec<u32>,
    events: VecDeque<SurfaceEvent>,
}

impl HeadlessSurface {
    /// Attached surface with the given container size.
    pub fn new(container: Size) -> Self {
        Self {
            container,
            attached: true,
            failing_loads: 0,
            hold_loads: false,
            observing: false,
            animations_running: true,
            sandbox: None,
            load_attempts: 0,
            documents: Vec::new(),
            held: VecDeque::new(),
            fits: Vec::new(),
            revealed: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Surface that rejects content until [`Self::attach`] is called.
    pub fn detached(container: Size) -> Self {
        Self {
            attached: false,
            ..Self::new(container)
        }
    }

    /// Attach the surface so loads succeed.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Make the next `n` loads fail.
    pub fn fail_next_loads(&mut self, n: u32) {
        self.failing_loads = n;
    }

    /// Keep load completions back until [`Self::complete_loads`].
    pub fn hold_loads(&mut self, hold: bool) {
        self.hold_loads = hold;
    }

    /// Deliver every held load completion, oldest first.
    pub fn complete_loads(&mut self) {
        while let Some(t) = self.held.pop_front() {
            self.events.push_back(SurfaceEvent::Loaded(t));
        }
    }

    /// Change the container size, signalling observers.
    pub fn resize(&mut self, size: Size) {
        self.container = size;
        if self.observing {
            self.events.push_back(SurfaceEvent::Resized(size));
        }
    }

    /// Number of `load_document` calls, successful or not.
    pub fn load_attempts(&self) -> u32 {
        self.load_attempts
    }

    /// Documents loaded since the last clear, as `(title, html)`, oldest first.
    pub fn documents(&self) -> &[(String, String)] {
        &self.documents
    }

    /// The document currently shown.
    pub fn current_document(&self) -> Option<&str> {
        self.documents.last().map(|(_, html)| html.as_str())
    }

    /// Every applied fit, oldest first.
    pub fn fits(&self) -> &[ScaleFit] {
        &self.fits
    }

    /// Elements currently revealed, in reveal order.
    pub fn revealed(&self) -> &[u32] {
        &self.revealed
    }

    /// Whether resize observation is active.
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Whether entrance animations are running.
    pub fn animations_running(&self) -> bool {
        self.animations_running
    }

    /// Sandbox attribute applied to the surface.
    pub fn sandbox_attribute(&self) -> Option<&str> {
        self.sandbox.as_deref()
    }
}

impl RenderSurface for HeadlessSurface {
    fn apply_sandbox(&mut self, policy: &SandboxPolicy) -> SlideResult<()> {
        self.sandbox = Some(policy.to_attribute());
        Ok(())
    }

    fn load_document(&mut self, ticket: LoadTicket, title: &str, html: &str) -> SlideResult<()> {
        self.load_attempts += 1;
        if !self.attached {
            return Err(SlideError::surface("surface is not attached"));
        }
        if self.failing_loads > 0 {
            self.failing_loads -= 1;
            return Err(SlideError::surface("content injection failed"));
        }
        self.documents.push((title.to_owned(), html.to_owned()));
        self.revealed.clear();
        self.animations_running = true;
        if self.hold_loads {
            self.held.push_back(ticket);
        } else {
            self.events.push_back(SurfaceEvent::Loaded(ticket));
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.documents.clear();
        self.revealed.clear();
        self.held.clear();
        self.events.clear();
    }

    fn container_size(&self) -> Size {
        self.container
    }

    fn apply_fit(&mut self, fit: &ScaleFit) -> SlideResult<()> {
        self.fits.push(*fit);
        Ok(())
    }

    fn observe_resize(&mut self) {
        self.observing = true;
    }

    fn unobserve_resize(&mut self) {
        self.observing = false;
        self.events
            .retain(|e| !matches!(e, SurfaceEvent::Resized(_)));
    }

    fn reveal(&mut self, cue: &RevealCue) -> SlideResult<()> {
        self.revealed.push(cue.element);
        Ok(())
    }

    fn conceal_all(&mut self) -> SlideResult<()> {
        self.revealed.clear();
        Ok(())
    }

    fn set_animations_running(&mut self, running: bool) -> SlideResult<()> {
        self.animations_running = running;
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<SurfaceEvent>) {
        out.extend(self.events.drain(..));
    }
}
