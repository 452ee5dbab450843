use crate::foundation::core::Size;
use crate::foundation::error::SlideResult;
use crate::script::reveal::RevealCue;
use crate::surface::fit::ScaleFit;
use crate::surface::sandbox::SandboxPolicy;

/// Identifies one content load so a late completion signal from a replaced document can be told
/// apart from the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct LoadTicket(pub u64);

/// Signals a rendering surface delivers back to its owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// The document loaded for `LoadTicket` finished loading.
    Loaded(LoadTicket),
    /// The observed container changed size.
    Resized(Size),
}

/// Isolated display context hosting one slide document.
///
/// Contract:
/// - `load_document` replaces the whole document (full reload, never a patch) and later reports
///   completion through [`SurfaceEvent::Loaded`] carrying the same ticket.
/// - Resize signals are only delivered between `observe_resize` and `unobserve_resize`.
/// - Events are buffered by the surface and handed out by `poll_events`; nothing calls back into
///   the owner.
pub trait RenderSurface {
    /// Restrict what loaded documents may do. Called once before the first load.
    fn apply_sandbox(&mut self, policy: &SandboxPolicy) -> SlideResult<()>;

    /// Replace the surface content with `html`. Fails when the surface cannot accept content yet
    /// (for example, not attached).
    fn load_document(&mut self, ticket: LoadTicket, title: &str, html: &str) -> SlideResult<()>;

    /// Show nothing.
    fn clear(&mut self);

    /// Current container size in CSS pixels. May be zero before layout.
    fn container_size(&self) -> Size;

    /// Apply a scale-to-fit transform to the loaded document's root.
    fn apply_fit(&mut self, fit: &ScaleFit) -> SlideResult<()>;

    /// Start delivering [`SurfaceEvent::Resized`].
    fn observe_resize(&mut self);

    /// Stop delivering [`SurfaceEvent::Resized`].
    fn unobserve_resize(&mut self);

    /// Make the node for `cue` visible and start its entrance animation.
    fn reveal(&mut self, cue: &RevealCue) -> SlideResult<()>;

    /// Hide every revealed node again.
    fn conceal_all(&mut self) -> SlideResult<()>;

    /// Pause or resume running entrance animations.
    fn set_animations_running(&mut self, running: bool) -> SlideResult<()>;

    /// Move buffered events into `out`, oldest first.
    fn poll_events(&mut self, out: &mut Vec<SurfaceEvent>);
}
