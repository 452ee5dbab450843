use crate::foundation::core::{Affine, Resolution, Size, Vec2};

/// Uniform scale and centering offset mapping the authoring canvas onto a container.
///
/// Always derived from the current container size; never stored beyond the next resize.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScaleFit {
    /// Uniform scale factor applied to the authoring canvas.
    pub scale: f64,
    /// Top-left position of the scaled canvas inside the container.
    pub offset: Vec2,
    /// Container size the fit was computed for.
    pub container: Size,
    /// Authoring canvas the fit maps from.
    pub canvas: Resolution,
}

impl ScaleFit {
    /// Compute the fit for `container`.
    ///
    /// Returns `None` while the container has no area (not laid out yet) or reports a
    /// non-finite size; callers retry on the next resize signal.
    pub fn compute(container: Size, canvas: Resolution) -> Option<Self> {
        let (w, h) = (container.width, container.height);
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return None;
        }
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let scale = (w / cw).min(h / ch);
        let offset = Vec2::new((w - cw * scale) / 2.0, (h - ch * scale) / 2.0);
        Some(Self {
            scale,
            offset,
            container,
            canvas,
        })
    }

    /// Size of the canvas after scaling.
    pub fn scaled_size(&self) -> Size {
        Size::new(
            f64::from(self.canvas.width) * self.scale,
            f64::from(self.canvas.height) * self.scale,
        )
    }

    /// Transform from canvas space to container space: scale about the top-left, then offset.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Inline style declarations that apply this fit to a document body.
    pub fn to_css(&self) -> String {
        format!(
            "transform: scale({}); width: {}px; height: {}px; left: {}px; top: {}px;",
            self.scale, self.canvas.width, self.canvas.height, self.offset.x, self.offset.y
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/fit.rs"]
mod tests;
