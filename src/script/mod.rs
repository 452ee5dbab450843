//! Slide-script contract: the shape generated scripts must have and how gaps are repaired.

pub(crate) mod markup;
pub(crate) mod model;
pub(crate) mod normalize;
pub(crate) mod reveal;
pub(crate) mod theme;
