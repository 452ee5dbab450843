pub(crate) mod fit;
pub(crate) mod host;
pub(crate) mod renderer;
pub(crate) mod sandbox;
