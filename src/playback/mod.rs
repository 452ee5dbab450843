pub(crate) mod audio;
pub(crate) mod controller;
pub(crate) mod state;
