//! In-memory rendering surface and audio backend for tests and headless simulation.

pub(crate) mod audio;
pub(crate) mod surface;
