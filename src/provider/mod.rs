pub(crate) mod audio;
pub(crate) mod contract;
pub(crate) mod error;
