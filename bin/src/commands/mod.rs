//! CLI command implementations.

pub(crate) mod dir;
pub(crate) mod file;
pub(crate) mod info;
pub(crate) mod transfer;
