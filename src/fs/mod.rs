//! Filesystem access layer: directory entries and the blocking read interface.

pub mod entry;
pub mod source;
