#![forbid(unsafe_code)]

pub mod json;
pub mod mirror;

pub use json::JsonFileMirror;
pub use mirror::{InMemoryMirror, MirrorError, ProgressMirror};
