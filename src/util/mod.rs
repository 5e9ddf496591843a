//! Helper functions

pub mod path;

pub use path::{parse_path, stringify_path, PathRequest, SEPARATOR};
