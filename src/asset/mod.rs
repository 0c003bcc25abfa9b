//! External asset tooling boundaries.

pub mod minify;
