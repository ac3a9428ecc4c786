//! Report rendering.
//!
//! Turns the built charts into a Markdown document or pretty-printed JSON.

mod generator;

pub use generator::*;
