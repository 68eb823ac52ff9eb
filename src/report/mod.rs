//! Dashboard rendering.

pub mod generator;

pub use generator::{render, render_chart, render_regions};
