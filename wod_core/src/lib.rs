#![forbid(unsafe_code)]

//! Workout description parsing and normalization.
//!
//! This crate provides:
//! - Domain types (movement entries, reps, blocks, parsed workouts)
//! - Movement catalog management
//! - Line classification, movement resolution and notation decoding
//! - Freeform and template-import pipelines converging on `ParsedWorkout`
//! - Plain-text rendering of the canonical model

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod notation;
pub mod resolver;
pub mod classifier;
pub mod template;
pub mod parser;
pub mod render;
pub mod editor;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, MovementCatalog};
pub use config::Config;
pub use resolver::{MovementResolver, Resolution};
pub use template::WorkoutTemplate;
pub use parser::{
    import_template, parse_workout, parse_workout_with_dictionary, FreeformText, ParseOptions,
    WorkoutParser, WorkoutSource,
};
pub use render::{heading, movement_line, render_text, RenderOptions};
