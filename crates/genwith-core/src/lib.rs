//! genwith Core Library
//!
//! This library renders functional-option HTTP client scaffolding for a Go
//! package from a set of feature flags, and runs the result through the
//! standard Go formatting tools.

pub mod config;
pub mod error;
pub mod format;
pub mod generate;
pub mod provenance;
pub mod templates;

pub use crate::{
    config::{Config, Flag, Flags},
    error::{Error, Result},
    format::{FormatPipeline, FormatStep},
    generate::Generator,
    templates::{RegionId, RegionTree, TemplateRenderer},
};
