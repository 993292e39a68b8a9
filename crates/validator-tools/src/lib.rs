//! Tool framework for the startup validator
//!
//! Every research step a stage performs (a search, a lookup table, a
//! projection) is exposed as a [`Tool`]: a named function from JSON
//! parameters to a JSON result. Tools are collected in a [`ToolRegistry`]
//! so they can be listed and invoked individually.

pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, parse_params};
