//! Core abstractions for the startup validator
//!
//! This crate defines the traits and types shared by every validation stage:
//! the [`Agent`] trait each stage implements, the [`Context`] record the
//! stages accumulate into, and the common [`Error`] type.

pub mod agent;
pub mod context;
pub mod error;

pub use agent::Agent;
pub use context::Context;
pub use error::{Error, Result};
