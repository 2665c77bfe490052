//! CLI library components for the competency self-assessment.

#![allow(missing_docs)]

pub mod config;
pub mod interactive;
pub mod logging;
pub mod summary;
