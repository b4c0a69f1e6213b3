//! jv library - shared code for the `jv` CLI
//!
//! Detection of installed JDKs, distributors and the installation pipeline,
//! the persisted registry, and the system-wide `JAVA_HOME` configurator.

// Production-ready clippy configuration
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suspicious)]
#![warn(clippy::unwrap_used)]
// Allow documentation lints - internal code, not public API
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Allow some pedantic lints that are too strict for this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::similar_names)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::cast_possible_truncation)]

pub mod cli;
pub mod config;
pub mod core;
pub mod env;
pub mod runtimes;
