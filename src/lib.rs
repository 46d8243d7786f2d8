#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

#[macro_use]
pub mod report;
pub mod bootstrap;
pub mod cmd;
pub mod elevate;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod install;
pub mod path;
pub mod platform;
pub mod tour;
pub mod version;

pub use error::{InstallError, Result};
