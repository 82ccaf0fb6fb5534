//! Command line front end for instrument result import and worklist export.

pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
