//! Symlink farm manager.
//!
//! Installs packages (top-level directories of a *source* marked by a
//! `.linkfarm` entry) into a *target* directory as relative symlinks, linking
//! whole directories where it can and turning a directory link into a real
//! directory when a second package needs to share it.
//!
//! A run has two phases:
//!
//! - **[`planner`]** — walk the requested packages against an [`index`] of
//!   current and planned target states, without touching the target
//! - **[`plan`]** — diff the index into ordered actions and apply them (or
//!   print them as a JSON document for a dry run)
//!
//! Everything touches the disk through the [`fs::Filesystem`] trait.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod index;
pub mod itemize;
pub mod logging;
pub mod paths;
pub mod plan;
pub mod planner;
pub mod state;
