//! Confix: keep configuration files in one repository and symlink them into
//! place.
//!
//! A tracked file such as `~/.vimrc` is copied to `<repo>/__HOME__/.vimrc`
//! and replaced by a symlink to that copy, so the repository can be put under
//! version control and checked out on another machine.
//!
//! The public API is organised into layers, leaf first:
//!
//! - **[`paths`]**: user path <-> repository path mapping with home masking
//! - **[`resources`]**: link inspection, backups, repository storage
//! - **[`engine`]**: the `add` / `link` / `unlink` / `rm` / `merge` / `list`
//!   state machine
//! - **[`config`]**: root directory layout and persisted settings
//! - **[`commands`]**: subcommand orchestration for the `confix` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod logging;
pub mod paths;
pub mod resources;
