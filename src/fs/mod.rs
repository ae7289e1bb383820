//! Filesystem helpers.
//!
//! Everything malboxes generates (Vagrantfiles, rendered templates, user
//! scripts, the default configuration) goes through [`atomic_write_file`] so
//! an interrupted run never leaves a half-written file for vagrant to pick up.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file, write_new_file};
