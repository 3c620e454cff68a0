//! **i3ricing** — workspace- and output-aware navigation for i3 and sway.
//!
//! The window manager's own `move` and `workspace` commands stop at the
//! edges of a split, jump straight to the next *output*, or only know about
//! workspaces that already exist.  i3ricing adds the commands that fill
//! those gaps: move the focused container onto the neighbouring workspace
//! number, open the first free workspace number, and pass the focused
//! output to external programs.
//!
//! # Architecture
//!
//! Every invocation is a single snapshot-then-act cycle:
//!
//! 1. [`command`] turns `Class.method args key=value` into a [`command::Command`],
//! 2. [`actions::Navigator`] queries the [`traits::WindowManager`] for the
//!    tree and outputs and builds a [`layout::Layout`],
//! 3. the layout computes the target workspace or output and the navigator
//!    sends the resulting command string back to the window manager.
//!
//! The concrete IPC backend lives in [`i3`].

pub mod actions;
pub mod command;
pub mod config;
pub mod format;
pub mod i3;
pub mod layout;
pub mod model;
pub mod traits;
