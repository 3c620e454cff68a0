//! i3/sway-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`WindowManager`](crate::traits::WindowManager) trait, powered by the
//! i3 IPC protocol.  sway speaks the same protocol on `$SWAYSOCK`.
//!
//! Nothing outside this module should reference the wire format directly.

pub mod ipc;
pub mod wm;
