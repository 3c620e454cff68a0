//! Core trait that decouples the navigation logic from the IPC transport.
//!
//! The [`Navigator`](crate::actions::Navigator) only depends on this
//! abstraction.  The concrete i3/sway backend lives in [`crate::i3`]; tests
//! use in-memory doubles.

use crate::model::{CommandOutcome, OutputInfo, Tree};

/// Abstraction over a window manager speaking the i3 IPC vocabulary.
///
/// An implementation might talk to i3 or sway over their Unix socket, or it
/// might be a canned snapshot used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Return the current layout tree (`GET_TREE`).
    fn tree(&self) -> Result<Tree, Self::Error>;

    /// Return the outputs as seen by RandR (`GET_OUTPUTS`), in the order
    /// the window manager reports them.
    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error>;

    /// Execute a command string (`RUN_COMMAND`).
    ///
    /// The reply holds one [`CommandOutcome`] per `;`-separated command.
    fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, Self::Error>;
}
