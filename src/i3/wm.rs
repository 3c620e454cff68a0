//! [`WindowManager`] implementation backed by the i3 IPC socket.

use super::ipc::{self, IpcError, MessageType};
use crate::model::{CommandOutcome, OutputInfo, Tree};
use crate::traits::WindowManager;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// i3/sway-backed window manager.
///
/// No connection is opened eagerly; each method call opens a short-lived
/// IPC request.
#[derive(Debug, Clone)]
pub struct I3Wm {
    socket: PathBuf,
}

impl I3Wm {
    /// Create a handle talking to the socket at `socket`.
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
        }
    }

    /// Create a handle for the running window manager.
    ///
    /// See [`ipc::socket_path`] for the lookup order.
    pub fn discover(configured: Option<&str>) -> Result<Self, IpcError> {
        ipc::socket_path(configured).map(Self::new)
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }
}

impl WindowManager for I3Wm {
    type Error = IpcError;

    fn tree(&self) -> Result<Tree, Self::Error> {
        let reply = ipc::request(&self.socket, MessageType::GetTree, "")?;
        let raw: Value = serde_json::from_slice(&reply)?;
        Ok(Tree::from_value(raw)?)
    }

    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error> {
        let reply = ipc::request(&self.socket, MessageType::GetOutputs, "")?;
        Ok(serde_json::from_slice(&reply)?)
    }

    fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, Self::Error> {
        let reply = ipc::request(&self.socket, MessageType::RunCommand, command)?;
        Ok(serde_json::from_slice(&reply)?)
    }
}
