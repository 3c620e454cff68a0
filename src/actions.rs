//! The orchestrator that ties the layout snapshot and the window manager
//! together.
//!
//! [`Navigator`] reacts to a [`Command`] by taking a fresh [`Layout`]
//! snapshot, computing the target, and issuing the resulting command string
//! through the [`WindowManager`] trait.

use crate::command::{Command, Direction};
use crate::config::Config;
use crate::format::{self, FormatError};
use crate::layout::{Layout, LayoutError, Side};
use crate::model::{attribute, render_value};
use crate::traits::WindowManager;
use log::{debug, info};

/// Possible errors from carrying out a command.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The window manager could not be queried or reached.
    #[error("window manager error: {0}")]
    WindowManager(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The focused output has no attribute of that name.
    #[error("output has no attribute '{0}'")]
    MissingAttribute(String),
    /// The window manager rejected the command.
    #[error("command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

/// Carries out [`Command`]s against a window manager.
///
/// The navigator is generic over any [`WindowManager`] implementation, so
/// it is independent of the IPC transport.
///
/// # Typical usage
///
/// ```ignore
/// let wm = I3Wm::discover(None)?;
/// let navigator = Navigator::new(wm, Config::default());
/// navigator.handle(Command::NewWorkspace)?;
/// ```
pub struct Navigator<W: WindowManager> {
    wm: W,
    config: Config,
}

impl<W: WindowManager> Navigator<W> {
    pub fn new(wm: W, config: Config) -> Self {
        Self { wm, config }
    }

    pub fn wm(&self) -> &W {
        &self.wm
    }

    /// Query the window manager and build a [`Layout`].
    pub fn snapshot(&self) -> Result<Layout, ActionError> {
        let tree = self
            .wm
            .tree()
            .map_err(|e| ActionError::WindowManager(e.to_string()))?;
        let outputs = self
            .wm
            .outputs()
            .map_err(|e| ActionError::WindowManager(e.to_string()))?;
        Ok(Layout::new(tree, outputs, &self.config))
    }

    /// Process a single command.
    ///
    /// Returns the text to print on stdout, if the command produces any
    /// (queries, and [`Command::OnFocused`] with `run == false`).
    pub fn handle(&self, cmd: Command) -> Result<Option<String>, ActionError> {
        let layout = self.snapshot()?;
        debug!(
            "{} workspace(s), {} active output(s)",
            layout.workspaces().len(),
            layout.randr_outputs().len()
        );

        match cmd {
            Command::FindNextWorkspace { find_new } => {
                Ok(Some(layout.find_next_workspace(find_new)?.to_string()))
            }
            Command::FindPreviousWorkspace { find_new } => {
                Ok(Some(layout.find_previous_workspace(find_new)?.to_string()))
            }
            Command::GetFocusedOutput => Ok(Some(layout.focused_output()?.name().to_string())),
            Command::GetFocusedOutputIdx => Ok(Some(layout.focused_output_idx()?.to_string())),
            Command::FocusedContainer(dir) => {
                self.focused_container(&layout, dir)?;
                Ok(None)
            }
            Command::FocusedContainerToWorkspace(dir) => {
                self.focused_container_to_workspace(&layout, dir)?;
                Ok(None)
            }
            Command::NewWorkspace => {
                let num = layout.find_next_workspace(true)?;
                info!("opening workspace {}", num);
                self.run(&format!("workspace number {}", num))?;
                Ok(None)
            }
            Command::OnFocused { cmd, attrib, run } => {
                let command = self.on_focused(&layout, &cmd, attrib.as_deref())?;
                if run {
                    self.run(&command)?;
                    Ok(None)
                } else {
                    Ok(Some(command))
                }
            }
        }
    }

    //  Mover

    /// `move left/right`, continuing onto the neighbouring workspace when
    /// the container is the outermost child of a horizontal split.
    ///
    /// Plain `move right` on the rightmost sibling jumps to the next
    /// *output*, skipping the remaining workspaces on the current one.
    fn focused_container(&self, layout: &Layout, dir: Direction) -> Result<(), ActionError> {
        let side = match dir {
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
        };
        if layout.focused_at_horizontal_edge(side)? {
            debug!("focused container at {} edge, changing workspace", dir);
            self.focused_container_to_workspace(layout, dir)
        } else {
            self.run(&format!("move {}", dir))
        }
    }

    /// Move the focused container to the neighbouring workspace number and
    /// follow it.  The target workspace is created if it does not exist.
    fn focused_container_to_workspace(
        &self,
        layout: &Layout,
        dir: Direction,
    ) -> Result<(), ActionError> {
        let num = match dir {
            Direction::Left => layout.find_previous_workspace(false)?,
            Direction::Right => layout.find_next_workspace(false)?,
        };
        info!("moving focused container to workspace {}", num);
        self.run(&format!(
            "move container to workspace number {}; workspace number {}",
            num, num
        ))
    }

    //  Launcher

    /// Build the command for [`Command::OnFocused`].
    fn on_focused(
        &self,
        layout: &Layout,
        template: &str,
        attrib: Option<&str>,
    ) -> Result<String, ActionError> {
        let value = match attrib {
            Some(name) => {
                let output = layout.focused_output()?;
                layout
                    .tree()
                    .raw_node(output.id)
                    .and_then(|raw| attribute(raw, name))
                    .map(render_value)
                    .ok_or_else(|| ActionError::MissingAttribute(name.to_string()))?
            }
            None => layout.focused_output_idx()?.to_string(),
        };
        Ok(format::substitute(template, &value)?)
    }

    //  Helpers

    /// Send `command` and fail if any part of it was rejected.
    fn run(&self, command: &str) -> Result<(), ActionError> {
        debug!("running '{}'", command);
        let outcomes = self
            .wm
            .run_command(command)
            .map_err(|e| ActionError::WindowManager(e.to_string()))?;
        match outcomes.into_iter().find(|o| !o.success) {
            Some(failed) => Err(ActionError::CommandFailed {
                command: command.to_string(),
                reason: failed.error.unwrap_or_else(|| "unknown error".into()),
            }),
            None => Ok(()),
        }
    }
}
