//! Command-line vocabulary.
//!
//! Invocations look like
//!
//! ```text
//! i3ricing Class.method [positional ...] [keyword=value ...]
//! ```
//!
//! [`Invocation::parse`] splits the raw arguments, and
//! [`Command::from_invocation`] binds them against the method's parameter
//! list to produce a typed [`Command`].  Three classes exist:
//!
//! * `BaseI3` — read-only queries, available through every class,
//! * `Mover` — moving the focused container between workspaces,
//! * `Launcher` — opening workspaces and running templated commands.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One-line usage summary printed on malformed input.
pub const USAGE: &str =
    "Usage: i3ricing class.method [parg1 parg2 .. ] [ kwarg1=kwvarg1 kwarg2=kwarg2 .. ]";

/// Errors from parsing or binding the command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Empty command argument list.")]
    Empty,
    #[error("Positional arg '{0}' found after keyword args.")]
    PositionalAfterKeyword(String),
    #[error("What should I run? Expected 'class.method' as first argument.")]
    MissingTarget,
    #[error("Expected 'class.method' as first argument. Found '{0}'.")]
    MalformedTarget(String),
    #[error("Unknown class '{0}'.")]
    UnknownClass(String),
    #[error("'{class}' has no method '{method}'.")]
    UnknownMethod { class: Class, method: String },
    #[error("{method}() takes {max} positional argument(s) but {given} were given.")]
    TooManyArguments {
        method: String,
        max: usize,
        given: usize,
    },
    #[error("{method}() got an unexpected keyword argument '{keyword}'.")]
    UnexpectedKeyword { method: String, keyword: String },
    #[error("{method}() got multiple values for argument '{param}'.")]
    DuplicateArgument { method: String, param: String },
    #[error("{method}() missing required argument '{param}'.")]
    MissingArgument { method: String, param: String },
    #[error("Invalid boolean '{value}' for argument '{param}'.")]
    InvalidBool { param: String, value: String },
}

/// The classes exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    BaseI3,
    Mover,
    Launcher,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::BaseI3 => write!(f, "BaseI3"),
            Class::Mover => write!(f, "Mover"),
            Class::Launcher => write!(f, "Launcher"),
        }
    }
}

impl FromStr for Class {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BaseI3" => Ok(Class::BaseI3),
            "Mover" => Ok(Class::Mover),
            "Launcher" => Ok(Class::Launcher),
            other => Err(UsageError::UnknownClass(other.to_string())),
        }
    }
}

/// Direction for workspace stepping and container moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Every action the tool can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the next larger workspace number (optionally the next free one).
    FindNextWorkspace { find_new: bool },

    /// Print the next smaller workspace number (optionally the next free one).
    FindPreviousWorkspace { find_new: bool },

    /// Print the name of the output holding the focused container.
    GetFocusedOutput,

    /// Print the RandR index of the focused output.
    GetFocusedOutputIdx,

    /// `move left`/`move right`, continuing onto the neighbouring workspace
    /// when the container is already at the edge of a horizontal split.
    FocusedContainer(Direction),

    /// Move the focused container to the previous (`Left`) or next (`Right`)
    /// workspace number and follow it, creating the workspace if needed.
    FocusedContainerToWorkspace(Direction),

    /// Switch to the first free workspace number after the focused one.
    NewWorkspace,

    /// Fill `cmd`'s placeholder with an attribute of the focused output (or
    /// its RandR index) and run it, or print it when `run` is false.
    OnFocused {
        cmd: String,
        attrib: Option<String>,
        run: bool,
    },
}

/// Raw command line split into target, positional and keyword arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub class: String,
    pub method: String,
    pub args: Vec<String>,
    pub kwargs: Vec<(String, String)>,
}

impl Invocation {
    /// Split `args` (without the program name).
    ///
    /// An argument containing `=` is a keyword argument; the key ends at the
    /// first `=`.  Positional arguments must precede all keywords, and the
    /// first one names the target as `class.method`.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        if args.is_empty() {
            return Err(UsageError::Empty);
        }

        let mut positional = Vec::new();
        let mut kwargs = Vec::new();
        for arg in args.iter().map(AsRef::as_ref) {
            match arg.split_once('=') {
                Some((key, value)) => kwargs.push((key.to_string(), value.to_string())),
                None if !kwargs.is_empty() => {
                    return Err(UsageError::PositionalAfterKeyword(arg.to_string()))
                }
                None => positional.push(arg.to_string()),
            }
        }

        if positional.is_empty() {
            return Err(UsageError::MissingTarget);
        }
        let target = positional.remove(0);
        let (class, method) = split_target(&target)
            .ok_or_else(|| UsageError::MalformedTarget(target.clone()))?;

        Ok(Self {
            class: class.to_string(),
            method: method.to_string(),
            args: positional,
            kwargs,
        })
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn split_target(target: &str) -> Option<(&str, &str)> {
    let (class, method) = target.split_once('.')?;
    (is_word(class) && is_word(method)).then_some((class, method))
}

/// A formal parameter of a dispatchable method.
struct Param {
    name: &'static str,
    required: bool,
}

const fn required(name: &'static str) -> Param {
    Param {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> Param {
    Param {
        name,
        required: false,
    }
}

/// Arguments bound to parameter names.
struct Bound(HashMap<&'static str, String>);

impl Bound {
    fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    fn flag(&mut self, name: &str, default: bool) -> Result<bool, UsageError> {
        match self.take(name) {
            Some(value) => parse_bool(&value).ok_or(UsageError::InvalidBool {
                param: name.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }
}

/// Bind positional and keyword arguments to `params`, Python-call style.
fn bind(method: &str, params: &[Param], inv: &Invocation) -> Result<Bound, UsageError> {
    if inv.args.len() > params.len() {
        return Err(UsageError::TooManyArguments {
            method: method.to_string(),
            max: params.len(),
            given: inv.args.len(),
        });
    }

    let mut bound = HashMap::new();
    for (param, value) in params.iter().zip(&inv.args) {
        bound.insert(param.name, value.clone());
    }

    for (key, value) in &inv.kwargs {
        let param = params
            .iter()
            .find(|p| p.name == key.as_str())
            .ok_or_else(|| UsageError::UnexpectedKeyword {
                method: method.to_string(),
                keyword: key.clone(),
            })?;
        if bound.insert(param.name, value.clone()).is_some() {
            return Err(UsageError::DuplicateArgument {
                method: method.to_string(),
                param: key.clone(),
            });
        }
    }

    if let Some(missing) = params.iter().find(|p| p.required && !bound.contains_key(p.name)) {
        return Err(UsageError::MissingArgument {
            method: method.to_string(),
            param: missing.name.to_string(),
        });
    }

    Ok(Bound(bound))
}

/// Parse a boolean keyword value (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Command {
    /// Resolve an [`Invocation`] into a command.
    ///
    /// The `BaseI3` queries are reachable through every class; `Mover` and
    /// `Launcher` methods only through their own class.
    pub fn from_invocation(inv: &Invocation) -> Result<Self, UsageError> {
        let class: Class = inv.class.parse()?;
        let method = inv.method.as_str();

        let command = match (class, method) {
            (_, "find_next_workspace") => {
                let mut b = bind(method, &[optional("find_new")], inv)?;
                Command::FindNextWorkspace {
                    find_new: b.flag("find_new", false)?,
                }
            }
            (_, "find_previous_workspace") => {
                let mut b = bind(method, &[optional("find_new")], inv)?;
                Command::FindPreviousWorkspace {
                    find_new: b.flag("find_new", false)?,
                }
            }
            (_, "get_focused_output") => {
                bind(method, &[], inv)?;
                Command::GetFocusedOutput
            }
            (_, "get_focused_output_idx") => {
                bind(method, &[], inv)?;
                Command::GetFocusedOutputIdx
            }
            (Class::Mover, "focused_container_right") => {
                bind(method, &[], inv)?;
                Command::FocusedContainer(Direction::Right)
            }
            (Class::Mover, "focused_container_left") => {
                bind(method, &[], inv)?;
                Command::FocusedContainer(Direction::Left)
            }
            (Class::Mover, "focused_container_to_next_ws") => {
                bind(method, &[], inv)?;
                Command::FocusedContainerToWorkspace(Direction::Right)
            }
            (Class::Mover, "focused_container_to_previous_ws") => {
                bind(method, &[], inv)?;
                Command::FocusedContainerToWorkspace(Direction::Left)
            }
            (Class::Launcher, "new_workspace") => {
                bind(method, &[], inv)?;
                Command::NewWorkspace
            }
            (Class::Launcher, "on_focused") => {
                let params = [required("cmd"), optional("attrib"), optional("run")];
                let mut b = bind(method, &params, inv)?;
                Command::OnFocused {
                    cmd: b.take("cmd").unwrap_or_default(),
                    // An empty attribute means "use the output index".
                    attrib: b.take("attrib").filter(|a| !a.is_empty()),
                    run: b.flag("run", true)?,
                }
            }
            _ => {
                return Err(UsageError::UnknownMethod {
                    class,
                    method: method.to_string(),
                })
            }
        };
        Ok(command)
    }

    /// Parse a full argument list (without the program name).
    pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        Self::from_invocation(&Invocation::parse(args)?)
    }
}
