//! i3 IPC wire format and socket discovery.
//!
//! # Wire format
//!
//! Every message, in both directions, is a fixed header followed by a
//! payload:
//!
//! ```text
//! "i3-ipc" | payload length: u32 | message type: u32 | payload
//! ```
//!
//! Integers use the host byte order.  Replies carry the type of the request
//! they answer and a JSON payload.

use log::debug;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Magic string opening every message.
pub const MAGIC: &[u8; 6] = b"i3-ipc";

const HEADER_LEN: usize = MAGIC.len() + 8;

/// Message types used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MessageType {
    RunCommand = 0,
    GetOutputs = 3,
    GetTree = 4,
}

/// Errors from talking to the IPC socket.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid magic in reply header")]
    BadMagic,
    #[error("expected reply of type {expected}, got {got}")]
    UnexpectedType { expected: u32, got: u32 },
    #[error("cannot locate the IPC socket: {0}")]
    NoSocket(String),
}

/// Encode a message of `msg_type` carrying `payload`.
pub fn encode(msg_type: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    buf.extend_from_slice(&(msg_type as u32).to_ne_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Read one message and return its raw type and payload.
pub fn read_message<R: Read>(reader: &mut R) -> Result<(u32, Vec<u8>), IpcError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;
    if &header[..MAGIC.len()] != MAGIC {
        return Err(IpcError::BadMagic);
    }
    let len = u32_at(&header, MAGIC.len());
    let msg_type = u32_at(&header, MAGIC.len() + 4);

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok((msg_type, payload))
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_ne_bytes(bytes)
}

/// Send one request over a fresh connection to `socket` and return the
/// reply payload.
pub fn request(socket: &Path, msg_type: MessageType, payload: &str) -> Result<Vec<u8>, IpcError> {
    debug!("ipc {:?} {:?}", msg_type, payload);
    let mut stream = UnixStream::connect(socket)?;
    stream.write_all(&encode(msg_type, payload.as_bytes()))?;

    let (reply_type, reply) = read_message(&mut stream)?;
    if reply_type != msg_type as u32 {
        return Err(IpcError::UnexpectedType {
            expected: msg_type as u32,
            got: reply_type,
        });
    }
    Ok(reply)
}

/// Window managers that can report their socket on the command line.
const SOCKETPATH_PROGRAMS: [&str; 2] = ["i3", "sway"];

/// Resolve the IPC socket path.
///
/// `configured` wins if set; then `$I3SOCK`, `$SWAYSOCK` and finally the
/// answers of `i3 --get-socketpath` and `sway --get-socketpath` are tried.
pub fn socket_path(configured: Option<&str>) -> Result<PathBuf, IpcError> {
    if let Some(path) = configured {
        return Ok(PathBuf::from(path));
    }
    for var in ["I3SOCK", "SWAYSOCK"] {
        if let Ok(path) = std::env::var(var) {
            if !path.is_empty() {
                debug!("using socket from ${}", var);
                return Ok(PathBuf::from(path));
            }
        }
    }

    SOCKETPATH_PROGRAMS
        .iter()
        .find_map(|program| ask_socketpath(program))
        .ok_or_else(|| {
            IpcError::NoSocket(
                "I3SOCK and SWAYSOCK unset and neither i3 nor sway reported a socket".into(),
            )
        })
}

/// Run `<program> --get-socketpath` and return its answer, if any.
fn ask_socketpath(program: &str) -> Option<PathBuf> {
    let output = match Command::new(program).arg("--get-socketpath").output() {
        Ok(output) => output,
        Err(e) => {
            debug!("{} --get-socketpath: {}", program, e);
            return None;
        }
    };
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || path.is_empty() {
        debug!("{} --get-socketpath gave no answer", program);
        return None;
    }
    debug!("using socket reported by {}", program);
    Some(PathBuf::from(path))
}
