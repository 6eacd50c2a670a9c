//! Drives an external UCI (Universal Chess Interface) engine subprocess.
//!
//! This crate models only the boundary named in the specification: spawning
//! an engine, performing the `uci`/`isready` handshake, sending `position`/
//! `go`/`stop`/`quit`, and parsing the `info`/`bestmove` lines it sends
//! back. It does not implement the engine side of the protocol.
//!
//! # Example
//!
//! ```no_run
//! use uci::{GoOptions, UciDriver};
//!
//! let mut driver = UciDriver::spawn("/path/to/engine").unwrap();
//! driver.handshake().unwrap();
//! driver.new_game().unwrap();
//! driver.set_position(None, &[]).unwrap();
//! let (best, _ponder, _infos) = driver.go(GoOptions { movetime: Some(1000), ..Default::default() }).unwrap();
//! println!("bestmove: {}", best);
//! driver.quit().unwrap();
//! ```

mod command;
mod driver;
mod info;

pub use command::GoOptions;
pub use driver::{EngineOption, OptionKind, UciDriver};
pub use info::{EngineInfo, InfoBuilder, Score};

use thiserror::Error;

/// Errors that can occur while driving a UCI engine subprocess.
#[derive(Error, Debug)]
pub enum UciError {
    /// The driver's subprocess has already been torn down.
    #[error("engine process is not running")]
    NotRunning,
    /// The subprocess closed its stdout before sending an expected reply.
    #[error("engine exited unexpectedly")]
    EngineExited,
    /// An I/O error occurred talking to the subprocess.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
