//! Drives an external UCI engine subprocess from the GUI side of the protocol.
//!
//! Generalizes the teacher's `bot-arena::uci_client::UciClient` (which lived
//! in a single downstream binary) into a reusable type: spawn the engine,
//! run the handshake, push position/search commands, and tear the process
//! down idempotently.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{trace, warn};

use crate::{EngineInfo, GoOptions, UciError};

/// One parsed `option name N type T [default D] [min A] [max B] (var C)*` line.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOption {
    /// The option's name, as reported by the engine.
    pub name: String,
    /// The option's type and associated payload.
    pub kind: OptionKind,
}

/// The `type T` payload of an [`EngineOption`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    Check { default: Option<bool> },
    Spin {
        default: Option<i64>,
        min: Option<i64>,
        max: Option<i64>,
    },
    Combo {
        default: Option<String>,
        vars: Vec<String>,
    },
    Button,
    String { default: Option<String> },
}

impl EngineOption {
    /// Parses one `option ...` line. Returns `None` if the line isn't a
    /// well-formed option declaration.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("option ")?;
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        let name_idx = tokens.iter().position(|&t| t == "name")?;
        let type_idx = tokens.iter().position(|&t| t == "type")?;
        if type_idx <= name_idx {
            return None;
        }
        let name = tokens[name_idx + 1..type_idx].join(" ");
        let type_str = *tokens.get(type_idx + 1)?;
        let rest_tokens = &tokens[(type_idx + 2).min(tokens.len())..];

        let mut default: Option<String> = None;
        let mut min = None;
        let mut max = None;
        let mut vars = Vec::new();
        let mut i = 0;
        while i < rest_tokens.len() {
            match rest_tokens[i] {
                "default" => {
                    let mut j = i + 1;
                    let mut value = Vec::new();
                    while j < rest_tokens.len() && !matches!(rest_tokens[j], "min" | "max" | "var")
                    {
                        value.push(rest_tokens[j]);
                        j += 1;
                    }
                    default = Some(value.join(" "));
                    i = j;
                }
                "min" => {
                    min = rest_tokens.get(i + 1).and_then(|s| s.parse().ok());
                    i += 2;
                }
                "max" => {
                    max = rest_tokens.get(i + 1).and_then(|s| s.parse().ok());
                    i += 2;
                }
                "var" => {
                    if let Some(&v) = rest_tokens.get(i + 1) {
                        vars.push(v.to_string());
                    }
                    i += 2;
                }
                _ => i += 1,
            }
        }

        let kind = match type_str {
            "check" => OptionKind::Check {
                default: default.and_then(|d| d.parse().ok()),
            },
            "spin" => OptionKind::Spin {
                default: default.and_then(|d| d.parse().ok()),
                min,
                max,
            },
            "combo" => OptionKind::Combo { default, vars },
            "button" => OptionKind::Button,
            "string" => OptionKind::String { default },
            _ => return None,
        };

        Some(EngineOption { name, kind })
    }
}

/// A handle to a running UCI engine subprocess.
///
/// Owns the subprocess's stdin/stdout exclusively; all send/receive calls
/// are synchronous and single-threaded with respect to the child process.
/// `quit` and `Drop` are both idempotent — calling `quit` twice, or dropping
/// after an explicit `quit`, is safe and a no-op the second time.
pub struct UciDriver {
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
    /// Engine name reported via `id name` during the handshake.
    pub name: Option<String>,
    /// Engine author reported via `id author` during the handshake.
    pub author: Option<String>,
    /// Options the engine declared during the handshake.
    pub options: Vec<EngineOption>,
}

impl UciDriver {
    /// Spawns the engine executable with piped stdin/stdout; stderr is
    /// discarded. Does not perform the handshake — call [`handshake`]
    /// afterwards.
    ///
    /// [`handshake`]: UciDriver::handshake
    pub fn spawn<P: AsRef<Path>>(path: P) -> Result<Self, UciError> {
        let mut process = Command::new(path.as_ref())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = process.stdin.take().expect("piped stdin");
        let stdout = BufReader::new(process.stdout.take().expect("piped stdout"));

        Ok(Self {
            process: Some(process),
            stdin: Some(stdin),
            stdout: Some(stdout),
            name: None,
            author: None,
            options: Vec::new(),
        })
    }

    fn send_line(&mut self, line: &str) -> Result<(), UciError> {
        trace!(command = line, "sending command to engine");
        let stdin = self.stdin.as_mut().ok_or(UciError::NotRunning)?;
        writeln!(stdin, "{}", line)?;
        stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, UciError> {
        let stdout = self.stdout.as_mut().ok_or(UciError::NotRunning)?;
        let mut line = String::new();
        let bytes = stdout.read_line(&mut line)?;
        if bytes == 0 {
            warn!("engine stdout closed before expected response");
            return Err(UciError::EngineExited);
        }
        let line = line.trim().to_string();
        trace!(response = %line, "received line from engine");
        Ok(line)
    }

    /// Sends `uci`, collects `id`/`option` lines until `uciok`, then sends
    /// `isready` and blocks for `readyok`.
    pub fn handshake(&mut self) -> Result<(), UciError> {
        self.send_line("uci")?;
        loop {
            let line = self.read_line()?;
            if let Some(rest) = line.strip_prefix("id name ") {
                self.name = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix("id author ") {
                self.author = Some(rest.to_string());
            } else if let Some(opt) = EngineOption::parse(&line) {
                self.options.push(opt);
            } else if line == "uciok" {
                break;
            } else if !line.is_empty() {
                warn!(line = %line, "unrecognized line during uci handshake");
            }
        }

        self.send_line("isready")?;
        loop {
            let line = self.read_line()?;
            if line == "readyok" {
                break;
            }
        }

        Ok(())
    }

    /// Sends `ucinewgame`.
    pub fn new_game(&mut self) -> Result<(), UciError> {
        self.send_line("ucinewgame")
    }

    /// Sends `position startpos|fen ... [moves ...]`.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), UciError> {
        let mut cmd = String::from("position ");
        match fen {
            Some(f) => {
                cmd.push_str("fen ");
                cmd.push_str(f);
            }
            None => cmd.push_str("startpos"),
        }
        if !moves.is_empty() {
            cmd.push_str(" moves ");
            cmd.push_str(&moves.join(" "));
        }
        self.send_line(&cmd)
    }

    /// Sends `setoption name N value V`.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), UciError> {
        self.send_line(&format!("setoption name {} value {}", name, value))
    }

    /// Sends `go ...` and blocks, collecting `info` lines, until `bestmove`.
    /// Returns the best move, the ponder move if given, and every `info`
    /// line seen while waiting.
    pub fn go(
        &mut self,
        options: GoOptions,
    ) -> Result<(String, Option<String>, Vec<EngineInfo>), UciError> {
        self.send_line(&options.to_command())?;

        let mut infos = Vec::new();
        loop {
            let line = self.read_line()?;
            if let Some(rest) = line.strip_prefix("bestmove ") {
                let mut tokens = rest.split_whitespace();
                let best = tokens.next().unwrap_or("").to_string();
                let ponder = match tokens.next() {
                    Some("ponder") => tokens.next().map(|s| s.to_string()),
                    _ => None,
                };
                return Ok((best, ponder, infos));
            }
            match EngineInfo::parse(&line) {
                Some(info) => infos.push(info),
                None if !line.is_empty() => {
                    warn!(line = %line, "unrecognized line from engine during search")
                }
                None => {}
            }
        }
    }

    /// Sends `stop` without blocking for a reply.
    pub fn stop(&mut self) -> Result<(), UciError> {
        self.send_line("stop")
    }

    /// Sends `quit` and waits for the child to exit. Safe to call more than
    /// once; the second call is a no-op.
    pub fn quit(&mut self) -> Result<(), UciError> {
        if self.process.is_none() {
            return Ok(());
        }
        let _ = self.send_line("quit");
        if let Some(mut process) = self.process.take() {
            let _ = process.wait();
        }
        self.stdin = None;
        self.stdout = None;
        Ok(())
    }
}

impl Drop for UciDriver {
    /// Performs the same teardown as [`quit`](UciDriver::quit) if the
    /// engine hasn't already been quit.
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            let _ = write!(
                self.stdin.as_mut().expect("stdin present while process is"),
                "quit\n"
            );
            let _ = process.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_check_option() {
        let opt = EngineOption::parse("option name Ponder type check default false").unwrap();
        assert_eq!(opt.name, "Ponder");
        assert_eq!(opt.kind, OptionKind::Check { default: Some(false) });
    }

    #[test]
    fn parse_spin_option() {
        let opt =
            EngineOption::parse("option name Threads type spin default 1 min 1 max 512").unwrap();
        assert_eq!(opt.name, "Threads");
        assert_eq!(
            opt.kind,
            OptionKind::Spin {
                default: Some(1),
                min: Some(1),
                max: Some(512),
            }
        );
    }

    #[test]
    fn parse_combo_option() {
        let opt = EngineOption::parse(
            "option name Style type combo default Normal var Solid var Normal var Risky",
        )
        .unwrap();
        assert_eq!(opt.name, "Style");
        assert_eq!(
            opt.kind,
            OptionKind::Combo {
                default: Some("Normal".to_string()),
                vars: vec![
                    "Solid".to_string(),
                    "Normal".to_string(),
                    "Risky".to_string()
                ],
            }
        );
    }

    #[test]
    fn parse_button_option() {
        let opt = EngineOption::parse("option name Clear Hash type button").unwrap();
        assert_eq!(opt.name, "Clear Hash");
        assert_eq!(opt.kind, OptionKind::Button);
    }

    #[test]
    fn parse_string_option() {
        let opt =
            EngineOption::parse("option name SyzygyPath type string default <empty>").unwrap();
        assert_eq!(opt.name, "SyzygyPath");
        assert_eq!(
            opt.kind,
            OptionKind::String {
                default: Some("<empty>".to_string())
            }
        );
    }

    #[test]
    fn parse_rejects_non_option_line() {
        assert!(EngineOption::parse("uciok").is_none());
        assert!(EngineOption::parse("id name Foo").is_none());
    }

    #[test]
    fn spawn_nonexistent_executable_returns_error() {
        let result = UciDriver::spawn("/nonexistent/path/to/engine");
        assert!(result.is_err());
        match result {
            Err(UciError::IoError(_)) => {}
            other => panic!("expected IoError, got {:?}", other),
        }
    }
}
