//! Client side of the UCI protocol: an external engine process used as a
//! move-selection backend.
//!
//! The engine's stdout is drained by a reader thread into a channel, so a
//! request can be started with `begin_search`, checked with `poll`, waited
//! on with `wait` or dropped with `abandon`. At most one request is in
//! flight per client; the late `bestmove` of an abandoned request is
//! discarded.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use super::parser::{parse_best_move, parse_engine_reply, EngineReply};
use crate::board::{Board, Color, Move};
use crate::error::{Error, Result};
use crate::player::MoveSelector;
#[cfg(feature = "instrumentation")]
use tracing::instrument;

/// How to launch and drive the external engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Executable to spawn
    pub program: String,

    /// Command-line arguments for the executable
    pub args: Vec<String>,

    /// Depth sent with every `go`
    pub depth: u8,

    /// Time allowed for `uciok` and `readyok`
    pub handshake_timeout: Duration,

    /// Time allowed for a `bestmove` after `go`
    pub move_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "stockfish".to_string(),
            args: Vec::new(),
            depth: 10,
            handshake_timeout: Duration::from_secs(5),
            move_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = timeout;
        self
    }
}

pub struct EngineClient {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    config: EngineConfig,
    in_flight: bool,
    /// bestmove replies still owed for abandoned requests
    stale: usize,
}

impl EngineClient {
    /// Spawn the engine and complete the `uci` / `isready` handshake.
    pub fn start(config: EngineConfig) -> Result<Self> {
        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::EngineUnavailable(format!("cannot start '{}': {}", config.program, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::EngineUnavailable("engine stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::EngineUnavailable("engine stdout not captured".to_string()))?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let mut client = Self {
            child,
            stdin,
            lines: rx,
            config,
            in_flight: false,
            stale: 0,
        };

        let timeout = client.config.handshake_timeout;
        client.send("uci")?;
        client.wait_for(timeout, |r| *r == EngineReply::UciOk)?;
        client.send("isready")?;
        client.wait_for(timeout, |r| *r == EngineReply::ReadyOk)?;
        Ok(client)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight
    }

    /// Send the position and start a fixed-depth search.
    #[cfg_attr(feature = "instrumentation", instrument(skip_all))]
    pub fn begin_search(&mut self, board: &Board, side: Color) -> Result<()> {
        if self.in_flight {
            return Err(Error::SearchInProgress);
        }
        self.send(&format!("position fen {}", board.to_fen(side)))?;
        self.send(&format!("go depth {}", self.config.depth))?;
        self.in_flight = true;
        Ok(())
    }

    /// Non-blocking check for the pending answer. None while still thinking
    /// or when nothing is in flight.
    pub fn poll(&mut self) -> Option<Result<Option<Move>>> {
        if !self.in_flight {
            return None;
        }
        loop {
            match self.lines.try_recv() {
                Ok(line) => {
                    if let Some(done) = self.consume(&line) {
                        return Some(done);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.in_flight = false;
                    return Some(Err(closed()));
                }
            }
        }
    }

    /// Block until the pending answer arrives or the move timeout expires.
    /// On timeout the request is abandoned.
    pub fn wait(&mut self) -> Result<Option<Move>> {
        if !self.in_flight {
            return Err(Error::Protocol("no search in flight".to_string()));
        }
        let deadline = Instant::now() + self.config.move_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    if let Some(done) = self.consume(&line) {
                        return done;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.abandon();
                    return Err(Error::EngineUnavailable(format!(
                        "no bestmove within {} ms",
                        self.config.move_timeout.as_millis()
                    )));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.in_flight = false;
                    return Err(closed());
                }
            }
        }
    }

    /// Drop the pending request; its reply will be ignored when it arrives.
    pub fn abandon(&mut self) {
        if self.in_flight {
            let _ = self.send("stop");
            self.stale += 1;
            self.in_flight = false;
        }
    }

    // Some(..) once the line settles the pending request
    fn consume(&mut self, line: &str) -> Option<Result<Option<Move>>> {
        let reply = parse_engine_reply(line);
        let settled = match reply {
            Ok(EngineReply::BestMove { mv, .. }) => parse_best_move(&mv),
            Err(e) => Err(e),
            Ok(_) => return None,
        };
        if self.stale > 0 {
            self.stale -= 1;
            return None;
        }
        self.in_flight = false;
        Some(settled)
    }

    fn send(&mut self, line: &str) -> Result<()> {
        writeln!(self.stdin, "{}", line)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| Error::EngineUnavailable(format!("write to engine failed: {}", e)))
    }

    fn wait_for(&mut self, timeout: Duration, done: impl Fn(&EngineReply) -> bool) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    if done(&parse_engine_reply(&line)?) {
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(Error::EngineUnavailable(
                        "engine did not complete the handshake".to_string(),
                    ))
                }
                Err(RecvTimeoutError::Disconnected) => return Err(closed()),
            }
        }
    }
}

fn closed() -> Error {
    Error::EngineUnavailable("engine closed its output".to_string())
}

impl MoveSelector for EngineClient {
    fn select_move(&mut self, board: &Board, side: Color) -> Result<Option<Move>> {
        self.begin_search(board, side)?;
        self.wait()
    }
}

impl Drop for EngineClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let deadline = Instant::now() + Duration::from_millis(200);
        while Instant::now() < deadline {
            if let Ok(Some(_)) = self.child.try_wait() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
