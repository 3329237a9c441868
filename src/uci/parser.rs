//! UCI line parser, both directions.
//!
//! `parse_uci_command` reads what a GUI (or our client) sends to an engine;
//! `parse_engine_reply` reads what an engine sends back.

use crate::board::Move;
use crate::error::{Error, Result};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go {
        depth: Option<u8>,
    },
    Stop,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EngineReply {
    Id {
        key: String,
        value: String,
    },
    UciOk,
    ReadyOk,
    BestMove {
        mv: String,
        ponder: Option<String>,
    },
    Info(String),
    Other(String),
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "position" => {
            // position [fen <fenstring> | startpos ]  moves <move1> ...
            let mut fen: Option<String> = None;
            let mut moves: Vec<String> = Vec::new();
            if parts.len() >= 2 && parts[1] == "startpos" {
                if let Some(pos) = parts.iter().position(|&s| s == "moves") {
                    moves.extend(parts[pos + 1..].iter().map(|m| m.to_string()));
                }
            } else if parts.len() >= 2 && parts[1] == "fen" {
                // collect until "moves" or end
                let mut i = 2usize;
                let mut fen_parts = Vec::new();
                while i < parts.len() && parts[i] != "moves" {
                    fen_parts.push(parts[i]);
                    i += 1;
                }
                fen = Some(fen_parts.join(" "));
                if i < parts.len() {
                    moves.extend(parts[i + 1..].iter().map(|m| m.to_string()));
                }
            } else {
                return UciCommand::Unknown(line.trim().to_string());
            }
            UciCommand::Position { fen, moves }
        }
        "go" => {
            let mut depth: Option<u8> = None;
            let mut i = 1usize;
            while i < parts.len() {
                if parts[i] == "depth" {
                    depth = parts.get(i + 1).and_then(|v| v.parse::<u8>().ok());
                    i += 2;
                } else {
                    // wtime, movetime, infinite... accepted but ignored
                    i += 1;
                }
            }
            UciCommand::Go { depth }
        }
        other => UciCommand::Unknown(other.to_string()),
    }
}

/// Parse one line of engine output. Only a `bestmove` line without a move
/// token is an error; anything unrecognised is passed through as `Other`.
pub fn parse_engine_reply(line: &str) -> Result<EngineReply> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();
    let reply = match parts.next() {
        Some("uciok") => EngineReply::UciOk,
        Some("readyok") => EngineReply::ReadyOk,
        Some("id") => {
            let key = parts.next().unwrap_or_default().to_string();
            let value = parts.collect::<Vec<_>>().join(" ");
            EngineReply::Id { key, value }
        }
        Some("bestmove") => {
            let mv = parts
                .next()
                .ok_or_else(|| Error::Protocol("bestmove without a move".to_string()))?
                .to_string();
            let ponder = match (parts.next(), parts.next()) {
                (Some("ponder"), Some(p)) => Some(p.to_string()),
                _ => None,
            };
            EngineReply::BestMove { mv, ponder }
        }
        Some("info") => EngineReply::Info(trimmed["info".len()..].trim().to_string()),
        _ => EngineReply::Other(trimmed.to_string()),
    };
    Ok(reply)
}

/// Turn the move token of a `bestmove` reply into a move. `(none)` and the
/// null move `0000` mean the engine has nothing to play.
pub fn parse_best_move(token: &str) -> Result<Option<Move>> {
    match token {
        "(none)" | "0000" => Ok(None),
        text => Move::from_uci(text)
            .map(Some)
            .map_err(|_| Error::Protocol(format!("unparseable move '{}'", text))),
    }
}
