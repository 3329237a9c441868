//! Minimal UCI event loop exposing the built-in search as an engine

use super::parser::{parse_uci_command, UciCommand};
use crate::board::{Color, Move, START_FEN};
use crate::game::Game;
use crate::search::{Search, SearchParams};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciState {
    Init,
    Ready,
    Thinking,
}

pub struct UciEngine {
    state: UciState,
    game: Game,
    params: SearchParams,
    running: bool,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new(SearchParams::new())
    }
}

impl UciEngine {
    /// `params.depth` is used when `go` carries no depth.
    pub fn new(params: SearchParams) -> Self {
        let depth = params.depth.max(1);
        Self {
            state: UciState::Init,
            game: Game::new(),
            params: params.depth(depth),
            running: true,
        }
    }

    pub fn state(&self) -> &UciState {
        &self.state
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name arrocco {}", env!("CARGO_PKG_VERSION")));
                res.push("id author the arrocco developers".to_string());
                res.push("uciok".to_string());
                self.state = UciState::Ready;
            }
            UciCommand::IsReady => {
                res.push("readyok".to_string());
            }
            UciCommand::UciNewGame => {
                self.game = Game::new();
                self.state = UciState::Ready;
            }
            UciCommand::Position { fen, moves } => {
                // Posizione temporanea: tutte le mosse devono essere valide
                let fen_str = fen.as_deref().unwrap_or(START_FEN);
                let mut temp = match Game::from_fen(fen_str) {
                    Ok(g) => g,
                    Err(e) => {
                        res.push(format!("info string {}", e));
                        return res;
                    }
                };
                for move_str in &moves {
                    let applied = Move::from_uci(move_str).and_then(|mv| temp.play(mv));
                    if let Err(e) = applied {
                        res.push(format!("info string invalid move {}: {}", move_str, e));
                        return res;
                    }
                }
                self.game = temp;
                self.state = UciState::Ready;
            }
            UciCommand::Go { depth } => {
                self.state = UciState::Thinking;
                let params = self
                    .params
                    .clone()
                    .depth(depth.unwrap_or(self.params.depth).max(1));
                let depth = params.depth;
                let mut search = Search::new(params);
                let result = search.search(self.game.board(), self.game.side());
                let stats = search.stats();

                // UCI reports the score from the side to move
                let score = match self.game.side() {
                    Color::White => result.score,
                    Color::Black => -result.score,
                };
                res.push(format!(
                    "info depth {} score cp {} nodes {} time {}",
                    depth,
                    score,
                    stats.nodes,
                    stats.search_time.as_millis()
                ));
                match result.mv {
                    Some(mv) => res.push(format!("bestmove {}", mv)),
                    None => {
                        res.push(
                            "info string position is terminal (checkmate or stalemate)"
                                .to_string(),
                        );
                        res.push("bestmove (none)".to_string());
                    }
                }
                self.state = UciState::Ready;
            }
            UciCommand::Stop => {
                // search is synchronous: nothing to interrupt
            }
            UciCommand::Quit => {
                self.running = false;
            }
            UciCommand::Unknown(s) => {
                res.push(format!("info string unknown command: {}", s));
            }
        }
        res
    }
}

pub fn run_uci_loop(params: SearchParams) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let mut engine = UciEngine::new(params);
    let mut buf = String::new();

    while engine.is_running() {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            // EOF reached
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        for r in process_uci_line(line, &mut engine) {
            writeln!(writer, "{}", r)?;
        }
        // Flush after each command so the other side sees replies immediately
        writer.flush()?;
    }

    Ok(())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    let cmd = parse_uci_command(line);
    engine.handle_command(cmd)
}
