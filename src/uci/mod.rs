//! UCI text protocol: parser, external-engine client and our own engine loop.

pub mod client;
pub mod parser;
pub mod server;

pub use client::{EngineClient, EngineConfig};
pub use parser::{parse_best_move, parse_engine_reply, parse_uci_command, EngineReply, UciCommand};
pub use server::{process_uci_line, run_uci_loop, UciEngine, UciState};
