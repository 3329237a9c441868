use std::process::ExitCode;

use arrocco::board::{Board, START_FEN};
use arrocco::rules::perft;
use clap::Parser;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u8,

    /// Skip the shakmaty reference count
    #[arg(long)]
    no_reference: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let (board, side) = match Board::from_fen(&args.fen) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = std::time::Instant::now();
    let ours = perft(&board, side, args.depth);
    report("arrocco", args.depth, ours, start.elapsed());

    if args.no_reference {
        return ExitCode::SUCCESS;
    }

    let pos: Chess = match args
        .fen
        .parse::<Fen>()
        .map_err(|e| e.to_string())
        .and_then(|f| f.into_position::<Chess>(CastlingMode::Standard).map_err(|e| e.to_string()))
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("shakmaty rejected the position: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = std::time::Instant::now();
    let reference = perft_shakmaty(&pos, args.depth);
    report("shakmaty", args.depth, reference, start.elapsed());

    if ours != reference {
        // en passant is not modelled, so positions that allow it diverge
        println!("MISMATCH: {} vs {}", ours, reference);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn report(name: &str, depth: u8, nodes: u64, duration: std::time::Duration) {
    println!(
        "{} perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        name,
        depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );
}

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    let moves = pos.legal_moves();
    for m in moves {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
