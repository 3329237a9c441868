//! Search statistics and performance metrics
//!
//! Tracks nodes visited, leaf evaluations, alpha-beta cutoffs and timing.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched
    pub nodes: u64,

    /// Static evaluations at the horizon or at terminal nodes
    pub evaluations: u64,

    /// Alpha-beta cutoffs
    pub cutoffs: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and calculate NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    pub fn inc_evaluation(&mut self) {
        self.evaluations += 1;
    }

    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Print formatted summary
    pub fn print_summary(&self) {
        println!("=== Search Statistics ===");
        println!("Nodes searched: {}", self.nodes);
        println!("Evaluations: {}", self.evaluations);
        println!("Alpha-Beta cutoffs: {}", self.cutoffs);
        println!("Search time: {} ms", self.search_time.as_millis());
        println!("Nodes per second: {}", self.nps);
    }
}
