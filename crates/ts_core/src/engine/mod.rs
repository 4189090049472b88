pub mod config; // All tuning constants, swappable per run
pub mod match_sim; // Match/set/game/tiebreak state machines
pub mod point; // Serve + rally point resolution
pub mod skill; // Fatigue-adjusted effective skills, overall rating
pub mod stats; // Per-match statistics accumulator
