//! Point-level outcome data passed up from the point simulator.

use serde::Serialize;

/// How a point ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutcomeKind {
    /// Serve won the point outright, no rally.
    Ace,
    /// Failed second serve; the receiver is awarded the point.
    DoubleFault,
    /// A rally-ending failed return (including the rally-length cap).
    ForcedError,
}

impl OutcomeKind {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::Ace => "Ace",
            OutcomeKind::DoubleFault => "Double Fault",
            OutcomeKind::ForcedError => "Forced Error",
        }
    }
}

/// The result of one resolved point.
///
/// Ephemeral: produced by the point simulator, consumed by the game loop
/// and the stats tracker within the same point evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOutcome {
    /// Participant index (0 or 1) of the point winner.
    pub winner: usize,
    pub kind: OutcomeKind,
    /// 0 for aces and double faults, >= 1 once a rally started.
    pub rally_length: u32,
    /// The first serve missed and the point ran on the second serve.
    pub first_serve_fault: bool,
}
