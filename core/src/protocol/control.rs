// brook/src/protocol/control.rs

//! Defines the signals exchanged between chain nodes: downstream demand and
//! the upstream-facing flow and error verdicts.

/// How much work a consumer is asking its upstream for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demand {
  /// Produce at most one more position.
  FetchOne,
  /// A drop-phase pull: the requester intends to discard whatever comes
  /// back. The payload is a lower-bound hint of the positions still to be
  /// dropped (zero when the extent is predicate-driven and unknown).
  /// Generator sources charge each such pull against a finite drop budget
  /// instead of spinning forever.
  DropThenFetch(usize),
  /// Run to exhaustion. Unbounded sources reject this demand.
  DrainAll,
}

impl Demand {
  /// Whether this pull happens on behalf of an element that will be
  /// thrown away.
  pub fn is_dropping(self) -> bool {
    matches!(self, Demand::DropThenFetch(_))
  }
}

/// Signal returned by a consumer for every delivered position, telling the
/// producer whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainControl {
  /// Keep producing on demand.
  Continue,
  /// Stop producing permanently. The source cancels itself and notifies the
  /// chain exactly once via `on_cancelled`.
  Stop,
}

/// Verdict of an error hook for one element-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorControl {
  /// Keep the chain running; the failing position stays absent.
  Resume,
  /// Cancel the chain cleanly, keeping everything produced so far.
  Cancel,
  /// Escalate into a hard, chain-aborting failure.
  Abort,
}
