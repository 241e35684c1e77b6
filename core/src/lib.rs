// src/lib.rs

//! Brook: a lazy, pull-driven sequence engine for Rust.
//!
//! Brook lets you describe chains of sequence operators that only run when a
//! terminal operation demands a result, with features like:
//!  - Finite sources and unbounded generators behind one facade.
//!  - A demand-driven producer/consumer/handle protocol with cooperative,
//!    exactly-once cancellation.
//!  - Null-valued positions as first-class elements, dropped only by the
//!    default terminal view.
//!  - Per-element error capture with a pluggable per-chain hook that can
//!    resume, cancel, or abort.
//!  - Unbounded-sequence protection: operators that must drain their input
//!    fail fast instead of hanging.

// Declare modules according to the planned structure
pub mod error;
pub mod maybe;
pub mod ops;
pub mod protocol;
pub mod seq;
pub mod source;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::error::{BrookError, BrookResult};
pub use crate::maybe::Maybe;
pub use crate::protocol::{BoxConsumer, BoxHandle, ChainControl, Consumer, Demand, ErrorControl, Handle, Producer};

// The main facade and its helper types
pub use crate::ops::cast::AnyValue;
pub use crate::seq::{Brook, Elements, ErrorHook, Positions};

// Source-level knobs
pub use crate::source::DROP_BUDGET;

/*
    Core Workflow:
    1. Build a chain: `Brook::of([1, 2, 3])`, `Brook::of_nullable(...)` or
       `Brook::generate(...)` for an unbounded source.
    2. Stack operators: `.filter(..)`, `.map(..)`, `.flat_map(..)`,
       `.limit(..)`, `.distinct()`, `.sorted()`, ...
    3. Optionally register an error hook with `.on_error(..)` (or
       `.assert_no_error()` to fail hard on the first element error).
    4. Consume through a terminal: `.collect()?`, `.first()?`, `.size()?`,
       `.reduce(..)?`, `.iter()`, ...
    Nothing runs before step 4, and every terminal call re-evaluates the
    chain from its source.
*/
