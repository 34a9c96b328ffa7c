//! Generalised LL (GLL) recognition engine.
//!
//! Given an arbitrary context-free grammar — left-recursive, right-recursive,
//! ambiguous, nullable, or cyclic — and a token sequence, this crate explores
//! every derivation with the worklist-driven GLL algorithm of Scott &
//! Johnstone and produces a Binary Subtree Representation (BSR): a flat set
//! of nodes that together encode the full shared derivation forest.
//!
//! The core pipeline is `Grammar` -> `preprocess` -> `Predictor` ->
//! `gll::Parser`. Lexing, grammar source-text parsing, and BSR-to-tree
//! enumeration are intentionally outside this crate's core; `cli` ships a
//! thin demo front-end for the former two.

pub mod cli;
pub mod error;
pub mod fixpoint;
pub mod gll;
pub mod grammar;
pub mod predictor;
pub mod preprocess;
pub mod symbol;

pub use error::{GllError, Result};
pub use gll::{BsrNode, Parser};
pub use grammar::{Grammar, Rule};
pub use predictor::Predictor;
pub use preprocess::preprocess;
pub use symbol::Symbol;
