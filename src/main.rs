//! GLL Recognition Engine
//!
//! A Rust implementation of the Generalised LL (GLL) parsing algorithm of
//! Scott & Johnstone, producing a Binary Subtree Representation (BSR) of
//! every derivation of an input under an arbitrary context-free grammar.
//!
//! # References
//! Scott, Elizabeth and Johnstone, Adrian. "GLL Parsing." Electronic Notes
//! in Theoretical Computer Science, 2010.

mod cli;
mod error;
mod fixpoint;
mod gll;
mod grammar;
mod predictor;
mod preprocess;
mod symbol;

use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
