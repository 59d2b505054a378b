//! Context-free grammar normalization and regular-expression tooling.
//!
//! This implementation provides:
//! - Dead/unreachable-symbol removal, ε-production elimination, chain-rule
//!   elimination, left-recursion elimination, and left-factorization
//! - A recursive-descent membership tester over the normalized grammar
//! - A regular-expression AST and a Thompson-style compiler to a labelled
//!   transition system
//! - A CLI for grammar analysis and string parsing, and for regular
//!   expression/LTS experiments
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

mod cli;
mod error;
mod grammar;
mod graph;
mod lts;
mod parser;
mod rex;
mod rex2lts;
mod rex_parser;
mod symbol;

use std::{env, process};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = cli::run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
