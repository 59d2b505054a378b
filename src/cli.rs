//! CLI demo: a grammar-normalization report, or a regular-expression/LTS
//! acceptance demo when invoked with `--rex <expression>`.

use std::collections::HashSet;
use std::io::{self, BufRead};

use log::info;

use crate::error::Result;
use crate::grammar::Grammar;
use crate::parser::Parser;
use crate::rex2lts;
use crate::rex_parser;
use crate::symbol::{string_to_symbols, Symbol};

/// Entry point dispatched by `main`. `--rex <expression>` runs the
/// regular-expression/LTS demo; with no arguments, reads a grammar from
/// stdin and runs the CFG normalization report.
pub fn run(args: &[String]) -> Result<()> {
    match args {
        [flag, expression, ..] if flag == "--rex" => run_rex_demo(expression),
        _ => run_grammar_demo(),
    }
}

/// Parses `expression`, compiles it to an LTS, then reads candidate strings
/// from stdin (one per line, terminated by a blank line) and reports whether
/// each is accepted.
fn run_rex_demo(expression: &str) -> Result<()> {
    let rex = rex_parser::parse(expression)?;
    let lts = rex2lts::compile(&rex);
    info!(
        "compiled '{}' into an LTS with {} states",
        expression,
        lts.states().len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(Ok(line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let tokens = string_to_symbols(trimmed);
        let verdict = rex.accepts(&tokens);
        debug_assert_eq!(verdict, lts.accepts(&tokens));
        println!("{}", if verdict { "yes" } else { "no" });
    }
    Ok(())
}

/// Reads a grammar from stdin, reports its analysis sets, normalizes it, and
/// runs the recursive-descent tester over candidate strings (one per line,
/// terminated by a blank line).
fn run_grammar_demo() -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let grammar_lines = read_grammar(&mut lines)?;
    let mut grammar = Grammar::parse_lines(&grammar_lines)?;

    println!("alive: {}", format_set(&grammar.alive()));
    println!("reachable: {}", format_set(&grammar.reachable()));
    println!("vanishing: {}", format_set(&grammar.vanishing()));
    println!("has left recursion: {}", grammar.has_left_recursion());

    grammar.delete_extra_non_terminals();
    grammar.delete_vanishings();
    grammar.delete_chain_rules();
    grammar.eliminate_left_recursion();
    grammar.left_factorize();
    info!("normalized grammar:\n{grammar}");
    print!("{grammar}");

    let parser = Parser::new(&grammar);
    parse_strings(|s| parser.is_in_language(s), &mut lines)
}

fn format_set(set: &HashSet<Symbol>) -> String {
    let mut names: Vec<&str> = set.iter().map(Symbol::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}

/// Reads the grammar from input lines: first line is the production count
/// `n`, then `n` production lines.
fn read_grammar<R: BufRead>(lines: &mut io::Lines<R>) -> Result<Vec<String>> {
    let mut grammar_lines = Vec::new();

    let n_str = lines
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "expected production count"))??;

    let n = n_str
        .trim()
        .parse::<usize>()
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid production count"))?;

    grammar_lines.push(n_str);

    for _ in 0..n {
        let line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "expected production line"))??;
        grammar_lines.push(line);
    }

    Ok(grammar_lines)
}

/// Parses strings with `accepts` until an empty line is encountered.
fn parse_strings<F, R>(accepts: F, lines: &mut io::Lines<R>) -> Result<()>
where
    F: Fn(&str) -> bool,
    R: BufRead,
{
    while let Some(Ok(line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        println!("{}", if accepts(trimmed) { "yes" } else { "no" });
    }
    Ok(())
}
