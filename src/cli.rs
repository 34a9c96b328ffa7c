//! Demo CLI for the GLL engine.
//!
//! This is a grammar source-text parsing front-end, deliberately kept
//! outside the recognition core: it reads a small line-oriented grammar
//! format and a whitespace-tokenised input string, builds the core
//! `Grammar` -> `Predictor` -> `gll::Parser` pipeline, and reports whether
//! the input was accepted plus the resulting BSR set. None of this module's
//! text format is part of the core engine's construction contract.
//!
//! # Grammar format
//! ```text
//! <n>
//! <LHS> -> <alt1 sym1> <alt1 sym2> | <alt2 sym1> | EPS
//! ...
//! ```
//! `n` production lines follow, each naming one or more `|`-separated
//! alternatives for a single left-hand side. A bare `EPS` alternative is an
//! ε-production. The start symbol is the left-hand side of the first line.
//! Symbols are whitespace-separated tokens; a token is a nonterminal iff its
//! first character is an ASCII uppercase letter.

use crate::error::{GllError, Result};
use crate::gll::Parser as GllParser;
use crate::grammar::Grammar;
use crate::predictor::Predictor;
use crate::symbol::Symbol;
use std::io::{self, BufRead, Write};

fn symbol_from_token(tok: &str) -> Symbol {
    if tok.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        Symbol::nonterminal(tok)
    } else {
        Symbol::terminal(tok)
    }
}

/// Parses one `LHS -> alt1 | alt2 | ...` line into `(lhs, alternatives)`.
fn parse_production_line(line: &str) -> Result<(Symbol, Vec<Vec<Symbol>>)> {
    let (lhs_str, rhs_str) = line
        .split_once("->")
        .ok_or_else(|| GllError::InvalidFormat(line.to_string()))?;

    let lhs_str = lhs_str.trim();
    if lhs_str.is_empty() {
        return Err(GllError::InvalidFormat("empty left-hand side".to_string()));
    }
    let lhs = symbol_from_token(lhs_str);

    let alternatives = rhs_str
        .split('|')
        .map(|alt| {
            let alt = alt.trim();
            if alt == "EPS" {
                Vec::new()
            } else {
                alt.split_whitespace().map(symbol_from_token).collect()
            }
        })
        .collect();

    Ok((lhs, alternatives))
}

/// Builds a `Grammar` from the text format described above.
pub fn parse_grammar(lines: &[String]) -> Result<Grammar> {
    if lines.is_empty() {
        return Err(GllError::InvalidFormat("empty grammar input".to_string()));
    }

    let n = lines[0]
        .trim()
        .parse::<usize>()
        .map_err(|e| GllError::InvalidFormat(format!("invalid production count: {}", e)))?;

    if lines.len() < n + 1 {
        return Err(GllError::NotEnoughProductions {
            expected: n,
            actual: lines.len() - 1,
        });
    }

    let mut grammar: Option<Grammar> = None;
    for line in &lines[1..=n] {
        let (lhs, alternatives) = parse_production_line(line)?;
        let g = grammar.get_or_insert_with(|| Grammar::with_start(lhs.clone()));
        for rhs in alternatives {
            g.add_rule(lhs.clone(), rhs);
        }
    }

    grammar.ok_or_else(|| GllError::InvalidFormat("no productions given".to_string()))
}

/// Tokenises a whitespace-separated input string into terminals.
pub fn tokenize(input: &str) -> Vec<Symbol> {
    input.split_whitespace().map(Symbol::terminal).collect()
}

/// Runs the interactive demo: reads a grammar, then repeatedly reads an
/// input line (until EOF or a blank line) and reports accept/reject plus
/// the BSR set size.
pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let grammar_lines = read_grammar(&mut lines)?;
    let grammar = parse_grammar(&grammar_lines)?;
    let predictor = Predictor::new(grammar, Symbol::end_marker())
        .map_err(|e| GllError::InvalidFormat(e.to_string()))?;
    let mut parser = GllParser::new(predictor);

    while let Some(Ok(line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }

        let tokens = tokenize(trimmed);
        parser.parse(tokens, -1);

        if parser.accepted() {
            println!("accept ({} BSR nodes)", parser.bsr_set().len());
        } else {
            println!("reject");
        }
        io::stdout().flush()?;
    }

    Ok(())
}

fn read_grammar<R: BufRead>(lines: &mut io::Lines<R>) -> Result<Vec<String>> {
    let mut grammar_lines = Vec::new();

    let n_str = lines
        .next()
        .ok_or_else(|| {
            GllError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "expected number of productions",
            ))
        })??;

    let n = n_str
        .trim()
        .parse::<usize>()
        .map_err(|_| GllError::InvalidFormat("invalid production count".to_string()))?;

    grammar_lines.push(n_str);

    for _ in 0..n {
        let line = lines.next().ok_or_else(|| {
            GllError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "expected production line",
            ))
        })??;
        grammar_lines.push(line);
    }

    Ok(grammar_lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_grammar() {
        let lines = vec![
            "2".to_string(),
            "S -> A b".to_string(),
            "A -> a | EPS".to_string(),
        ];
        let grammar = parse_grammar(&lines).unwrap();
        assert_eq!(grammar.start(), &Symbol::nonterminal("S"));
        assert_eq!(grammar.alternatives(&Symbol::nonterminal("A")).count(), 2);
    }

    #[test]
    fn tokenizes_whitespace_separated_input() {
        let tokens = tokenize("a b a");
        assert_eq!(
            tokens,
            vec![
                Symbol::terminal("a"),
                Symbol::terminal("b"),
                Symbol::terminal("a")
            ]
        );
    }
}
