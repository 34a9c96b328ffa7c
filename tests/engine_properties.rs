//! Engine-level properties that need a running parser rather than a single
//! grammar analysis: descriptor uniqueness, BSR range soundness,
//! termination, acceptance equivalence, and the budget law.

use gll_parser::gll::BsrNode;
use gll_parser::grammar::Grammar;
use gll_parser::predictor::Predictor;
use gll_parser::symbol::Symbol;
use gll_parser::Parser;

fn nt(name: &str) -> Symbol {
    Symbol::nonterminal(name)
}
fn t(name: &str) -> Symbol {
    Symbol::terminal(name)
}
fn tokens(s: &[&str]) -> Vec<Symbol> {
    s.iter().map(|tok| t(tok)).collect()
}

fn expr_grammar() -> Grammar {
    let mut g = Grammar::with_start(nt("E"));
    g.add_rule(nt("E"), vec![nt("E"), t("+"), nt("E")]);
    g.add_rule(nt("E"), vec![t("1")]);
    g
}

fn build(grammar: Grammar) -> Parser {
    Parser::new(Predictor::new(grammar, Symbol::end_marker()).unwrap())
}

#[test]
fn descriptor_uniqueness_total_set_never_shrinks_after_exhaustion() {
    let mut parser = build(expr_grammar());
    parser.parse(tokens(&["1", "+", "1"]), -1);
    assert_eq!(parser.work_remaining(), 0);

    let total_after_first_run = parser.total_descriptor_count();
    // Continuing after exhaustion must be a no-op: nothing left to process,
    // and nothing new can be discovered from an empty worklist.
    parser.continue_parse(-1);
    assert_eq!(parser.total_descriptor_count(), total_after_first_run);
    assert_eq!(parser.work_remaining(), 0);
}

#[test]
fn bsr_range_soundness() {
    let mut parser = build(expr_grammar());
    let n = 5; // "1+1+1"
    parser.parse(tokens(&["1", "+", "1", "+", "1"]), -1);

    for node in parser.bsr_set() {
        let (lext, pivot, rext) = match node {
            BsrNode::Alt {
                lext, pivot, rext, ..
            } => (*lext, *pivot, *rext),
            BsrNode::Packed {
                lext, pivot, rext, ..
            } => (*lext, *pivot, *rext),
        };
        assert!(lext <= pivot, "lext {} > pivot {}", lext, pivot);
        assert!(pivot <= rext, "pivot {} > rext {}", pivot, rext);
        assert!(rext <= n + 1, "rext {} exceeds input length + 1", rext);
    }
}

#[test]
fn termination_on_left_recursive_nullable_grammar() {
    let mut g = Grammar::with_start(nt("S"));
    g.add_rule(nt("S"), vec![nt("S"), nt("S")]);
    g.add_rule(nt("S"), vec![t("a")]);
    g.add_rule(nt("S"), vec![]);

    let mut parser = build(g);
    parser.parse(tokens(&["a", "a", "a", "a", "a"]), -1);
    assert_eq!(parser.work_remaining(), 0);
}

#[test]
fn acceptance_equivalence_for_expression_grammar() {
    let mut parser = build(expr_grammar());

    parser.parse(tokens(&["1", "+", "1"]), -1);
    assert!(parser.accepted());

    parser.parse(tokens(&["1", "+"]), -1);
    assert!(!parser.accepted());

    parser.parse(tokens(&["1"]), -1);
    assert!(parser.accepted());

    parser.parse(vec![], -1);
    assert!(!parser.accepted());
}

#[test]
fn budget_law_matches_unbounded_parse() {
    let unbounded_bsr = {
        let mut parser = build(expr_grammar());
        parser.parse(tokens(&["1", "+", "1", "+", "1"]), -1);
        parser.bsr_set().clone()
    };

    let budgeted_bsr = {
        let mut parser = build(expr_grammar());
        parser.parse(tokens(&["1", "+", "1", "+", "1"]), 1);
        while parser.work_remaining() > 0 {
            parser.continue_parse(1);
        }
        parser.bsr_set().clone()
    };

    assert_eq!(unbounded_bsr, budgeted_bsr);
}

#[test]
fn budget_zero_is_a_legal_noop() {
    let mut parser = build(expr_grammar());
    let remaining = parser.parse(tokens(&["1"]), 0);
    assert!(remaining > 0, "budget 0 must not process any descriptor");
    assert!(parser.bsr_set().is_empty());
}
