//! Nullable/FIRST/FOLLOW computation and the `testSelect` predictive gate.
//!
//! `Predictor` owns a preprocessed grammar alongside its derived sets, and
//! validates grammar degeneracy once at construction time rather than
//! leaving it to be discovered mid-parse.

use crate::error::{GllError, Result};
use crate::fixpoint::{closure, closure_map};
use crate::grammar::Grammar;
use crate::preprocess::preprocess;
use crate::symbol::Symbol;
use log::debug;
use std::collections::{HashMap, HashSet};

/// FIRST/FOLLOW sets, keyed by symbol.
pub type SymbolSets = HashMap<Symbol, HashSet<Symbol>>;

/// Wraps a preprocessed grammar together with its nullable set and
/// FIRST/FOLLOW tables, and exposes the `testSelect` predictive gate the
/// GLL engine uses to prune descriptors before they are ever created.
#[derive(Debug, Clone)]
pub struct Predictor {
    grammar: Grammar,
    end: Symbol,
    nullable: HashSet<Symbol>,
    first: SymbolSets,
    follow: SymbolSets,
}

impl Predictor {
    /// Preprocesses `grammar`, validates that its start symbol survived
    /// preprocessing, and computes nullable/FIRST/FOLLOW over the pruned
    /// grammar.
    ///
    /// `end` is the dedicated end-of-input terminal (default `"$"`); it is
    /// added once to `FOLLOW(start)` here, before any input is seen.
    pub fn new(grammar: Grammar, end: Symbol) -> Result<Self> {
        let start = grammar.start().clone();
        let pruned = preprocess(&grammar);

        if !pruned.productions().contains_key(&start) {
            // preprocess() only removes a key entirely when it had rules
            // that got shrunk to nothing *and* the key was never
            // reachable/productive; distinguish the two causes for a
            // better error message.
            return Err(if grammar.has_rules(&start) {
                GllError::UnproductiveStart(start.to_string())
            } else {
                GllError::UndefinedStart(start.to_string())
            });
        }
        if pruned.alternatives(&start).next().is_none() && grammar.has_rules(&start) {
            return Err(GllError::UnproductiveStart(start.to_string()));
        }

        let nullable = compute_nullable(&pruned);
        let first = compute_first(&pruned, &nullable);
        let follow = compute_follow(&pruned, &first, &end);

        debug!(
            "predictor built: {} nonterminals, start {}",
            pruned.productions().len(),
            start
        );

        Ok(Self {
            grammar: pruned,
            end,
            nullable,
            first,
            follow,
        })
    }

    /// The preprocessed grammar the predictor was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The dedicated end-of-input terminal.
    pub fn end(&self) -> &Symbol {
        &self.end
    }

    /// Whether `sym` (a nonterminal) is nullable.
    pub fn is_nullable(&self, sym: &Symbol) -> bool {
        self.nullable.contains(sym)
    }

    /// FIRST(sym) for a single symbol (terminal, nonterminal, or epsilon).
    pub fn first_of_symbol(&self, sym: &Symbol) -> HashSet<Symbol> {
        match sym {
            Symbol::Terminal(_) => HashSet::from([sym.clone()]),
            Symbol::Epsilon => HashSet::from([Symbol::Epsilon]),
            Symbol::Nonterminal(_) => self.first.get(sym).cloned().unwrap_or_default(),
        }
    }

    /// FOLLOW(nt) for a nonterminal.
    pub fn follow_of(&self, nt: &Symbol) -> HashSet<Symbol> {
        self.follow.get(nt).cloned().unwrap_or_default()
    }

    /// FIRST of a sequence of symbols: walk left to right,
    /// accumulating each symbol's FIRST minus ε until a symbol whose FIRST
    /// excludes ε is met; if the whole sequence is nullable, ε is included.
    pub fn first_of_sequence(&self, word: &[Symbol]) -> HashSet<Symbol> {
        let mut result = HashSet::new();
        let mut all_nullable_so_far = true;

        for sym in word {
            let first_sym = self.first_of_symbol(sym);
            for s in &first_sym {
                if !s.is_epsilon() {
                    result.insert(s.clone());
                }
            }
            if !first_sym.contains(&Symbol::Epsilon) {
                all_nullable_so_far = false;
                break;
            }
        }

        if all_nullable_so_far {
            result.insert(Symbol::Epsilon);
        }
        result
    }

    /// `testSelect(t, N, word)`: true iff `t` could plausibly begin a
    /// derivation of `word` followed by whatever follows `N`.
    ///
    /// This reads `self.follow`, the predictor's own field — capturing a
    /// stray free variable here instead would silently break FOLLOW-based
    /// pruning.
    pub fn test_select(&self, t: &Symbol, n: &Symbol, word: &[Symbol]) -> bool {
        let first_word = self.first_of_sequence(word);
        if first_word.contains(t) {
            return true;
        }
        first_word.contains(&Symbol::Epsilon) && self.follow_of(n).contains(t)
    }
}

/// Nullable nonterminals: the least set of `N` with some all-nullable rhs
/// (the empty rhs satisfies this vacuously).
fn compute_nullable(grammar: &Grammar) -> HashSet<Symbol> {
    let mut nullable = HashSet::new();

    closure(&mut nullable, |nullable| {
        let mut newly_nullable = Vec::new();
        for lhs in grammar.nonterminal_keys() {
            if nullable.contains(lhs) {
                continue;
            }
            let has_nullable_alt = grammar
                .alternatives(lhs)
                .any(|rhs| rhs.iter().all(|s| nullable.contains(s)));
            if has_nullable_alt {
                newly_nullable.push(lhs.clone());
            }
        }
        nullable.extend(newly_nullable);
    });

    nullable
}

/// FIRST sets for every nonterminal, by fixed-point over all alternatives.
fn compute_first(grammar: &Grammar, nullable: &HashSet<Symbol>) -> SymbolSets {
    let mut first: SymbolSets = grammar
        .nonterminal_keys()
        .map(|nt| (nt.clone(), HashSet::new()))
        .collect();

    for nt in grammar.nonterminal_keys() {
        if nullable.contains(nt) {
            first.get_mut(nt).unwrap().insert(Symbol::Epsilon);
        }
    }

    closure_map(&mut first, |first| {
        let nts: Vec<Symbol> = first.keys().cloned().collect();
        for lhs in nts {
            let mut accumulated = first[&lhs].clone();
            for rhs in grammar.alternatives(&lhs) {
                accumulated.extend(first_of_rhs(first, rhs));
            }
            first.insert(lhs, accumulated);
        }
    });

    first
}

/// FIRST of an rhs using the in-progress `first` table (terminals' FIRST is
/// always the singleton `{terminal}` and need not be tabulated).
fn first_of_rhs(first: &SymbolSets, rhs: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut all_nullable_so_far = true;

    for sym in rhs {
        let first_sym = match sym {
            Symbol::Terminal(_) => HashSet::from([sym.clone()]),
            Symbol::Epsilon => HashSet::from([Symbol::Epsilon]),
            Symbol::Nonterminal(_) => first.get(sym).cloned().unwrap_or_default(),
        };
        for s in &first_sym {
            if !s.is_epsilon() {
                result.insert(s.clone());
            }
        }
        if !first_sym.contains(&Symbol::Epsilon) {
            all_nullable_so_far = false;
            break;
        }
    }

    if all_nullable_so_far {
        result.insert(Symbol::Epsilon);
    }
    result
}

/// FOLLOW sets for every nonterminal:
///   (a) `end` ∈ FOLLOW(start);
///   (b) for every rhs `α N β`: FIRST(β) \ {ε} ⊆ FOLLOW(N);
///   (c) if ε ∈ FIRST(β) (including β empty), FOLLOW(lhs) ⊆ FOLLOW(N).
fn compute_follow(grammar: &Grammar, first: &SymbolSets, end: &Symbol) -> SymbolSets {
    let mut follow: SymbolSets = grammar
        .nonterminal_keys()
        .map(|nt| (nt.clone(), HashSet::new()))
        .collect();

    follow
        .entry(grammar.start().clone())
        .or_default()
        .insert(end.clone());

    closure_map(&mut follow, |follow| {
        for lhs in grammar.nonterminal_keys() {
            for rhs in grammar.alternatives(lhs) {
                for (i, sym) in rhs.iter().enumerate() {
                    if !sym.is_nonterminal() {
                        continue;
                    }
                    let beta = &rhs[i + 1..];
                    let first_beta = first_of_rhs(first, beta);

                    let additions: Vec<Symbol> = first_beta
                        .iter()
                        .filter(|s| !s.is_epsilon())
                        .cloned()
                        .collect();
                    follow.get_mut(sym).unwrap().extend(additions);

                    if beta.is_empty() || first_beta.contains(&Symbol::Epsilon) {
                        let follow_lhs = follow.get(lhs).cloned().unwrap_or_default();
                        follow.get_mut(sym).unwrap().extend(follow_lhs);
                    }
                }
            }
        }
    });

    follow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(name: &str) -> Symbol {
        Symbol::nonterminal(name)
    }
    fn t(name: &str) -> Symbol {
        Symbol::terminal(name)
    }

    fn end() -> Symbol {
        Symbol::end_marker()
    }

    #[test]
    fn nullable_consistency_matches_first_epsilon() {
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![nt("A"), nt("B")]);
        g.add_rule(nt("A"), vec![t("a")]);
        g.add_rule(nt("A"), vec![]);
        g.add_rule(nt("B"), vec![t("b")]);

        let p = Predictor::new(g, end()).unwrap();
        assert!(p.is_nullable(&nt("A")));
        assert!(p.first_of_symbol(&nt("A")).contains(&Symbol::Epsilon));
        assert!(!p.is_nullable(&nt("B")));
        assert!(!p.first_of_symbol(&nt("B")).contains(&Symbol::Epsilon));
    }

    #[test]
    fn follow_of_start_contains_end_marker() {
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![t("a")]);
        let p = Predictor::new(g, end()).unwrap();
        assert!(p.follow_of(&nt("S")).contains(&end()));
    }

    #[test]
    fn follow_propagates_through_nullable_tail() {
        // S := A B ; A := "a" ; B := "b" | ε  =>  FOLLOW(A) must contain
        // FIRST(B) and, since B is nullable, FOLLOW(S) too.
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![nt("A"), nt("B")]);
        g.add_rule(nt("A"), vec![t("a")]);
        g.add_rule(nt("B"), vec![t("b")]);
        g.add_rule(nt("B"), vec![]);

        let p = Predictor::new(g, end()).unwrap();
        let follow_a = p.follow_of(&nt("A"));
        assert!(follow_a.contains(&t("b")));
        assert!(follow_a.contains(&end()));
    }

    #[test]
    fn test_select_accepts_first_or_nullable_plus_follow() {
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![nt("A")]);
        g.add_rule(nt("A"), vec![t("a")]);
        g.add_rule(nt("A"), vec![]);
        let p = Predictor::new(g, end()).unwrap();

        assert!(p.test_select(&t("a"), &nt("A"), &[t("a")]));
        // A is nullable, so anything in FOLLOW(A) (here, end) selects too.
        assert!(p.test_select(&end(), &nt("A"), &[]));
        assert!(!p.test_select(&t("z"), &nt("A"), &[t("a")]));
    }

    #[test]
    fn unproductive_start_is_a_distinct_error() {
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![nt("S")]); // never bottoms out in terminals
        let err = Predictor::new(g, end()).unwrap_err();
        assert!(matches!(err, GllError::UnproductiveStart(_)));
    }

    #[test]
    fn first_follow_monotonicity_under_added_rule() {
        let mut g = Grammar::with_start(nt("S"));
        g.add_rule(nt("S"), vec![t("a")]);
        let before = Predictor::new(g.clone(), end()).unwrap();

        g.add_rule(nt("S"), vec![t("b")]);
        let after = Predictor::new(g, end()).unwrap();

        assert!(before
            .first_of_symbol(&nt("S"))
            .is_subset(&after.first_of_symbol(&nt("S"))));
    }
}
