//! Grammar preprocessing: productive and reachable nonterminal analysis, and
//! the pipeline that prunes a grammar down to its useful core.

use crate::fixpoint::closure;
use crate::grammar::{shrink, Grammar};
use crate::symbol::Symbol;
use std::collections::HashSet;

/// The least set of nonterminals `N` such that some rhs of `N` is composed
/// entirely of terminals and/or already-productive nonterminals. A
/// nonterminal with no rules at all is never productive.
pub fn productive(grammar: &Grammar) -> HashSet<Symbol> {
    let mut productive = HashSet::new();

    closure(&mut productive, |productive| {
        let mut newly_productive = Vec::new();
        for lhs in grammar.nonterminal_keys() {
            if productive.contains(lhs) {
                continue;
            }
            let has_productive_alt = grammar.alternatives(lhs).any(|rhs| {
                rhs.iter()
                    .all(|s| s.is_terminal() || productive.contains(s))
            });
            if has_productive_alt {
                newly_productive.push(lhs.clone());
            }
        }
        productive.extend(newly_productive);
    });

    productive
}

/// The least set of nonterminals containing `start` and closed under "if
/// `N` is in the set and some rhs of `N` mentions nonterminal `M`, then `M`
/// is in the set".
pub fn reachable(grammar: &Grammar) -> HashSet<Symbol> {
    let mut reachable = HashSet::new();
    reachable.insert(grammar.start().clone());

    closure(&mut reachable, |reachable| {
        let mut newly_reachable = Vec::new();
        for lhs in reachable.iter() {
            for rhs in grammar.alternatives(lhs) {
                for sym in rhs {
                    if sym.is_nonterminal() && !reachable.contains(sym) {
                        newly_reachable.push(sym.clone());
                    }
                }
            }
        }
        reachable.extend(newly_reachable);
    });

    reachable
}

/// Computes `productive`, shrinks to it, then computes `reachable` on the
/// shrunk grammar and shrinks again, returning the doubly-pruned grammar.
///
/// A pipeline that discarded this pruned result and returned the original
/// grammar unchanged would silently defeat preprocessing; the pruned
/// grammar, not the original, is always what callers receive.
pub fn preprocess(grammar: &Grammar) -> Grammar {
    let productive_syms = productive(grammar);
    let productive_grammar = shrink(grammar, &productive_syms);

    let reachable_syms = reachable(&productive_grammar);
    shrink(&productive_grammar, &reachable_syms)
}
