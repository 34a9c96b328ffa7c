//! Grammar model: rules and the context-free grammar they form.
//!
//! Callers build a `Grammar` directly from a start symbol and a mapping of
//! nonterminals to their alternative right-hand sides. Parsing grammars out
//! of source text is an external concern handled by `cli`, not this module.

use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A production rule `lhs -> rhs`.
///
/// An empty `rhs` encodes an ε-production. Rules are value-equal and
/// hashable so they can be shared between `GrammarSlot`s and BSR nodes
/// without re-deriving identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Left-hand side: always a nonterminal.
    pub lhs: Symbol,
    /// Right-hand side: a (possibly empty) sequence of symbols.
    pub rhs: Vec<Symbol>,
}

impl Rule {
    /// Creates a new rule. Does not validate `lhs`; callers are expected to
    /// pass a `Symbol::Nonterminal`.
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "{} -> ε", self.lhs)
        } else {
            write!(f, "{} -> ", self.lhs)?;
            for (i, sym) in self.rhs.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", sym)?;
            }
            Ok(())
        }
    }
}

/// A context-free grammar: a start symbol plus a map from each nonterminal
/// to the set of its alternative right-hand sides.
///
/// Well-formedness (`start` appears as a key, alongside reachability and
/// productivity) is checked by `Predictor::new`, not enforced here.
/// Duplicate right-hand sides for the same left-hand side collapse by set
/// semantics.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: Symbol,
    productions: HashMap<Symbol, HashSet<Vec<Symbol>>>,
}

impl Grammar {
    /// Builds a grammar from a start symbol and a production map.
    ///
    /// Does not force `start` to be a key: a well-formed grammar has `start`
    /// as a key, but construction does not silently repair a malformed one.
    /// `shrink` relies on this — a grammar whose start was pruned away as
    /// unproductive or unreachable must come back out *without* a start
    /// key, so `Predictor::new` can detect the degeneracy.
    pub fn new(start: Symbol, productions: HashMap<Symbol, HashSet<Vec<Symbol>>>) -> Self {
        Self { start, productions }
    }

    /// Builds a grammar with only the given start symbol and no
    /// productions for it yet. Mostly useful for tests and for
    /// incrementally building a grammar with `add_rule`, which always
    /// requires `lhs` (including `start`) to already be a key.
    pub fn with_start(start: Symbol) -> Self {
        let mut productions = HashMap::new();
        productions.insert(start.clone(), HashSet::new());
        Self { start, productions }
    }

    /// Adds a single right-hand side alternative for `lhs`.
    pub fn add_rule(&mut self, lhs: Symbol, rhs: Vec<Symbol>) {
        self.productions.entry(lhs).or_default().insert(rhs);
    }

    /// The grammar's start symbol.
    pub fn start(&self) -> &Symbol {
        &self.start
    }

    /// All right-hand sides for `lhs`, or nothing if `lhs` has none.
    pub fn alternatives(&self, lhs: &Symbol) -> impl Iterator<Item = &Vec<Symbol>> {
        self.productions.get(lhs).into_iter().flatten()
    }

    /// All rules in the grammar, reconstructed as `(lhs, rhs)` pairs.
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.productions.iter().flat_map(|(lhs, rhss)| {
            rhss.iter()
                .map(move |rhs| Rule::new(lhs.clone(), rhs.clone()))
        })
    }

    /// All nonterminals that appear as a key (i.e. have at least a rule
    /// slot, possibly with zero alternatives).
    pub fn nonterminal_keys(&self) -> impl Iterator<Item = &Symbol> {
        self.productions.keys()
    }

    /// The raw production map.
    pub fn productions(&self) -> &HashMap<Symbol, HashSet<Vec<Symbol>>> {
        &self.productions
    }

    /// Whether `lhs` has any rules at all (not whether they are productive).
    pub fn has_rules(&self, lhs: &Symbol) -> bool {
        self.productions
            .get(lhs)
            .is_some_and(|rhss| !rhss.is_empty())
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

/// Retains only the nonterminals in `keep` as keys of `productions`, and
/// within each retained nonterminal, only the rhs alternatives whose
/// nonterminal symbols lie entirely within `keep`.
pub fn shrink(grammar: &Grammar, keep: &HashSet<Symbol>) -> Grammar {
    let mut productions = HashMap::new();
    for (lhs, rhss) in grammar.productions() {
        if !keep.contains(lhs) {
            continue;
        }
        let kept_rhss: HashSet<Vec<Symbol>> = rhss
            .iter()
            .filter(|rhs| {
                rhs.iter()
                    .filter(|s| s.is_nonterminal())
                    .all(|s| keep.contains(s))
            })
            .cloned()
            .collect();
        productions.insert(lhs.clone(), kept_rhss);
    }
    Grammar::new(grammar.start().clone(), productions)
}
