//! A reusable monotone closure operator, shared by the preprocessor's
//! productive/reachable analyses and the predictor's nullable/FIRST/FOLLOW
//! analyses.
//!
//! All three analyses share the same "loop until the set stops growing"
//! shape; factoring it into one place means each analysis only has to
//! supply its step function.

use std::collections::HashSet;
use std::hash::Hash;

/// Iterates `step` over `set`, mutating it in place, until a call leaves its
/// size unchanged. `step` must be monotone (only ever add elements) for this
/// to terminate and for the result to be the least fixed point.
///
/// This is the *increasing* flavour of fixed-point iteration; it is the only
/// one the engine needs. A decreasing flavour (start large, shrink to a
/// fixed point) is not used anywhere in this crate and so is not provided.
pub fn closure<T, F>(set: &mut HashSet<T>, mut step: F)
where
    T: Eq + Hash,
    F: FnMut(&mut HashSet<T>),
{
    loop {
        let before = set.len();
        step(set);
        if set.len() == before {
            break;
        }
    }
}

/// Same as [`closure`], but for a map of per-key sets (e.g. FIRST/FOLLOW,
/// keyed by nonterminal), where growth is measured as the sum of all value
/// set sizes. `step` receives the whole map so it can read other keys while
/// updating one.
pub fn closure_map<K, V, F>(map: &mut std::collections::HashMap<K, HashSet<V>>, mut step: F)
where
    K: Eq + Hash + Clone,
    V: Eq + Hash,
    F: FnMut(&mut std::collections::HashMap<K, HashSet<V>>),
{
    loop {
        let before: usize = map.values().map(|s| s.len()).sum();
        step(map);
        let after: usize = map.values().map(|s| s.len()).sum();
        if after == before {
            break;
        }
    }
}
