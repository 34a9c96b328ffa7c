//! The GLL worklist-driven exploration engine.
//!
//! This is the heart of the crate: `Parser` owns all mutable parse state —
//! the worklist, the de-duplication guard, the call-return forest, the
//! contingent return set, and the BSR set — and advances it descriptor by
//! descriptor. Nothing here is shared across threads; `continue_parse` is
//! the only suspension point.

use crate::gll::bsr::BsrNode;
use crate::gll::descriptor::{CallRecord, CallReturnAddress, Descriptor};
use crate::gll::slot::GrammarSlot;
use crate::grammar::Rule;
use crate::predictor::Predictor;
use crate::symbol::Symbol;
use log::{debug, trace};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// The GLL engine. Constructed once per predictor; each call to `parse`
/// reinitialises all mutable state.
pub struct Parser {
    predictor: Predictor,
    working_set: VecDeque<Descriptor>,
    total_set: HashSet<Descriptor>,
    call_return_forest: HashMap<CallRecord, HashSet<CallReturnAddress>>,
    contingent_return_set: HashMap<CallRecord, HashSet<usize>>,
    bsr_set: HashSet<BsrNode>,
    input: Vec<Symbol>,
    /// Length of the token sequence the caller supplied, *not* counting the
    /// appended end marker. Used only to phrase acceptance.
    input_len: usize,
}

impl Parser {
    /// Builds an engine stub around a predictor. No parse has run yet;
    /// `work_remaining()` is `0` and `bsr_set()` is empty until `parse` is
    /// called.
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            working_set: VecDeque::new(),
            total_set: HashSet::new(),
            call_return_forest: HashMap::new(),
            contingent_return_set: HashMap::new(),
            bsr_set: HashSet::new(),
            input: Vec::new(),
            input_len: 0,
        }
    }

    /// Resets all mutable state, appends the end marker to `tokens`, seeds
    /// the start nonterminal at position 0, and runs `continue_parse(budget)`.
    /// Returns the remaining worklist size, same as `continue_parse`.
    pub fn parse(&mut self, tokens: Vec<Symbol>, budget: i64) -> usize {
        self.working_set.clear();
        self.total_set.clear();
        self.call_return_forest.clear();
        self.contingent_return_set.clear();
        self.bsr_set.clear();

        self.input_len = tokens.len();
        self.input = tokens;
        self.input.push(self.predictor.end().clone());

        debug!("parse: {} tokens (+ end marker)", self.input_len);

        let start = self.predictor.grammar().start().clone();
        self.nt_add(&start, 0);
        self.continue_parse(budget)
    }

    /// Consumes up to `budget` descriptors (`budget < 0` means unbounded)
    /// and returns the remaining worklist size. `budget == 0` is a legal
    /// no-op.
    pub fn continue_parse(&mut self, budget: i64) -> usize {
        let mut consumed: i64 = 0;
        while budget < 0 || consumed < budget {
            let Some(d) = self.working_set.pop_front() else {
                break;
            };
            self.process_descriptor(d);
            consumed += 1;
        }
        self.work_remaining()
    }

    /// The current worklist size.
    pub fn work_remaining(&self) -> usize {
        self.working_set.len()
    }

    /// The accumulated BSR set.
    pub fn bsr_set(&self) -> &HashSet<BsrNode> {
        &self.bsr_set
    }

    /// Whether the most recent `parse` accepted its input: some `Alt` node
    /// spans `[0, input_len)` with the grammar's start symbol as its lhs.
    pub fn accepted(&self) -> bool {
        let start = self.predictor.grammar().start();
        self.bsr_set.iter().any(|node| match node {
            BsrNode::Alt {
                rule, lext, rext, ..
            } => &rule.lhs == start && *lext == 0 && *rext == self.input_len,
            BsrNode::Packed { .. } => false,
        })
    }

    /// Total de-duplication guard membership count — exposed for the
    /// "descriptor uniqueness" property test.
    pub fn total_descriptor_count(&self) -> usize {
        self.total_set.len()
    }

    /// Iterates every descriptor ever enqueued, regardless of whether it has
    /// already been processed. Exposed for tests that assert the predictive
    /// gate pruned a specific alternative.
    pub fn total_descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.total_set.iter()
    }

    fn input_at(&self, i: usize) -> &Symbol {
        self.input
            .get(i)
            .unwrap_or_else(|| panic!("input lookup at {} out of range (len {})", i, self.input.len()))
    }

    /// "Start exploring nonterminal `n` at input position `i`." For each
    /// rhs whose predictive test passes against the lookahead at `i`,
    /// enqueues a fresh descriptor. The predictive gate is an optional
    /// performance improvement; correctness does not depend on
    /// it, since every enqueued descriptor is re-checked by `testSelect`
    /// once it has advanced past position 0.
    fn nt_add(&mut self, n: &Symbol, i: usize) {
        let lookahead = self.input_at(i).clone();
        let rhss: Vec<Vec<Symbol>> = self
            .predictor
            .grammar()
            .alternatives(n)
            .cloned()
            .collect();
        for rhs in rhss {
            let passes = rhs.is_empty() || self.predictor.test_select(&lookahead, n, &rhs);
            if passes {
                let rule = Rc::new(Rule::new(n.clone(), rhs));
                let slot = GrammarSlot::start_of(rule);
                trace!("ntAdd: {} at {}", n, i);
                self.add_desc(Descriptor::new(slot, i, i));
            }
        }
    }

    /// Enqueues `d` iff it has never been seen before: the de-duplication
    /// step that guarantees termination.
    fn add_desc(&mut self, d: Descriptor) {
        if self.total_set.insert(d.clone()) {
            self.working_set.push_back(d);
        }
    }

    /// `slot` is a continuation that has just stepped over nonterminal
    /// `m = slot.predecessor()`, invoked when the cursor was at `i`.
    fn call(&mut self, slot: GrammarSlot, call_index: usize, i: usize) {
        let m = slot.predecessor().clone();
        let rec = CallRecord::new(m.clone(), i);
        let is_new_call = !self.call_return_forest.contains_key(&rec);
        let addr = CallReturnAddress::new(slot.clone(), call_index);
        let addr_is_new = self
            .call_return_forest
            .entry(rec.clone())
            .or_default()
            .insert(addr);

        if is_new_call {
            self.nt_add(&m, i);
        } else if addr_is_new {
            let returns: Vec<usize> = self
                .contingent_return_set
                .get(&rec)
                .map(|s| s.iter().copied().collect())
                .unwrap_or_default();
            for j in returns {
                self.add_desc(Descriptor::new(slot.clone(), call_index, j));
                self.bsr_add(&slot, call_index, i, j);
            }
        }
    }

    /// "Nonterminal `m` invoked at `call_index` has successfully matched up
    /// to position `j`." Replays every known return address against the new
    /// return position.
    fn rtn(&mut self, m: &Symbol, call_index: usize, j: usize) {
        let rec = CallRecord::new(m.clone(), call_index);
        let is_new = self
            .contingent_return_set
            .entry(rec.clone())
            .or_default()
            .insert(j);

        if is_new {
            let addrs: Vec<CallReturnAddress> = self
                .call_return_forest
                .get(&rec)
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_default();
            for addr in addrs {
                self.add_desc(Descriptor::new(addr.slot.clone(), addr.call_index, j));
                self.bsr_add(&addr.slot, addr.call_index, call_index, j);
            }
        }
    }

    /// Classifies a `(slot, lext, pivot, rext)` triple by slot geometry and
    /// emits the matching BSR node, or nothing for a prefix of length 0 or 1.
    fn bsr_add(&mut self, slot: &GrammarSlot, lext: usize, pivot: usize, rext: usize) {
        if slot.suffix().is_empty() {
            self.bsr_set
                .insert(BsrNode::alt(Rc::clone(slot.rule()), lext, pivot, rext));
        } else if slot.prefix().len() > 1 {
            self.bsr_set
                .insert(BsrNode::packed(slot.prefix().to_vec(), lext, pivot, rext));
        }
    }

    /// The main descriptor-processing step.
    fn process_descriptor(&mut self, d: Descriptor) {
        let Descriptor {
            slot,
            call_index,
            index,
        } = d;

        if slot.rule().rhs.is_empty() {
            // An empty-rhs alternative is a valid, trivial reduction, not
            // something the engine silently skips.
            self.bsr_set
                .insert(BsrNode::alt(Rc::clone(slot.rule()), index, index, index));
            let lhs = slot.rule().lhs.clone();
            self.rtn(&lhs, call_index, index);
            return;
        }

        let n = slot.rule().lhs.clone();
        let suffix_len = slot.suffix().len();
        let mut offset = 0usize;
        let mut stopped_early = false;

        while offset < suffix_len {
            let subject = slot.suffix()[offset].clone();
            let focus = self.input_at(index + offset).clone();

            // The stricter predictive guard: checked against the offset
            // accumulated so far in *this* scan, not just the slot's own
            // starting index.
            if slot.index() + offset != 0 {
                let remaining = &slot.suffix()[offset..];
                if !self.predictor.test_select(&focus, &n, remaining) {
                    stopped_early = true;
                    break;
                }
            }

            if subject.is_nonterminal() {
                let continuation = slot
                    .advance(offset + 1)
                    .expect("advance within suffix bounds");
                self.call(continuation, call_index, index + offset);
                stopped_early = true;
                break;
            }

            if subject != focus {
                // testSelect is an optional gate; without it a
                // terminal mismatch simply abandons the descriptor.
                stopped_early = true;
                break;
            }

            let advanced = slot
                .advance(offset + 1)
                .expect("advance within suffix bounds");
            self.bsr_add(&advanced, call_index, index + offset, index + offset + 1);
            offset += 1;
        }

        if !stopped_early {
            let end_pos = index + offset;
            let focus = self.input_at(end_pos).clone();
            if self.predictor.follow_of(&n).contains(&focus) {
                self.rtn(&n, call_index, end_pos);
            }
        }
    }
}
