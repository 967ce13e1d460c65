// Copyright (c) 2018 Fabian Schuiki

//! First set computation.
//!
//! This module implements computation of the first sets for a grammar. The
//! first set of a nonterminal states all terminals that can appear as the
//! first symbol of something it derives, plus whether it can derive the empty
//! string. Since rules may be left recursive and contain nonterminals that
//! vanish, the sets are grown to a fixed point rather than computed by
//! recursion.

use std::iter::repeat;
use std::mem::swap;

use bit_set::BitSet;

use crate::grammar::{Grammar, NonterminalId, RuleId, Symbol, TerminalId};

/// All first sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirstSets(Vec<FirstSet>);

/// The first set of a nonterminal or a sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirstSet {
    /// The first symbols.
    symbols: BitSet,
    /// Whether the empty string can be derived.
    has_epsilon: bool,
}

impl FirstSets {
    /// Compute the first sets of a grammar.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        compute(grammar)
    }

    /// The first set of a nonterminal.
    pub fn first(&self, id: NonterminalId) -> &FirstSet {
        &self.0[id.as_usize()]
    }

    /// The first set of a single symbol.
    ///
    /// Terminals form their own first set. Epsilon yields the set containing
    /// only epsilon. A first set only holds grammar terminals, so the end
    /// marker yields the empty set.
    pub fn first_of(&self, symbol: Symbol) -> FirstSet {
        match symbol {
            Symbol::Nonterminal(id) => self.first(id).clone(),
            Symbol::Terminal(id) => {
                let mut fs = FirstSet::new();
                fs.symbols.insert(id.as_usize());
                fs
            }
            Symbol::Epsilon => FirstSet::epsilon(),
            Symbol::End => FirstSet::new(),
        }
    }

    /// The first set of the symbols of a rule, starting at an offset.
    ///
    /// An empty suffix yields the set containing only epsilon. Otherwise the
    /// first sets of the symbols are accumulated from left to right until a
    /// symbol is encountered that cannot vanish. Epsilon is only part of the
    /// result if every symbol in the suffix can vanish.
    pub fn first_from(&self, grammar: &Grammar, rule: RuleId, from: usize) -> FirstSet {
        let symbols = grammar.rule(rule).symbols();
        self.first_of_sequence(&symbols[from.min(symbols.len())..])
    }

    /// The first set of a sequence of symbols.
    ///
    /// The end marker stops accumulation like a terminal but adds nothing to
    /// the set.
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> FirstSet {
        let mut fs = FirstSet::new();
        if symbols.is_empty() {
            fs.has_epsilon = true;
            return fs;
        }
        for (index, &symbol) in symbols.iter().enumerate() {
            let last = index + 1 == symbols.len();
            let tight = match symbol {
                Symbol::Terminal(id) => {
                    fs.symbols.insert(id.as_usize());
                    true
                }
                Symbol::Nonterminal(id) => {
                    let nfs = self.first(id);
                    fs.symbols.union_with(&nfs.symbols);
                    !nfs.has_epsilon
                }
                Symbol::Epsilon => false,
                Symbol::End => true,
            };
            if tight {
                break;
            }
            if last {
                fs.has_epsilon = true;
            }
        }
        fs
    }

    /// Whether a nonterminal can derive the empty string.
    pub fn is_nullable(&self, id: NonterminalId) -> bool {
        self.first(id).has_epsilon
    }
}

impl FirstSet {
    /// Create an empty first set.
    pub fn new() -> FirstSet {
        FirstSet {
            symbols: BitSet::new(),
            has_epsilon: false,
        }
    }

    /// Create a first set that only contains epsilon.
    pub fn epsilon() -> FirstSet {
        FirstSet {
            symbols: BitSet::new(),
            has_epsilon: true,
        }
    }

    /// Whether the set contains epsilon.
    pub fn has_epsilon(&self) -> bool {
        self.has_epsilon
    }

    /// Whether the set contains a terminal.
    pub fn contains(&self, id: TerminalId) -> bool {
        self.symbols.contains(id.as_usize())
    }

    /// The terminals in the set, in ascending order.
    pub fn terminals<'a>(&'a self) -> impl Iterator<Item = TerminalId> + 'a {
        self.symbols.iter().map(TerminalId::from_usize)
    }

    /// The number of terminals in the set, not counting epsilon.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the set contains neither terminals nor epsilon.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && !self.has_epsilon
    }

    /// Add all terminals and the epsilon flag of another set to this one.
    pub fn union_with(&mut self, other: &FirstSet) {
        self.symbols.union_with(&other.symbols);
        self.has_epsilon |= other.has_epsilon;
    }
}

impl Default for FirstSet {
    fn default() -> FirstSet {
        FirstSet::new()
    }
}

/// The meat of this module. Computes the first set for each nonterminal in a
/// grammar.
fn compute(grammar: &Grammar) -> FirstSets {
    let num_term = grammar.terminal_id_bound();
    let num_nonterm = grammar.nonterminal_id_bound();

    // Create the initial empty first sets. These will be populated in the main
    // loop.
    let mut fs = FirstSets(
        repeat(FirstSet {
            symbols: BitSet::with_capacity(num_term),
            has_epsilon: false,
        }).take(num_nonterm)
            .collect(),
    );

    // Keep track of which nonterminals have to be revisited when the first
    // set of another nonterminal grows.
    let mut deps: Vec<BitSet> = repeat(BitSet::with_capacity(num_nonterm))
        .take(num_nonterm)
        .collect();
    for rule in grammar.rules() {
        for symbol in rule.symbols() {
            if let Symbol::Nonterminal(id) = *symbol {
                deps[id.as_usize()].insert(rule.name().as_usize());
            }
        }
    }

    // Determine the sets of nonterminals to be updated.
    let mut update = BitSet::with_capacity(num_nonterm);
    let mut next_update = BitSet::with_capacity(num_nonterm);
    for rule in grammar.rules() {
        update.insert(rule.name().as_usize());
    }

    // This is the main update loop which processes nonterminals in sets.
    let mut rounds = 0;
    while !update.is_empty() {
        rounds += 1;
        for current in update.iter() {
            let id = NonterminalId::from_usize(current);
            let mut new_fs = fs.0[current].clone();
            for &rule in grammar.rules_for_nonterminal(id) {
                new_fs.union_with(&fs.first_from(grammar, rule, 0));
            }

            // If the first set has changed, trigger an update of everything
            // that depends on us.
            if new_fs != fs.0[current] {
                trace!(
                    "first({}) grew to {} terminals",
                    id.pretty(grammar),
                    new_fs.len()
                );
                fs.0[current] = new_fs;
                next_update.union_with(&deps[current]);
            }
        }

        // If we've cleared the update set, swap in the next update set.
        swap(&mut update, &mut next_update);
        next_update.clear();
    }
    debug!(
        "computed first sets of {} nonterminals in {} rounds",
        num_nonterm, rounds
    );

    fs
}
