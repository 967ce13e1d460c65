// Copyright (c) 2018 Fabian Schuiki

//! Construction of the canonical LR(1) collection.
//!
//! Item sets are discovered breadth-first from the closure of the augmented
//! start item. Every successor is looked up by content, such that two paths
//! leading to the same items end up in the same set.

use std::collections::BTreeMap;

use indexmap::IndexSet;

use crate::first::FirstSets;
use crate::grammar::{Grammar, Symbol};
use crate::item_set::{Item, ItemSet, ItemSetId, ItemSets};

/// Construct the item sets for a grammar.
pub(crate) fn construct_item_sets(grammar: &Grammar, first_sets: &FirstSets) -> ItemSets {
    // Create the initial item set.
    let initial = ItemSet::closure(
        grammar,
        first_sets,
        Some(Item::new(grammar.start_rule(), 0, Symbol::End)),
    );
    trace!("initial item set:\n{}", initial.pretty(grammar));

    let mut sets: IndexSet<ItemSet> = IndexSet::new();
    let mut transitions: Vec<BTreeMap<Symbol, ItemSetId>> = Vec::new();
    sets.insert(initial);

    // The main loop. Sets are visited in the order they were discovered, and
    // new sets are appended to the end of the list.
    let mut todo = 0;
    loop {
        let successors: Vec<(Symbol, ItemSet)> = match sets.get_index(todo) {
            Some(is) => is.next_symbols(grammar)
                .into_iter()
                .filter_map(|symbol| {
                    is.goto(grammar, first_sets, symbol)
                        .map(|successor| (symbol, successor))
                })
                .collect(),
            None => break,
        };

        let mut edges = BTreeMap::new();
        for (symbol, successor) in successors {
            let (index, added) = sets.insert_full(successor);
            let target = ItemSetId::from_usize(index);
            if added {
                trace!(
                    "item set {} via {} yields new item set {}",
                    todo,
                    symbol.pretty(grammar),
                    target
                );
            } else {
                trace!(
                    "item set {} via {} yields existing item set {}",
                    todo,
                    symbol.pretty(grammar),
                    target
                );
            }
            edges.insert(symbol, target);
        }
        transitions.push(edges);
        todo += 1;
    }
    debug!(
        "constructed {} item sets for {} rules",
        sets.len(),
        grammar.num_rules()
    );

    ItemSets {
        sets: sets.into_iter().collect(),
        transitions: transitions,
    }
}
