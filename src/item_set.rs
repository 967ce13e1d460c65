// Copyright (c) 2018 Fabian Schuiki

//! Item sets derived from a grammar.
//!
//! An LR(1) item is a rule with a marker that tracks how much of the rule has
//! been recognized, together with the terminal that must follow once the rule
//! is reduced. Item sets are kept sorted, which makes their equality and hash
//! independent of the order in which items were discovered.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use indexmap::IndexSet;

use crate::canonical;
use crate::first::FirstSets;
use crate::grammar::{Grammar, RuleId, Symbol};
use crate::Pretty;

/// All item sets of a grammar, i.e. its canonical LR(1) collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSets {
    /// The item sets, in discovery order.
    pub(crate) sets: Vec<ItemSet>,
    /// The outgoing transitions of each item set.
    pub(crate) transitions: Vec<BTreeMap<Symbol, ItemSetId>>,
}

impl ItemSets {
    /// Compute the item sets for a grammar.
    pub fn compute(grammar: &Grammar) -> ItemSets {
        let first_sets = FirstSets::compute(grammar);
        ItemSets::compute_with(grammar, &first_sets)
    }

    /// Compute the item sets for a grammar with precomputed first sets.
    pub fn compute_with(grammar: &Grammar, first_sets: &FirstSets) -> ItemSets {
        canonical::construct_item_sets(grammar, first_sets)
    }

    /// Get the item sets in the collection.
    pub fn all(&self) -> &[ItemSet] {
        &self.sets
    }

    /// The number of item sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the collection is empty. Never true for a computed collection.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The item set reached from an item set via a symbol, if any.
    pub fn transition(&self, from: ItemSetId, symbol: Symbol) -> Option<ItemSetId> {
        self.transitions[from.as_usize()].get(&symbol).cloned()
    }

    /// All outgoing transitions of an item set, ordered by symbol.
    pub fn transitions<'a>(
        &'a self,
        from: ItemSetId,
    ) -> impl Iterator<Item = (Symbol, ItemSetId)> + 'a {
        self.transitions[from.as_usize()]
            .iter()
            .map(|(&symbol, &id)| (symbol, id))
    }

    /// Find the id of an item set with the given content.
    pub fn find(&self, item_set: &ItemSet) -> Option<ItemSetId> {
        self.sets
            .iter()
            .position(|is| is == item_set)
            .map(ItemSetId::from_usize)
    }

    /// Get a pretty printer for this item set.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Index<ItemSetId> for ItemSets {
    type Output = ItemSet;

    fn index(&self, index: ItemSetId) -> &ItemSet {
        &self.sets[index.as_usize()]
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a ItemSets> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, is) in self.item.sets.iter().enumerate() {
            if index > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "item set {}:\n{}", index, is.pretty(self.ctx))?;
            for (symbol, target) in &self.item.transitions[index] {
                write!(f, "\n  {} -> {}", symbol.pretty(self.ctx), target)?;
            }
        }
        Ok(())
    }
}

/// An item set.
///
/// The items are sorted by rule, marker, and lookahead, and contain no
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemSet {
    /// The items in the set.
    pub(crate) items: Vec<Item>,
}

impl ItemSet {
    /// Compute the closure of a set of items.
    ///
    /// For every item with a nonterminal after its marker, an item is added
    /// for each rule of that nonterminal and each terminal that may follow the
    /// nonterminal. Items added along the way are expanded as well.
    pub fn closure<I>(grammar: &Grammar, first_sets: &FirstSets, kernel: I) -> ItemSet
    where
        I: IntoIterator<Item = Item>,
    {
        let mut items: IndexSet<Item> = kernel.into_iter().collect();
        let mut index = 0;
        while let Some(&item) = items.get_index(index) {
            index += 1;
            let nonterminal = match item.next_symbol(grammar) {
                Some(Symbol::Nonterminal(id)) => id,
                _ => continue,
            };

            // The lookaheads are whatever can follow the nonterminal within
            // the rule, or the item's own lookahead if the rest vanishes.
            let fs = first_sets.first_from(grammar, item.rule, item.marker + 1);
            let mut lookaheads: Vec<Symbol> = fs.terminals().map(Symbol::Terminal).collect();
            if fs.has_epsilon() {
                lookaheads.push(item.lookahead);
            }

            for &rule in grammar.rules_for_nonterminal(nonterminal) {
                for &lookahead in &lookaheads {
                    items.insert(Item::new(rule, 0, lookahead));
                }
            }
        }
        let mut items: Vec<Item> = items.into_iter().collect();
        items.sort();
        ItemSet { items: items }
    }

    /// Compute the item set reached by moving the marker over a symbol.
    ///
    /// Returns `None` if no item in the set expects the symbol.
    pub fn goto(&self, grammar: &Grammar, first_sets: &FirstSets, symbol: Symbol) -> Option<ItemSet> {
        let kernel: Vec<Item> = self
            .items
            .iter()
            .filter(|item| item.next_symbol(grammar) == Some(symbol))
            .map(Item::advance)
            .collect();
        if kernel.is_empty() {
            None
        } else {
            Some(ItemSet::closure(grammar, first_sets, kernel))
        }
    }

    /// The distinct symbols that appear after a marker, in the order of the
    /// items they first appear in.
    pub fn next_symbols(&self, grammar: &Grammar) -> Vec<Symbol> {
        let symbols: IndexSet<Symbol> = self
            .items
            .iter()
            .filter_map(|item| item.next_symbol(grammar))
            .collect();
        symbols.into_iter().collect()
    }

    /// The kernel items of the set.
    ///
    /// These are the items with a marker past the first symbol, plus the
    /// initial item of the augmented start rule.
    pub fn kernel<'a>(&'a self, grammar: &'a Grammar) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |item| item.marker > 0 || item.rule == grammar.start_rule())
    }

    /// Get the items in the set.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The number of items in the set.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the set contains an item.
    pub fn contains(&self, item: &Item) -> bool {
        self.items.binary_search(item).is_ok()
    }

    /// Get a pretty printer for this item set.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a ItemSet> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, item) in self.item.items.iter().enumerate() {
            if index > 0 {
                write!(f, "\n")?;
            }
            write!(f, "{} {}", index, item.pretty(self.ctx))?;
        }
        if self.item.items.is_empty() {
            write!(f, "<empty>")?;
        }
        Ok(())
    }
}

/// A single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    /// The rule of the item.
    pub(crate) rule: RuleId,
    /// The position of the marker within the rule.
    pub(crate) marker: usize,
    /// The lookahead terminal.
    pub(crate) lookahead: Symbol,
}

impl Item {
    /// Create a new item.
    ///
    /// The lookahead must be a terminal or the end of input.
    pub fn new(rule: RuleId, marker: usize, lookahead: Symbol) -> Item {
        debug_assert!(lookahead.is_terminal());
        Item {
            rule: rule,
            marker: marker,
            lookahead: lookahead,
        }
    }

    /// Get the rule this item represents.
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Get the lookahead terminal of this item.
    pub fn lookahead(&self) -> Symbol {
        self.lookahead
    }

    /// Get the position of the marker within the rule.
    pub fn marker(&self) -> usize {
        self.marker
    }

    /// The symbol right after the marker, or `None` if the item is final.
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        grammar.rule(self.rule).symbols().get(self.marker).cloned()
    }

    /// Whether the marker is at the end of the rule.
    pub fn is_final(&self, grammar: &Grammar) -> bool {
        self.marker >= grammar.rule(self.rule).symbols().len()
    }

    /// Whether this is the final item of the augmented start rule.
    pub fn is_accepting(&self, grammar: &Grammar) -> bool {
        self.rule == grammar.start_rule() && self.is_final(grammar)
    }

    /// The item with the marker moved one symbol to the right.
    pub fn advance(&self) -> Item {
        Item {
            marker: self.marker + 1,
            ..*self
        }
    }

    /// Get a pretty printer for this item.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Item> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rule = self.ctx.rule(self.item.rule);
        write!(f, "[{} ->", rule.name().pretty(self.ctx))?;
        let symbols = rule.symbols();
        for symbol in &symbols[0..self.item.marker] {
            write!(f, " {}", symbol.pretty(self.ctx))?;
        }
        write!(f, " .")?;
        for symbol in &symbols[self.item.marker..] {
            write!(f, " {}", symbol.pretty(self.ctx))?;
        }
        write!(f, ", {}]", self.item.lookahead.pretty(self.ctx))?;
        Ok(())
    }
}

/// A unique item set identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemSetId(usize);

impl ItemSetId {
    /// Create an item set id from a usize.
    pub fn from_usize(id: usize) -> ItemSetId {
        ItemSetId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemSetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarBuilder, Rule};
    use pretty_assertions::assert_eq;

    // S : C C ; C : c C | d ;
    fn dragon() -> Grammar {
        let (mut g, nt_s) = GrammarBuilder::with_start("S");
        let nt_c = g.add_nonterminal("C");
        let t_c = g.add_terminal("c");
        let t_d = g.add_terminal("d");
        g.add_rule(Rule::new(nt_s, vec![nt_c.into(), nt_c.into()]));
        g.add_rule(Rule::new(nt_c, vec![t_c.into(), nt_c.into()]));
        g.add_rule(Rule::new(nt_c, vec![t_d.into()]));
        g.build().unwrap()
    }

    #[test]
    fn closure_of_start() {
        let g = dragon();
        let fs = FirstSets::compute(&g);
        let is = ItemSet::closure(&g, &fs, Some(Item::new(g.start_rule(), 0, Symbol::End)));
        assert_eq!(
            is.pretty(&g).to_string(),
            "0 [$accept -> . S, $end]\n\
             1 [S -> . C C, $end]\n\
             2 [C -> . c C, c]\n\
             3 [C -> . c C, d]\n\
             4 [C -> . d, c]\n\
             5 [C -> . d, d]"
        );
        assert_eq!(is.kernel(&g).count(), 1);
    }

    #[test]
    fn closure_is_order_independent() {
        let g = dragon();
        let fs = FirstSets::compute(&g);
        let a = Item::new(RuleId::from_usize(2), 1, Symbol::End);
        let b = Item::new(RuleId::from_usize(3), 1, Symbol::End);
        let one = ItemSet::closure(&g, &fs, vec![a, b]);
        let two = ItemSet::closure(&g, &fs, vec![b, a, b]);
        assert_eq!(one, two);
    }

    #[test]
    fn goto_advances_and_closes() {
        let g = dragon();
        let fs = FirstSets::compute(&g);
        let t_c = Symbol::Terminal(g.find_terminal("c").unwrap());
        let start = ItemSet::closure(&g, &fs, Some(Item::new(g.start_rule(), 0, Symbol::End)));
        let next = start.goto(&g, &fs, t_c).unwrap();
        assert_eq!(
            next.pretty(&g).to_string(),
            "0 [C -> . c C, c]\n\
             1 [C -> . c C, d]\n\
             2 [C -> c . C, c]\n\
             3 [C -> c . C, d]\n\
             4 [C -> . d, c]\n\
             5 [C -> . d, d]"
        );
        assert_eq!(start.goto(&g, &fs, Symbol::End), None);
        assert_eq!(
            start.next_symbols(&g),
            vec![
                Symbol::Nonterminal(g.start_symbol()),
                Symbol::Nonterminal(g.find_nonterminal("C").unwrap()),
                t_c,
                Symbol::Terminal(g.find_terminal("d").unwrap()),
            ]
        );
    }

    #[test]
    fn item_queries() {
        let g = dragon();
        let item = Item::new(g.start_rule(), 0, Symbol::End);
        assert!(!item.is_final(&g));
        assert!(!item.is_accepting(&g));
        assert_eq!(item.next_symbol(&g), Some(Symbol::Nonterminal(g.start_symbol())));
        let item = item.advance();
        assert!(item.is_final(&g));
        assert!(item.is_accepting(&g));
        assert_eq!(item.next_symbol(&g), None);
        assert_eq!(item.pretty(&g).to_string(), "[$accept -> S ., $end]");
    }
}
