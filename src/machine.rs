// Copyright (c) 2018 Fabian Schuiki

//! Representation of a parsing state machine, i.e. the ACTION and GOTO tables.

use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;
use std::ops::Index;

use thiserror::Error;

use crate::first::FirstSets;
use crate::grammar::{Grammar, NonterminalId, RuleId, Symbol};
use crate::item_set::{ItemSetId, ItemSets};
use crate::Pretty;

/// A state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine {
    states: Vec<State>,
    conflicts: Vec<Conflict>,
}

/// A parser state.
///
/// This is basically a set of mappings from terminals to actions, and from
/// nonterminals to successor states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    item_set: ItemSetId,
    actions: BTreeMap<Symbol, Action>,
    gotos: BTreeMap<NonterminalId, StateId>,
}

/// An action to be taken upon encountering a symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Shift the symbol and go to the given state.
    Shift(StateId),
    /// Reduce with the given rule.
    Reduce(RuleId),
    /// Accept the input.
    Accept,
}

/// How to treat two different actions for the same state and terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConflictPolicy {
    /// Keep the action that was written first and record the conflict.
    ///
    /// Items are visited in ascending order of rule, marker, and lookahead.
    /// A shift therefore wins over a reduce of the same rule, and among
    /// reductions the rule that was added to the grammar first wins.
    FirstWins,
    /// Fail table construction.
    Reject,
}

impl Default for ConflictPolicy {
    fn default() -> ConflictPolicy {
        ConflictPolicy::FirstWins
    }
}

/// Two different actions for the same state and terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Conflict {
    /// The state in which the conflict occurs.
    pub state: StateId,
    /// The terminal that triggers both actions.
    pub symbol: Symbol,
    /// The action that was written first.
    pub kept: Action,
    /// The action that was written second.
    pub dropped: Action,
}

impl Conflict {
    /// Whether this is a shift/reduce conflict.
    pub fn is_shift_reduce(&self) -> bool {
        match (self.kept, self.dropped) {
            (Action::Shift(_), Action::Reduce(_)) | (Action::Reduce(_), Action::Shift(_)) => true,
            _ => false,
        }
    }

    /// Get a pretty printer for this conflict.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Conflict> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = if self.item.is_shift_reduce() {
            "shift/reduce"
        } else {
            "reduce/reduce"
        };
        write!(
            f,
            "{} conflict in state {} on {}: {} vs {}",
            kind,
            self.item.state,
            self.item.symbol.pretty(self.ctx),
            self.item.kept.pretty(self.ctx),
            self.item.dropped.pretty(self.ctx)
        )
    }
}

/// An error that prevents table construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The grammar is not LR(1).
    #[error("grammar is not LR(1), found {} conflicts", .conflicts.len())]
    NotLr1 {
        /// All conflicts found in the tables.
        conflicts: Vec<Conflict>,
    },
}

impl StateMachine {
    /// Compute the state machine of a grammar.
    ///
    /// Runs first set computation, item set construction, and table
    /// construction in sequence.
    pub fn compute(grammar: &Grammar, policy: ConflictPolicy) -> Result<StateMachine, TableError> {
        let first_sets = FirstSets::compute(grammar);
        let item_sets = ItemSets::compute_with(grammar, &first_sets);
        StateMachine::try_from(&item_sets, grammar, policy)
    }

    /// Create a state machine from a list of item sets.
    ///
    /// Each item set becomes the state with the same index.
    pub fn try_from(
        item_sets: &ItemSets,
        grammar: &Grammar,
        policy: ConflictPolicy,
    ) -> Result<StateMachine, TableError> {
        let mut states = Vec::with_capacity(item_sets.len());
        let mut conflicts = Vec::new();

        for (index, is) in item_sets.all().iter().enumerate() {
            let id = StateId::from_usize(index);
            let is_id = ItemSetId::from_usize(index);
            let mut actions = BTreeMap::new();
            for item in is.items() {
                let (symbol, action) = if item.is_accepting(grammar) {
                    (Symbol::End, Action::Accept)
                } else if item.is_final(grammar) {
                    (item.lookahead(), Action::Reduce(item.rule()))
                } else {
                    match item.next_symbol(grammar) {
                        Some(symbol @ Symbol::Terminal(_)) => {
                            match item_sets.transition(is_id, symbol) {
                                Some(target) => (symbol, Action::Shift(target.into())),
                                None => continue,
                            }
                        }
                        _ => continue,
                    }
                };
                match actions.entry(symbol) {
                    Entry::Vacant(entry) => {
                        entry.insert(action);
                    }
                    Entry::Occupied(entry) => if *entry.get() != action {
                        conflicts.push(Conflict {
                            state: id,
                            symbol: symbol,
                            kept: *entry.get(),
                            dropped: action,
                        });
                    },
                }
            }

            let gotos: BTreeMap<NonterminalId, StateId> = item_sets
                .transitions(is_id)
                .filter_map(|(symbol, target)| match symbol {
                    Symbol::Nonterminal(nt) => Some((nt, StateId::from(target))),
                    _ => None,
                })
                .collect();

            states.push(State {
                id: id,
                item_set: is_id,
                actions: actions,
                gotos: gotos,
            });
        }

        if !conflicts.is_empty() {
            if policy == ConflictPolicy::Reject {
                return Err(TableError::NotLr1 {
                    conflicts: conflicts,
                });
            }
            for conflict in &conflicts {
                warn!("resolved {}", conflict.pretty(grammar));
            }
        }
        debug!(
            "constructed tables with {} states and {} conflicts",
            states.len(),
            conflicts.len()
        );

        Ok(StateMachine {
            states: states,
            conflicts: conflicts,
        })
    }

    /// All states in the state machine.
    pub fn states(&self) -> States {
        States(self.states.iter())
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the state machine has no states. Never true for a computed
    /// state machine.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The initial state.
    pub fn root(&self) -> StateId {
        StateId::from_usize(0)
    }

    /// Look up the action for a state and terminal.
    pub fn action(&self, state: StateId, symbol: Symbol) -> Option<Action> {
        self.states
            .get(state.as_usize())
            .and_then(|s| s.action(symbol))
    }

    /// Look up the successor state for a state and nonterminal.
    pub fn goto(&self, state: StateId, nonterminal: NonterminalId) -> Option<StateId> {
        self.states
            .get(state.as_usize())
            .and_then(|s| s.goto(nonterminal))
    }

    /// The conflicts resolved during construction.
    ///
    /// Always empty for state machines built with
    /// [`ConflictPolicy::Reject`].
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Get a pretty printer for this state machine.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

#[cfg(test)]
impl StateMachine {
    /// Assemble a state machine from hand-written tables, one entry per state.
    pub(crate) fn from_tables(
        tables: Vec<(Vec<(Symbol, Action)>, Vec<(NonterminalId, StateId)>)>,
    ) -> StateMachine {
        let states = tables
            .into_iter()
            .enumerate()
            .map(|(index, (actions, gotos))| State {
                id: StateId::from_usize(index),
                item_set: ItemSetId::from_usize(index),
                actions: actions.into_iter().collect(),
                gotos: gotos.into_iter().collect(),
            })
            .collect();
        StateMachine {
            states: states,
            conflicts: Vec::new(),
        }
    }
}

impl Index<StateId> for StateMachine {
    type Output = State;

    fn index(&self, index: StateId) -> &State {
        &self.states[index.as_usize()]
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a StateMachine> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, state) in self.item.states.iter().enumerate() {
            if index > 0 {
                write!(f, "\n")?;
            }
            write!(f, "state {}:", state.id)?;
            for (symbol, action) in state.actions() {
                write!(
                    f,
                    "\n  {} {}",
                    symbol.pretty(self.ctx),
                    action.pretty(self.ctx)
                )?;
            }
            for (nonterminal, target) in state.gotos() {
                write!(
                    f,
                    "\n  {} goto {}",
                    nonterminal.pretty(self.ctx),
                    target
                )?;
            }
        }
        Ok(())
    }
}

impl State {
    /// Get the unique identifier of this state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Get the item set this state was created from.
    pub fn item_set(&self) -> ItemSetId {
        self.item_set
    }

    /// The action for a terminal, if any.
    pub fn action(&self, symbol: Symbol) -> Option<Action> {
        self.actions.get(&symbol).cloned()
    }

    /// The successor state for a nonterminal, if any.
    pub fn goto(&self, nonterminal: NonterminalId) -> Option<StateId> {
        self.gotos.get(&nonterminal).cloned()
    }

    /// An iterator over the terminals and associated actions.
    pub fn actions(&self) -> Actions {
        Actions(self.actions.iter())
    }

    /// An iterator over the nonterminals and associated successor states.
    pub fn gotos(&self) -> Gotos {
        Gotos(self.gotos.iter())
    }
}

impl Action {
    /// Get a pretty printer for this action.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Action> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.item {
            Action::Shift(id) => write!(f, "shift {}", id),
            Action::Reduce(id) => write!(
                f,
                "reduce {} ({})",
                id,
                self.ctx.rule(id).pretty(self.ctx)
            ),
            Action::Accept => write!(f, "accept"),
        }
    }
}

/// An iterator over the states of a state machine.
pub struct States<'a>(std::slice::Iter<'a, State>);

impl<'a> Iterator for States<'a> {
    type Item = &'a State;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// An iterator over the actions of a state.
pub struct Actions<'a>(btree_map::Iter<'a, Symbol, Action>);

impl<'a> Iterator for Actions<'a> {
    type Item = (Symbol, Action);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&s, &a)| (s, a))
    }
}

/// An iterator over the gotos of a state.
pub struct Gotos<'a>(btree_map::Iter<'a, NonterminalId, StateId>);

impl<'a> Iterator for Gotos<'a> {
    type Item = (NonterminalId, StateId);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&n, &s)| (n, s))
    }
}

/// A unique state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
    /// Create a state id from a usize.
    pub fn from_usize(id: usize) -> StateId {
        StateId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl From<ItemSetId> for StateId {
    fn from(id: ItemSetId) -> StateId {
        StateId(id.as_usize())
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
