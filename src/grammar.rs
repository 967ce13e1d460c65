// Copyright (c) 2018 Fabian Schuiki

//! Data structures representing a grammar.
//!
//! A grammar is assembled through a [`GrammarBuilder`] and frozen into an
//! immutable [`Grammar`] by [`GrammarBuilder::build`], which checks that the
//! rules form a well-formed augmented grammar. Rule 0 is always the augmented
//! start rule `S' -> S`.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::Pretty;

/// A grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    nonterms: HashMap<String, NonterminalId>,
    terms: HashMap<String, TerminalId>,
    nonterm_names: Vec<String>,
    nonterm_rules: Vec<Vec<RuleId>>,
    term_names: Vec<String>,
}

/// An incrementally assembled grammar.
///
/// Terminals and nonterminals are interned by name. Rules are numbered in the
/// order they are added; the first rule becomes the augmented start rule.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    rules: Vec<Rule>,
    nonterms: HashMap<String, NonterminalId>,
    terms: HashMap<String, TerminalId>,
    nonterm_names: Vec<String>,
    term_names: Vec<String>,
}

/// A single rule within a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    name: NonterminalId,
    symbols: Vec<Symbol>,
}

/// A symbol of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A terminal.
    Terminal(TerminalId),
    /// A nonterminal.
    Nonterminal(NonterminalId),
    /// The empty string. Never part of an input stream or a rule.
    Epsilon,
    /// The end of the input.
    End,
}

/// A unique nonterminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(usize);

/// A unique terminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(usize);

/// A unique rule identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

/// The augmented start rule `S' -> S`.
pub const START: RuleId = RuleId(0);

/// The name given to the implicit start nonterminal of
/// [`GrammarBuilder::with_start`].
pub const ACCEPT_NAME: &str = "$accept";

/// An iterator over the rules of a grammar.
pub type RulesIter<'a> = std::slice::Iter<'a, Rule>;

/// An iterator over the rule IDs of a grammar.
pub type RuleIdsIter<'a> = std::slice::Iter<'a, RuleId>;

/// An error found while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The grammar has no rules at all.
    #[error("grammar has no rules")]
    Empty,
    /// The first rule is not of the form `S' -> S`.
    #[error("the start rule must have exactly one nonterminal on its right-hand side")]
    BadAugmentation,
    /// The nonterminal of the start rule occurs in another rule.
    #[error("the start rule's nonterminal reappears in rule {rule}")]
    StartReused {
        /// The first rule that produces or uses the start rule's nonterminal.
        rule: RuleId,
    },
    /// A nonterminal is used in a rule but never defined by one.
    #[error("nonterminal `{name}` used in rule {rule} has no rules")]
    UndefinedNonterminal {
        /// The name of the nonterminal.
        name: String,
        /// The first rule that uses the nonterminal.
        rule: RuleId,
    },
    /// A rule explicitly contains the epsilon or end-of-input symbol.
    #[error("rule {rule} contains an epsilon or end-of-input symbol")]
    MarkerInRule {
        /// The offending rule.
        rule: RuleId,
    },
    /// A rule refers to a terminal that was not declared in this grammar.
    #[error("rule {rule} refers to undeclared terminal {terminal}")]
    UnknownTerminal {
        /// The offending rule.
        rule: RuleId,
        /// The undeclared terminal.
        terminal: TerminalId,
    },
    /// A rule refers to a nonterminal that was not declared in this grammar.
    #[error("rule {rule} refers to undeclared nonterminal {nonterminal}")]
    UnknownNonterminal {
        /// The offending rule.
        rule: RuleId,
        /// The undeclared nonterminal.
        nonterminal: NonterminalId,
    },
}

impl GrammarBuilder {
    /// Create a new empty grammar builder.
    ///
    /// The first rule added to the builder must be the augmented start rule.
    pub fn new() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Create a grammar builder for the given start symbol.
    ///
    /// This declares the implicit `$accept` nonterminal and adds the augmented
    /// start rule `$accept -> start` as rule 0. Returns the builder and the
    /// start nonterminal.
    pub fn with_start<S: Into<String>>(start: S) -> (GrammarBuilder, NonterminalId) {
        let mut builder = GrammarBuilder::new();

        // The accept nonterminal is not interned, such that a user-defined
        // nonterminal of the same name stays distinct.
        let accept = NonterminalId(builder.nonterm_names.len());
        builder.nonterm_names.push(ACCEPT_NAME.to_owned());

        let start = builder.add_nonterminal(start);
        builder.add_rule(Rule::new(accept, vec![start.into()]));
        (builder, start)
    }

    /// Add a nonterminal.
    pub fn add_nonterminal<S: Into<String>>(&mut self, name: S) -> NonterminalId {
        let name = name.into();
        let next_id = NonterminalId(self.nonterm_names.len());
        if let Some(&id) = self.nonterms.get(&name) {
            id
        } else {
            self.nonterms.insert(name.clone(), next_id);
            self.nonterm_names.push(name);
            next_id
        }
    }

    /// Add a terminal.
    pub fn add_terminal<S: Into<String>>(&mut self, name: S) -> TerminalId {
        let name = name.into();
        let next_id = TerminalId(self.term_names.len());
        if let Some(&id) = self.terms.get(&name) {
            id
        } else {
            self.terms.insert(name.clone(), next_id);
            self.term_names.push(name);
            next_id
        }
    }

    /// Add a rule to the grammar.
    ///
    /// Adding the same rule twice yields two distinct rules.
    pub fn add_rule(&mut self, rule: Rule) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(rule);
        id
    }

    /// Check the rules and freeze the grammar.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let num_nonterms = self.nonterm_names.len();
        let num_terms = self.term_names.len();

        match self.rules.first() {
            None => return Err(GrammarError::Empty),
            Some(rule) => match rule.symbols() {
                [Symbol::Nonterminal(_)] => (),
                _ => return Err(GrammarError::BadAugmentation),
            },
        }

        // Check the symbols referenced by each rule and sort the rules by the
        // nonterminal they produce.
        let mut nonterm_rules = vec![Vec::new(); num_nonterms];
        for (index, rule) in self.rules.iter().enumerate() {
            let id = RuleId(index);
            if rule.name().as_usize() >= num_nonterms {
                return Err(GrammarError::UnknownNonterminal {
                    rule: id,
                    nonterminal: rule.name(),
                });
            }
            for symbol in rule.symbols() {
                match *symbol {
                    Symbol::Terminal(t) if t.as_usize() >= num_terms => {
                        return Err(GrammarError::UnknownTerminal {
                            rule: id,
                            terminal: t,
                        })
                    }
                    Symbol::Nonterminal(nt) if nt.as_usize() >= num_nonterms => {
                        return Err(GrammarError::UnknownNonterminal {
                            rule: id,
                            nonterminal: nt,
                        })
                    }
                    Symbol::Epsilon | Symbol::End => {
                        return Err(GrammarError::MarkerInRule { rule: id })
                    }
                    _ => (),
                }
            }
            nonterm_rules[rule.name().as_usize()].push(id);
        }

        // Every nonterminal that appears on a right-hand side needs a rule.
        for (index, rule) in self.rules.iter().enumerate() {
            for symbol in rule.symbols() {
                if let Symbol::Nonterminal(nt) = *symbol {
                    if nonterm_rules[nt.as_usize()].is_empty() {
                        return Err(GrammarError::UndefinedNonterminal {
                            name: self.nonterm_names[nt.as_usize()].clone(),
                            rule: RuleId(index),
                        });
                    }
                }
            }
        }

        // The start rule's nonterminal is produced by rule 0 alone and used
        // nowhere.
        let accept = self.rules[START.as_usize()].name();
        for (index, rule) in self.rules.iter().enumerate().skip(1) {
            if rule.name() == accept || rule.symbols().contains(&Symbol::Nonterminal(accept)) {
                return Err(GrammarError::StartReused {
                    rule: RuleId(index),
                });
            }
        }

        Ok(Grammar {
            rules: self.rules,
            nonterms: self.nonterms,
            terms: self.terms,
            nonterm_names: self.nonterm_names,
            nonterm_rules: nonterm_rules,
            term_names: self.term_names,
        })
    }
}

impl Grammar {
    /// Get the name of a nonterminal.
    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterm_names[id.as_usize()]
    }

    /// Get the name of a terminal.
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.term_names[id.as_usize()]
    }

    /// Look up a nonterminal by name.
    pub fn find_nonterminal(&self, name: &str) -> Option<NonterminalId> {
        self.nonterms.get(name).cloned()
    }

    /// Look up a terminal by name.
    pub fn find_terminal(&self, name: &str) -> Option<TerminalId> {
        self.terms.get(name).cloned()
    }

    /// The upper bound on nonterminal IDs.
    ///
    /// Basically returns the largest nonterminal ID + 1. Can be used as
    /// capacity for containers that will hold nonterminals.
    pub fn nonterminal_id_bound(&self) -> usize {
        self.nonterm_names.len()
    }

    /// The upper bound on terminal IDs.
    ///
    /// Basically returns the largest terminal ID + 1. Can be used as capacity
    /// for containers that will hold terminals.
    pub fn terminal_id_bound(&self) -> usize {
        self.term_names.len()
    }

    /// All nonterminals of the grammar, in declaration order.
    pub fn nonterminals(&self) -> impl Iterator<Item = NonterminalId> {
        (0..self.nonterminal_id_bound()).map(NonterminalId)
    }

    /// All terminals of the grammar, in declaration order.
    pub fn terminals(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminal_id_bound()).map(TerminalId)
    }

    /// The rules in this grammar.
    pub fn rules(&self) -> RulesIter {
        self.rules.iter()
    }

    /// The number of rules in this grammar.
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    /// The rules for a specific nonterminal in the grammar.
    pub fn rules_for_nonterminal(&self, id: NonterminalId) -> RuleIdsIter {
        self.nonterm_rules[id.as_usize()].iter()
    }

    /// Access a single rule of this grammar.
    ///
    /// Panics if the rule does not belong to this grammar.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.as_usize()]
    }

    /// The augmented start rule `S' -> S`.
    pub fn start_rule(&self) -> RuleId {
        START
    }

    /// The start symbol `S` of the grammar, i.e. the right-hand side of the
    /// augmented start rule.
    pub fn start_symbol(&self) -> NonterminalId {
        match self.rules[START.as_usize()].symbols()[0] {
            Symbol::Nonterminal(id) => id,
            _ => unreachable!("start rule checked during build"),
        }
    }
}

impl Rule {
    /// Create a new rule.
    pub fn new(name: NonterminalId, symbols: Vec<Symbol>) -> Rule {
        Rule {
            name: name,
            symbols: symbols,
        }
    }

    /// The name of this rule.
    pub fn name(&self) -> NonterminalId {
        self.name
    }

    /// The symbols in this production.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Whether this is an epsilon rule.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get a pretty printer for this rule.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Rule> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.item.name().pretty(self.ctx))?;
        for symbol in self.item.symbols() {
            write!(f, " {}", symbol.pretty(self.ctx))?;
        }
        if self.item.is_empty() {
            write!(f, " {}", Symbol::Epsilon.pretty(self.ctx))?;
        }
        Ok(())
    }
}

impl Symbol {
    /// Whether this symbol may key an action, i.e. is a terminal or the end
    /// of input.
    pub fn is_terminal(&self) -> bool {
        match *self {
            Symbol::Terminal(_) | Symbol::End => true,
            _ => false,
        }
    }

    /// Whether this symbol is a nonterminal.
    pub fn is_nonterminal(&self) -> bool {
        match *self {
            Symbol::Nonterminal(_) => true,
            _ => false,
        }
    }

    /// Get a pretty printer for this symbol.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl From<TerminalId> for Symbol {
    fn from(id: TerminalId) -> Symbol {
        Symbol::Terminal(id)
    }
}

impl From<NonterminalId> for Symbol {
    fn from(id: NonterminalId) -> Symbol {
        Symbol::Nonterminal(id)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Symbol> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.item {
            Symbol::Terminal(id) => write!(f, "{}", id.pretty(self.ctx)),
            Symbol::Nonterminal(id) => write!(f, "{}", id.pretty(self.ctx)),
            Symbol::Epsilon => write!(f, "epsilon"),
            Symbol::End => write!(f, "$end"),
        }
    }
}

impl NonterminalId {
    /// Create a nonterminal id from a usize.
    pub fn from_usize(id: usize) -> NonterminalId {
        NonterminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this nonterminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl fmt::Display for NonterminalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, NonterminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.nonterminal_name(self.item))
    }
}

impl TerminalId {
    /// Create a terminal id from a usize.
    pub fn from_usize(id: usize) -> TerminalId {
        TerminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this terminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, TerminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.terminal_name(self.item))
    }
}

impl RuleId {
    /// Create a rule id from a usize.
    pub fn from_usize(id: usize) -> RuleId {
        RuleId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
