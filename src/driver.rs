// Copyright (c) 2018 Fabian Schuiki

//! A table-driven shift-reduce parser.
//!
//! The driver runs a sequence of terminals against the ACTION and GOTO tables
//! of a [`StateMachine`]. It records the rules it reduces, which amounts to a
//! rightmost derivation of the input in reverse.

use std::iter::once;

use thiserror::Error;

use crate::grammar::{Grammar, RuleId, Symbol};
use crate::machine::{Action, StateId, StateMachine};

/// A parser driven by a state machine.
pub struct Driver<'a> {
    machine: &'a StateMachine,
    grammar: &'a Grammar,
}

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    reductions: Vec<RuleId>,
}

/// An error encountered while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// There is no action or goto for a symbol in a state.
    #[error("syntax error in state {state} at position {position}")]
    Syntax {
        /// The state on top of the stack.
        state: StateId,
        /// The symbol for which no entry exists.
        symbol: Symbol,
        /// The number of terminals consumed so far.
        position: usize,
    },
    /// The input contains something other than a terminal.
    #[error("symbol at position {position} is not a terminal")]
    NotTerminal {
        /// The offending symbol.
        symbol: Symbol,
        /// The position of the symbol in the input.
        position: usize,
    },
    /// The tables accepted, but the stack does not hold exactly the start
    /// symbol.
    #[error("accepted with {depth} symbols on the stack")]
    Unbalanced {
        /// The number of symbols on the stack.
        depth: usize,
    },
}

/// An entry on the parser stack.
///
/// The root entry carries no symbol.
#[derive(Debug)]
struct StackEntry {
    symbol: Option<Symbol>,
    state: StateId,
}

impl<'a> Driver<'a> {
    /// Create a new driver.
    pub fn new(machine: &'a StateMachine, grammar: &'a Grammar) -> Driver<'a> {
        Driver {
            machine: machine,
            grammar: grammar,
        }
    }

    /// Parse a sequence of terminals.
    ///
    /// The end of input is implied after the last terminal. An explicit
    /// [`Symbol::End`] ends the input early.
    pub fn parse<I>(&self, input: I) -> Result<Parse, ParseError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let root = self.machine.root();
        let mut input = input.into_iter().chain(once(Symbol::End));
        let mut lookahead = input.next().unwrap_or(Symbol::End);
        let mut position = 0;
        let mut stack = vec![StackEntry {
            symbol: None,
            state: root,
        }];
        let mut reductions = Vec::new();

        loop {
            if !lookahead.is_terminal() {
                return Err(ParseError::NotTerminal {
                    symbol: lookahead,
                    position: position,
                });
            }
            let state = stack.last().map(|e| e.state).unwrap_or(root);
            let action = match self.machine.action(state, lookahead) {
                Some(action) => action,
                None => {
                    return Err(ParseError::Syntax {
                        state: state,
                        symbol: lookahead,
                        position: position,
                    })
                }
            };
            match action {
                Action::Shift(next) => {
                    trace!("shift {} in state {}", lookahead.pretty(self.grammar), state);
                    stack.push(StackEntry {
                        symbol: Some(lookahead),
                        state: next,
                    });
                    lookahead = input.next().unwrap_or(Symbol::End);
                    position += 1;
                }
                Action::Reduce(rule_id) => {
                    let rule = self.grammar.rule(rule_id);
                    trace!("reduce {} in state {}", rule.pretty(self.grammar), state);
                    // Tables built from a grammar never pop the root entry.
                    let length = rule.symbols().len();
                    if length >= stack.len() {
                        return Err(ParseError::Unbalanced {
                            depth: stack.len() - 1,
                        });
                    }
                    let at = stack.len() - length;
                    stack.truncate(at);
                    let top = stack.last().map(|e| e.state).unwrap_or(root);
                    let next = match self.machine.goto(top, rule.name()) {
                        Some(next) => next,
                        None => {
                            return Err(ParseError::Syntax {
                                state: top,
                                symbol: rule.name().into(),
                                position: position,
                            })
                        }
                    };
                    stack.push(StackEntry {
                        symbol: Some(rule.name().into()),
                        state: next,
                    });
                    reductions.push(rule_id);
                }
                Action::Accept => {
                    // The stack must hold exactly the start symbol on top of
                    // the root entry.
                    let start = Symbol::Nonterminal(self.grammar.start_symbol());
                    if stack.len() != 2 || stack[1].symbol != Some(start) {
                        return Err(ParseError::Unbalanced {
                            depth: stack.len() - 1,
                        });
                    }
                    trace!("accept");
                    reductions.push(self.grammar.start_rule());
                    return Ok(Parse {
                        reductions: reductions,
                    });
                }
            }
        }
    }

    /// Whether a sequence of terminals is accepted.
    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = Symbol>,
    {
        self.parse(input).is_ok()
    }
}

impl Parse {
    /// The rules reduced during the parse, in order.
    ///
    /// The last entry is always the augmented start rule.
    pub fn reductions(&self) -> &[RuleId] {
        &self.reductions
    }

    /// Replay the reductions as a rightmost derivation.
    ///
    /// Starting from the left-hand side of the last reduction, each rule in
    /// reverse order replaces the rightmost nonterminal of the sentential
    /// form. Returns the derived terminals, or `None` if the reductions do not
    /// form a valid derivation.
    pub fn derive(&self, grammar: &Grammar) -> Option<Vec<Symbol>> {
        let mut rules = self.reductions.iter().rev();
        let first = grammar.rule(*rules.next()?);
        let mut form: Vec<Symbol> = first.symbols().to_vec();
        for &rule_id in rules {
            let rule = grammar.rule(rule_id);
            let at = form.iter().rposition(|s| s.is_nonterminal())?;
            if form[at] != Symbol::Nonterminal(rule.name()) {
                return None;
            }
            form.splice(at..at + 1, rule.symbols().iter().cloned());
        }
        if form.iter().any(|s| s.is_nonterminal()) {
            None
        } else {
            Some(form)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarBuilder, Rule};
    use crate::machine::ConflictPolicy;

    #[test]
    fn epsilon_rules() {
        // S : a S b | epsilon ;
        let (mut g, nt_s) = GrammarBuilder::with_start("S");
        let t_a = g.add_terminal("a");
        let t_b = g.add_terminal("b");
        let r_wrap = g.add_rule(Rule::new(nt_s, vec![t_a.into(), nt_s.into(), t_b.into()]));
        let r_empty = g.add_rule(Rule::new(nt_s, vec![]));
        let g = g.build().unwrap();
        let sm = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap();
        let driver = Driver::new(&sm, &g);
        let (a, b) = (Symbol::Terminal(t_a), Symbol::Terminal(t_b));

        let parse = driver.parse(vec![]).unwrap();
        assert_eq!(parse.reductions(), &[r_empty, g.start_rule()]);
        assert_eq!(parse.derive(&g), Some(vec![]));

        let parse = driver.parse(vec![a, a, b, b]).unwrap();
        assert_eq!(
            parse.reductions(),
            &[r_empty, r_wrap, r_wrap, g.start_rule()]
        );
        assert_eq!(parse.derive(&g), Some(vec![a, a, b, b]));

        assert!(!driver.accepts(vec![a, a, b]));
        assert!(!driver.accepts(vec![b, a]));
    }

    #[test]
    fn explicit_end_and_errors() {
        let (mut g, nt_s) = GrammarBuilder::with_start("S");
        let t_x = g.add_terminal("x");
        g.add_rule(Rule::new(nt_s, vec![t_x.into()]));
        let g = g.build().unwrap();
        let sm = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap();
        let driver = Driver::new(&sm, &g);
        let x = Symbol::Terminal(t_x);

        assert!(driver.accepts(vec![x, Symbol::End, x]));
        assert_eq!(
            driver.parse(vec![x, x]),
            Err(ParseError::Syntax {
                state: StateId::from_usize(2),
                symbol: x,
                position: 1,
            })
        );
        assert_eq!(
            driver.parse(vec![Symbol::Nonterminal(nt_s)]),
            Err(ParseError::NotTerminal {
                symbol: Symbol::Nonterminal(nt_s),
                position: 0,
            })
        );
        assert_eq!(
            driver.parse(vec![]),
            Err(ParseError::Syntax {
                state: sm.root(),
                symbol: Symbol::End,
                position: 0,
            })
        );
    }

    #[test]
    fn malformed_tables() {
        // S : x ;
        let (mut g, nt_s) = GrammarBuilder::with_start("S");
        let t_x = g.add_terminal("x");
        let r_x = g.add_rule(Rule::new(nt_s, vec![t_x.into()]));
        let g = g.build().unwrap();
        let x = Symbol::Terminal(t_x);

        // Reducing `S : x` right away would pop the root entry.
        let sm = StateMachine::from_tables(vec![(
            vec![(Symbol::End, Action::Reduce(r_x))],
            vec![],
        )]);
        assert_eq!(
            Driver::new(&sm, &g).parse(vec![]),
            Err(ParseError::Unbalanced { depth: 0 })
        );

        // Accepting with `x` rather than `S` on the stack.
        let sm = StateMachine::from_tables(vec![
            (vec![(x, Action::Shift(StateId::from_usize(1)))], vec![]),
            (vec![(Symbol::End, Action::Accept)], vec![]),
        ]);
        assert_eq!(
            Driver::new(&sm, &g).parse(vec![x]),
            Err(ParseError::Unbalanced { depth: 1 })
        );

        // Accepting with two symbols on the stack.
        let sm = StateMachine::from_tables(vec![
            (
                vec![(x, Action::Shift(StateId::from_usize(1)))],
                vec![(nt_s, StateId::from_usize(2))],
            ),
            (vec![(x, Action::Reduce(r_x))], vec![]),
            (vec![(x, Action::Shift(StateId::from_usize(3)))], vec![]),
            (vec![(Symbol::End, Action::Accept)], vec![]),
        ]);
        assert_eq!(
            Driver::new(&sm, &g).parse(vec![x, x]),
            Err(ParseError::Unbalanced { depth: 2 })
        );
    }
}
