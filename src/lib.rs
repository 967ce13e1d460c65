// Copyright (c) 2018 Fabian Schuiki

//! A canonical LR(1) automaton and parse table generator.
//!
//! A [`Grammar`](grammar::Grammar) is assembled with a
//! [`GrammarBuilder`](grammar::GrammarBuilder). Its
//! [`FirstSets`](first::FirstSets) feed the construction of the canonical
//! collection of LR(1) [`ItemSets`](item_set::ItemSets), from which a
//! [`StateMachine`](machine::StateMachine) with the ACTION and GOTO tables is
//! derived. The [`Driver`](driver::Driver) runs terminal sequences against
//! these tables.
//!
//! ```
//! use lrgen::grammar::{GrammarBuilder, Rule, Symbol};
//! use lrgen::machine::{ConflictPolicy, StateMachine};
//! use lrgen::driver::Driver;
//!
//! let (mut g, list) = GrammarBuilder::with_start("list");
//! let x = g.add_terminal("x");
//! g.add_rule(Rule::new(list, vec![list.into(), x.into()]));
//! g.add_rule(Rule::new(list, vec![x.into()]));
//! let g = g.build().unwrap();
//!
//! let sm = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap();
//! let driver = Driver::new(&sm, &g);
//! assert!(driver.accepts(vec![Symbol::Terminal(x); 3]));
//! assert!(!driver.accepts(vec![]));
//! ```

#![deny(missing_docs)]

extern crate bit_set;
extern crate indexmap;
#[macro_use]
extern crate log;
extern crate thiserror;

pub mod grammar;
pub mod first;
pub mod item_set;
pub mod machine;
pub mod driver;
pub mod demo;
mod canonical;

/// A pretty printer.
pub struct Pretty<C, T> {
    ctx: C,
    item: T,
}

impl<C, T> Pretty<C, T> {
    pub(crate) fn new(ctx: C, item: T) -> Pretty<C, T> {
        Pretty { ctx, item }
    }
}
