// Copyright (c) 2018 Fabian Schuiki

//! A few well-known grammars.

use crate::grammar::{Grammar, GrammarBuilder, GrammarError, Rule};

/// The names of the bundled grammars, as accepted by [`by_name`].
pub const NAMES: &[&str] = &["parens", "expr", "tribble", "ambiguous"];

/// Look up a bundled grammar by name.
pub fn by_name(name: &str) -> Option<Result<Grammar, GrammarError>> {
    match name {
        "parens" => Some(parens()),
        "expr" => Some(expr()),
        "tribble" => Some(tribble()),
        "ambiguous" => Some(ambiguous()),
        _ => None,
    }
}

/// Non-empty sequences of balanced parentheses.
///
/// ```text
/// GOAL : LIST ;
/// LIST : LIST PAIR | PAIR ;
/// PAIR : '(' PAIR ')' | '(' ')' ;
/// ```
pub fn parens() -> Result<Grammar, GrammarError> {
    let mut g = GrammarBuilder::new();
    let nt_goal = g.add_nonterminal("GOAL");
    let nt_list = g.add_nonterminal("LIST");
    let nt_pair = g.add_nonterminal("PAIR");
    let t_open = g.add_terminal("(");
    let t_close = g.add_terminal(")");

    g.add_rule(Rule::new(nt_goal, vec![nt_list.into()]));
    g.add_rule(Rule::new(nt_list, vec![nt_list.into(), nt_pair.into()]));
    g.add_rule(Rule::new(nt_list, vec![nt_pair.into()]));
    g.add_rule(Rule::new(
        nt_pair,
        vec![t_open.into(), nt_pair.into(), t_close.into()],
    ));
    g.add_rule(Rule::new(nt_pair, vec![t_open.into(), t_close.into()]));
    g.build()
}

/// Arithmetic expressions with the usual precedence.
///
/// ```text
/// E : E '+' T | T ;
/// T : T '*' F | F ;
/// F : '(' E ')' | 'n' ;
/// ```
pub fn expr() -> Result<Grammar, GrammarError> {
    let (mut g, nt_e) = GrammarBuilder::with_start("E");
    let nt_t = g.add_nonterminal("T");
    let nt_f = g.add_nonterminal("F");
    let t_plus = g.add_terminal("+");
    let t_star = g.add_terminal("*");
    let t_lparen = g.add_terminal("(");
    let t_rparen = g.add_terminal(")");
    let t_n = g.add_terminal("n");

    g.add_rule(Rule::new(nt_e, vec![nt_e.into(), t_plus.into(), nt_t.into()]));
    g.add_rule(Rule::new(nt_e, vec![nt_t.into()]));
    g.add_rule(Rule::new(nt_t, vec![nt_t.into(), t_star.into(), nt_f.into()]));
    g.add_rule(Rule::new(nt_t, vec![nt_f.into()]));
    g.add_rule(Rule::new(
        nt_f,
        vec![t_lparen.into(), nt_e.into(), t_rparen.into()],
    ));
    g.add_rule(Rule::new(nt_f, vec![t_n.into()]));
    g.build()
}

/// David Tribble's example 11, which is LR(1) but not LALR(1).
///
/// ```text
/// S : 'a' A 'd' | 'a' B 'e' | 'b' A 'e' | 'b' B 'd' ;
/// A : 'c' ;
/// B : 'c' ;
/// ```
pub fn tribble() -> Result<Grammar, GrammarError> {
    let (mut g, nt_s) = GrammarBuilder::with_start("S");
    let nt_a = g.add_nonterminal("A");
    let nt_b = g.add_nonterminal("B");
    let (ta, tb, tc, td, te) = (
        g.add_terminal("a"),
        g.add_terminal("b"),
        g.add_terminal("c"),
        g.add_terminal("d"),
        g.add_terminal("e"),
    );
    g.add_rule(Rule::new(nt_s, vec![ta.into(), nt_a.into(), td.into()]));
    g.add_rule(Rule::new(nt_s, vec![ta.into(), nt_b.into(), te.into()]));
    g.add_rule(Rule::new(nt_s, vec![tb.into(), nt_a.into(), te.into()]));
    g.add_rule(Rule::new(nt_s, vec![tb.into(), nt_b.into(), td.into()]));
    g.add_rule(Rule::new(nt_a, vec![tc.into()]));
    g.add_rule(Rule::new(nt_b, vec![tc.into()]));
    g.build()
}

/// An ambiguous expression grammar with a shift/reduce conflict.
///
/// ```text
/// E : E '+' E | 'n' ;
/// ```
pub fn ambiguous() -> Result<Grammar, GrammarError> {
    let (mut g, nt_e) = GrammarBuilder::with_start("E");
    let t_plus = g.add_terminal("+");
    let t_n = g.add_terminal("n");
    g.add_rule(Rule::new(nt_e, vec![nt_e.into(), t_plus.into(), nt_e.into()]));
    g.add_rule(Rule::new(nt_e, vec![t_n.into()]));
    g.build()
}
