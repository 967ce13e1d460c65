// Copyright (c) 2018 Fabian Schuiki
extern crate lrgen;
extern crate pretty_assertions;

use std::collections::{HashSet, VecDeque};

use lrgen::demo;
use lrgen::driver::Driver;
use lrgen::first::FirstSets;
use lrgen::grammar::{Grammar, GrammarBuilder, Rule, Symbol};
use lrgen::machine::{ConflictPolicy, StateMachine};
use pretty_assertions::assert_eq;

/// Collect all sentences of at most `bound` terminals the grammar derives.
///
/// Expands the leftmost nonterminal of each sentential form, dropping forms
/// that already require more than `bound` terminals.
fn sentences(g: &Grammar, bound: usize) -> HashSet<Vec<Symbol>> {
    let fs = FirstSets::compute(g);
    let min_len = |form: &[Symbol]| {
        form.iter()
            .filter(|s| match **s {
                Symbol::Nonterminal(nt) => !fs.is_nullable(nt),
                _ => true,
            })
            .count()
    };
    let mut seen = HashSet::new();
    let mut todo = VecDeque::new();
    let mut result = HashSet::new();
    let start = vec![Symbol::Nonterminal(g.start_symbol())];
    seen.insert(start.clone());
    todo.push_back(start);
    while let Some(form) = todo.pop_front() {
        let at = match form.iter().position(|s| s.is_nonterminal()) {
            Some(at) => at,
            None => {
                result.insert(form);
                continue;
            }
        };
        let nt = match form[at] {
            Symbol::Nonterminal(nt) => nt,
            _ => unreachable!(),
        };
        for &rule in g.rules_for_nonterminal(nt) {
            let mut next = form[..at].to_vec();
            next.extend(g.rule(rule).symbols().iter().cloned());
            next.extend(form[at + 1..].iter().cloned());
            if min_len(&next) <= bound && seen.insert(next.clone()) {
                todo.push_back(next);
            }
        }
    }
    result
}

/// All strings over the grammar's terminals of at most `bound` symbols.
fn all_strings(g: &Grammar, bound: usize) -> Vec<Vec<Symbol>> {
    let alphabet: Vec<Symbol> = g.terminals().map(Symbol::Terminal).collect();
    let mut result = vec![vec![]];
    let mut layer = vec![vec![]];
    for _ in 0..bound {
        let mut next_layer = Vec::new();
        for prefix in &layer {
            for &t in &alphabet {
                let mut s: Vec<Symbol> = prefix.clone();
                s.push(t);
                next_layer.push(s);
            }
        }
        result.extend(next_layer.iter().cloned());
        layer = next_layer;
    }
    result
}

/// Check that the driver accepts exactly the derivable strings up to `bound`
/// and that each accepted parse derives its input.
fn check_language(g: &Grammar, bound: usize) {
    let sm = StateMachine::compute(g, ConflictPolicy::Reject).unwrap();
    let driver = Driver::new(&sm, g);
    let language = sentences(g, bound);
    assert!(!language.is_empty());
    for input in all_strings(g, bound) {
        let expected = language.contains(&input);
        match driver.parse(input.iter().cloned()) {
            Ok(parse) => {
                let shown: Vec<_> = input.iter().map(|s| s.pretty(g).to_string()).collect();
                assert!(expected, "accepted {:?}", shown);
                assert_eq!(parse.derive(g), Some(input));
            }
            Err(_) => {
                let shown: Vec<_> = input.iter().map(|s| s.pretty(g).to_string()).collect();
                assert!(!expected, "rejected {:?}", shown);
            }
        }
    }
}

fn tokens(g: &Grammar, input: &str) -> Vec<Symbol> {
    input
        .chars()
        .map(|c| Symbol::Terminal(g.find_terminal(&c.to_string()).unwrap()))
        .collect()
}

#[test]
fn parens_strings() {
    let g = demo::parens().unwrap();
    let sm = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap();
    let driver = Driver::new(&sm, &g);
    for input in &["()", "(())", "()()", "((()))()"] {
        assert!(driver.accepts(tokens(&g, input)), "rejected {}", input);
    }
    for input in &["(()", ")(", "", ")", "(()))"] {
        assert!(!driver.accepts(tokens(&g, input)), "accepted {}", input);
    }
}

#[test]
fn parens_language() {
    check_language(&demo::parens().unwrap(), 8);
}

#[test]
fn expr_language() {
    check_language(&demo::expr().unwrap(), 5);
}

#[test]
fn tribble_language() {
    let g = demo::tribble().unwrap();
    assert_eq!(sentences(&g, 3).len(), 4);
    check_language(&g, 4);
}

#[test]
fn dragon_language() {
    // S : C C ; C : c C | d ;
    let (mut g, nt_s) = GrammarBuilder::with_start("S");
    let nt_c = g.add_nonterminal("C");
    let t_c = g.add_terminal("c");
    let t_d = g.add_terminal("d");
    g.add_rule(Rule::new(nt_s, vec![nt_c.into(), nt_c.into()]));
    g.add_rule(Rule::new(nt_c, vec![t_c.into(), nt_c.into()]));
    g.add_rule(Rule::new(nt_c, vec![t_d.into()]));
    check_language(&g.build().unwrap(), 7);
}

#[test]
fn epsilon_language() {
    // S : a S b | epsilon ;
    let (mut g, nt_s) = GrammarBuilder::with_start("S");
    let t_a = g.add_terminal("a");
    let t_b = g.add_terminal("b");
    g.add_rule(Rule::new(nt_s, vec![t_a.into(), nt_s.into(), t_b.into()]));
    g.add_rule(Rule::new(nt_s, vec![]));
    let g = g.build().unwrap();
    assert_eq!(sentences(&g, 8).len(), 5);
    check_language(&g, 8);
}
