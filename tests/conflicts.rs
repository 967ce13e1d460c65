// Copyright (c) 2018 Fabian Schuiki
extern crate lrgen;

use lrgen::demo;
use lrgen::driver::Driver;
use lrgen::grammar::{Grammar, GrammarBuilder, Rule, RuleId, Symbol};
use lrgen::machine::{Action, ConflictPolicy, StateMachine, TableError};

// X : A | B ; A : 'a' ; B : 'a' ;
fn reduce_reduce() -> (Grammar, RuleId, RuleId) {
    let (mut g, nt_x) = GrammarBuilder::with_start("X");
    let nt_a = g.add_nonterminal("A");
    let nt_b = g.add_nonterminal("B");
    let t_a = g.add_terminal("a");
    g.add_rule(Rule::new(nt_x, vec![nt_a.into()]));
    g.add_rule(Rule::new(nt_x, vec![nt_b.into()]));
    let r_a = g.add_rule(Rule::new(nt_a, vec![t_a.into()]));
    let r_b = g.add_rule(Rule::new(nt_b, vec![t_a.into()]));
    (g.build().unwrap(), r_a, r_b)
}

#[test]
fn reject_shift_reduce() {
    let g = demo::ambiguous().unwrap();
    match StateMachine::compute(&g, ConflictPolicy::Reject) {
        Err(TableError::NotLr1 { conflicts }) => {
            assert_eq!(conflicts.len(), 1);
            assert!(conflicts[0].is_shift_reduce());
        }
        Ok(_) => panic!("ambiguous grammar accepted"),
    }
}

#[test]
fn reject_reduce_reduce() {
    let (g, r_a, r_b) = reduce_reduce();
    let err = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap_err();
    let TableError::NotLr1 { conflicts } = err.clone();
    assert_eq!(conflicts.len(), 1);
    assert!(!conflicts[0].is_shift_reduce());
    assert_eq!(conflicts[0].symbol, Symbol::End);
    assert_eq!(conflicts[0].kept, Action::Reduce(r_a));
    assert_eq!(conflicts[0].dropped, Action::Reduce(r_b));
    assert_eq!(err.to_string(), "grammar is not LR(1), found 1 conflicts");
}

#[test]
fn first_wins_is_stable() {
    let g = demo::ambiguous().unwrap();
    let reference = StateMachine::compute(&g, ConflictPolicy::FirstWins).unwrap();
    for _ in 0..5 {
        let sm = StateMachine::compute(&g, ConflictPolicy::FirstWins).unwrap();
        assert_eq!(sm, reference);
        assert_eq!(sm.conflicts(), reference.conflicts());
    }
}

#[test]
fn first_wins_parses_right_associative() {
    // With shift preferred, `n + n + n` groups as `n + (n + n)`.
    let g = demo::ambiguous().unwrap();
    let sm = StateMachine::compute(&g, ConflictPolicy::FirstWins).unwrap();
    let n = Symbol::Terminal(g.find_terminal("n").unwrap());
    let plus = Symbol::Terminal(g.find_terminal("+").unwrap());
    let parse = Driver::new(&sm, &g).parse(vec![n, plus, n, plus, n]).unwrap();
    let r_add = RuleId::from_usize(1);
    let r_n = RuleId::from_usize(2);
    assert_eq!(
        parse.reductions(),
        &[r_n, r_n, r_n, r_add, r_add, g.start_rule()]
    );
    assert_eq!(parse.derive(&g), Some(vec![n, plus, n, plus, n]));
}

#[test]
fn first_wins_reduce_reduce_prefers_earlier_rule() {
    let (g, r_a, _) = reduce_reduce();
    let sm = StateMachine::compute(&g, ConflictPolicy::FirstWins).unwrap();
    let a = Symbol::Terminal(g.find_terminal("a").unwrap());
    let parse = Driver::new(&sm, &g).parse(vec![a]).unwrap();
    assert_eq!(parse.reductions()[0], r_a);
}

#[test]
fn lr1_grammars_have_no_conflicts() {
    for name in &["parens", "expr", "tribble"] {
        let g = demo::by_name(name).unwrap().unwrap();
        let sm = StateMachine::compute(&g, ConflictPolicy::Reject).unwrap();
        assert!(sm.conflicts().is_empty(), "{} has conflicts", name);
    }
}
