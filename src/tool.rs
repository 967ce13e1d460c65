// Copyright (c) 2018 Fabian Schuiki
#[macro_use]
extern crate clap;
extern crate lrgen;
#[macro_use]
extern crate log;
extern crate stderrlog;

use std::error::Error;
use std::process;

use clap::{App, Arg, ArgMatches};
use lrgen::demo;
use lrgen::driver::Driver;
use lrgen::grammar::{Grammar, Symbol};
use lrgen::item_set::ItemSets;
use lrgen::machine::{ConflictPolicy, StateMachine};

fn main() {
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::with_name("GRAMMAR")
                .help("The bundled grammar to build tables for")
                .required(true)
                .possible_values(demo::NAMES),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence all output"),
        )
        .arg(
            Arg::with_name("conflicts")
                .long("conflicts")
                .takes_value(true)
                .possible_values(&["first-wins", "reject"])
                .default_value("first-wins")
                .help("How to treat conflicting table entries"),
        )
        .arg(
            Arg::with_name("items")
                .long("items")
                .help("Print the canonical collection of item sets"),
        )
        .arg(
            Arg::with_name("table")
                .long("table")
                .help("Print the ACTION and GOTO tables"),
        )
        .arg(
            Arg::with_name("parse")
                .long("parse")
                .takes_value(true)
                .value_name("TOKENS")
                .help("Parse a whitespace-separated sequence of terminal names"),
        )
        .get_matches();

    if let Err(err) = stderrlog::new()
        .module(module_path!())
        .quiet(matches.is_present("quiet"))
        .verbosity(matches.occurrences_of("verbose") as usize)
        .init()
    {
        eprintln!("unable to initialize logging: {}", err);
    }

    if let Err(err) = run(&matches) {
        error!("{}", err);
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let name = matches.value_of("GRAMMAR").unwrap_or("parens");
    let grammar = match demo::by_name(name) {
        Some(grammar) => grammar?,
        None => return Err(format!("unknown grammar `{}`", name).into()),
    };
    let policy = match matches.value_of("conflicts") {
        Some("reject") => ConflictPolicy::Reject,
        _ => ConflictPolicy::FirstWins,
    };

    let item_sets = ItemSets::compute(&grammar);
    info!("{} item sets", item_sets.len());
    if matches.is_present("items") {
        println!("{}", item_sets.pretty(&grammar));
    }

    let sm = StateMachine::try_from(&item_sets, &grammar, policy)?;
    for conflict in sm.conflicts() {
        println!("{}", conflict.pretty(&grammar));
    }
    if matches.is_present("table") {
        println!("{}", sm.pretty(&grammar));
    }

    if let Some(tokens) = matches.value_of("parse") {
        let input = tokenize(&grammar, tokens)?;
        let parse = Driver::new(&sm, &grammar).parse(input)?;
        for &rule in parse.reductions() {
            println!("{}", grammar.rule(rule).pretty(&grammar));
        }
        println!("accepted");
    }

    Ok(())
}

/// Map whitespace-separated terminal names to symbols.
fn tokenize(grammar: &Grammar, tokens: &str) -> Result<Vec<Symbol>, Box<dyn Error>> {
    tokens
        .split_whitespace()
        .map(|name| match grammar.find_terminal(name) {
            Some(id) => Ok(Symbol::Terminal(id)),
            None => Err(format!("unknown terminal `{}`", name).into()),
        })
        .collect()
}
