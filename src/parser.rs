//! This module provides the parser for Turing Machine programs, utilizing the `pest` crate.
//! It defines the grammar for `.tur` files and functions to parse the input into a `Program` struct.

use crate::{
    analyzer::analyze,
    types::{
        Direction, Program, Symbol, Transition, TransitionTable, TuringMachineError,
        DEFAULT_BLANK_SYMBOL, INPUT_BLANK_SYMBOL, MAX_PROGRAM_SIZE,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{BTreeSet, HashSet};

/// Derives a `PestParser` for the Turing Machine grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TuringMachineParser;

/// Parses the given input string into a `Program` struct.
///
/// This is the main entry point for parsing Turing Machine program definitions.
/// It trims the input, parses it using the `TuringMachineParser`, and then processes
/// the resulting parse tree into a structured `Program`. The parsed program is
/// automatically validated before being returned.
///
/// # Arguments
///
/// * `input` - A string slice containing the Turing Machine program definition.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if the program fails validation.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::ValidationError(format!(
            "Program is too large: {} bytes (limit is {} bytes)",
            input.len(),
            MAX_PROGRAM_SIZE
        )));
    }

    let root = TuringMachineParser::parse(Rule::program, input.trim())
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty program".to_string()))?;

    let program = parse_program(root)?;

    // Analyze the parsed program
    analyze(&program)?;

    Ok(program)
}

/// Parses the top-level structure of a Turing Machine program from a `Pair<Rule::program>`.
///
/// Sections may appear in any order, so symbol-bearing sections are only interpreted once
/// the blank symbol is known.
fn parse_program(pair: Pair<Rule>) -> Result<Program, TuringMachineError> {
    let mut name: Option<String> = None;
    let mut blank: Option<Symbol> = None;
    let mut initial_state: Option<String> = None;
    let mut final_states: Option<Vec<String>> = None;
    let mut input_symbols: Option<Pair<Rule>> = None;
    let mut tape: Option<Pair<Rule>> = None;
    let mut rules: Option<Pair<Rule>> = None;
    let mut seen = HashSet::new();

    // Parse top-level rules
    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(inner_str(p).trim().to_string()),
            Rule::blank => blank = inner_str(p).trim_matches('\'').chars().next(),
            Rule::initial => initial_state = Some(inner_str(p).to_string()),
            Rule::finals => final_states = Some(parse_states(p)),
            Rule::inputs => input_symbols = Some(p),
            Rule::tape => tape = Some(p),
            Rule::rules => rules = Some(p),
            _ => {} // Skip other rules
        }
    }

    // Handle mandatory checks
    let name = check_required_rule(name, vec!["name"])?;
    let rules = check_required_rule(rules, vec!["rules"])?;
    let blank = blank.unwrap_or(DEFAULT_BLANK_SYMBOL);

    let ParsedRules {
        table,
        mut states,
        idle,
    } = parse_rules(rules, blank)?;

    let initial_state = check_required_rule(
        initial_state.or_else(|| states.first().cloned()),
        vec!["initial"],
    )?;
    let final_states = final_states.unwrap_or(idle);

    let input_symbols = match input_symbols {
        Some(pair) => parse_symbols(pair, blank),
        None => default_input_symbols(&table, blank),
    };
    let tape = tape.map(|pair| parse_tape(pair, blank)).unwrap_or_default();

    push_unique(&mut states, initial_state.clone());
    for state in &final_states {
        push_unique(&mut states, state.clone());
    }

    let alphabet = collect_alphabet(&table, blank, &input_symbols, &tape);

    Ok(Program {
        name,
        states,
        alphabet,
        blank,
        input_symbols,
        initial_state,
        final_states: final_states.into_iter().collect(),
        rules: table,
        tape,
    })
}

/// The transition table together with the states it mentions.
struct ParsedRules {
    table: TransitionTable,
    /// States in order of first appearance, headers and targets alike.
    states: Vec<String>,
    /// States declared with no actions.
    idle: Vec<String>,
}

/// Parses the transition rules section from a `Pair<Rule::rules>`.
///
/// Each state may only be declared once, and each `(state, symbol)` pair may only have
/// one action.
fn parse_rules(pair: Pair<Rule>, blank: Symbol) -> Result<ParsedRules, TuringMachineError> {
    let mut table = TransitionTable::new();
    let mut states = Vec::new();
    let mut idle = Vec::new();

    // Rule: rules > [transition > state, [action]]
    for transition_pair in pair.into_inner() {
        let span = transition_pair.as_span();
        let mut pairs = transition_pair.into_inner();
        let state = next_str(&mut pairs)?.to_string();

        // Prevent duplicated transition rule
        if table.has_state(&state) {
            return Err(parse_error(
                &format!("Duplicate transition rule: {state}"),
                span,
            ));
        }

        table.declare(&state);
        push_unique(&mut states, state.clone());

        let mut actions = 0;
        for action_pair in pairs {
            let span = action_pair.as_span();
            let action = parse_action(action_pair, blank)?;

            push_unique(&mut states, action.next.clone());

            let transition = Transition::new(action.next, action.write, action.direction);
            if table.insert(&state, action.read, transition).is_some() {
                return Err(parse_error(
                    &format!(
                        "Duplicate transition for state {state} and symbol {:?}",
                        action.read
                    ),
                    span,
                ));
            }
            actions += 1;
        }

        if actions == 0 {
            idle.push(state);
        }
    }

    Ok(ParsedRules {
        table,
        states,
        idle,
    })
}

/// Parses a single action from a `Pair<Rule::action>`.
///
/// It extracts the read symbol, write symbol (defaults to read if omitted), direction, and next state.
fn parse_action(pair: Pair<Rule>, blank: Symbol) -> Result<ParsedAction, TuringMachineError> {
    let mut pairs = pair.into_inner();
    let read = parse_symbol(next_str(&mut pairs)?, blank);

    // If `write` is omitted, we'll make `write` equal to `read`
    let write = match pairs.peek().map(|p| p.as_rule()) {
        Some(Rule::symbol) => parse_symbol(next_str(&mut pairs)?, blank),
        _ => read,
    };

    let direction = parse_direction(next_pair(&mut pairs)?)?;
    let next = next_str(&mut pairs)?.to_string();

    Ok(ParsedAction {
        read,
        write,
        direction,
        next,
    })
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports '<' or 'L' for Left, '>' or 'R' for Right, and '-' or 'S' for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, TuringMachineError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" | "L" => Ok(Direction::Left),
        ">" | "R" => Ok(Direction::Right),
        "-" | "S" => Ok(Direction::Stay),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            span,
        )),
    }
}

/// Parses the state list of a `final:` section.
fn parse_states(pair: Pair<Rule>) -> Vec<String> {
    // Rule: finals > state_list > [state]
    pair.into_inner()
        .flat_map(|list| list.into_inner())
        .filter(|p| p.as_rule() == Rule::state_id)
        .map(|p| p.as_str().to_string())
        .collect()
}

/// Parses the symbols of an `input:` or `tape:` symbol list.
fn parse_symbols(pair: Pair<Rule>, blank: Symbol) -> Vec<Symbol> {
    // Rule: (input | tape) > symbol_list > [symbol]
    pair.into_inner()
        .flat_map(|list| list.into_inner())
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str(), blank))
        .collect()
}

/// Parses a `tape:` section, given either as a quoted string or as a symbol list.
///
/// Inside a quoted tape every `_` stands for the blank; use the list form to put a literal
/// `'_'` on the tape.
fn parse_tape(pair: Pair<Rule>, blank: Symbol) -> String {
    match pair.clone().into_inner().next() {
        Some(p) if p.as_rule() == Rule::quoted_tape => p
            .as_str()
            .trim_matches('"')
            .chars()
            .map(|s| if s == INPUT_BLANK_SYMBOL { blank } else { s })
            .collect(),
        _ => parse_symbols(pair, blank).into_iter().collect(),
    }
}

/// Parses a single character symbol.
///
/// A bare `_` is the blank symbol, while a quoted `'_'` is a literal underscore.
fn parse_symbol(input: &str, blank: Symbol) -> Symbol {
    if let Some(quoted) = input.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return quoted.chars().next().unwrap_or(blank);
    }

    match input.chars().next() {
        Some(INPUT_BLANK_SYMBOL) | None => blank,
        Some(symbol) => symbol,
    }
}

/// Every symbol read by some rule, except the blank.
fn default_input_symbols(table: &TransitionTable, blank: Symbol) -> Vec<Symbol> {
    table
        .iter()
        .map(|(_, read, _)| read)
        .filter(|&read| read != blank)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The blank, the input symbols, the tape and every symbol read or written by a rule.
fn collect_alphabet(
    table: &TransitionTable,
    blank: Symbol,
    input_symbols: &[Symbol],
    tape: &str,
) -> Vec<Symbol> {
    let mut alphabet = BTreeSet::from([blank]);
    alphabet.extend(input_symbols);
    alphabet.extend(tape.chars());
    for (_, read, transition) in table.iter() {
        alphabet.insert(read);
        alphabet.insert(transition.write);
    }

    alphabet.into_iter().collect()
}

fn push_unique(states: &mut Vec<String>, state: String) {
    if !states.contains(&state) {
        states.push(state);
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Extracts the content of the first inner `Pair`, or an empty string.
fn inner_str<'i>(pair: Pair<'i, Rule>) -> &'i str {
    pair.into_inner().next().map(|p| p.as_str()).unwrap_or_default()
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<Pair<'i, Rule>, TuringMachineError> {
    pairs.next().ok_or_else(|| {
        TuringMachineError::ValidationError("Unexpected end of action".to_string())
    })
}

fn next_str<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<&'i str, TuringMachineError> {
    next_pair(pairs).map(|p| p.as_str())
}

/// Checks if a given rule has already been declared, ensuring uniqueness for top-level sections.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), TuringMachineError> {
    let Some(keyword) = section_keyword(rule) else {
        return Ok(());
    };

    if seen.contains(&rule) {
        return Err(parse_error(
            &format!("Duplicate \"{keyword}:\" declaration"),
            span,
        ));
    }

    seen.insert(rule);

    Ok(())
}

fn section_keyword(rule: Rule) -> Option<&'static str> {
    match rule {
        Rule::name => Some("name"),
        Rule::blank => Some("blank"),
        Rule::initial => Some("initial"),
        Rule::finals => Some("final"),
        Rule::inputs => Some("input"),
        Rule::tape => Some("tape"),
        Rule::rules => Some("rules"),
        _ => None,
    }
}

/// Checks if a required rule is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, names: Vec<&str>) -> Result<T, TuringMachineError> {
    value.ok_or_else(|| {
        TuringMachineError::ValidationError(format!("Missing {} section", format_rules(names)))
    })
}

/// Formats a list of rule names into a human-readable string for error messages.
fn format_rules(names: Vec<&str>) -> String {
    names
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// A helper struct to temporarily hold parsed action data.
struct ParsedAction {
    read: Symbol,
    write: Symbol,
    direction: Direction,
    next: String,
}
