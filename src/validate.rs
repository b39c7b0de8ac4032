//! Shape checks for uploaded automaton and language definitions.
//!
//! The validator consumes an already parsed [`serde_json::Value`] and either
//! produces a model value or an [`Error`] naming the offending field. It checks
//! the declared shape of the definition; the full graph consistency check is
//! only run when [`Config::check_references`] is enabled.

use log::debug;
use serde_json::{Map, Value};

use crate::automaton::{Automaton, Symbol};
use crate::config::Config;
use crate::trie::Language;
use crate::{Error, Result};

/// Transition symbol keys that denote an epsilon move.
pub const EPSILON_KEYS: &[&str] = &["", "ε", "λ", "eps", "epsilon", "lambda"];

/// Top-level keys some tools use to list epsilon moves separately.
const EPSILON_FIELDS: &[&str] = &["epsilon", "epsilonTransitions", "epsilon_transitions"];

const AUTOMATON_FIELDS: [&str; 5] = ["states", "alphabet", "start", "accept", "transitions"];
const LANGUAGE_FIELDS: [&str; 2] = ["alphabet", "accept"];

#[derive(Clone, Debug, Default)]
pub struct Validator {
    config: Config,
}

impl Validator {
    pub fn new() -> Validator {
        Validator::default()
    }

    pub fn configure(mut self, config: Config) -> Validator {
        self.config = self.config.overwrite(config);
        self
    }

    pub fn validate(&self, raw: &Value) -> Result<Automaton> {
        let definition = as_object(raw)?;
        require_fields(definition, &AUTOMATON_FIELDS)?;
        if let Some(key) = EPSILON_FIELDS.iter().find(|k| definition.contains_key(**k)) {
            return Err(Error::EpsilonTransition {
                field: key.to_string(),
                key: key.to_string(),
            });
        }

        let states = string_array(&definition["states"], "states")?;
        let alphabet = symbols(&string_array(&definition["alphabet"], "alphabet")?, "alphabet")?;
        let start = definition["start"]
            .as_str()
            .ok_or_else(|| mismatch("start", "a string"))?;
        let accept = string_array(&definition["accept"], "accept")?;
        let mut automaton = Automaton::new(states, alphabet, start, accept);

        let transitions = definition["transitions"].as_object().ok_or_else(|| {
            mismatch("transitions", "an object mapping states to symbol maps")
        })?;
        for (state, by_symbol) in transitions {
            let field = format!("transitions.{}", state);
            let by_symbol = by_symbol
                .as_object()
                .ok_or_else(|| mismatch(&field, "an object mapping symbols to state arrays"))?;
            for (key, destinations) in by_symbol {
                if EPSILON_KEYS.contains(&key.as_str()) {
                    return Err(Error::EpsilonTransition {
                        field,
                        key: key.clone(),
                    });
                }
                let symbol = single_symbol(key, &field)?;
                let destinations =
                    string_array(destinations, &format!("transitions.{}.{}", state, key))?;
                for destination in destinations {
                    automaton.add_transition(state.as_str(), symbol, destination);
                }
            }
        }

        if self.config.get_check_references() {
            automaton.check_integrity()?;
        }
        debug!(
            "validated automaton with {} states and {} transitions",
            automaton.num_states(),
            automaton.num_transitions()
        );
        Ok(automaton)
    }

    pub fn validate_language(&self, raw: &Value) -> Result<Language> {
        let definition = as_object(raw)?;
        require_fields(definition, &LANGUAGE_FIELDS)?;
        let alphabet = symbols(&string_array(&definition["alphabet"], "alphabet")?, "alphabet")?;
        if alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        let words = string_array(&definition["accept"], "accept")?;
        debug!(
            "validated language with {} symbols and {} words",
            alphabet.len(),
            words.len()
        );
        Ok(Language::new(alphabet, words))
    }
}

/// Validates an automaton definition with the default configuration.
pub fn validate(raw: &Value) -> Result<Automaton> {
    Validator::new().validate(raw)
}

/// Validates a language definition with the default configuration.
pub fn validate_language(raw: &Value) -> Result<Language> {
    Validator::new().validate_language(raw)
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>> {
    raw.as_object().ok_or(Error::NotAnObject)
}

fn require_fields(definition: &Map<String, Value>, fields: &[&'static str]) -> Result<()> {
    match fields.iter().find(|field| !definition.contains_key(**field)) {
        Some(field) => Err(Error::MissingField(*field)),
        None => Ok(()),
    }
}

fn mismatch(field: &str, expected: &'static str) -> Error {
    Error::TypeMismatch {
        field: field.to_string(),
        expected,
    }
}

fn string_array(value: &Value, field: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(field, "an array of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(field, "an array of strings"))
        })
        .collect()
}

fn symbols(entries: &[String], field: &str) -> Result<Vec<Symbol>> {
    entries.iter().map(|entry| single_symbol(entry, field)).collect()
}

fn single_symbol(entry: &str, field: &str) -> Result<Symbol> {
    let mut chars = entry.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(Error::InvalidSymbol {
            field: field.to_string(),
            symbol: entry.to_string(),
        }),
    }
}
