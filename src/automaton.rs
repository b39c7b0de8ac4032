//! The automaton value shared by every transformation in the crate.
//!
//! One representation covers NFAs, DFAs and DAFSAs: each `(state, symbol)`
//! pair maps to a sorted, duplicate-free list of destinations. A deterministic
//! automaton simply never has more than one destination per pair, and a
//! missing pair means "no transition".

use bincode::{config, Decode, Encode};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde_json::{Map, Value};

use crate::{Error, Result};

// define type alias for state-id and symbol
pub type StateId = String;
pub type Symbol = char;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Automaton {
    states: Vec<StateId>,
    alphabet: Vec<Symbol>,
    start: StateId,
    accept: HashSet<StateId>,
    transitions: HashMap<StateId, HashMap<Symbol, Vec<StateId>>>,
}

impl Automaton {
    /// Creates an automaton without transitions. Duplicate states and symbols
    /// are dropped, keeping the first occurrence.
    pub fn new<S, A, T>(states: S, alphabet: A, start: impl Into<StateId>, accept: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<StateId>,
        A: IntoIterator<Item = Symbol>,
        T: IntoIterator,
        T::Item: Into<StateId>,
    {
        let mut seen: HashSet<StateId> = HashSet::default();
        let states = states
            .into_iter()
            .map(Into::into)
            .filter(|state: &StateId| seen.insert(state.clone()))
            .collect();
        let mut seen_symbols: HashSet<Symbol> = HashSet::default();
        let alphabet = alphabet
            .into_iter()
            .filter(|symbol| seen_symbols.insert(*symbol))
            .collect();
        Self {
            states,
            alphabet,
            start: start.into(),
            accept: accept.into_iter().map(Into::into).collect(),
            transitions: HashMap::default(),
        }
    }

    /// Parses a JSON automaton definition and validates it.
    pub fn from_json_str(definition: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(definition)?;
        crate::validate::validate(&raw)
    }

    /// Adds `source --symbol--> destination`. Returns `false` when the edge
    /// was already present.
    pub fn add_transition(
        &mut self,
        source: impl Into<StateId>,
        symbol: Symbol,
        destination: impl Into<StateId>,
    ) -> bool {
        let destinations = self
            .transitions
            .entry(source.into())
            .or_default()
            .entry(symbol)
            .or_default();
        let destination = destination.into();
        match destinations.binary_search(&destination) {
            Ok(_) => false,
            Err(pos) => {
                destinations.insert(pos, destination);
                true
            }
        }
    }

    pub(crate) fn add_state(&mut self, state: StateId) {
        self.states.push(state);
    }

    pub(crate) fn add_accept_state(&mut self, state: StateId) {
        self.accept.insert(state);
    }

    pub fn states(&self) -> &[StateId] {
        &self.states
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn accept(&self) -> &HashSet<StateId> {
        &self.accept
    }

    pub fn transitions(&self) -> &HashMap<StateId, HashMap<Symbol, Vec<StateId>>> {
        &self.transitions
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions
            .values()
            .flat_map(|by_symbol| by_symbol.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept.contains(state)
    }

    pub fn has_symbol(&self, symbol: Symbol) -> bool {
        self.alphabet.contains(&symbol)
    }

    /// Destinations of `state` on `symbol`; empty when there is no transition.
    pub fn successors(&self, state: &str, symbol: Symbol) -> &[StateId] {
        self.transitions
            .get(state)
            .and_then(|by_symbol| by_symbol.get(&symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing edges of `state` sorted by symbol, one entry per destination.
    pub fn edges(&self, state: &str) -> Vec<(Symbol, &str)> {
        let mut edges: Vec<(Symbol, &str)> = self
            .transitions
            .get(state)
            .map(|by_symbol| {
                by_symbol
                    .iter()
                    .flat_map(|(symbol, destinations)| {
                        destinations.iter().map(move |d| (*symbol, d.as_str()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        edges.sort_unstable();
        edges
    }

    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .values()
            .flat_map(|by_symbol| by_symbol.values())
            .all(|destinations| destinations.len() <= 1)
    }

    /// Checks that every state reference points at a declared state and that
    /// every transition symbol belongs to the alphabet.
    pub fn check_integrity(&self) -> Result<()> {
        let declared: HashSet<&str> = self.states.iter().map(String::as_str).collect();
        fn unknown(field: impl Into<String>, state: &str) -> Error {
            Error::UnknownState {
                field: field.into(),
                state: state.to_string(),
            }
        }
        if !declared.contains(self.start.as_str()) {
            return Err(unknown("start", &self.start));
        }
        let mut accept: Vec<&StateId> = self.accept.iter().collect();
        accept.sort_unstable();
        if let Some(state) = accept.into_iter().find(|s| !declared.contains(s.as_str())) {
            return Err(unknown("accept", state));
        }
        let mut sources: Vec<&StateId> = self.transitions.keys().collect();
        sources.sort_unstable();
        for source in sources {
            if !declared.contains(source.as_str()) {
                return Err(unknown("transitions", source));
            }
            for (symbol, destination) in self.edges(source) {
                if !self.has_symbol(symbol) {
                    return Err(Error::UnknownSymbol {
                        state: source.clone(),
                        symbol,
                    });
                }
                if !declared.contains(destination) {
                    return Err(unknown(
                        format!("transitions.{}.{}", source, symbol),
                        destination,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Renders the automaton in the definition format accepted by
    /// [`validate`](crate::validate::validate).
    pub fn to_json(&self) -> Value {
        let mut accept: Vec<&StateId> = self.accept.iter().collect();
        accept.sort_unstable();
        let mut transitions = Map::new();
        for state in &self.states {
            let mut by_symbol = Map::new();
            if let Some(outgoing) = self.transitions.get(state) {
                let mut symbols: Vec<&Symbol> = outgoing.keys().collect();
                symbols.sort_unstable();
                for symbol in symbols {
                    by_symbol.insert(symbol.to_string(), Value::from(outgoing[symbol].clone()));
                }
            }
            transitions.insert(state.clone(), Value::Object(by_symbol));
        }
        let alphabet: Vec<String> = self.alphabet.iter().map(|c| c.to_string()).collect();
        serde_json::json!({
            "states": self.states,
            "alphabet": alphabet,
            "start": self.start,
            "accept": accept,
            "transitions": transitions,
        })
    }

    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    pub fn from_binary(binary_data: &[u8]) -> Result<Self> {
        let (automaton, _): (Automaton, usize) =
            bincode::decode_from_slice(binary_data, config::standard())?;
        Ok(automaton)
    }
}

impl std::fmt::Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Automaton with {} states, start {:?}, transitions:",
            self.states.len(),
            self.start
        )?;
        for state in &self.states {
            let marker = if self.is_accepting(state) { "*" } else { " " };
            for (symbol, destination) in self.edges(state) {
                writeln!(f, "{}{:?} -{}-> {:?}", marker, state, symbol, destination)?;
            }
        }
        Ok(())
    }
}
