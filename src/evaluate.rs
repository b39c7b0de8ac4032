//! Running input strings through an automaton.
//!
//! The evaluator treats every automaton as nondeterministic: it tracks the set
//! of states the automaton may be in, which for a DFA is always a singleton or
//! empty. Rejections are ordinary [`Verdict`]s carrying a [`Reason`], never
//! errors.

use std::collections::BTreeSet;

use log::trace;
use rayon::prelude::*;
use serde::Serialize;

use crate::automaton::{Automaton, StateId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Reason {
    /// The input contains a symbol the alphabet does not declare.
    SymbolNotInAlphabet { symbol: Symbol, position: usize },
    /// No state was left after reading the symbol at `position`.
    DeadConfiguration { position: usize },
    ReachedAcceptState,
    NoAcceptStateReached,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::SymbolNotInAlphabet { symbol, position } => write!(
                f,
                "symbol {:?} at position {} is not in the alphabet",
                symbol, position
            ),
            Reason::DeadConfiguration { position } => write!(
                f,
                "no transition left after reading the symbol at position {}",
                position
            ),
            Reason::ReachedAcceptState => write!(f, "input ends in an accept state"),
            Reason::NoAcceptStateReached => write!(f, "input does not end in an accept state"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub accepted: bool,
    pub reason: Reason,
    /// States the automaton may be in once the input is consumed, sorted.
    pub final_states: Vec<StateId>,
}

impl Verdict {
    fn rejected(reason: Reason) -> Self {
        Self {
            accepted: false,
            reason,
            final_states: Vec::new(),
        }
    }
}

/// Tests whether `automaton` accepts `input`.
pub fn test(automaton: &Automaton, input: &str) -> Verdict {
    if let Some((position, symbol)) = input
        .chars()
        .enumerate()
        .find(|(_, symbol)| !automaton.has_symbol(*symbol))
    {
        return Verdict::rejected(Reason::SymbolNotInAlphabet { symbol, position });
    }

    let mut current: BTreeSet<&str> = BTreeSet::from([automaton.start()]);
    for (position, symbol) in input.chars().enumerate() {
        let next: BTreeSet<&str> = current
            .iter()
            .flat_map(|state| automaton.successors(state, symbol))
            .map(String::as_str)
            .collect();
        trace!("{:?} -{}-> {:?}", current, symbol, next);
        if next.is_empty() {
            return Verdict::rejected(Reason::DeadConfiguration { position });
        }
        current = next;
    }

    let accepted = current.iter().any(|state| automaton.is_accepting(state));
    Verdict {
        accepted,
        reason: if accepted {
            Reason::ReachedAcceptState
        } else {
            Reason::NoAcceptStateReached
        },
        final_states: current.into_iter().map(str::to_string).collect(),
    }
}

/// Tests many inputs in parallel; verdicts are returned in input order.
pub fn test_batch<S>(automaton: &Automaton, inputs: &[S]) -> Vec<Verdict>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|input| test(automaton, input.as_ref()))
        .collect()
}
