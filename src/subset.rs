//! Subset construction algorithm for converting an epsilon-free NFA to a DFA.

use std::collections::{BTreeSet, VecDeque};

use log::{debug, trace, warn};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::automaton::{Automaton, StateId};

/// A set of NFA states. Ordered membership makes equal sets hash and compare
/// equal no matter in which order their members were discovered.
type Subset<'a> = BTreeSet<&'a str>;

/// Convert an NFA to an equivalent DFA using the powerset construction.
///
/// Each DFA state stands for one reachable, non-empty set of NFA states and is
/// named after its sorted members, e.g. `{q1,q2}`. An empty successor set does
/// not become a state: the transition is simply left out.
pub fn subset_construct(nfa: &Automaton) -> Automaton {
    let mut names: HashMap<Subset<'_>, StateId> = HashMap::default();
    let mut taken: HashSet<StateId> = HashSet::default();

    let initial: Subset<'_> = BTreeSet::from([nfa.start()]);
    let initial_name = unique_name(&initial, &mut taken);
    let mut dfa = Automaton::new(
        [initial_name.clone()],
        nfa.alphabet().iter().copied(),
        initial_name.clone(),
        Vec::<StateId>::new(),
    );
    if is_accepting(nfa, &initial) {
        dfa.add_accept_state(initial_name.clone());
    }
    names.insert(initial.clone(), initial_name);

    // Queue of subsets whose outgoing transitions are not computed yet
    let mut worklist: VecDeque<Subset<'_>> = VecDeque::from([initial]);

    while let Some(current) = worklist.pop_front() {
        let source = names[&current].clone();
        for &symbol in nfa.alphabet() {
            let next: Subset<'_> = current
                .iter()
                .flat_map(|state| nfa.successors(state, symbol))
                .map(String::as_str)
                .collect();
            if next.is_empty() {
                continue;
            }
            let destination = match names.get(&next) {
                Some(existing) => existing.clone(),
                None => {
                    let name = unique_name(&next, &mut taken);
                    trace!("subset {} discovered from {} on {:?}", name, source, symbol);
                    dfa.add_state(name.clone());
                    if is_accepting(nfa, &next) {
                        dfa.add_accept_state(name.clone());
                    }
                    names.insert(next.clone(), name.clone());
                    worklist.push_back(next);
                    name
                }
            };
            dfa.add_transition(source.as_str(), symbol, destination);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states",
        nfa.num_states(),
        dfa.num_states()
    );
    dfa
}

fn is_accepting(nfa: &Automaton, subset: &Subset<'_>) -> bool {
    subset.iter().any(|state| nfa.is_accepting(state))
}

fn unique_name(subset: &Subset<'_>, taken: &mut HashSet<StateId>) -> StateId {
    let members: Vec<&str> = subset.iter().copied().collect();
    let mut name = format!("{{{}}}", members.join(","));
    while taken.contains(&name) {
        warn!("state name {} is ambiguous, renaming", name);
        name.push('\'');
    }
    taken.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::{test, Reason};
    use crate::validate::validate;
    use serde_json::json;

    fn scenario_nfa() -> Automaton {
        validate(&json!({
            "states": ["q1", "q2"],
            "alphabet": ["a", "b"],
            "start": "q1",
            "accept": ["q2"],
            "transitions": {
                "q1": {"a": ["q1", "q2"], "b": ["q1"]},
                "q2": {"b": ["q1"]}
            }
        }))
        .unwrap()
    }

    #[test]
    fn scenario_conversion() {
        let dfa = subset_construct(&scenario_nfa());
        assert!(dfa.is_deterministic());
        assert_eq!(dfa.start(), "{q1}");
        assert_eq!(dfa.states(), &["{q1}".to_string(), "{q1,q2}".to_string()]);
        assert!(dfa.is_accepting("{q1,q2}"));
        assert!(!dfa.is_accepting("{q1}"));
        assert_eq!(dfa.successors("{q1,q2}", 'b'), &["{q1}".to_string()]);

        assert!(test(&dfa, "a").accepted);
        let verdict = test(&dfa, "b");
        assert!(!verdict.accepted);
        assert_eq!(verdict.reason, Reason::NoAcceptStateReached);
        assert!(!test(&dfa, "bbbb").accepted);
    }

    #[test]
    fn empty_subsets_are_omitted() {
        let mut nfa = Automaton::new(["s", "t"], ['a', 'b'], "s", ["t"]);
        nfa.add_transition("s", 'a', "t");
        let dfa = subset_construct(&nfa);
        assert_eq!(dfa.num_states(), 2);
        assert!(dfa.successors("{s}", 'b').is_empty());
        assert!(dfa.successors("{t}", 'a').is_empty());
        assert_eq!(test(&dfa, "b").reason, Reason::DeadConfiguration { position: 0 });
    }

    #[test]
    fn subset_identity_is_order_independent() {
        // {p, q} is reached as p+q on 'a' and as q+p on 'b'
        let mut nfa = Automaton::new(["s", "p", "q"], ['a', 'b'], "s", ["q"]);
        nfa.add_transition("s", 'a', "p");
        nfa.add_transition("s", 'a', "q");
        nfa.add_transition("s", 'b', "q");
        nfa.add_transition("s", 'b', "p");
        let dfa = subset_construct(&nfa);
        assert_eq!(dfa.num_states(), 2);
        assert_eq!(dfa.successors("{s}", 'a'), dfa.successors("{s}", 'b'));
    }

    #[test]
    fn third_from_last_is_a() {
        // the classic NFA whose DFA needs 2^3 states
        let mut nfa = Automaton::new(["0", "1", "2", "3"], ['a', 'b'], "0", ["3"]);
        nfa.add_transition("0", 'a', "0");
        nfa.add_transition("0", 'b', "0");
        nfa.add_transition("0", 'a', "1");
        for (from, to) in [("1", "2"), ("2", "3")] {
            nfa.add_transition(from, 'a', to);
            nfa.add_transition(from, 'b', to);
        }
        let dfa = subset_construct(&nfa);
        assert_eq!(dfa.num_states(), 8);
        assert!(dfa.is_deterministic());
        for word in ["abb", "babb", "aaa", "bbbabab"] {
            assert_eq!(test(&nfa, word).accepted, test(&dfa, word).accepted, "{}", word);
        }
        assert!(test(&dfa, "babb").accepted);
        assert!(!test(&dfa, "bbab").accepted);
    }

    #[test]
    fn accepting_start_subset() {
        let nfa = Automaton::new(["s"], ['a'], "s", ["s"]);
        let dfa = subset_construct(&nfa);
        assert!(dfa.is_accepting("{s}"));
        assert!(test(&dfa, "").accepted);
    }

    #[test]
    fn colliding_names_are_disambiguated() {
        let mut nfa = Automaton::new(["a,b", "a", "b"], ['x', 'y'], "a", ["b"]);
        nfa.add_transition("a", 'x', "a,b");
        nfa.add_transition("a", 'y', "a");
        nfa.add_transition("a", 'y', "b");
        let dfa = subset_construct(&nfa);
        // {a,b} as the singleton of "a,b" and as the pair of a and b
        assert_eq!(dfa.num_states(), 3);
        assert!(dfa.states().contains(&"{a,b}'".to_string()));
        assert!(test(&dfa, "y").accepted);
        assert!(!test(&dfa, "x").accepted);
    }
}
