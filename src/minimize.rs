//! Minimizing acyclic DFAs by merging states with equal right languages.
//!
//! In an acyclic DFA two states accept the same suffixes iff they agree on
//! acceptance and, symbol by symbol, move to states that are themselves
//! equivalent. Signatures are therefore computed bottom-up: a post-order
//! traversal from the start state guarantees every successor has been assigned
//! an equivalence class before its predecessors are looked at.
//!
//! Self-loops are the one kind of cycle allowed. A state that loops on `a` and
//! a state that moves on `a` into that loop's class can share a right language
//! while having different signatures, so the registry also tries to read such
//! edges as self-loops before opening a new class.

use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;

use crate::automaton::{Automaton, StateId, Symbol};
use crate::config::Config;
use crate::{Error, Result};

/// Where an edge of a signature leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Target {
    Class(usize),
    /// Back to the state itself.
    SelfLoop,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Signature {
    accepting: bool,
    edges: Vec<(Symbol, Target)>,
}

impl Signature {
    fn has_self_loop(&self) -> bool {
        self.edges.iter().any(|(_, target)| *target == Target::SelfLoop)
    }

    /// The signature with every edge into `class` read as a self-loop.
    fn looping_into(&self, class: usize) -> Signature {
        Signature {
            accepting: self.accepting,
            edges: self
                .edges
                .iter()
                .map(|&(symbol, target)| match target {
                    Target::Class(c) if c == class => (symbol, Target::SelfLoop),
                    other => (symbol, other),
                })
                .collect(),
        }
    }
}

/// Equivalence classes discovered so far, with the signature that opened each.
#[derive(Debug, Default)]
struct Registry {
    ids: HashMap<Signature, usize>,
    canonical: Vec<Signature>,
}

impl Registry {
    fn classify(&mut self, signature: Signature) -> usize {
        if let Some(&class) = self.ids.get(&signature) {
            return class;
        }
        let mut targets: Vec<usize> = signature
            .edges
            .iter()
            .filter_map(|(_, target)| match target {
                Target::Class(c) => Some(*c),
                Target::SelfLoop => None,
            })
            .collect();
        targets.sort_unstable();
        targets.dedup();
        let merged = targets.into_iter().find(|&c| {
            self.canonical[c].has_self_loop() && signature.looping_into(c) == self.canonical[c]
        });
        let class = match merged {
            Some(class) => class,
            None => {
                self.canonical.push(signature.clone());
                self.canonical.len() - 1
            }
        };
        self.ids.insert(signature, class);
        class
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Open,
    Done,
}

#[derive(Clone, Debug, Default)]
pub struct Minimizer {
    config: Config,
}

impl Minimizer {
    pub fn new() -> Minimizer {
        Minimizer::default()
    }

    pub fn configure(mut self, config: Config) -> Minimizer {
        self.config = self.config.overwrite(config);
        self
    }

    pub fn minimize(&self, dfa: &Automaton) -> Result<Automaton> {
        let mut symbols: Vec<Symbol> = dfa.alphabet().to_vec();
        symbols.sort_unstable();
        let prune = self.config.get_prune_dead_states();

        let order = post_order(dfa, &symbols)?;

        // None marks a dead state, i.e. one with an empty right language
        let mut class_of: HashMap<&str, Option<usize>> = HashMap::default();
        let mut registry = Registry::default();
        for &state in &order {
            let mut edges = Vec::new();
            for (symbol, successor) in outgoing(dfa, &symbols, state)? {
                if successor == state {
                    edges.push((symbol, Target::SelfLoop));
                } else if let Some(class) = class_of[successor] {
                    edges.push((symbol, Target::Class(class)));
                }
            }
            let accepting = dfa.is_accepting(state);
            let dead = !accepting && edges.iter().all(|(_, t)| *t == Target::SelfLoop);
            let class = if prune && dead {
                None
            } else {
                Some(registry.classify(Signature { accepting, edges }))
            };
            trace!("state {:?} -> class {:?}", state, class);
            class_of.insert(state, class);
        }

        // Representatives are picked in declaration order, falling back to
        // traversal order for states the declaration does not list.
        let mut representative: HashMap<usize, &str> = HashMap::default();
        let mut kept: Vec<&str> = Vec::new();
        let candidates = dfa
            .states()
            .iter()
            .map(String::as_str)
            .chain(order.iter().copied());
        for state in candidates {
            if let Some(Some(class)) = class_of.get(state) {
                if !representative.contains_key(class) {
                    representative.insert(*class, state);
                    kept.push(state);
                }
            }
        }

        let start = match class_of.get(dfa.start()) {
            Some(Some(class)) => representative[class],
            _ => {
                // the whole language is empty; keep a bare start state
                kept.push(dfa.start());
                dfa.start()
            }
        };
        let accept: Vec<StateId> = kept
            .iter()
            .filter(|state| dfa.is_accepting(state))
            .map(|state| state.to_string())
            .collect();
        let mut minimized = Automaton::new(
            kept.iter().map(|state| state.to_string()),
            dfa.alphabet().iter().copied(),
            start,
            accept,
        );
        for &state in &kept {
            if class_of.get(state).copied().flatten().is_none() {
                continue;
            }
            for (symbol, successor) in outgoing(dfa, &symbols, state)? {
                if successor == state {
                    minimized.add_transition(state, symbol, state);
                } else if let Some(class) = class_of[successor] {
                    minimized.add_transition(state, symbol, representative[&class]);
                }
            }
        }

        debug!(
            "acyclic minimization: {} states -> {} states",
            dfa.num_states(),
            minimized.num_states()
        );
        Ok(minimized)
    }
}

/// Minimizes `dfa` with the default configuration.
pub fn minimize_acyclic(dfa: &Automaton) -> Result<Automaton> {
    Minimizer::new().minimize(dfa)
}

/// Edges of `state` over `symbols`, failing on nondeterministic transitions.
fn outgoing<'a>(
    dfa: &'a Automaton,
    symbols: &[Symbol],
    state: &str,
) -> Result<Vec<(Symbol, &'a str)>> {
    let mut edges = Vec::new();
    for &symbol in symbols {
        match dfa.successors(state, symbol) {
            [] => {}
            [successor] => edges.push((symbol, successor.as_str())),
            _ => {
                return Err(Error::NotDeterministic {
                    state: state.to_string(),
                    symbol,
                })
            }
        }
    }
    Ok(edges)
}

/// States reachable from the start state, each listed after all of its
/// successors. Self-loops are ignored; any other cycle is an error.
fn post_order<'a>(dfa: &'a Automaton, symbols: &[Symbol]) -> Result<Vec<&'a str>> {
    let children = |state: &'a str| -> Result<Vec<&'a str>> {
        let mut children: Vec<&'a str> = outgoing(dfa, symbols, state)?
            .into_iter()
            .map(|(_, successor)| successor)
            .filter(|successor| *successor != state)
            .collect();
        children.reverse();
        Ok(children)
    };

    let mut marks: HashMap<&'a str, Mark> = HashMap::default();
    let mut order: Vec<&'a str> = Vec::new();
    let mut stack: Vec<(&'a str, Vec<&'a str>)> = vec![(dfa.start(), children(dfa.start())?)];
    marks.insert(dfa.start(), Mark::Open);

    while let Some(frame) = stack.last_mut() {
        let state = frame.0;
        match frame.1.pop() {
            Some(child) => match marks.get(child) {
                Some(Mark::Done) => {}
                Some(Mark::Open) => return Err(Error::CyclicAutomaton(child.to_string())),
                None => {
                    marks.insert(child, Mark::Open);
                    stack.push((child, children(child)?));
                }
            },
            None => {
                marks.insert(state, Mark::Done);
                order.push(state);
                stack.pop();
            }
        }
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::test;
    use crate::trie::{build_trie, Language};

    /// All words over `alphabet` of length at most `max_len`.
    fn words(alphabet: &[Symbol], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut layer = vec![String::new()];
        for _ in 0..max_len {
            layer = layer
                .iter()
                .flat_map(|w| alphabet.iter().map(move |c| format!("{}{}", w, c)))
                .collect();
            all.extend(layer.iter().cloned());
        }
        all
    }

    fn assert_same_language(a: &Automaton, b: &Automaton, max_len: usize) {
        for word in words(a.alphabet(), max_len) {
            assert_eq!(test(a, &word).accepted, test(b, &word).accepted, "{:?}", word);
        }
    }

    #[test]
    fn merges_equivalent_leaves() {
        let trie = build_trie(&Language::new(['a', 'b'], ["", "a", "ab", "aabb"])).unwrap();
        let dafsa = minimize_acyclic(&trie).unwrap();
        assert_eq!(trie.num_states(), 6);
        assert_eq!(dafsa.num_states(), 5);
        // q2 ("ab") and q5 ("aabb") both end a word with no way forward
        assert!(!dafsa.states().contains(&"q5".to_string()));
        assert_eq!(dafsa.successors("q4", 'b'), &["q2".to_string()]);
        assert_same_language(&trie, &dafsa, 6);
    }

    #[test]
    fn merges_shared_suffixes() {
        let trie = build_trie(&Language::new(['a', 'b', 'c'], ["ab", "cb", "b"])).unwrap();
        let dafsa = minimize_acyclic(&trie).unwrap();
        // root, one state expecting "b", one final state
        assert_eq!(dafsa.num_states(), 3);
        assert_eq!(dafsa.successors("q0", 'a'), dafsa.successors("q0", 'c'));
        assert_same_language(&trie, &dafsa, 4);
    }

    #[test]
    fn minimization_is_idempotent() {
        let trie = build_trie(&Language::new(
            ['a', 'b'],
            ["aa", "ab", "ba", "bb", "aaa", "bab"],
        ))
        .unwrap();
        let once = minimize_acyclic(&trie).unwrap();
        let twice = minimize_acyclic(&once).unwrap();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(once, twice);
        assert_same_language(&trie, &once, 5);
    }

    #[test]
    fn rejects_cycles_and_nondeterminism() {
        let mut cyclic = Automaton::new(["s", "t"], ['a'], "s", ["t"]);
        cyclic.add_transition("s", 'a', "t");
        cyclic.add_transition("t", 'a', "s");
        assert!(matches!(
            minimize_acyclic(&cyclic),
            Err(Error::CyclicAutomaton(state)) if state == "s"
        ));

        let mut nfa = Automaton::new(["s", "t", "u"], ['a'], "s", ["t"]);
        nfa.add_transition("s", 'a', "t");
        nfa.add_transition("s", 'a', "u");
        assert!(matches!(
            minimize_acyclic(&nfa),
            Err(Error::NotDeterministic { symbol: 'a', .. })
        ));
    }

    #[test]
    fn tolerates_self_loops() {
        let mut dfa = Automaton::new(["s", "t", "u"], ['a', 'b', 'c'], "s", ["t", "u"]);
        dfa.add_transition("s", 'b', "t");
        dfa.add_transition("s", 'c', "u");
        dfa.add_transition("t", 'a', "t");
        dfa.add_transition("u", 'a', "u");
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.num_states(), 2);
        assert_eq!(minimized.successors("t", 'a'), &["t".to_string()]);
        assert_same_language(&dfa, &minimized, 5);
    }

    /// `r -a-> s`, `r -b-> t`, `s -a-> s`, `t -a-> s`: s and t both accept a*.
    fn loop_and_entry() -> Automaton {
        let mut dfa = Automaton::new(["r", "s", "t"], ['a', 'b'], "r", ["s", "t"]);
        dfa.add_transition("r", 'a', "s");
        dfa.add_transition("r", 'b', "t");
        dfa.add_transition("s", 'a', "s");
        dfa.add_transition("t", 'a', "s");
        dfa
    }

    #[test]
    fn merges_states_entering_an_equivalent_loop() {
        let dfa = loop_and_entry();
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.states(), &["r".to_string(), "s".to_string()]);
        assert_eq!(minimized.successors("r", 'b'), &["s".to_string()]);
        assert_eq!(minimized.successors("s", 'a'), &["s".to_string()]);
        assert_same_language(&dfa, &minimized, 5);

        let again = minimize_acyclic(&minimized).unwrap();
        assert_eq!(again.num_states(), 2);
        assert_eq!(again, minimized);
    }

    #[test]
    fn merges_chains_into_a_loop() {
        // t -a-> u -a-> s with s looping on a; all accepting, all accept a*
        let mut dfa = Automaton::new(["t", "u", "s"], ['a', 'b'], "t", ["t", "u", "s"]);
        dfa.add_transition("t", 'a', "u");
        dfa.add_transition("u", 'a', "s");
        dfa.add_transition("s", 'a', "s");
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.states(), &["t".to_string()]);
        assert_eq!(minimized.successors("t", 'a'), &["t".to_string()]);
        assert_same_language(&dfa, &minimized, 5);
    }

    #[test]
    fn loop_merge_requires_matching_other_edges() {
        // s loops on a and stops; t enters s on a but also reads b
        let mut dfa = Automaton::new(["r", "s", "t", "f"], ['a', 'b'], "r", ["s", "t", "f"]);
        dfa.add_transition("r", 'a', "s");
        dfa.add_transition("r", 'b', "t");
        dfa.add_transition("s", 'a', "s");
        dfa.add_transition("t", 'a', "s");
        dfa.add_transition("t", 'b', "f");
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.num_states(), 4);
        assert_same_language(&dfa, &minimized, 5);
    }

    #[test]
    fn prunes_dead_states_unless_disabled() {
        let mut dfa = Automaton::new(["s", "d", "f"], ['a', 'b'], "s", ["f"]);
        dfa.add_transition("s", 'a', "d");
        dfa.add_transition("s", 'b', "f");
        let pruned = minimize_acyclic(&dfa).unwrap();
        assert_eq!(pruned.num_states(), 2);
        assert!(pruned.successors("s", 'a').is_empty());
        assert_same_language(&dfa, &pruned, 3);

        let kept = Minimizer::new()
            .configure(Config::new().prune_dead_states(false))
            .minimize(&dfa)
            .unwrap();
        assert_eq!(kept.num_states(), 3);
    }

    #[test]
    fn empty_language_keeps_start() {
        let mut dfa = Automaton::new(["s", "d"], ['a'], "s", Vec::<String>::new());
        dfa.add_transition("s", 'a', "d");
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.states(), &["s".to_string()]);
        assert_eq!(minimized.num_transitions(), 0);
        assert!(!test(&minimized, "").accepted);
    }

    #[test]
    fn drops_unreachable_states() {
        let mut dfa = Automaton::new(["s", "f", "x"], ['a'], "s", ["f", "x"]);
        dfa.add_transition("s", 'a', "f");
        dfa.add_transition("x", 'a', "f");
        let minimized = minimize_acyclic(&dfa).unwrap();
        assert_eq!(minimized.states(), &["s".to_string(), "f".to_string()]);
    }

    #[test]
    fn long_words_do_not_recurse() {
        let word: String = std::iter::repeat('a').take(50_000).collect();
        let trie = build_trie(&Language::new(['a'], [word.clone()])).unwrap();
        let dafsa = minimize_acyclic(&trie).unwrap();
        assert_eq!(dafsa.num_states(), trie.num_states());
        assert!(test(&dafsa, &word).accepted);
    }
}
