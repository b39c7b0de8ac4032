//! Building the unminimized trie automaton of a finite language.

use log::{debug, trace};
use rustc_hash::FxHashMap as HashMap;
use serde_json::Value;

use crate::automaton::{Automaton, StateId, Symbol};
use crate::config::Config;
use crate::{Error, Result};

/// A finite language: an alphabet and the words that belong to the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    alphabet: Vec<Symbol>,
    words: Vec<String>,
}

impl Language {
    pub fn new<W>(alphabet: impl IntoIterator<Item = Symbol>, words: W) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let mut alphabet: Vec<Symbol> = alphabet.into_iter().collect();
        let mut seen = rustc_hash::FxHashSet::default();
        alphabet.retain(|symbol| seen.insert(*symbol));
        Self {
            alphabet,
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a JSON language definition and validates it.
    pub fn from_json_str(definition: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(definition)?;
        crate::validate::validate_language(&raw)
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// The first word using a symbol outside the alphabet, with that symbol.
    fn first_violation(&self) -> Option<(&str, Symbol)> {
        self.words.iter().find_map(|word| {
            word.chars()
                .find(|c| !self.alphabet.contains(c))
                .map(|c| (word.as_str(), c))
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrieBuilder {
    config: Config,
}

impl TrieBuilder {
    pub fn new() -> TrieBuilder {
        TrieBuilder::default()
    }

    pub fn configure(mut self, config: Config) -> TrieBuilder {
        self.config = self.config.overwrite(config);
        self
    }

    pub fn build(&self, language: &Language) -> Result<Automaton> {
        if let Some((word, symbol)) = language.first_violation() {
            return Err(Error::AlphabetViolation {
                word: word.to_string(),
                symbol,
            });
        }
        let prefix = self.config.get_state_prefix();
        let root: StateId = format!("{}0", prefix);
        let mut trie = Automaton::new(
            [root.clone()],
            language.alphabet().iter().copied(),
            root.clone(),
            Vec::<StateId>::new(),
        );
        // children[state][symbol] mirrors the trie edges for quick lookups
        let mut children: HashMap<StateId, HashMap<Symbol, StateId>> = HashMap::default();

        for word in language.words() {
            let mut current = root.clone();
            for symbol in word.chars() {
                current = match children.get(&current).and_then(|c| c.get(&symbol)) {
                    Some(next) => next.clone(),
                    None => {
                        let next = format!("{}{}", prefix, trie.num_states());
                        trace!("trie: {:?} -{}-> new state {:?}", current, symbol, next);
                        trie.add_state(next.clone());
                        trie.add_transition(current.as_str(), symbol, next.as_str());
                        children
                            .entry(current)
                            .or_default()
                            .insert(symbol, next.clone());
                        next
                    }
                };
            }
            trie.add_accept_state(current);
        }
        debug!(
            "built trie with {} states for {} words",
            trie.num_states(),
            language.words().len()
        );
        Ok(trie)
    }
}

/// Builds the trie of `language` with the default configuration.
pub fn build_trie(language: &Language) -> Result<Automaton> {
    TrieBuilder::new().build(language)
}
