//! Holding the automaton a front end currently works with.
//!
//! A session keeps the current automaton and, after a transformation, the one
//! it was derived from. Every operation either fully succeeds or leaves the
//! session exactly as it was.

use log::info;
use serde_json::Value;

use crate::automaton::Automaton;
use crate::config::Config;
use crate::evaluate::{self, Verdict};
use crate::minimize::Minimizer;
use crate::subset::subset_construct;
use crate::trie::TrieBuilder;
use crate::validate::Validator;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Config,
    current: Option<Automaton>,
    original: Option<Automaton>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&Automaton> {
        self.current.as_ref()
    }

    pub fn original(&self) -> Option<&Automaton> {
        self.original.as_ref()
    }

    /// Validates an automaton definition and makes it current.
    pub fn load_automaton(&mut self, raw: &Value) -> Result<&Automaton> {
        let automaton = Validator::new()
            .configure(self.config.clone())
            .validate(raw)?;
        info!("loaded automaton with {} states", automaton.num_states());
        Ok(self.install(automaton, None))
    }

    /// Validates a language definition and makes its trie current.
    pub fn load_language(&mut self, raw: &Value) -> Result<&Automaton> {
        let language = Validator::new()
            .configure(self.config.clone())
            .validate_language(raw)?;
        let trie = TrieBuilder::new()
            .configure(self.config.clone())
            .build(&language)?;
        info!("loaded language of {} words", language.words().len());
        Ok(self.install(trie, None))
    }

    /// Replaces the current automaton with its subset construction.
    pub fn convert(&mut self) -> Result<&Automaton> {
        let current = self.current.take().ok_or(Error::NoAutomatonLoaded)?;
        let dfa = subset_construct(&current);
        Ok(self.install(dfa, Some(current)))
    }

    /// Replaces the current automaton with its acyclic minimization.
    pub fn minimize(&mut self) -> Result<&Automaton> {
        let current = self.current.as_ref().ok_or(Error::NoAutomatonLoaded)?;
        let minimized = Minimizer::new()
            .configure(self.config.clone())
            .minimize(current)?;
        let previous = self.current.take();
        Ok(self.install(minimized, previous))
    }

    pub fn test(&self, input: &str) -> Result<Verdict> {
        let current = self.current.as_ref().ok_or(Error::NoAutomatonLoaded)?;
        Ok(evaluate::test(current, input))
    }

    /// Makes the pre-transformation automaton current again.
    pub fn restore_original(&mut self) -> Result<&Automaton> {
        let original = self.original.take().ok_or(Error::NoAutomatonLoaded)?;
        Ok(self.install(original, None))
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.original = None;
    }

    fn install(&mut self, automaton: Automaton, original: Option<Automaton>) -> &Automaton {
        self.original = original;
        self.current.insert(automaton)
    }
}
