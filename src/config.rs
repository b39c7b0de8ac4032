//! Knobs shared by the validator, the trie builder and the minimizer.
//!
//! Every option is optional; an unset option falls back to its default when
//! read through the corresponding `get_*` accessor.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    check_references: Option<bool>,
    state_prefix: Option<String>,
    prune_dead_states: Option<bool>,
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    /// Also verify that `start`, `accept` and transition destinations name
    /// declared states, and that transition symbols are in the alphabet.
    pub fn check_references(mut self, yes: bool) -> Config {
        self.check_references = Some(yes);
        self
    }

    /// Prefix of the state names generated by the trie builder.
    pub fn state_prefix(mut self, prefix: impl Into<String>) -> Config {
        self.state_prefix = Some(prefix.into());
        self
    }

    /// Drop states whose right language is empty when minimizing.
    pub fn prune_dead_states(mut self, yes: bool) -> Config {
        self.prune_dead_states = Some(yes);
        self
    }

    pub fn get_check_references(&self) -> bool {
        self.check_references.unwrap_or(false)
    }

    pub fn get_state_prefix(&self) -> &str {
        self.state_prefix.as_deref().unwrap_or("q")
    }

    pub fn get_prune_dead_states(&self) -> bool {
        self.prune_dead_states.unwrap_or(true)
    }

    /// Overwrite options set in `other`, keeping ours where `other` is unset.
    pub(crate) fn overwrite(&self, other: Config) -> Config {
        Config {
            check_references: other.check_references.or(self.check_references),
            state_prefix: other.state_prefix.or_else(|| self.state_prefix.clone()),
            prune_dead_states: other.prune_dead_states.or(self.prune_dead_states),
        }
    }
}
