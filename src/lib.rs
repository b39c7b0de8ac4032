//! # fsa_convert
//!
//! `fsa_convert` turns NFAs into DFAs by subset construction, builds tries for
//! finite languages and minimizes them into DAFSAs, and tests strings against
//! any of the resulting automata.
//!
//! ```
//! use fsa_convert::{build_trie, minimize_acyclic, test, Language};
//!
//! let language = Language::new(['a', 'b'], ["", "a", "ab", "aabb"]);
//! let trie = build_trie(&language).unwrap();
//! let dafsa = minimize_acyclic(&trie).unwrap();
//! assert!(dafsa.num_states() < trie.num_states());
//! assert!(test(&dafsa, "aabb").accepted);
//! ```

pub mod automaton;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod minimize;
pub mod session;
pub mod subset;
pub mod trie;
pub mod validate;

pub use automaton::{Automaton, StateId, Symbol};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use evaluate::{test, test_batch, Reason, Verdict};
pub use minimize::{minimize_acyclic, Minimizer};
pub use session::Session;
pub use subset::subset_construct;
pub use trie::{build_trie, Language, TrieBuilder};
pub use validate::{validate, validate_language, Validator};

#[cfg(feature = "python-bindings")]
mod python_bindings;
