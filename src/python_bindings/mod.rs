//! Provides tools and interfaces to integrate the crate's functionality with Python.

use std::sync::{Arc, PoisonError, RwLock};

use bincode::{Decode, Encode};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rustc_hash::FxHashSet as HashSet;
use serde_json::Value;

use crate::automaton::Automaton;
use crate::config::Config;
use crate::evaluate::{test, test_batch};
use crate::minimize::minimize_acyclic;
use crate::session::Session;
use crate::subset::subset_construct;
use crate::trie::build_trie;
use crate::validate::{validate, validate_language};

#[pyclass(name = "Automaton", module = "fsa_convert.fsa_convert_rs")]
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
pub struct PyAutomaton(Arc<Automaton>);

#[pyclass(name = "Session", module = "fsa_convert.fsa_convert_rs")]
#[derive(Clone, Debug)]
pub struct PySession(Arc<RwLock<Session>>);

fn to_json_value(definition: &Bound<'_, PyAny>) -> PyResult<Value> {
    serde_pyobject::from_pyobject(definition.clone()).map_err(|e| {
        PyErr::new::<PyValueError, _>(format!("Definition is not JSON-like: {}", e))
    })
}

fn to_python<'py, T: serde::Serialize>(py: Python<'py>, value: &T) -> PyResult<Bound<'py, PyAny>> {
    serde_pyobject::to_pyobject(py, value)
        .map_err(|e| PyErr::new::<PyValueError, _>(format!("Conversion to Python failed: {}", e)))
}

#[pymethods]
impl PyAutomaton {
    #[new]
    fn __new__(definition: &Bound<'_, PyAny>) -> PyResult<Self> {
        let raw = to_json_value(definition)?;
        validate(&raw)
            .map(|x| PyAutomaton(Arc::new(x)))
            .map_err(Into::into)
    }

    #[staticmethod]
    fn from_json(definition: &str) -> PyResult<Self> {
        Automaton::from_json_str(definition)
            .map(|x| PyAutomaton(Arc::new(x)))
            .map_err(Into::into)
    }

    #[staticmethod]
    fn from_language(py: Python<'_>, definition: &Bound<'_, PyAny>) -> PyResult<Self> {
        let language = validate_language(&to_json_value(definition)?)?;
        py.allow_threads(|| {
            build_trie(&language)
                .map(|x| PyAutomaton(Arc::new(x)))
                .map_err(Into::into)
        })
    }

    fn subset_construct(&self, py: Python<'_>) -> Self {
        py.allow_threads(|| PyAutomaton(Arc::new(subset_construct(&self.0))))
    }

    fn minimize_acyclic(&self, py: Python<'_>) -> PyResult<Self> {
        py.allow_threads(|| {
            minimize_acyclic(&self.0)
                .map(|x| PyAutomaton(Arc::new(x)))
                .map_err(Into::into)
        })
    }

    fn test<'py>(&self, py: Python<'py>, input: &str) -> PyResult<Bound<'py, PyAny>> {
        to_python(py, &test(&self.0, input))
    }

    fn test_batch<'py>(&self, py: Python<'py>, inputs: Vec<String>) -> PyResult<Bound<'py, PyAny>> {
        let verdicts = py.allow_threads(|| test_batch(&self.0, &inputs));
        to_python(py, &verdicts)
    }

    fn get_states(&self) -> Vec<String> {
        self.0.states().to_vec()
    }

    fn get_alphabet(&self) -> Vec<char> {
        self.0.alphabet().to_vec()
    }

    fn get_start(&self) -> String {
        self.0.start().to_string()
    }

    fn get_accept(&self) -> HashSet<String> {
        self.0.accept().clone()
    }

    fn get_successors(&self, state: &str, symbol: char) -> Vec<String> {
        self.0.successors(state, symbol).to_vec()
    }

    fn is_deterministic(&self) -> bool {
        self.0.is_deterministic()
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        to_python(py, &self.0.to_json())
    }

    fn to_json(&self) -> String {
        self.0.to_json().to_string()
    }

    fn __repr__(&self) -> String {
        format!("{:#?}", self.0)
    }

    fn __str__(&self) -> String {
        format!("{}", self.0)
    }

    fn __eq__(&self, other: &PyAutomaton) -> bool {
        *self.0 == *other.0
    }

    fn __deepcopy__(&self, _py: Python<'_>, _memo: Py<PyDict>) -> Self {
        PyAutomaton(Arc::new((*self.0).clone()))
    }

    fn __reduce__(&self) -> PyResult<(PyObject, (Vec<u8>,))> {
        Python::with_gil(|py| {
            let cls = PyModule::import(py, "fsa_convert.fsa_convert_rs")?.getattr("Automaton")?;
            let binary_data = self.0.to_binary()?;
            Ok((cls.getattr("from_binary")?.unbind(), (binary_data,)))
        })
    }

    #[staticmethod]
    fn from_binary(binary_data: Vec<u8>) -> PyResult<Self> {
        let automaton = Automaton::from_binary(&binary_data)?;
        Ok(PyAutomaton(Arc::new(automaton)))
    }
}

fn map_poison_error_to_pyerr<G>(_: PoisonError<G>) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>("RwLock poisoned")
}

#[pymethods]
impl PySession {
    #[new]
    #[pyo3(signature = (check_references=false, state_prefix=None, prune_dead_states=true))]
    fn __new__(
        check_references: bool,
        state_prefix: Option<String>,
        prune_dead_states: bool,
    ) -> Self {
        let mut config = Config::new()
            .check_references(check_references)
            .prune_dead_states(prune_dead_states);
        if let Some(prefix) = state_prefix {
            config = config.state_prefix(prefix);
        }
        PySession(Arc::new(RwLock::new(Session::new(config))))
    }

    fn load_automaton(&self, definition: &Bound<'_, PyAny>) -> PyResult<PyAutomaton> {
        let raw = to_json_value(definition)?;
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        let automaton = session_guard.load_automaton(&raw)?;
        Ok(PyAutomaton(Arc::new(automaton.clone())))
    }

    fn load_language(&self, definition: &Bound<'_, PyAny>) -> PyResult<PyAutomaton> {
        let raw = to_json_value(definition)?;
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        let automaton = session_guard.load_language(&raw)?;
        Ok(PyAutomaton(Arc::new(automaton.clone())))
    }

    fn convert(&self) -> PyResult<PyAutomaton> {
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        let automaton = session_guard.convert()?;
        Ok(PyAutomaton(Arc::new(automaton.clone())))
    }

    fn minimize(&self) -> PyResult<PyAutomaton> {
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        let automaton = session_guard.minimize()?;
        Ok(PyAutomaton(Arc::new(automaton.clone())))
    }

    fn restore_original(&self) -> PyResult<PyAutomaton> {
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        let automaton = session_guard.restore_original()?;
        Ok(PyAutomaton(Arc::new(automaton.clone())))
    }

    fn test<'py>(&self, py: Python<'py>, input: &str) -> PyResult<Bound<'py, PyAny>> {
        let session_guard = self.0.read().map_err(map_poison_error_to_pyerr)?;
        to_python(py, &session_guard.test(input)?)
    }

    fn current(&self) -> PyResult<Option<PyAutomaton>> {
        let session_guard = self.0.read().map_err(map_poison_error_to_pyerr)?;
        Ok(session_guard
            .current()
            .map(|automaton| PyAutomaton(Arc::new(automaton.clone()))))
    }

    fn original(&self) -> PyResult<Option<PyAutomaton>> {
        let session_guard = self.0.read().map_err(map_poison_error_to_pyerr)?;
        Ok(session_guard
            .original()
            .map(|automaton| PyAutomaton(Arc::new(automaton.clone()))))
    }

    fn clear(&self) -> PyResult<()> {
        let mut session_guard = self.0.write().map_err(map_poison_error_to_pyerr)?;
        session_guard.clear();
        Ok(())
    }
}

#[pymodule]
fn fsa_convert_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAutomaton>()?;
    m.add_class::<PySession>()?;

    Ok(())
}
