//! The module a session delivers finished functions to.
//!
//! [`FunctionSink`] is the downstream contract: one `register_function`
//! call per function frame exit. [`IrModule`] is the in-memory module used
//! by default; embedders with their own module representation implement the
//! trait instead.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tir_ir::PrimFunc;

/// Name given to functions registered without one, unless overridden.
pub const DEFAULT_FUNCTION_NAME: &str = "main";

/// Error raised by a [`FunctionSink`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("function `{name}` is already defined in this module")]
    DuplicateFunction { name: String },
}

/// Receives finished functions from a builder session.
pub trait FunctionSink {
    /// Register `func` under `name`, resolving an absent name to a default.
    ///
    /// Returns the name the function was registered under.
    fn register_function(
        &mut self,
        name: Option<String>,
        func: PrimFunc,
    ) -> Result<String, ModuleError>;
}

/// An ordered collection of named functions.
#[derive(Clone, Debug)]
pub struct IrModule {
    default_name: String,
    functions: Vec<(String, PrimFunc)>,
    index: FxHashMap<String, usize>,
}

impl Default for IrModule {
    fn default() -> Self {
        Self::new()
    }
}

impl IrModule {
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_FUNCTION_NAME)
    }

    /// Create an empty module that names anonymous functions `default_name`.
    pub fn with_default_name(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
            functions: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PrimFunc> {
        self.index.get(name).map(|&i| &self.functions[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Function names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.iter().map(|(name, _)| name.as_str())
    }

    /// Functions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PrimFunc)> + '_ {
        self.functions.iter().map(|(name, func)| (name.as_str(), func))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionSink for IrModule {
    fn register_function(
        &mut self,
        name: Option<String>,
        func: PrimFunc,
    ) -> Result<String, ModuleError> {
        let name = name.unwrap_or_else(|| self.default_name.clone());
        if self.index.contains_key(&name) {
            return Err(ModuleError::DuplicateFunction { name });
        }
        self.index.insert(name.clone(), self.functions.len());
        self.functions.push((name.clone(), func));
        Ok(name)
    }
}
