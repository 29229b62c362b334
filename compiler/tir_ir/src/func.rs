//! Function node and attribute values.

use rustc_hash::FxHashMap;

use crate::{Buffer, DataType, IrError, IterVar, PrimExpr, Stmt, Var};

/// An attribute or annotation value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Expr(PrimExpr),
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<PrimExpr> for AttrValue {
    fn from(value: PrimExpr) -> Self {
        Self::Expr(value)
    }
}

/// String-keyed attribute map (function attrs, block annotations).
pub type Attrs = FxHashMap<String, AttrValue>;

/// Parameter variable → buffer descriptor.
pub type BufferMap = FxHashMap<Var, Buffer>;

/// Variable → thread-bound iteration variable.
pub type EnvThreads = FxHashMap<Var, IterVar>;

/// Function return type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Type {
    #[default]
    Void,
    Prim(DataType),
    Tuple(Vec<Type>),
}

/// A finished tensor function.
///
/// Functions are unnamed; the module they are registered in owns the name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimFunc {
    pub params: Vec<Var>,
    pub body: Stmt,
    pub ret_type: Type,
    pub buffer_map: BufferMap,
    pub preflattened_buffer_map: BufferMap,
    pub attrs: Attrs,
    pub env_threads: EnvThreads,
}

impl PrimFunc {
    /// Create a function. Fails if a parameter is listed twice.
    pub fn new(params: Vec<Var>, body: Stmt) -> Result<Self, IrError> {
        for (i, param) in params.iter().enumerate() {
            if params[..i].contains(param) {
                return Err(IrError::DuplicateParam {
                    name: param.name.clone(),
                });
            }
        }
        Ok(Self {
            params,
            body,
            ret_type: Type::Void,
            buffer_map: BufferMap::default(),
            preflattened_buffer_map: BufferMap::default(),
            attrs: Attrs::default(),
            env_threads: EnvThreads::default(),
        })
    }

    #[must_use]
    pub fn with_ret_type(mut self, ret_type: Type) -> Self {
        self.ret_type = ret_type;
        self
    }

    #[must_use]
    pub fn with_buffer_map(mut self, buffer_map: BufferMap) -> Self {
        self.buffer_map = buffer_map;
        self
    }

    #[must_use]
    pub fn with_preflattened_buffer_map(mut self, buffer_map: BufferMap) -> Self {
        self.preflattened_buffer_map = buffer_map;
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn with_env_threads(mut self, env_threads: EnvThreads) -> Self {
        self.env_threads = env_threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_params_rejected() {
        let a = Var::handle("a");
        let err = PrimFunc::new(vec![a.clone(), a], Stmt::no_op()).unwrap_err();
        assert_eq!(
            err,
            IrError::DuplicateParam {
                name: "a".to_owned()
            }
        );
    }

    #[test]
    fn same_name_distinct_params_allowed() {
        let func = PrimFunc::new(vec![Var::handle("a"), Var::handle("a")], Stmt::no_op());
        assert!(func.is_ok());
    }

    #[test]
    fn defaults() {
        let func = PrimFunc::new(vec![], Stmt::no_op()).unwrap();
        assert_eq!(func.ret_type, Type::Void);
        assert!(func.buffer_map.is_empty());
        assert!(func.attrs.is_empty());
    }
}
