//! Scalar expressions and variables.
//!
//! [`PrimExpr`] is the expression language of the IR: immediates, variable
//! references, binary arithmetic/comparison, and buffer loads. Expressions
//! are plain trees; sharing is by clone.
//!
//! Floats are stored as `u64` bits so every expression is `Hash`.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::{Buffer, DataType};

// ── Variables ───────────────────────────────────────────────────────

static NEXT_VAR_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of a [`Var`].
///
/// Two variables with the same name are still distinct; identity is this ID,
/// allocated from a process-wide counter when the variable is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A scalar variable (loop variable, parameter, buffer data handle).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Var {
    pub id: VarId,
    pub name: String,
    pub dtype: DataType,
}

impl Var {
    /// Create a fresh variable, distinct from every other variable.
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        let id = VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            name: name.into(),
            dtype,
        }
    }

    /// Create a fresh `handle`-typed variable.
    pub fn handle(name: impl Into<String>) -> Self {
        Self::new(name, DataType::HANDLE)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ── Operators ───────────────────────────────────────────────────────

/// Binary operator of a [`PrimExpr::Binary`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    FloorMod,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Returns `true` if the result of this operator is `bool`.
    pub fn yields_bool(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::And | Self::Or
        )
    }
}

// ── Expressions ─────────────────────────────────────────────────────

/// Scalar expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimExpr {
    IntImm {
        value: i64,
        dtype: DataType,
    },
    FloatImm {
        bits: u64,
        dtype: DataType,
    },
    StringImm(String),
    Var(Var),
    Binary {
        op: BinaryOp,
        lhs: Box<PrimExpr>,
        rhs: Box<PrimExpr>,
    },
    Not(Box<PrimExpr>),
    BufferLoad {
        buffer: Box<Buffer>,
        indices: Vec<PrimExpr>,
    },
}

impl PrimExpr {
    /// `int32` immediate.
    pub fn int(value: i64) -> Self {
        Self::IntImm {
            value,
            dtype: DataType::INT32,
        }
    }

    /// Integer immediate of an explicit type.
    pub fn int_of(value: i64, dtype: DataType) -> Self {
        Self::IntImm { value, dtype }
    }

    /// `float32` immediate.
    pub fn float(value: f64) -> Self {
        Self::FloatImm {
            bits: value.to_bits(),
            dtype: DataType::FLOAT32,
        }
    }

    /// Boolean immediate.
    pub fn bool(value: bool) -> Self {
        Self::IntImm {
            value: i64::from(value),
            dtype: DataType::BOOL,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::StringImm(value.into())
    }

    pub fn binary(op: BinaryOp, lhs: PrimExpr, rhs: PrimExpr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn lt(self, rhs: PrimExpr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    #[must_use]
    pub fn and(self, rhs: PrimExpr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    /// The element type this expression evaluates to.
    pub fn dtype(&self) -> DataType {
        match self {
            Self::IntImm { dtype, .. } | Self::FloatImm { dtype, .. } => *dtype,
            Self::StringImm(_) => DataType::HANDLE,
            Self::Var(var) => var.dtype,
            Self::Binary { op, lhs, .. } => {
                if op.yields_bool() {
                    DataType::BOOL
                } else {
                    lhs.dtype()
                }
            }
            Self::Not(_) => DataType::BOOL,
            Self::BufferLoad { buffer, .. } => buffer.dtype,
        }
    }

    /// Returns `true` for the literal `true`.
    pub fn is_const_true(&self) -> bool {
        matches!(self, Self::IntImm { value: 1, dtype } if dtype.is_bool())
    }
}

impl std::ops::Add for PrimExpr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Add, self, rhs)
    }
}

impl std::ops::Mul for PrimExpr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Mul, self, rhs)
    }
}

impl From<Var> for PrimExpr {
    fn from(var: Var) -> Self {
        Self::Var(var)
    }
}

impl From<&Var> for PrimExpr {
    fn from(var: &Var) -> Self {
        Self::Var(var.clone())
    }
}

// ── Ranges ──────────────────────────────────────────────────────────

/// Half-open interval `[min, min + extent)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: PrimExpr,
    pub extent: PrimExpr,
}

impl Range {
    pub fn new(min: PrimExpr, extent: PrimExpr) -> Self {
        Self { min, extent }
    }

    /// `[0, extent)`.
    pub fn from_extent(extent: PrimExpr) -> Self {
        Self::new(PrimExpr::int(0), extent)
    }

    /// The single point `index`.
    pub fn point(index: PrimExpr) -> Self {
        Self::new(index, PrimExpr::int(1))
    }
}
