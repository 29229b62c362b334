//! Statement nodes.
//!
//! Statements are immutable once built. Composite nodes ([`Block`],
//! [`BlockRealize`], [`AssertStmt`]) have fallible constructors that reject
//! malformed parts; the remaining variants are built directly.

use crate::{
    Attrs, Buffer, BufferRegion, IrError, IterVar, MatchBufferRegion, PrimExpr, TypeCode, Var,
};

/// Loop execution kind of a [`For`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ForKind {
    #[default]
    Serial,
    Parallel,
    Vectorized,
    Unrolled,
}

/// A statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// Evaluate an expression for its side effects.
    Evaluate(PrimExpr),
    /// `buffer[indices] = value`.
    BufferStore {
        buffer: Buffer,
        value: PrimExpr,
        indices: Vec<PrimExpr>,
    },
    /// Ordered composition; children run in order.
    Seq(Vec<Stmt>),
    /// Allocation scope: `buffer` lives for the duration of `body`.
    AllocBuffer { buffer: Buffer, body: Box<Stmt> },
    For(Box<For>),
    Block(Box<Block>),
    BlockRealize(Box<BlockRealize>),
    Assert(Box<AssertStmt>),
}

impl Stmt {
    /// The canonical empty statement: `evaluate(0)`.
    pub fn no_op() -> Self {
        Self::Evaluate(PrimExpr::int(0))
    }

    /// Returns `true` for the canonical empty statement.
    pub fn is_no_op(&self) -> bool {
        *self == Self::no_op()
    }

    pub fn evaluate(expr: PrimExpr) -> Self {
        Self::Evaluate(expr)
    }

    pub fn alloc_buffer(buffer: Buffer, body: Stmt) -> Self {
        Self::AllocBuffer {
            buffer,
            body: Box::new(body),
        }
    }

    /// Short name of the statement kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Evaluate(_) => "evaluate",
            Self::BufferStore { .. } => "buffer_store",
            Self::Seq(_) => "seq",
            Self::AllocBuffer { .. } => "alloc_buffer",
            Self::For(_) => "for",
            Self::Block(_) => "block",
            Self::BlockRealize(_) => "block_realize",
            Self::Assert(_) => "assert",
        }
    }
}

impl From<Block> for Stmt {
    fn from(block: Block) -> Self {
        Self::Block(Box::new(block))
    }
}

impl From<BlockRealize> for Stmt {
    fn from(realize: BlockRealize) -> Self {
        Self::BlockRealize(Box::new(realize))
    }
}

impl From<AssertStmt> for Stmt {
    fn from(assert: AssertStmt) -> Self {
        Self::Assert(Box::new(assert))
    }
}

impl From<For> for Stmt {
    fn from(for_loop: For) -> Self {
        Self::For(Box::new(for_loop))
    }
}

// ── Loops ───────────────────────────────────────────────────────────

/// `for loop_var in [min, min + extent): body`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct For {
    pub loop_var: Var,
    pub min: PrimExpr,
    pub extent: PrimExpr,
    pub kind: ForKind,
    pub body: Stmt,
}

impl For {
    pub fn new(loop_var: Var, min: PrimExpr, extent: PrimExpr, kind: ForKind, body: Stmt) -> Self {
        Self {
            loop_var,
            min,
            extent,
            kind,
            body,
        }
    }

    pub fn serial(loop_var: Var, extent: PrimExpr, body: Stmt) -> Self {
        Self::new(loop_var, PrimExpr::int(0), extent, ForKind::Serial, body)
    }
}

// ── Blocks ──────────────────────────────────────────────────────────

/// A schedulable unit of computation.
///
/// Built with [`Block::new`] and the `with_*` methods; the optional parts
/// default to empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub iter_vars: Vec<IterVar>,
    pub reads: Vec<BufferRegion>,
    pub writes: Vec<BufferRegion>,
    /// Runs once before the first iteration of a reduction.
    pub init: Option<Stmt>,
    pub body: Stmt,
    pub alloc_buffers: Vec<Buffer>,
    pub match_buffers: Vec<MatchBufferRegion>,
    pub annotations: Attrs,
}

impl Block {
    /// Create a block. Fails if a variable is bound by two iteration variables.
    pub fn new(
        name: impl Into<String>,
        iter_vars: Vec<IterVar>,
        body: Stmt,
    ) -> Result<Self, IrError> {
        let name = name.into();
        for (i, iv) in iter_vars.iter().enumerate() {
            if iter_vars[..i].iter().any(|prev| prev.var == iv.var) {
                return Err(IrError::DuplicateIterVar {
                    block: name,
                    name: iv.var.name.clone(),
                });
            }
        }
        Ok(Self {
            name,
            iter_vars,
            reads: Vec::new(),
            writes: Vec::new(),
            init: None,
            body,
            alloc_buffers: Vec::new(),
            match_buffers: Vec::new(),
            annotations: Attrs::default(),
        })
    }

    #[must_use]
    pub fn with_reads(mut self, reads: Vec<BufferRegion>) -> Self {
        self.reads = reads;
        self
    }

    #[must_use]
    pub fn with_writes(mut self, writes: Vec<BufferRegion>) -> Self {
        self.writes = writes;
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: Option<Stmt>) -> Self {
        self.init = init;
        self
    }

    #[must_use]
    pub fn with_alloc_buffers(mut self, alloc_buffers: Vec<Buffer>) -> Self {
        self.alloc_buffers = alloc_buffers;
        self
    }

    #[must_use]
    pub fn with_match_buffers(mut self, match_buffers: Vec<MatchBufferRegion>) -> Self {
        self.match_buffers = match_buffers;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Attrs) -> Self {
        self.annotations = annotations;
        self
    }
}

/// Binds a block's iteration variables to values, guarded by a predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRealize {
    pub iter_values: Vec<PrimExpr>,
    pub predicate: PrimExpr,
    pub block: Block,
}

impl BlockRealize {
    pub fn new(
        iter_values: Vec<PrimExpr>,
        predicate: PrimExpr,
        block: Block,
    ) -> Result<Self, IrError> {
        let dtype = predicate.dtype();
        if !dtype.is_bool() {
            return Err(IrError::NonBooleanPredicate {
                dtype: dtype.to_string(),
            });
        }
        Ok(Self {
            iter_values,
            predicate,
            block,
        })
    }
}

// ── Assertions ──────────────────────────────────────────────────────

/// Runtime check: if `condition` is false, abort with `message`; otherwise
/// run `body`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertStmt {
    pub condition: PrimExpr,
    pub message: PrimExpr,
    pub body: Stmt,
}

impl AssertStmt {
    /// Create an assertion. The message must be a string or an `int32` code.
    pub fn new(condition: PrimExpr, message: PrimExpr, body: Stmt) -> Result<Self, IrError> {
        let dtype = message.dtype();
        let is_code = dtype.code == TypeCode::Int && dtype.bits == 32 && dtype.is_scalar();
        if !matches!(message, PrimExpr::StringImm(_)) && !is_code {
            return Err(IrError::InvalidAssertMessage {
                dtype: dtype.to_string(),
            });
        }
        Ok(Self {
            condition,
            message,
            body,
        })
    }
}

#[cfg(test)]
mod tests;
