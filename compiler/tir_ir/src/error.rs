//! Errors raised by fallible IR node constructors.

use thiserror::Error;

/// A node could not be constructed because its parts are malformed.
///
/// Raised by constructors such as [`BufferRegion::new`](crate::BufferRegion::new)
/// and [`PrimFunc::new`](crate::PrimFunc::new). Builders propagate these
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IrError {
    /// A region does not cover every dimension of its buffer.
    #[error("region for buffer `{buffer}` has {found} ranges, buffer has {expected} dimensions")]
    RegionRankMismatch {
        buffer: String,
        expected: usize,
        found: usize,
    },

    /// A matched buffer has more dimensions than the region it views.
    #[error("match buffer `{buffer}` has {buffer_ndim} dimensions, source region has only {region_ndim}")]
    MatchBufferRankMismatch {
        buffer: String,
        buffer_ndim: usize,
        region_ndim: usize,
    },

    /// The same variable appears twice in a function's parameter list.
    #[error("parameter `{name}` appears more than once")]
    DuplicateParam { name: String },

    /// The same variable is bound by two iteration variables of one block.
    #[error("block `{block}` binds iteration variable `{name}` more than once")]
    DuplicateIterVar { block: String, name: String },

    /// A realize predicate is not a boolean expression.
    #[error("block predicate must be bool, found {dtype}")]
    NonBooleanPredicate { dtype: String },

    /// An assertion message is neither a string nor an `int32` code.
    #[error("assert message must be a string or int32 code, found {dtype}")]
    InvalidAssertMessage { dtype: String },
}
