//! TIR - leaf node types for the tensor IR builder
//!
//! This crate contains the immutable data structures that scope frames
//! assemble:
//! - Scalar data types and variables
//! - Expressions ([`PrimExpr`]) and ranges
//! - Buffers, buffer regions and match-buffer bindings
//! - Statements, blocks, block realizations and assertions
//! - The function node ([`PrimFunc`]) and its attribute maps
//!
//! # Design Philosophy
//!
//! - **Plain trees**: nodes own their children; sharing is by clone.
//! - **Identity by ID**: [`Var`] equality is its [`VarId`], not its name.
//! - **Validate at construction**: composite nodes whose parts can be
//!   inconsistent have fallible constructors returning [`IrError`].
//!
//! Types that contain floats store them as `u64` bits for `Hash`
//! compatibility.

mod buffer;
mod dtype;
mod error;
mod expr;
mod func;
mod iter_var;
mod stmt;

pub use buffer::{Buffer, BufferRegion, MatchBufferRegion};
pub use dtype::{DataType, TypeCode};
pub use error::IrError;
pub use expr::{BinaryOp, PrimExpr, Range, Var, VarId};
pub use func::{AttrValue, Attrs, BufferMap, EnvThreads, PrimFunc, Type};
pub use iter_var::{IterKind, IterVar};
pub use stmt::{AssertStmt, Block, BlockRealize, For, ForKind, Stmt};
