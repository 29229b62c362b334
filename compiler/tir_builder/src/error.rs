//! Builder errors.

use thiserror::Error;
use tir_ir::IrError;

use crate::frame::{FrameHandle, FrameTag, SessionId};
use crate::module::ModuleError;

/// Error raised by a [`Builder`](crate::Builder) operation.
///
/// Every error surfaces at the violating call. None leaves the stack
/// half-modified: a frame either finalizes and attaches to its parent, or it
/// is discarded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// Exit requested on a frame that is not the top of the stack, or with no
    /// open frame at all.
    #[error("cannot exit {exited}: {}", describe_top(.top))]
    StackDiscipline {
        exited: FrameHandle,
        top: Option<FrameHandle>,
    },

    /// A realized block binds a different number of values than it has
    /// iteration variables.
    #[error("block `{block}` has {iter_vars} iteration variables but {iter_values} bound values")]
    ArityMismatch {
        block: String,
        iter_vars: usize,
        iter_values: usize,
    },

    /// A handle from another session was passed to this one.
    #[error("{handle} belongs to another session (this is {session})")]
    ForeignFrame {
        handle: FrameHandle,
        session: SessionId,
    },

    /// A statement was emitted with no open frame.
    #[error("no active scope to emit into")]
    NoActiveScope,

    /// The handle's frame has already been exited or unwound.
    #[error("{handle} is no longer open")]
    FrameClosed { handle: FrameHandle },

    /// The handle names a frame of a different kind than requested.
    #[error("expected a {expected} frame, found a {found} frame")]
    FrameKindMismatch { expected: FrameTag, found: FrameTag },

    /// No open frame of the requested kind encloses the current scope.
    #[error("no enclosing {kind} frame")]
    NoEnclosingFrame { kind: FrameTag },

    /// Set-once metadata was written twice under
    /// [`MetadataPolicy::FailOnConflict`](crate::MetadataPolicy::FailOnConflict).
    #[error("{kind} frame field `{field}` is already set")]
    MetadataConflict { kind: FrameTag, field: String },

    /// The session was finished while frames were still open. They have been
    /// unwound.
    #[error("{open} scope(s) still open at end of session")]
    UnclosedScopes { open: usize },

    /// The session was finished while statements finalized outside any
    /// frame were still waiting to be taken.
    #[error("{count} detached statement(s) never taken at end of session")]
    UnclaimedStatements { count: usize },

    /// An IR node constructor rejected the frame's contents.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The module rejected a finished function.
    #[error(transparent)]
    Module(#[from] ModuleError),
}

fn describe_top(top: &Option<FrameHandle>) -> String {
    match top {
        Some(top) => format!("{top} is still open above it"),
        None => "no frame is open".to_owned(),
    }
}
