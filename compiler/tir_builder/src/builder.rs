//! Builder session: the scope protocol driven by a front-end.
//!
//! A [`Builder`] owns one [`FrameStack`] and the [`FunctionSink`] finished
//! functions are delivered to. Sessions are independent: each has its own
//! [`SessionId`], and handles from one session are rejected by every other.
//!
//! # Protocol
//!
//! ```text
//! let f = builder.enter_scope(PrimFuncFrame::named("main"))?;
//! let root = builder.enter_scope(BlockFrame::new("root").with_no_realize(true))?;
//! builder.add_stmt(store)?;
//! builder.exit_scope(root)?;   // bare block attached to `f`
//! builder.exit_scope(f)?;      // function registered with the sink
//! ```
//!
//! The caller guarantees that every entered scope is either exited or
//! unwound on every control-flow path. [`Builder::scope`] packages that
//! guarantee for closure-shaped callers.

use std::sync::atomic::{AtomicU32, Ordering};

use tir_ir::Stmt;

use crate::frame::{
    AssertFrame, BlockFrame, Finalized, Frame, FrameHandle, FrameKind, FrameTag, PrimFuncFrame,
    SessionId,
};
use crate::module::{FunctionSink, IrModule};
use crate::stack::FrameStack;
use crate::{BuilderConfig, BuilderError};

static NEXT_SESSION: AtomicU32 = AtomicU32::new(0);

/// One IR construction session.
pub struct Builder<S: FunctionSink = IrModule> {
    stack: FrameStack,
    sink: S,
    detached: Vec<Stmt>,
}

impl Default for Builder<IrModule> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<IrModule> {
    /// A session with default configuration delivering into a fresh module.
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self::with_sink(config, IrModule::new())
    }
}

impl<S: FunctionSink> Builder<S> {
    /// A session delivering finished functions to `sink`.
    pub fn with_sink(config: BuilderConfig, sink: S) -> Self {
        let session = SessionId::new(NEXT_SESSION.fetch_add(1, Ordering::Relaxed));
        Self {
            stack: FrameStack::new(session, config),
            sink,
            detached: Vec::new(),
        }
    }

    #[inline]
    pub fn session(&self) -> SessionId {
        self.stack.session()
    }

    #[inline]
    pub fn config(&self) -> &BuilderConfig {
        self.stack.config()
    }

    /// Number of open frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    #[inline]
    pub fn stack(&self) -> &FrameStack {
        &self.stack
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // Scope protocol

    /// Open a scope. The returned handle must later be passed to
    /// [`exit_scope`](Self::exit_scope) or [`unwind_to`](Self::unwind_to).
    ///
    /// Fails with [`BuilderError::MetadataConflict`] when the session runs
    /// under [`MetadataPolicy::FailOnConflict`](crate::MetadataPolicy) and a
    /// set-once field of `frame` was written twice before entry. The frame is
    /// not pushed.
    pub fn enter_scope(
        &mut self,
        frame: impl Into<FrameKind>,
    ) -> Result<FrameHandle, BuilderError> {
        let frame = frame.into();
        let kind = frame.tag();
        let handle = match self.stack.push(frame) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::debug!(%kind, error = %err, "enter scope rejected");
                return Err(err);
            }
        };
        tracing::debug!(
            session = handle.session.raw(),
            frame = handle.frame.raw(),
            %kind,
            depth = self.stack.depth(),
            "enter scope"
        );
        Ok(handle)
    }

    /// Close the top scope: finalize it and attach the result.
    ///
    /// Statements go to the new top frame, or to the detached list if the
    /// stack is now empty. Functions go to the sink.
    pub fn exit_scope(&mut self, handle: FrameHandle) -> Result<(), BuilderError> {
        let finalized = match self.stack.pop_and_finalize(handle) {
            Ok(finalized) => finalized,
            Err(err) => {
                tracing::debug!(%handle, error = %err, "exit scope failed");
                return Err(err);
            }
        };
        tracing::debug!(
            session = handle.session.raw(),
            frame = handle.frame.raw(),
            depth = self.stack.depth(),
            "exit scope"
        );
        self.attach(finalized)
    }

    fn attach(&mut self, finalized: Finalized) -> Result<(), BuilderError> {
        match finalized {
            Finalized::Function { name, func } => {
                let name = self.sink.register_function(name, func)?;
                tracing::debug!(function = %name, "registered function");
            }
            Finalized::Stmt(stmt) => match self.stack.current_mut() {
                Ok(parent) => parent.push_stmt(stmt),
                Err(_) => {
                    tracing::debug!(kind = stmt.kind_name(), "detached statement");
                    self.detached.push(stmt);
                }
            },
        }
        Ok(())
    }

    /// Append a finished statement to the current frame.
    pub fn add_stmt(&mut self, stmt: Stmt) -> Result<(), BuilderError> {
        tracing::trace!(kind = stmt.kind_name(), depth = self.stack.depth(), "add stmt");
        self.stack.add_stmt(stmt)
    }

    /// Run `body` inside a new scope.
    ///
    /// On success the scope is exited and finalized. If `body` fails, or the
    /// exit itself fails, the scope and anything `body` left open above it
    /// are unwound without finalization and the error is returned.
    pub fn scope<T, E>(
        &mut self,
        frame: impl Into<FrameKind>,
        body: impl FnOnce(&mut Self, FrameHandle) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<BuilderError>,
    {
        let handle = self.enter_scope(frame)?;
        match body(self, handle) {
            Ok(value) => {
                if let Err(err) = self.exit_scope(handle) {
                    self.discard_from(handle);
                    return Err(err.into());
                }
                Ok(value)
            }
            Err(err) => {
                self.discard_from(handle);
                Err(err)
            }
        }
    }

    fn discard_from(&mut self, handle: FrameHandle) {
        let discarded = self.stack.unwind_to(handle);
        if discarded > 0 {
            tracing::warn!(%handle, discarded, "unwound abandoned scopes");
        }
    }

    /// Discard `handle`'s frame and everything above it without finalizing.
    pub fn unwind_to(&mut self, handle: FrameHandle) -> Result<usize, BuilderError> {
        self.stack.check_session(handle)?;
        let discarded = self.stack.unwind_to(handle);
        if discarded > 0 {
            tracing::warn!(%handle, discarded, "unwound scopes");
        }
        Ok(discarded)
    }

    /// Discard every open frame without finalizing.
    pub fn unwind(&mut self) -> usize {
        let discarded = self.stack.unwind_all();
        if discarded > 0 {
            tracing::warn!(session = self.session().raw(), discarded, "unwound all scopes");
        }
        discarded
    }

    /// End the session and return the sink.
    ///
    /// Fails with [`BuilderError::UnclosedScopes`] if frames are still open;
    /// they are unwound first, so nothing partial reaches the sink. Fails with
    /// [`BuilderError::UnclaimedStatements`] if detached statements were never
    /// taken with [`take_detached`](Self::take_detached).
    pub fn finish(mut self) -> Result<S, BuilderError> {
        let open = self.unwind();
        if open > 0 {
            return Err(BuilderError::UnclosedScopes { open });
        }
        if !self.detached.is_empty() {
            return Err(BuilderError::UnclaimedStatements {
                count: self.detached.len(),
            });
        }
        Ok(self.sink)
    }

    /// Take the statements finalized while no frame was open.
    pub fn take_detached(&mut self) -> Vec<Stmt> {
        std::mem::take(&mut self.detached)
    }

    // Frame access

    pub fn current(&self) -> Result<&Frame, BuilderError> {
        self.stack.current()
    }

    pub fn frame(&self, handle: FrameHandle) -> Result<&Frame, BuilderError> {
        self.stack.get(handle)
    }

    pub fn prim_func_mut(&mut self, handle: FrameHandle) -> Result<&mut PrimFuncFrame, BuilderError> {
        as_prim_func(self.stack.get_mut(handle)?)
    }

    pub fn block_mut(&mut self, handle: FrameHandle) -> Result<&mut BlockFrame, BuilderError> {
        as_block(self.stack.get_mut(handle)?)
    }

    pub fn assert_frame(&self, handle: FrameHandle) -> Result<&AssertFrame, BuilderError> {
        let frame = self.stack.get(handle)?;
        match frame.kind() {
            FrameKind::Assert(assert) => Ok(assert),
            other => Err(BuilderError::FrameKindMismatch {
                expected: FrameTag::Assert,
                found: other.tag(),
            }),
        }
    }

    /// The innermost open function frame.
    pub fn enclosing_prim_func_mut(&mut self) -> Result<&mut PrimFuncFrame, BuilderError> {
        let frame = self
            .stack
            .innermost_mut(FrameTag::PrimFunc)
            .ok_or(BuilderError::NoEnclosingFrame {
                kind: FrameTag::PrimFunc,
            })?;
        as_prim_func(frame)
    }

    /// The innermost open block frame.
    pub fn enclosing_block_mut(&mut self) -> Result<&mut BlockFrame, BuilderError> {
        let frame = self
            .stack
            .innermost_mut(FrameTag::Block)
            .ok_or(BuilderError::NoEnclosingFrame {
                kind: FrameTag::Block,
            })?;
        as_block(frame)
    }
}

fn as_prim_func(frame: &mut Frame) -> Result<&mut PrimFuncFrame, BuilderError> {
    match frame.kind_mut() {
        FrameKind::PrimFunc(func) => Ok(func),
        other => Err(BuilderError::FrameKindMismatch {
            expected: FrameTag::PrimFunc,
            found: other.tag(),
        }),
    }
}

fn as_block(frame: &mut Frame) -> Result<&mut BlockFrame, BuilderError> {
    match frame.kind_mut() {
        FrameKind::Block(block) => Ok(block),
        other => Err(BuilderError::FrameKindMismatch {
            expected: FrameTag::Block,
            found: other.tag(),
        }),
    }
}
