//! The frame stack of one session.
//!
//! Frames exit in strict reverse order of entry. [`FrameStack`] enforces
//! that discipline: only the top frame can be popped, and popping consumes
//! the frame into its finalized node. Frames can also be discarded without
//! finalization when a scope is abandoned.

use tir_ir::Stmt;

use crate::frame::{Finalized, Frame, FrameHandle, FrameId, FrameKind, FrameTag, SessionId};
use crate::{BuilderConfig, BuilderError};

/// Ordered stack of open frames, bottom first.
#[derive(Clone, Debug)]
pub struct FrameStack {
    session: SessionId,
    config: BuilderConfig,
    frames: Vec<Frame>,
    next_frame: u32,
}

impl FrameStack {
    pub fn new(session: SessionId, config: BuilderConfig) -> Self {
        Self {
            session,
            config,
            frames: Vec::new(),
            next_frame: 0,
        }
    }

    #[inline]
    pub fn session(&self) -> SessionId {
        self.session
    }

    #[inline]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Open frames, outermost first.
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    /// Handle of the top frame, if any.
    pub fn top_handle(&self) -> Option<FrameHandle> {
        self.frames.last().map(Frame::handle)
    }

    /// Make `kind` the new top frame.
    ///
    /// Fails with [`BuilderError::MetadataConflict`] if the frame's metadata
    /// was overwritten before entry and the session does not allow it. A
    /// rejected frame is dropped and consumes no ID.
    pub fn push(&mut self, kind: impl Into<FrameKind>) -> Result<FrameHandle, BuilderError> {
        let mut kind = kind.into();
        kind.enter(self.config.metadata_policy)?;
        let handle = FrameHandle {
            session: self.session,
            frame: FrameId::new(self.next_frame),
        };
        self.next_frame += 1;
        self.frames.push(Frame::new(handle, kind));
        Ok(handle)
    }

    /// The top frame.
    pub fn current(&self) -> Result<&Frame, BuilderError> {
        self.frames.last().ok_or(BuilderError::NoActiveScope)
    }

    pub fn current_mut(&mut self) -> Result<&mut Frame, BuilderError> {
        self.frames.last_mut().ok_or(BuilderError::NoActiveScope)
    }

    /// Append a finished statement to the top frame.
    pub fn add_stmt(&mut self, stmt: Stmt) -> Result<(), BuilderError> {
        self.current_mut()?.push_stmt(stmt);
        Ok(())
    }

    /// Fail with [`BuilderError::ForeignFrame`] unless `handle` was issued by
    /// this stack.
    pub fn check_session(&self, handle: FrameHandle) -> Result<(), BuilderError> {
        if handle.session == self.session {
            Ok(())
        } else {
            Err(BuilderError::ForeignFrame {
                handle,
                session: self.session,
            })
        }
    }

    fn position(&self, handle: FrameHandle) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.handle() == handle)
    }

    /// The open frame named by `handle`.
    pub fn get(&self, handle: FrameHandle) -> Result<&Frame, BuilderError> {
        self.check_session(handle)?;
        let index = self
            .position(handle)
            .ok_or(BuilderError::FrameClosed { handle })?;
        Ok(&self.frames[index])
    }

    pub fn get_mut(&mut self, handle: FrameHandle) -> Result<&mut Frame, BuilderError> {
        self.check_session(handle)?;
        let index = self
            .position(handle)
            .ok_or(BuilderError::FrameClosed { handle })?;
        Ok(&mut self.frames[index])
    }

    /// The innermost open frame of kind `tag`.
    pub fn innermost_mut(&mut self, tag: FrameTag) -> Option<&mut Frame> {
        self.frames.iter_mut().rev().find(|frame| frame.tag() == tag)
    }

    /// Pop the top frame and build its node.
    ///
    /// `handle` must name the top frame. If finalization fails, the frame is
    /// gone and the stack below it is untouched.
    pub fn pop_and_finalize(&mut self, handle: FrameHandle) -> Result<Finalized, BuilderError> {
        self.check_session(handle)?;
        let top = self.top_handle();
        if top != Some(handle) {
            return Err(BuilderError::StackDiscipline {
                exited: handle,
                top,
            });
        }
        match self.frames.pop() {
            Some(frame) => frame.finalize(&self.config),
            None => Err(BuilderError::StackDiscipline {
                exited: handle,
                top: None,
            }),
        }
    }

    /// Discard `handle`'s frame and every frame above it without finalizing.
    ///
    /// Returns the number of frames discarded; zero if `handle` is not open.
    pub fn unwind_to(&mut self, handle: FrameHandle) -> usize {
        match self.position(handle) {
            Some(index) => {
                let discarded = self.frames.len() - index;
                self.frames.truncate(index);
                discarded
            }
            None => 0,
        }
    }

    /// Discard every open frame without finalizing.
    pub fn unwind_all(&mut self) -> usize {
        let discarded = self.frames.len();
        self.frames.clear();
        discarded
    }
}
