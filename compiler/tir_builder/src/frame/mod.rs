//! Scope frames.
//!
//! A [`Frame`] is the mutable accumulation record of one open scope: the
//! statements emitted directly inside it plus kind-specific metadata held in
//! a [`FrameKind`]. The kind set is closed; [`Frame::finalize`] dispatches to
//! the per-kind assembly and consumes the frame, so a frame can finalize at
//! most once.
//!
//! # Kinds
//!
//! - [`PrimFuncFrame`]: one tensor function; finalizes into a [`PrimFunc`]
//!   delivered to the module.
//! - [`BlockFrame`]: one schedulable block; finalizes into a bare
//!   [`Block`](tir_ir::Block) or a [`BlockRealize`](tir_ir::BlockRealize).
//! - [`AssertFrame`]: a deferred runtime check guarding its nested
//!   statements.

mod assert;
mod block;
mod prim_func;

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tir_ir::{PrimFunc, Stmt};

use crate::{BuilderConfig, BuilderError, MetadataPolicy};

pub use self::assert::AssertFrame;
pub use self::block::{BlockFrame, DETECT_ACCESS_ANNOTATION};
pub use self::prim_func::PrimFuncFrame;

// ── Identity ────────────────────────────────────────────────────────

/// Identity of a builder session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SessionId(u32);

impl SessionId {
    #[inline]
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session #{}", self.0)
    }
}

/// Identity of a frame within its session. Allocated sequentially, never
/// reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct FrameId(u32);

impl FrameId {
    #[inline]
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Returned by scope entry; names one frame of one session.
///
/// Handles stay valid as values after the frame exits, but every operation
/// on a closed frame's handle fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    pub session: SessionId,
    pub frame: FrameId,
}

impl fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame #{} of {}", self.frame.0, self.session)
    }
}

/// Discriminant of a [`FrameKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameTag {
    PrimFunc,
    Block,
    Assert,
}

impl fmt::Display for FrameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimFunc => write!(f, "prim_func"),
            Self::Block => write!(f, "block"),
            Self::Assert => write!(f, "assert"),
        }
    }
}

// ── Frames ──────────────────────────────────────────────────────────

/// Kind-specific state of an open frame.
#[derive(Clone, Debug)]
pub enum FrameKind {
    PrimFunc(PrimFuncFrame),
    Block(BlockFrame),
    Assert(AssertFrame),
}

impl FrameKind {
    pub fn tag(&self) -> FrameTag {
        match self {
            Self::PrimFunc(_) => FrameTag::PrimFunc,
            Self::Block(_) => FrameTag::Block,
            Self::Assert(_) => FrameTag::Assert,
        }
    }

    /// Apply the session's metadata policy as the frame is entered.
    ///
    /// Under [`MetadataPolicy::FailOnConflict`] a frame whose set-once
    /// metadata was already overwritten before entry is rejected.
    pub(crate) fn enter(&mut self, policy: MetadataPolicy) -> Result<(), BuilderError> {
        let tag = self.tag();
        match self {
            Self::PrimFunc(frame) => frame.guard.enter(policy, tag),
            Self::Block(frame) => frame.guard.enter(policy, tag),
            Self::Assert(_) => Ok(()),
        }
    }
}

impl From<PrimFuncFrame> for FrameKind {
    fn from(frame: PrimFuncFrame) -> Self {
        Self::PrimFunc(frame)
    }
}

impl From<BlockFrame> for FrameKind {
    fn from(frame: BlockFrame) -> Self {
        Self::Block(frame)
    }
}

impl From<AssertFrame> for FrameKind {
    fn from(frame: AssertFrame) -> Self {
        Self::Assert(frame)
    }
}

/// One open scope.
#[derive(Clone, Debug)]
pub struct Frame {
    handle: FrameHandle,
    stmts: Vec<Stmt>,
    kind: FrameKind,
}

/// The node a frame produced on exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finalized {
    /// Delivered to the module under `name`.
    Function { name: Option<String>, func: PrimFunc },
    /// Attached to the parent frame.
    Stmt(Stmt),
}

impl Frame {
    pub(crate) fn new(handle: FrameHandle, kind: FrameKind) -> Self {
        Self {
            handle,
            stmts: Vec::new(),
            kind,
        }
    }

    #[inline]
    pub fn handle(&self) -> FrameHandle {
        self.handle
    }

    #[inline]
    pub fn tag(&self) -> FrameTag {
        self.kind.tag()
    }

    #[inline]
    pub fn kind(&self) -> &FrameKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_mut(&mut self) -> &mut FrameKind {
        &mut self.kind
    }

    /// Statements emitted directly into this frame so far.
    #[inline]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub(crate) fn push_stmt(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Build this frame's IR node.
    pub(crate) fn finalize(self, config: &BuilderConfig) -> Result<Finalized, BuilderError> {
        match self.kind {
            FrameKind::PrimFunc(frame) => frame.finalize(self.stmts),
            FrameKind::Block(frame) => frame.finalize(self.stmts, config).map(Finalized::Stmt),
            FrameKind::Assert(frame) => frame.finalize(self.stmts).map(Finalized::Stmt),
        }
    }
}

// ── Shared assembly helpers ─────────────────────────────────────────

/// Collapse a frame's statements into one body: none becomes a no-op, one
/// is passed through, more become an ordered sequence.
pub(crate) fn as_stmt(mut stmts: Vec<Stmt>) -> Stmt {
    if stmts.len() > 1 {
        Stmt::Seq(stmts)
    } else {
        stmts.pop().unwrap_or_else(Stmt::no_op)
    }
}

/// Conflict tracking for a frame's set-once metadata.
///
/// Until the frame is entered there is no session policy to consult, so an
/// overwrite is remembered and judged on entry.
#[derive(Clone, Debug, Default)]
pub(crate) struct MetadataGuard {
    policy: Option<MetadataPolicy>,
    overwritten: Option<String>,
}

impl MetadataGuard {
    pub(crate) fn enter(
        &mut self,
        policy: MetadataPolicy,
        kind: FrameTag,
    ) -> Result<(), BuilderError> {
        let overwritten = self.overwritten.take();
        if let (MetadataPolicy::FailOnConflict, Some(field)) = (policy, overwritten) {
            return Err(BuilderError::MetadataConflict { kind, field });
        }
        self.policy = Some(policy);
        Ok(())
    }

    /// Record that `field` is about to be written a second time.
    fn overwrite(&mut self, kind: FrameTag, field: String) -> Result<(), BuilderError> {
        match self.policy {
            Some(MetadataPolicy::FailOnConflict) => {
                Err(BuilderError::MetadataConflict { kind, field })
            }
            Some(MetadataPolicy::LastWriteWins) => Ok(()),
            None => {
                self.overwritten.get_or_insert(field);
                Ok(())
            }
        }
    }
}

/// Write a set-once slot.
pub(crate) fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    guard: &mut MetadataGuard,
    kind: FrameTag,
    field: &str,
) -> Result<(), BuilderError> {
    if slot.is_some() {
        guard.overwrite(kind, field.to_owned())?;
    }
    *slot = Some(value);
    Ok(())
}

/// Insert a map entry; an existing key counts as an overwrite.
pub(crate) fn insert_entry<K: Eq + Hash, V>(
    map: &mut FxHashMap<K, V>,
    key: K,
    value: V,
    guard: &mut MetadataGuard,
    kind: FrameTag,
    field: &str,
    key_name: &str,
) -> Result<(), BuilderError> {
    if map.contains_key(&key) {
        guard.overwrite(kind, format!("{field}[{key_name}]"))?;
    }
    map.insert(key, value);
    Ok(())
}

#[cfg(test)]
mod tests;
