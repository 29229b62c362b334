//! Block frame.
//!
//! A block frame collects one schedulable unit: iteration variables and
//! their bindings, read/write footprints, an optional init branch, local
//! allocations, match-buffer bindings and annotations. On exit it becomes
//! either a bare [`Block`] (`no_realize`) or a [`BlockRealize`] binding the
//! iteration values and predicate around it.

use tir_ir::{
    AttrValue, Attrs, Block, BlockRealize, Buffer, BufferRegion, IterVar, MatchBufferRegion,
    PrimExpr, Stmt,
};

use super::{as_stmt, insert_entry, set_once, FrameTag, MetadataGuard};
use crate::{BuilderConfig, BuilderError};

/// Annotation recording which footprints were never declared.
///
/// Bit 0 is set when reads are missing, bit 1 when writes are missing.
pub const DETECT_ACCESS_ANNOTATION: &str = "tir.script_parsing_detect_access";

/// Lexical scope of one block.
#[derive(Clone, Debug)]
pub struct BlockFrame {
    name: String,
    iter_vars: Vec<IterVar>,
    reads: Option<Vec<BufferRegion>>,
    writes: Option<Vec<BufferRegion>>,
    init: Option<Stmt>,
    alloc_buffers: Vec<Buffer>,
    match_buffers: Vec<MatchBufferRegion>,
    annotations: Option<Attrs>,
    iter_values: Vec<PrimExpr>,
    predicate: Option<PrimExpr>,
    no_realize: bool,
    pub(super) guard: MetadataGuard,
}

impl BlockFrame {
    /// A realized block with no iteration variables yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iter_vars: Vec::new(),
            reads: None,
            writes: None,
            init: None,
            alloc_buffers: Vec::new(),
            match_buffers: Vec::new(),
            annotations: None,
            iter_values: Vec::new(),
            predicate: None,
            no_realize: false,
            guard: MetadataGuard::default(),
        }
    }

    /// Select bare-block output, as used by a function's root block.
    #[must_use]
    pub fn with_no_realize(mut self, no_realize: bool) -> Self {
        self.no_realize = no_realize;
        self
    }

    // Metadata

    pub fn set_no_realize(&mut self, no_realize: bool) {
        self.no_realize = no_realize;
    }

    pub fn add_iter_var(&mut self, iter_var: IterVar) {
        self.iter_vars.push(iter_var);
    }

    pub fn add_iter_value(&mut self, value: PrimExpr) {
        self.iter_values.push(value);
    }

    /// Append an iteration variable together with its binding.
    pub fn add_iter(&mut self, iter_var: IterVar, value: PrimExpr) {
        self.iter_vars.push(iter_var);
        self.iter_values.push(value);
    }

    pub fn set_reads(&mut self, reads: Vec<BufferRegion>) -> Result<(), BuilderError> {
        set_once(&mut self.reads, reads, &mut self.guard, FrameTag::Block, "reads")
    }

    pub fn set_writes(&mut self, writes: Vec<BufferRegion>) -> Result<(), BuilderError> {
        set_once(&mut self.writes, writes, &mut self.guard, FrameTag::Block, "writes")
    }

    pub fn set_init(&mut self, init: Stmt) -> Result<(), BuilderError> {
        set_once(&mut self.init, init, &mut self.guard, FrameTag::Block, "init")
    }

    pub fn alloc_buffer(&mut self, buffer: Buffer) {
        self.alloc_buffers.push(buffer);
    }

    pub fn add_match_buffer(&mut self, match_buffer: MatchBufferRegion) {
        self.match_buffers.push(match_buffer);
    }

    pub fn set_annotation(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<(), BuilderError> {
        let key = key.into();
        let key_name = key.clone();
        insert_entry(
            self.annotations.get_or_insert_with(Attrs::default),
            key,
            value.into(),
            &mut self.guard,
            FrameTag::Block,
            "annotations",
            &key_name,
        )
    }

    pub fn set_predicate(&mut self, predicate: PrimExpr) -> Result<(), BuilderError> {
        set_once(
            &mut self.predicate,
            predicate,
            &mut self.guard,
            FrameTag::Block,
            "predicate",
        )
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iter_vars(&self) -> &[IterVar] {
        &self.iter_vars
    }

    pub fn iter_values(&self) -> &[PrimExpr] {
        &self.iter_values
    }

    pub fn reads(&self) -> Option<&[BufferRegion]> {
        self.reads.as_deref()
    }

    pub fn writes(&self) -> Option<&[BufferRegion]> {
        self.writes.as_deref()
    }

    pub fn init(&self) -> Option<&Stmt> {
        self.init.as_ref()
    }

    pub fn alloc_buffers(&self) -> &[Buffer] {
        &self.alloc_buffers
    }

    pub fn match_buffers(&self) -> &[MatchBufferRegion] {
        &self.match_buffers
    }

    pub fn annotations(&self) -> Option<&Attrs> {
        self.annotations.as_ref()
    }

    pub fn predicate(&self) -> Option<&PrimExpr> {
        self.predicate.as_ref()
    }

    pub fn no_realize(&self) -> bool {
        self.no_realize
    }

    // Finalization

    pub(super) fn finalize(
        self,
        stmts: Vec<Stmt>,
        config: &BuilderConfig,
    ) -> Result<Stmt, BuilderError> {
        let Self {
            name,
            iter_vars,
            reads,
            writes,
            init,
            alloc_buffers,
            match_buffers,
            annotations,
            iter_values,
            predicate,
            no_realize,
            guard: _,
        } = self;

        if !no_realize && iter_values.len() != iter_vars.len() {
            return Err(BuilderError::ArityMismatch {
                block: name,
                iter_vars: iter_vars.len(),
                iter_values: iter_values.len(),
            });
        }

        let mut annotations = annotations.unwrap_or_default();
        if config.detect_access {
            let missing = i64::from(reads.is_none()) | (i64::from(writes.is_none()) << 1);
            if missing != 0 {
                annotations.insert(DETECT_ACCESS_ANNOTATION.to_owned(), AttrValue::Int(missing));
            }
        }

        let block = Block::new(name, iter_vars, as_stmt(stmts))?
            .with_reads(reads.unwrap_or_default())
            .with_writes(writes.unwrap_or_default())
            .with_init(init)
            .with_alloc_buffers(alloc_buffers)
            .with_match_buffers(match_buffers)
            .with_annotations(annotations);

        if no_realize {
            if !iter_values.is_empty() || predicate.is_some() {
                tracing::debug!(
                    block = %block.name,
                    bindings = iter_values.len(),
                    has_predicate = predicate.is_some(),
                    "no_realize block drops its bindings"
                );
            }
            return Ok(block.into());
        }

        let predicate = predicate.unwrap_or_else(|| PrimExpr::bool(true));
        Ok(BlockRealize::new(iter_values, predicate, block)?.into())
    }
}

#[cfg(test)]
mod tests;
