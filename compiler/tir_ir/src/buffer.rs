//! Buffers and buffer regions.

use crate::{DataType, IrError, PrimExpr, Range, Stmt, Var};

/// A multidimensional buffer descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Buffer {
    pub name: String,
    /// Handle variable holding the buffer's base address.
    pub data: Var,
    pub dtype: DataType,
    pub shape: Vec<PrimExpr>,
    /// Storage scope (`global`, `shared`, `local`, ...).
    pub scope: String,
}

impl Buffer {
    /// Create a `global` buffer with a fresh data handle.
    pub fn new(name: impl Into<String>, dtype: DataType, shape: Vec<PrimExpr>) -> Self {
        let name = name.into();
        Self {
            data: Var::handle(name.clone()),
            name,
            dtype,
            shape,
            scope: "global".to_owned(),
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Load expression `self[indices]`.
    pub fn load(&self, indices: Vec<PrimExpr>) -> PrimExpr {
        PrimExpr::BufferLoad {
            buffer: Box::new(self.clone()),
            indices,
        }
    }

    /// Store statement `self[indices] = value`.
    pub fn store(&self, value: PrimExpr, indices: Vec<PrimExpr>) -> Stmt {
        Stmt::BufferStore {
            buffer: self.clone(),
            value,
            indices,
        }
    }
}

/// A rectangular set of elements of one buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferRegion {
    pub buffer: Buffer,
    pub region: Vec<Range>,
}

impl BufferRegion {
    /// Create a region with one range per buffer dimension.
    pub fn new(buffer: Buffer, region: Vec<Range>) -> Result<Self, IrError> {
        if region.len() != buffer.ndim() {
            return Err(IrError::RegionRankMismatch {
                buffer: buffer.name.clone(),
                expected: buffer.ndim(),
                found: region.len(),
            });
        }
        Ok(Self { buffer, region })
    }

    /// The region covering the whole buffer.
    pub fn full(buffer: Buffer) -> Self {
        let region = buffer
            .shape
            .iter()
            .map(|extent| Range::from_extent(extent.clone()))
            .collect();
        Self { buffer, region }
    }
}

/// Binds a block-local buffer to a region of an outer buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatchBufferRegion {
    pub buffer: Buffer,
    pub source: BufferRegion,
}

impl MatchBufferRegion {
    pub fn new(buffer: Buffer, source: BufferRegion) -> Result<Self, IrError> {
        if buffer.ndim() > source.region.len() {
            return Err(IrError::MatchBufferRankMismatch {
                buffer: buffer.name.clone(),
                buffer_ndim: buffer.ndim(),
                region_ndim: source.region.len(),
            });
        }
        Ok(Self { buffer, source })
    }
}

#[cfg(test)]
mod tests;
