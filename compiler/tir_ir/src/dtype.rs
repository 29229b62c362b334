//! Scalar data types.

use std::fmt;

/// Type code of a [`DataType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Int,
    UInt,
    Float,
    /// Opaque pointer (buffer data handles, strings).
    Handle,
}

/// A scalar or vector element type: code, bit width and lane count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataType {
    pub code: TypeCode,
    pub bits: u8,
    pub lanes: u16,
}

impl DataType {
    pub const BOOL: Self = Self::uint(1);
    pub const INT32: Self = Self::int(32);
    pub const INT64: Self = Self::int(64);
    pub const FLOAT32: Self = Self::float(32);
    pub const HANDLE: Self = Self::new(TypeCode::Handle, 64, 1);

    #[inline]
    pub const fn new(code: TypeCode, bits: u8, lanes: u16) -> Self {
        Self { code, bits, lanes }
    }

    #[inline]
    pub const fn int(bits: u8) -> Self {
        Self::new(TypeCode::Int, bits, 1)
    }

    #[inline]
    pub const fn uint(bits: u8) -> Self {
        Self::new(TypeCode::UInt, bits, 1)
    }

    #[inline]
    pub const fn float(bits: u8) -> Self {
        Self::new(TypeCode::Float, bits, 1)
    }

    /// Same element type with `lanes` lanes.
    #[must_use]
    pub const fn with_lanes(self, lanes: u16) -> Self {
        Self::new(self.code, self.bits, lanes)
    }

    /// Returns `true` for the scalar `bool` type (`uint1`).
    #[inline]
    pub fn is_bool(self) -> bool {
        self == Self::BOOL
    }

    #[inline]
    pub fn is_scalar(self) -> bool {
        self.lanes == 1
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bool() {
            return write!(f, "bool");
        }
        match self.code {
            TypeCode::Int => write!(f, "int{}", self.bits)?,
            TypeCode::UInt => write!(f, "uint{}", self.bits)?,
            TypeCode::Float => write!(f, "float{}", self.bits)?,
            TypeCode::Handle => return write!(f, "handle"),
        }
        if self.lanes > 1 {
            write!(f, "x{}", self.lanes)?;
        }
        Ok(())
    }
}
