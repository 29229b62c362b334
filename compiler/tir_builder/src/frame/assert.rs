//! Assert frame.

use tir_ir::{AssertStmt, PrimExpr, Stmt};

use super::as_stmt;
use crate::BuilderError;

/// A deferred runtime precondition guarding everything nested inside it.
///
/// The condition is never evaluated here. An assert scope with nothing
/// nested in it is legal and guards a no-op body.
#[derive(Clone, Debug)]
pub struct AssertFrame {
    condition: PrimExpr,
    message: PrimExpr,
}

impl AssertFrame {
    pub fn new(condition: PrimExpr, message: PrimExpr) -> Self {
        Self { condition, message }
    }

    pub fn condition(&self) -> &PrimExpr {
        &self.condition
    }

    pub fn message(&self) -> &PrimExpr {
        &self.message
    }

    pub(super) fn finalize(self, stmts: Vec<Stmt>) -> Result<Stmt, BuilderError> {
        let assert = AssertStmt::new(self.condition, self.message, as_stmt(stmts))?;
        Ok(assert.into())
    }
}
