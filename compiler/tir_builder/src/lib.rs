//! Scope-frame builder for the tensor IR.
//!
//! A front-end describes program shape with nested scopes; this crate
//! accumulates statements inside each open scope and, when the scope exits,
//! freezes them into an immutable IR node threaded into the enclosing scope.
//!
//! - **Frames** ([`Frame`], [`FrameKind`]): one per open scope, a function
//!   ([`PrimFuncFrame`]), a block ([`BlockFrame`]) or an assertion
//!   ([`AssertFrame`]).
//! - **Frame stack** ([`FrameStack`]): strict LIFO; only the top frame can
//!   exit.
//! - **Session** ([`Builder`]): the explicit context object a front-end
//!   drives with `enter_scope` / `exit_scope` / `add_stmt`.
//! - **Module sink** ([`FunctionSink`], [`IrModule`]): receives each
//!   finished function exactly once.
//!
//! # Crate Dependencies
//!
//! `tir_builder` depends on `tir_ir` for every node it builds. It never
//! evaluates expressions and performs no I/O.

mod builder;
mod config;
mod error;
pub mod frame;
pub mod module;
mod stack;

pub use builder::Builder;
pub use config::{BuilderConfig, MetadataPolicy};
pub use error::BuilderError;
pub use frame::{
    AssertFrame, BlockFrame, Finalized, Frame, FrameHandle, FrameId, FrameKind, FrameTag,
    PrimFuncFrame, SessionId, DETECT_ACCESS_ANNOTATION,
};
pub use module::{FunctionSink, IrModule, ModuleError, DEFAULT_FUNCTION_NAME};
pub use stack::FrameStack;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tir_builder=debug` or `RUST_LOG=tir_builder=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
