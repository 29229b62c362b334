//! Iteration variables.

use std::fmt;

use crate::{Range, Var};

/// How an iteration variable participates in a block's computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum IterKind {
    /// Spatial (data-parallel) axis.
    #[default]
    DataPar,
    /// Commutative reduction axis.
    CommReduce,
    /// Axis with a required execution order.
    Ordered,
    /// Axis with no schedulable structure.
    Opaque,
    /// Axis bound to a hardware thread index.
    ThreadIndex,
}

impl fmt::Display for IterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataPar => write!(f, "spatial"),
            Self::CommReduce => write!(f, "reduce"),
            Self::Ordered => write!(f, "scan"),
            Self::Opaque => write!(f, "opaque"),
            Self::ThreadIndex => write!(f, "thread"),
        }
    }
}

/// A variable together with its iteration domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IterVar {
    pub var: Var,
    pub dom: Range,
    pub kind: IterKind,
    /// Thread tag (`threadIdx.x`, ...) for [`IterKind::ThreadIndex`] axes.
    pub thread_tag: Option<String>,
}

impl IterVar {
    pub fn new(var: Var, dom: Range, kind: IterKind) -> Self {
        Self {
            var,
            dom,
            kind,
            thread_tag: None,
        }
    }

    /// An axis bound to the hardware thread named by `tag`.
    pub fn thread(var: Var, dom: Range, tag: impl Into<String>) -> Self {
        Self {
            var,
            dom,
            kind: IterKind::ThreadIndex,
            thread_tag: Some(tag.into()),
        }
    }
}
