use pretty_assertions::assert_eq;

use crate::{DataType, IterKind, Range};

use super::*;

fn axis(name: &str) -> IterVar {
    IterVar::new(
        Var::new(name, DataType::INT32),
        Range::from_extent(PrimExpr::int(8)),
        IterKind::DataPar,
    )
}

#[test]
fn no_op_is_evaluate_zero() {
    assert_eq!(Stmt::no_op(), Stmt::Evaluate(PrimExpr::int(0)));
    assert!(Stmt::no_op().is_no_op());
    assert!(!Stmt::evaluate(PrimExpr::int(1)).is_no_op());
}

#[test]
fn block_defaults_are_empty() {
    let block = Block::new("b", vec![axis("vi")], Stmt::no_op()).unwrap();
    assert!(block.reads.is_empty());
    assert!(block.writes.is_empty());
    assert!(block.init.is_none());
    assert!(block.annotations.is_empty());
}

#[test]
fn block_rejects_rebound_iter_var() {
    let vi = axis("vi");
    let err = Block::new("b", vec![vi.clone(), vi], Stmt::no_op()).unwrap_err();
    assert_eq!(
        err,
        IrError::DuplicateIterVar {
            block: "b".to_owned(),
            name: "vi".to_owned(),
        }
    );
}

#[test]
fn realize_requires_bool_predicate() {
    let block = Block::new("b", vec![], Stmt::no_op()).unwrap();
    let err = BlockRealize::new(vec![], PrimExpr::int(1), block.clone()).unwrap_err();
    assert!(matches!(err, IrError::NonBooleanPredicate { .. }));

    let ok = BlockRealize::new(vec![], PrimExpr::bool(true), block).unwrap();
    assert!(ok.predicate.is_const_true());
}

#[test]
fn assert_message_kinds() {
    let cond = PrimExpr::bool(true);
    assert!(AssertStmt::new(cond.clone(), PrimExpr::string("oops"), Stmt::no_op()).is_ok());
    assert!(AssertStmt::new(cond.clone(), PrimExpr::int(-1), Stmt::no_op()).is_ok());

    let err = AssertStmt::new(cond, PrimExpr::float(1.0), Stmt::no_op()).unwrap_err();
    assert_eq!(
        err,
        IrError::InvalidAssertMessage {
            dtype: "float32".to_owned(),
        }
    );
}

#[test]
fn kind_names() {
    let block = Block::new("b", vec![], Stmt::no_op()).unwrap();
    assert_eq!(Stmt::from(block).kind_name(), "block");
    assert_eq!(Stmt::Seq(vec![]).kind_name(), "seq");
}

#[test]
fn serial_loop_starts_at_zero() {
    let i = Var::new("i", DataType::INT32);
    let body = Stmt::evaluate(PrimExpr::from(&i));
    let stmt = Stmt::from(For::serial(i.clone(), PrimExpr::int(4), body.clone()));
    let Stmt::For(for_loop) = stmt else {
        panic!("expected a loop");
    };
    assert_eq!(for_loop.loop_var, i);
    assert_eq!(for_loop.min, PrimExpr::int(0));
    assert_eq!(for_loop.kind, ForKind::Serial);
    assert_eq!(for_loop.body, body);
}
