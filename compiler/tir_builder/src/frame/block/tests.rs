use pretty_assertions::assert_eq;
use tir_ir::{DataType, IrError, IterKind, Range, Var};

use crate::MetadataPolicy;

use super::*;

fn axis(name: &str) -> IterVar {
    IterVar::new(
        Var::new(name, DataType::INT32),
        Range::from_extent(PrimExpr::int(16)),
        IterKind::DataPar,
    )
}

fn quiet() -> BuilderConfig {
    BuilderConfig::default().with_detect_access(false)
}

fn expect_block(stmt: Stmt) -> Block {
    match stmt {
        Stmt::Block(block) => *block,
        other => panic!("expected a bare block, got {}", other.kind_name()),
    }
}

fn expect_realize(stmt: Stmt) -> BlockRealize {
    match stmt {
        Stmt::BlockRealize(realize) => *realize,
        other => panic!("expected a block realize, got {}", other.kind_name()),
    }
}

#[test]
fn realized_block_defaults_predicate_to_true() {
    let mut frame = BlockFrame::new("update");
    let vi = axis("vi");
    frame.add_iter(vi.clone(), PrimExpr::int(3));

    let realize = expect_realize(frame.finalize(vec![], &quiet()).unwrap());
    assert!(realize.predicate.is_const_true());
    assert_eq!(realize.iter_values, vec![PrimExpr::int(3)]);
    assert_eq!(realize.block.iter_vars, vec![vi]);
    assert_eq!(realize.block.name, "update");
    assert_eq!(realize.block.body, Stmt::no_op());
}

#[test]
fn explicit_predicate_is_kept() {
    let mut frame = BlockFrame::new("guarded");
    let vi = axis("vi");
    let i = Var::new("i", DataType::INT32);
    let guard = PrimExpr::from(&i).lt(PrimExpr::int(10));
    frame.add_iter(vi, PrimExpr::from(&i));
    frame.set_predicate(guard.clone()).unwrap();

    let realize = expect_realize(frame.finalize(vec![], &quiet()).unwrap());
    assert_eq!(realize.predicate, guard);
}

#[test]
fn arity_mismatch_values_short() {
    let mut frame = BlockFrame::new("b");
    frame.add_iter_var(axis("vi"));
    frame.add_iter_var(axis("vj"));
    frame.add_iter_value(PrimExpr::int(0));

    let err = frame.finalize(vec![], &quiet()).unwrap_err();
    assert_eq!(
        err,
        BuilderError::ArityMismatch {
            block: "b".to_owned(),
            iter_vars: 2,
            iter_values: 1,
        }
    );
}

#[test]
fn arity_mismatch_zero_vars() {
    let mut frame = BlockFrame::new("b");
    frame.add_iter_value(PrimExpr::int(0));
    let err = frame.finalize(vec![], &quiet()).unwrap_err();
    assert!(matches!(
        err,
        BuilderError::ArityMismatch {
            iter_vars: 0,
            iter_values: 1,
            ..
        }
    ));
}

#[test]
fn arity_mismatch_zero_values() {
    let mut frame = BlockFrame::new("b");
    frame.add_iter_var(axis("vi"));
    let err = frame.finalize(vec![], &quiet()).unwrap_err();
    assert!(matches!(
        err,
        BuilderError::ArityMismatch {
            iter_vars: 1,
            iter_values: 0,
            ..
        }
    ));
}

#[test]
fn no_realize_ignores_bindings_and_predicate() {
    let mut frame = BlockFrame::new("root").with_no_realize(true);
    frame.add_iter_var(axis("vi"));
    frame.add_iter_value(PrimExpr::int(0));
    frame.add_iter_value(PrimExpr::int(1));
    frame.set_predicate(PrimExpr::bool(false)).unwrap();

    let block = expect_block(frame.finalize(vec![], &quiet()).unwrap());
    assert_eq!(block.name, "root");
    assert_eq!(block.iter_vars.len(), 1);
}

#[test]
fn init_stays_separate_from_body() {
    let c = Buffer::new("C", DataType::FLOAT32, vec![PrimExpr::int(4)]);
    let init = c.store(PrimExpr::float(0.0), vec![PrimExpr::int(0)]);
    let update = c.store(PrimExpr::float(1.0), vec![PrimExpr::int(0)]);

    let mut frame = BlockFrame::new("reduce").with_no_realize(true);
    frame.set_init(init.clone()).unwrap();
    let block = expect_block(frame.finalize(vec![update.clone()], &quiet()).unwrap());

    assert_eq!(block.init, Some(init));
    assert_eq!(block.body, update);
}

#[test]
fn body_sequentializes_in_emission_order() {
    let stmts: Vec<Stmt> = (0..3).map(|i| Stmt::evaluate(PrimExpr::int(i))).collect();
    let frame = BlockFrame::new("b").with_no_realize(true);
    let block = expect_block(frame.finalize(stmts.clone(), &quiet()).unwrap());
    assert_eq!(block.body, Stmt::Seq(stmts));
}

#[test]
fn footprints_allocations_and_matches_are_carried() {
    let a = Buffer::new("A", DataType::FLOAT32, vec![PrimExpr::int(8), PrimExpr::int(8)]);
    let local = Buffer::new("A_local", DataType::FLOAT32, vec![PrimExpr::int(8)]).with_scope("local");
    let row = Buffer::new("row", DataType::FLOAT32, vec![PrimExpr::int(8)]);
    let reads = vec![BufferRegion::full(a.clone())];
    let match_row = MatchBufferRegion::new(row, BufferRegion::full(a.clone())).unwrap();

    let mut frame = BlockFrame::new("copy").with_no_realize(true);
    frame.set_reads(reads.clone()).unwrap();
    frame.set_writes(vec![]).unwrap();
    frame.alloc_buffer(local.clone());
    frame.add_match_buffer(match_row.clone());
    frame.set_annotation("pragma_unroll", true).unwrap();

    let block = expect_block(frame.finalize(vec![], &BuilderConfig::default()).unwrap());
    assert_eq!(block.reads, reads);
    assert!(block.writes.is_empty());
    assert_eq!(block.alloc_buffers, vec![local]);
    assert_eq!(block.match_buffers, vec![match_row]);
    assert_eq!(
        block.annotations.get("pragma_unroll"),
        Some(&AttrValue::Bool(true))
    );
    // Both footprints were declared, so nothing is left to detect.
    assert!(!block.annotations.contains_key(DETECT_ACCESS_ANNOTATION));
}

#[test]
fn detect_access_marks_missing_footprints() {
    let cases = [
        (None, None, 3),
        (Some(vec![]), None, 2),
        (None, Some(vec![]), 1),
    ];
    for (reads, writes, expected) in cases {
        let mut frame = BlockFrame::new("b").with_no_realize(true);
        if let Some(reads) = reads {
            frame.set_reads(reads).unwrap();
        }
        if let Some(writes) = writes {
            frame.set_writes(writes).unwrap();
        }
        let block = expect_block(frame.finalize(vec![], &BuilderConfig::default()).unwrap());
        assert_eq!(
            block.annotations.get(DETECT_ACCESS_ANNOTATION),
            Some(&AttrValue::Int(expected))
        );
    }
}

#[test]
fn detect_access_can_be_disabled() {
    let frame = BlockFrame::new("b").with_no_realize(true);
    let block = expect_block(frame.finalize(vec![], &quiet()).unwrap());
    assert!(block.annotations.is_empty());
}

#[test]
fn non_boolean_predicate_is_an_ir_error() {
    let mut frame = BlockFrame::new("b");
    frame.set_predicate(PrimExpr::int(1)).unwrap();
    let err = frame.finalize(vec![], &quiet()).unwrap_err();
    assert_eq!(
        err,
        BuilderError::Ir(IrError::NonBooleanPredicate {
            dtype: "int32".to_owned()
        })
    );
}

#[test]
fn fail_on_conflict_predicate() {
    let mut frame = BlockFrame::new("b");
    frame
        .guard
        .enter(MetadataPolicy::FailOnConflict, FrameTag::Block)
        .unwrap();
    frame.set_predicate(PrimExpr::bool(true)).unwrap();
    let err = frame.set_predicate(PrimExpr::bool(false)).unwrap_err();
    assert_eq!(
        err,
        BuilderError::MetadataConflict {
            kind: FrameTag::Block,
            field: "predicate".to_owned(),
        }
    );
    assert_eq!(frame.predicate(), Some(&PrimExpr::bool(true)));

    frame.set_annotation("k", 1_i64).unwrap();
    assert!(frame.set_annotation("k", 2_i64).is_err());
}

#[test]
fn last_write_wins_reads() {
    let a = Buffer::new("A", DataType::FLOAT32, vec![PrimExpr::int(4)]);
    let mut frame = BlockFrame::new("b");
    frame.set_reads(vec![]).unwrap();
    frame.set_reads(vec![BufferRegion::full(a)]).unwrap();
    assert_eq!(frame.reads().map(<[BufferRegion]>::len), Some(1));
}
