use pretty_assertions::assert_eq;
use tir_ir::{Block, PrimExpr};

use super::*;

fn handle(frame: u32) -> FrameHandle {
    FrameHandle {
        session: SessionId::new(1),
        frame: FrameId::new(frame),
    }
}

#[test]
fn as_stmt_empty_is_no_op() {
    assert_eq!(as_stmt(vec![]), Stmt::no_op());
}

#[test]
fn as_stmt_single_passes_through() {
    let stmt = Stmt::evaluate(PrimExpr::int(5));
    assert_eq!(as_stmt(vec![stmt.clone()]), stmt);
}

#[test]
fn as_stmt_many_is_ordered_seq() {
    let a = Stmt::evaluate(PrimExpr::int(1));
    let b = Stmt::evaluate(PrimExpr::int(2));
    assert_eq!(as_stmt(vec![a.clone(), b.clone()]), Stmt::Seq(vec![a, b]));
}

#[test]
fn finalize_dispatches_on_kind() {
    let config = BuilderConfig::default().with_detect_access(false);

    let func = Frame::new(handle(0), PrimFuncFrame::named("f").into());
    assert!(matches!(
        func.finalize(&config).unwrap(),
        Finalized::Function { name: Some(ref n), .. } if n == "f"
    ));

    let mut block = Frame::new(handle(1), BlockFrame::new("b").with_no_realize(true).into());
    block.push_stmt(Stmt::evaluate(PrimExpr::int(1)));
    let expected = Block::new("b", vec![], Stmt::evaluate(PrimExpr::int(1))).unwrap();
    assert_eq!(
        block.finalize(&config).unwrap(),
        Finalized::Stmt(Stmt::from(expected))
    );

    let assert = Frame::new(
        handle(2),
        AssertFrame::new(PrimExpr::bool(true), PrimExpr::string("m")).into(),
    );
    assert!(matches!(
        assert.finalize(&config).unwrap(),
        Finalized::Stmt(Stmt::Assert(_))
    ));
}

#[test]
fn entered_policy_reaches_kind_state() {
    let mut kind = FrameKind::from(BlockFrame::new("b"));
    kind.enter(MetadataPolicy::FailOnConflict).unwrap();
    let FrameKind::Block(block) = &mut kind else {
        panic!("expected a block frame");
    };
    block.set_init(Stmt::no_op()).unwrap();
    assert!(block.set_init(Stmt::no_op()).is_err());
}

#[test]
fn overwrite_before_entry_is_judged_on_entry() {
    let mut frame = BlockFrame::new("b");
    frame.set_init(Stmt::no_op()).unwrap();
    frame.set_init(Stmt::no_op()).unwrap();

    let mut lenient = FrameKind::from(frame.clone());
    assert!(lenient.enter(MetadataPolicy::LastWriteWins).is_ok());

    let mut strict = FrameKind::from(frame);
    assert_eq!(
        strict.enter(MetadataPolicy::FailOnConflict).unwrap_err(),
        BuilderError::MetadataConflict {
            kind: FrameTag::Block,
            field: "init".to_owned(),
        }
    );
}

#[test]
fn assert_frames_enter_under_any_policy() {
    let mut kind = FrameKind::from(AssertFrame::new(PrimExpr::bool(true), PrimExpr::int(0)));
    assert!(kind.enter(MetadataPolicy::FailOnConflict).is_ok());
}

#[test]
fn handle_display() {
    assert_eq!(handle(4).to_string(), "frame #4 of session #1");
    assert_eq!(FrameTag::PrimFunc.to_string(), "prim_func");
}

#[test]
fn set_once_policies() {
    let mut lenient = MetadataGuard::default();
    lenient.enter(MetadataPolicy::LastWriteWins, FrameTag::Block).unwrap();
    let mut slot = Some(1);
    set_once(&mut slot, 2, &mut lenient, FrameTag::Block, "x").unwrap();
    assert_eq!(slot, Some(2));

    let mut strict = MetadataGuard::default();
    strict.enter(MetadataPolicy::FailOnConflict, FrameTag::Block).unwrap();
    let err = set_once(&mut slot, 3, &mut strict, FrameTag::Block, "x").unwrap_err();
    assert_eq!(
        err,
        BuilderError::MetadataConflict {
            kind: FrameTag::Block,
            field: "x".to_owned(),
        }
    );
    assert_eq!(slot, Some(2));
}

#[test]
fn first_pre_entry_overwrite_is_reported() {
    let mut guard = MetadataGuard::default();
    let mut attrs = FxHashMap::default();
    insert_entry(&mut attrs, "k", 1, &mut guard, FrameTag::PrimFunc, "attrs", "k").unwrap();
    insert_entry(&mut attrs, "k", 2, &mut guard, FrameTag::PrimFunc, "attrs", "k").unwrap();
    let mut slot = Some(0);
    set_once(&mut slot, 1, &mut guard, FrameTag::PrimFunc, "name").unwrap();

    assert_eq!(attrs.get("k"), Some(&2));
    assert_eq!(
        guard.enter(MetadataPolicy::FailOnConflict, FrameTag::PrimFunc),
        Err(BuilderError::MetadataConflict {
            kind: FrameTag::PrimFunc,
            field: "attrs[k]".to_owned(),
        })
    );
}
