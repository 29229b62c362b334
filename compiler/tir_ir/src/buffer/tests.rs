use pretty_assertions::assert_eq;

use super::*;

fn matrix(name: &str) -> Buffer {
    Buffer::new(name, DataType::FLOAT32, vec![PrimExpr::int(16), PrimExpr::int(16)])
}

#[test]
fn full_region_covers_every_dimension() {
    let a = matrix("A");
    let region = BufferRegion::full(a.clone());
    assert_eq!(region.region.len(), 2);
    assert_eq!(region.region[1], Range::from_extent(PrimExpr::int(16)));
    assert_eq!(region.buffer, a);
}

#[test]
fn region_rank_must_match_buffer() {
    let err = BufferRegion::new(matrix("A"), vec![Range::point(PrimExpr::int(0))]).unwrap_err();
    assert_eq!(
        err,
        IrError::RegionRankMismatch {
            buffer: "A".to_owned(),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn match_buffer_may_drop_dimensions() {
    let source = BufferRegion::full(matrix("A"));
    let row = Buffer::new("row", DataType::FLOAT32, vec![PrimExpr::int(16)]);
    assert!(MatchBufferRegion::new(row, source).is_ok());
}

#[test]
fn match_buffer_rank_cannot_exceed_region() {
    let source = BufferRegion::full(Buffer::new("v", DataType::FLOAT32, vec![PrimExpr::int(8)]));
    let err = MatchBufferRegion::new(matrix("m"), source).unwrap_err();
    assert!(matches!(
        err,
        IrError::MatchBufferRankMismatch {
            buffer_ndim: 2,
            region_ndim: 1,
            ..
        }
    ));
}

#[test]
fn new_buffer_defaults() {
    let a = matrix("A").with_scope("shared");
    assert_eq!(a.scope, "shared");
    assert_eq!(a.data.name, "A");
    assert_eq!(a.data.dtype, DataType::HANDLE);
}
