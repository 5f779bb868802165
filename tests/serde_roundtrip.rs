//! Serialization in field order, checked through serde_json
//!
//! Run with `cargo test --features serde`.

use rayo::{CompactMatrix3, Matrix3, Matrix4, Vec2i, Vec3d, Vec3f, Vec4f};

#[test]
fn test_vector_is_a_tuple() {
    let json = serde_json::to_string(&Vec3f::new(1.0, 2.5, -3.0)).expect("serialize");
    assert_eq!(json, "[1.0,2.5,-3.0]");

    let json = serde_json::to_string(&Vec2i::new(7, -8)).expect("serialize");
    assert_eq!(json, "[7,-8]");
}

#[test]
fn test_vector_round_trip() {
    let v = Vec4f::new(0.25, -1.5, 1e-7, 3.0e8);
    let json = serde_json::to_string(&v).expect("serialize");
    let back: Vec4f = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, v);
    assert!(back.padding_is_zero());

    let narrow: Vec2i = serde_json::from_str("[1, 2]").expect("deserialize");
    assert_eq!(narrow, Vec2i::new(1, 2));
}

#[test]
fn test_wrong_arity_is_rejected() {
    let err = serde_json::from_str::<Vec3f>("[1.0, 2.0]").expect_err("too short");
    assert!(err.to_string().contains("invalid length 2"), "{err}");
    assert!(serde_json::from_str::<Vec2i>("[1, 2, 3]").is_err());
    assert!(serde_json::from_str::<Vec2i>("[1.5, 2]").is_err());
}

#[test]
fn test_matrix_is_columns() {
    let m = Matrix3::from_cols([
        Vec3d::new(1.0, 2.0, 3.0),
        Vec3d::new(4.0, 5.0, 6.0),
        Vec3d::new(7.0, 8.0, 9.0),
    ]);
    let json = serde_json::to_string(&m).expect("serialize");
    assert_eq!(json, "[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]");

    let back: Matrix3<f64> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, m);
}

#[test]
fn test_matrix4_round_trip() {
    let m = Matrix4::from_rotation_x(0.5f32) * Matrix4::from_translation(Vec3f::new(1.0, 2.0, 3.0));
    let json = serde_json::to_string(&m).expect("serialize");
    let back: Matrix4<f32> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, m);
}

#[test]
fn test_compact_matches_padded_form() {
    let m = Matrix3::from_rotation_z(1.0f32);
    let padded = serde_json::to_string(&m).expect("serialize");
    let compact = serde_json::to_string(&m.to_compact()).expect("serialize");
    assert_eq!(padded, compact);

    let back: CompactMatrix3<f32> = serde_json::from_str(&compact).expect("deserialize");
    assert_eq!(Matrix3::from_compact(back), m);
}
