use voxgate_geom::{Aabb, BlockPos, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
}

#[test]
fn vec3_dot_length_normalized() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(approx_eq(v.dot(v), 25.0, 1e-6));
    assert!(approx_eq(v.length(), 5.0, 1e-6));
    assert!(vec3_approx_eq(v.normalized(), Vec3::new(0.6, 0.8, 0.0), 1e-6));

    // Zero vector normalization should be a no-op (not NaN, unchanged)
    assert!(vec3_approx_eq(Vec3::ZERO.normalized(), Vec3::ZERO, 1e-6));
}

#[test]
fn vec3_axis_accessors() {
    let mut v = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(v.axis(0), 1.0);
    assert_eq!(v.axis(1), 2.0);
    assert_eq!(v.axis(2), 3.0);
    v.set_axis(1, -7.0);
    assert_eq!(v.y, -7.0);
    assert_eq!(Vec3::unit(2), Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn aabb_intersects_and_contains() {
    let a = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
    let b = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(2.0, 2.0, 2.0));
    let c = Aabb::new(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
    assert!(!a.intersects(&c));
    // Touching faces count.
    let d = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    assert!(a.intersects(&d));

    assert!(a.contains(Vec3::new(0.5, 0.5, 0.5)));
    assert!(!a.contains(Vec3::new(1.5, 0.5, 0.5)));
}

#[test]
fn aabb_from_corners_and_expand() {
    let a = Aabb::from_corners(Vec3::new(2.0, -1.0, 5.0), Vec3::new(-2.0, 3.0, 4.0));
    assert_eq!(a.min, Vec3::new(-2.0, -1.0, 4.0));
    assert_eq!(a.max, Vec3::new(2.0, 3.0, 5.0));
    assert!(vec3_approx_eq(a.center(), Vec3::new(0.0, 1.0, 4.5), 1e-6));

    let e = a.expanded_along(2, 0.5);
    assert_eq!(e.min.z, 3.5);
    assert_eq!(e.max.z, 5.5);
    assert_eq!(e.min.x, a.min.x);
}

#[test]
fn block_pos_rounding_and_distances() {
    assert_eq!(BlockPos::round(Vec3::new(1.4, -0.6, 2.5)), BlockPos::new(1, -1, 3));
    let a = BlockPos::new(0, 0, 0);
    let b = BlockPos::new(1, -2, 2);
    assert_eq!(a.distance_sq(b), 9);
    assert_eq!(a.manhattan(b), 5);
    assert_eq!(a.offset(1, 2, 3), BlockPos::new(1, 2, 3));
    assert_eq!(b.axis(1), -2);
}

#[test]
fn block_pos_face_neighbors_are_unit_steps() {
    let p = BlockPos::new(5, 6, 7);
    let n = p.face_neighbors();
    assert_eq!(n.len(), 6);
    for q in n {
        assert_eq!(p.distance_sq(q), 1);
        assert_eq!(p.manhattan(q), 1);
    }
}
