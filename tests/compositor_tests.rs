// Host-side tests for reflection scheduling and mirror math.

use glam::{Mat4, Vec3, Vec4};
use wheel_core::compositor::{uv_bias, PassKind, PassTarget, Plane};
use wheel_core::scene::floor_plane;
use wheel_core::{Camera, ReflectionCamera, ReflectionSchedule, TargetSizes, REFLECTION_SIZE};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn first_frame_always_renders_the_reflection() {
    let mut s = ReflectionSchedule::new(3);
    let plan = s.plan();
    assert!(plan.render_reflection);
    assert_eq!(plan.frame, 0);
    assert!(!plan.reuses_stale_reflection());
}

#[test]
fn reflection_runs_every_nth_frame() {
    let mut s = ReflectionSchedule::default();
    assert_eq!(s.every_n(), 3);
    let rendered: Vec<bool> = (0..7).map(|_| s.plan().render_reflection).collect();
    assert_eq!(rendered, vec![true, false, false, true, false, false, true]);
    assert_eq!(s.frame(), 7);
}

#[test]
fn invalidate_forces_a_fresh_reflection() {
    let mut s = ReflectionSchedule::new(3);
    s.plan();
    s.invalidate();
    assert!(s.plan().render_reflection);
    assert!(!s.plan().render_reflection);
}

#[test]
fn every_n_of_zero_means_every_frame() {
    let mut s = ReflectionSchedule::new(0);
    assert_eq!(s.every_n(), 1);
    assert!((0..4).all(|_| s.plan().render_reflection));
}

#[test]
fn reflection_pass_precedes_main_and_composite() {
    let mut s = ReflectionSchedule::new(3);
    let plan = s.plan();
    let refl = plan.position(PassKind::Reflection).unwrap();
    let main = plan.position(PassKind::Main).unwrap();
    let comp = plan.position(PassKind::Composite).unwrap();
    assert!(refl < main && main < comp);
    assert_eq!(plan.passes[refl].target, PassTarget::Reflection);
    assert_eq!(plan.passes[main].target, PassTarget::Hdr);
    assert_eq!(plan.passes[comp].target, PassTarget::Surface);
}

#[test]
fn throttled_frames_skip_only_the_reflection_pass() {
    let mut s = ReflectionSchedule::new(3);
    s.plan();
    let plan = s.plan();
    assert!(plan.reuses_stale_reflection());
    assert_eq!(plan.position(PassKind::Reflection), None);
    assert_eq!(plan.passes.len(), 2);
    assert_eq!(plan.position(PassKind::Main), Some(0));
}

#[test]
fn target_sizes_keep_the_reflection_fixed() {
    let mut sizes = TargetSizes::new(800, 600);
    assert_eq!(sizes.reflection, (REFLECTION_SIZE, REFLECTION_SIZE));
    assert!(sizes.resize(1024, 768));
    assert_eq!(sizes.main, (1024, 768));
    assert_eq!(sizes.reflection, (REFLECTION_SIZE, REFLECTION_SIZE));
    assert!(!sizes.resize(1024, 768));
    assert!(!sizes.resize(0, 768));
    assert_eq!(sizes.main, (1024, 768));
    assert_eq!(TargetSizes::new(0, 0).main, (1, 1));
}

#[test]
fn plane_reflection_fixes_points_on_the_plane() {
    let plane = Plane::from_point_normal(Vec3::new(0.0, -2.0, 0.0), Vec3::new(0.0, 3.0, 0.0));
    assert!((plane.normal.length() - 1.0).abs() < 1e-6);
    let m = plane.reflection_matrix();
    let on = Vec3::new(4.0, -2.0, 7.0);
    assert!(approx(m.transform_point3(on), on));
    let above = Vec3::new(1.0, 1.0, 1.0);
    let mirrored = m.transform_point3(above);
    assert!(approx(mirrored, Vec3::new(1.0, -5.0, 1.0)));
    assert!((plane.signed_distance(mirrored) + plane.signed_distance(above)).abs() < 1e-5);
}

#[test]
fn reflecting_twice_is_the_identity() {
    let plane = floor_plane();
    let m = plane.reflection_matrix() * plane.reflection_matrix();
    assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-4));
}

#[test]
fn plane_packs_for_shaders() {
    let plane = Plane::from_point_normal(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
    assert_eq!(plane.to_vec4(), Vec4::new(0.0, 1.0, 0.0, -1.0));
}

#[test]
fn uv_bias_maps_clip_space_to_texture_space() {
    let b = uv_bias();
    let center = b * Vec4::new(0.0, 0.0, 0.5, 1.0);
    assert!((center.x - 0.5).abs() < 1e-6 && (center.y - 0.5).abs() < 1e-6);
    let top_left = b * Vec4::new(-1.0, 1.0, 0.0, 1.0);
    assert!(top_left.x.abs() < 1e-6 && top_left.y.abs() < 1e-6);
}

#[test]
fn mirrored_camera_agrees_on_the_floor() {
    let camera = Camera::default();
    let plane = floor_plane();
    let refl = ReflectionCamera::new(camera.view(), camera.projection(), &plane);
    assert_eq!(refl.clip_plane, plane.to_vec4());
    assert!(refl.texture_matrix.abs_diff_eq(uv_bias() * refl.view_proj, 1e-5));

    // a point on the mirror projects the same through both cameras
    let on_floor = plane.normal.any_orthonormal_vector() * 3.0 - plane.normal * plane.d;
    assert!(plane.signed_distance(on_floor).abs() < 1e-4);
    let a = camera.view_proj().project_point3(on_floor);
    let b = refl.view_proj.project_point3(on_floor);
    assert!(approx(a, b));
}

#[test]
fn camera_sits_above_the_floor() {
    let camera = Camera::default();
    assert!(floor_plane().signed_distance(camera.eye) > 0.0);
}
