use motor_core::{
    DynamicsModel, IntegratorModel, PointNode, PointScene, Scene, SceneNode, Vec3,
};

fn scene() -> PointScene {
    PointScene::new("world")
        .with_movable("a", PointNode::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5)))
        .with_node("b", PointNode::new(Vec3::new(0.75, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5)))
        .with_node("c", PointNode::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5)))
}

#[test]
fn properties_roundtrip_through_movable_nodes() {
    let mut s = scene();
    assert_eq!(s.properties().as_slice(), &[0.0, 0.0, 0.0]);
    s.set_properties(&[1.0, 2.0, 3.0]);
    assert_eq!(s.node("a").map(|n| n.centroid()), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(s.properties().as_slice(), &[1.0, 2.0, 3.0]);
}

#[test]
fn clone_named_is_independent() {
    let original = scene();
    let mut copy = original.clone_named("scratch");
    copy.set_properties(&[9.0, 9.0, 9.0]);
    assert_eq!(copy.name(), "scratch");
    assert_eq!(original.properties().as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn relations_report_overlapping_boxes() {
    let rels = scene().relations();
    assert!(rels.contains("intersect", "a", "b"));
    assert!(!rels.contains("intersect", "a", "c"));
    assert_eq!(rels.len(), 1);
}

#[test]
fn bounds_points_enumerate_box_corners() {
    let s = scene();
    let points = s.node("a").map(|n| n.bounds_points()).unwrap_or_default();
    assert_eq!(points.len(), 8);
    assert!(points.contains(&Vec3::new(0.5, 0.5, 0.5)));
    assert!(points.contains(&Vec3::new(-0.5, -0.5, -0.5)));
}

#[test]
fn integrator_moves_target_and_rejects_leaving_workspace() {
    let s = scene();
    let model = IntegratorModel::new(0)
        .with_max_step(1.0)
        .with_workspace(Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0));

    let next = model
        .predict(s.signature(), &s.relations(), &[0.0, 0.0, 0.0, 0.5, 3.0])
        .expect("in workspace");
    assert_eq!(next.as_slice(), &[0.5, 1.0, 0.0]);

    assert!(model
        .predict(s.signature(), &s.relations(), &[1.5, 0.0, 0.0, 1.0, 0.0])
        .is_none());
}
