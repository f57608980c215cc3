use motor_core::{
    ActionBounds, IntegratorModel, MultiObjective, Objective, PointNode, PointScene, RealVector,
    Scene, Vec3,
};
use motor_ctl::{Controller, SeekOutcome, Strategy};

fn scene_at(x: f64) -> PointScene {
    PointScene::new("world")
        .with_movable("hand", PointNode::new(Vec3::new(x, 0.0, 0.0), Vec3::new(0.1, 0.1, 0.1)))
        .with_node("goal", PointNode::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.1, 0.1, 0.1)))
}

fn reach_goal() -> MultiObjective {
    MultiObjective::new().with(Objective::euclidean("hand", "goal"))
}

fn unit_steps() -> ActionBounds {
    ActionBounds::new(vec![-1.0], vec![1.0]).with_increment(vec![1.0])
}

fn grid_controller(model: IntegratorModel) -> Controller<IntegratorModel> {
    Controller::new(model, reach_goal(), unit_steps(), 2, "grid")
}

/// Apply an action the way the model predicts it.
fn step(scene: &mut PointScene, model: &IntegratorModel, action: &RealVector) {
    use motor_core::DynamicsModel;
    let input = RealVector::concat(&[scene.properties().as_slice(), action.as_slice()]);
    let next = model
        .predict(scene.signature(), &scene.relations(), &input)
        .expect("step stays in the workspace");
    scene.set_properties(&next);
}

#[test]
fn strategy_names() {
    assert_eq!(Strategy::from_name("tree"), Strategy::Tree);
    assert_eq!(Strategy::from_name("simplex"), Strategy::Simplex);
    assert_eq!(Strategy::from_name("grid"), Strategy::Grid);
    assert_eq!(Strategy::from_name("anything"), Strategy::Grid);
    assert_eq!(Strategy::from_name(""), Strategy::Grid);
}

#[test]
fn outcome_codes() {
    assert_eq!(SeekOutcome::NoOutput.code(), 0);
    assert_eq!(SeekOutcome::LocalMinimum.code(), 1);
    assert_eq!(SeekOutcome::Success(RealVector::new(vec![0.5])).code(), 2);
    assert!(SeekOutcome::LocalMinimum.action().is_none());
}

#[test]
fn first_seek_plans_and_returns_first_action() {
    let mut ctl = grid_controller(IntegratorModel::default());
    let scene = scene_at(0.0);

    let outcome = ctl.seek(&scene);
    assert_eq!(outcome, SeekOutcome::Success(RealVector::new(vec![1.0])));
    assert_eq!(ctl.search_calls(), 1);

    let plan = ctl.cached_plan().expect("plan cached");
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.value.as_slice(), &[0.0]);
    assert_eq!(plan.final_state.as_slice(), &[2.0, 0.0, 0.0]);
}

#[test]
fn following_the_plan_hits_the_cache() {
    let model = IntegratorModel::default();
    let mut ctl = grid_controller(model.clone());
    let mut scene = scene_at(0.0);

    let first = ctl.seek(&scene);
    step(&mut scene, &model, first.action().unwrap());

    let second = ctl.seek(&scene);
    assert_eq!(second, SeekOutcome::Success(RealVector::new(vec![1.0])));
    assert_eq!(ctl.search_calls(), 1);
    assert_eq!(ctl.cache_hits(), 1);
    assert_eq!(ctl.invalidations(), 0);
    // Plan exhausted.
    assert!(ctl.cached_plan().is_none());
}

#[test]
fn unchanged_scene_within_tolerance_hits_the_cache() {
    let mut ctl = grid_controller(IntegratorModel::default()).with_drift_threshold(10.0);
    let scene = scene_at(0.0);

    assert_eq!(ctl.seek(&scene).code(), 2);
    assert_eq!(ctl.seek(&scene).code(), 2);
    assert_eq!(ctl.search_calls(), 1);
    assert_eq!(ctl.cache_hits(), 1);
}

#[test]
fn moved_scene_invalidates_and_replans() {
    let mut ctl = grid_controller(IntegratorModel::default());
    let mut scene = scene_at(0.0);
    ctl.seek(&scene);

    scene.set_properties(&[-1.0, 0.0, 0.0]);
    let outcome = ctl.seek(&scene);

    assert_eq!(outcome, SeekOutcome::Success(RealVector::new(vec![1.0])));
    assert_eq!(ctl.invalidations(), 1);
    assert_eq!(ctl.search_calls(), 2);
    let plan = ctl.cached_plan().expect("new plan");
    assert_eq!(plan.final_state.as_slice(), &[1.0, 0.0, 0.0]);
}

#[test]
fn retrained_model_invalidates_the_plan() {
    let model = IntegratorModel::default();
    let mut ctl = grid_controller(model.clone());
    let mut scene = scene_at(0.0);

    let first = ctl.seek(&scene);
    step(&mut scene, &model, first.action().unwrap());
    ctl.model_mut().gain = 0.5;

    assert_eq!(ctl.seek(&scene).code(), 2);
    assert_eq!(ctl.invalidations(), 1);
    assert_eq!(ctl.search_calls(), 2);
}

#[test]
fn plan_that_no_longer_simulates_is_dropped() {
    let model = IntegratorModel::default();
    let mut ctl = grid_controller(model.clone());
    let mut scene = scene_at(0.0);

    let first = ctl.seek(&scene);
    step(&mut scene, &model, first.action().unwrap());

    // The remaining step would take the hand to x = 2.
    ctl.model_mut().workspace = Some((Vec3::new(-5.0, -1.0, -1.0), Vec3::new(1.5, 1.0, 1.0)));

    assert_eq!(ctl.seek(&scene), SeekOutcome::NoOutput);
    assert_eq!(ctl.invalidations(), 1);
    assert_eq!(ctl.search_calls(), 2);
    assert!(ctl.cached_plan().is_none());
}

#[test]
fn reaching_the_plan_value_early_invalidates() {
    let mut ctl = grid_controller(IntegratorModel::default());
    let mut scene = scene_at(0.0);
    ctl.seek(&scene);

    scene.set_properties(&[2.0, 0.0, 0.0]);
    assert_eq!(ctl.seek(&scene), SeekOutcome::LocalMinimum);
    assert_eq!(ctl.invalidations(), 1);
    assert!(ctl.cached_plan().is_none());
}

#[test]
fn already_optimal_is_a_local_minimum() {
    let mut ctl = grid_controller(IntegratorModel::default());
    let scene = scene_at(2.0);

    assert_eq!(ctl.seek(&scene), SeekOutcome::LocalMinimum);
    assert_eq!(ctl.search_calls(), 1);
    assert!(ctl.cached_plan().is_none());
}

#[test]
fn prediction_failure_is_no_output_and_leaves_no_plan() {
    let model = IntegratorModel::default()
        .with_workspace(Vec3::new(-0.5, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0));
    let mut ctl = grid_controller(model);
    let scene = scene_at(0.0);

    assert_eq!(ctl.seek(&scene), SeekOutcome::NoOutput);
    assert!(ctl.cached_plan().is_none());

    assert_eq!(ctl.seek(&scene), SeekOutcome::NoOutput);
    assert_eq!(ctl.search_calls(), 2);
}

#[test]
fn simplex_returns_an_improving_legal_action() {
    let mut ctl = Controller::new(
        IntegratorModel::default(),
        reach_goal(),
        unit_steps(),
        3,
        Strategy::Simplex,
    )
    .with_seed(11);
    let scene = scene_at(0.0);

    let outcome = ctl.seek(&scene);
    let action = outcome.action().expect("simplex finds an improvement").clone();
    assert!(unit_steps().contains(&action));

    let plan = ctl.cached_plan().expect("rest of plan cached");
    assert_eq!(plan.actions.len(), 2);
    assert!(plan.value[0] < 2.0);
}

#[test]
fn same_seed_same_plan() {
    let scene = scene_at(0.0);
    let run = |seed| {
        let mut ctl = Controller::new(
            IntegratorModel::default(),
            reach_goal(),
            unit_steps(),
            3,
            Strategy::Simplex,
        )
        .with_seed(seed);
        ctl.seek(&scene)
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn tree_returns_an_improving_legal_action() {
    let mut ctl = Controller::new(
        IntegratorModel::default(),
        reach_goal(),
        unit_steps(),
        3,
        Strategy::Tree,
    )
    .with_seed(3);
    let scene = scene_at(0.0);

    let outcome = ctl.seek(&scene);
    let action = outcome.action().expect("tree finds an improvement");
    assert!(unit_steps().contains(action));
    assert_eq!(ctl.search_calls(), 1);
}
