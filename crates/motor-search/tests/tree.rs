use motor_core::{
    ActionBounds, DynamicsModel, IntegratorModel, MultiObjective, Objective, PointNode,
    PointScene, RealVector, RelationTable, SceneSignature, SplitMix64, Vec3,
};
use motor_search::{TreeSearch, TreeSearchConfig};

fn scene(goal: Vec3) -> PointScene {
    PointScene::new("world")
        .with_movable("hand", PointNode::new(Vec3::ZERO, Vec3::new(0.1, 0.1, 0.1)))
        .with_node("goal", PointNode::new(goal, Vec3::new(0.1, 0.1, 0.1)))
}

fn objective() -> MultiObjective {
    MultiObjective::new().with(Objective::euclidean("hand", "goal"))
}

fn step_bounds() -> ActionBounds {
    ActionBounds::new(vec![-1.0, -1.0], vec![1.0, 1.0])
}

struct RejectAll;

impl DynamicsModel<PointScene> for RejectAll {
    fn predict(&self, _: &SceneSignature, _: &RelationTable, _: &[f64]) -> Option<RealVector> {
        None
    }
}

#[test]
fn search_stops_at_first_improvement() {
    let s = scene(Vec3::new(3.0, 1.0, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let config = TreeSearchConfig {
        iterations: 50,
        ..TreeSearchConfig::default()
    };

    let mut tree = TreeSearch::new(&model, &objective, &s, step_bounds(), config);
    let root_value = tree.root_value().clone();
    let result = tree.search(&mut SplitMix64::new(11));

    // The root's first extension is a local descent that improves immediately, and the search
    // returns right there even though 49 iterations remain.
    assert_eq!(tree.num_nodes(), 2);
    assert_eq!(tree.num_nonleafs(), 1);
    assert_eq!(tree.num_leafs(), 1);
    assert!(result.value[0] < root_value[0]);
    assert!(!result.trajectory.is_empty());
    assert!(result.trajectory.len() <= config.max_steps);
    for step in result.trajectory.steps() {
        assert!(step_bounds().contains(step));
    }
}

#[test]
fn search_at_optimum_keeps_root_and_exhausts_iterations() {
    let s = scene(Vec3::ZERO);
    let model = IntegratorModel::new(0);
    let objective = objective();
    let config = TreeSearchConfig {
        iterations: 6,
        ..TreeSearchConfig::default()
    };

    let mut tree = TreeSearch::new(&model, &objective, &s, step_bounds(), config);
    let result = tree.search(&mut SplitMix64::new(2));

    assert!(result.trajectory.is_empty());
    assert_eq!(result.value.as_slice(), &[0.0]);
    assert_eq!(result.final_state.as_slice(), &[0.0, 0.0, 0.0]);
    // The root's descent finds nothing; later attempts add random children.
    assert!(tree.num_nodes() > 1);
    assert!(tree.num_nodes() <= 6);
}

#[test]
fn expand_reports_improvement_only_against_best() {
    let s = scene(Vec3::new(2.0, 0.0, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let mut tree = TreeSearch::new(
        &model,
        &objective,
        &s,
        step_bounds(),
        TreeSearchConfig::default(),
    );
    let mut rng = SplitMix64::new(4);

    assert!(tree.expand(&mut rng));
    let best_after_first = tree.best_value().clone();
    for _ in 0..10 {
        let before = tree.best_value().clone();
        let improved = tree.expand(&mut rng);
        if !improved {
            assert_eq!(tree.best_value(), &before);
        }
    }
    assert!(tree.best_value()[0] <= best_after_first[0]);
    assert!(tree.avg_depth() > 0.0);
}

#[test]
fn failing_model_never_grows_the_tree() {
    let s = scene(Vec3::new(1.0, 0.0, 0.0));
    let objective = objective();
    let mut tree = TreeSearch::new(
        &RejectAll,
        &objective,
        &s,
        step_bounds(),
        TreeSearchConfig::default(),
    );
    let result = tree.search(&mut SplitMix64::new(8));
    assert_eq!(tree.num_nodes(), 1);
    assert!(result.trajectory.is_empty());
    assert_eq!(result.value, tree.root_value().clone());
}
