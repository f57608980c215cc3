use core::cmp::Ordering;

use motor_core::{
    lexical_compare, ActionBounds, DynamicsModel, IntegratorModel, MultiObjective, Objective,
    PointNode, PointScene, RealVector, RelationTable, SceneSignature, SeekError, SplitMix64, Vec3,
};
use motor_search::{ConstrainedNelderMead, NelderMeadConfig, TrajEval};

fn scene(goal: Vec3) -> PointScene {
    PointScene::new("world")
        .with_movable("hand", PointNode::new(Vec3::ZERO, Vec3::new(0.1, 0.1, 0.1)))
        .with_node("goal", PointNode::new(goal, Vec3::new(0.1, 0.1, 0.1)))
}

fn objective() -> MultiObjective {
    MultiObjective::new().with(Objective::euclidean("hand", "goal"))
}

struct RejectAll;

impl DynamicsModel<PointScene> for RejectAll {
    fn predict(&self, _: &SceneSignature, _: &RelationTable, _: &[f64]) -> Option<RealVector> {
        None
    }
}

#[test]
fn never_worse_than_initial_simplex_and_stays_in_bounds() {
    let s = scene(Vec3::new(1.5, -0.5, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let bounds = ActionBounds::new(vec![-1.0, -1.0], vec![1.0, 1.0]).tile(2);
    let nm = ConstrainedNelderMead::new(bounds.clone());

    for seed in [1u64, 7, 42, 1234] {
        let mut eval = TrajEval::new(&model, &objective, &s, 2);

        // Replay the initial simplex draws with a copy of the generator.
        let mut probe = SplitMix64::new(seed);
        let mut initial_best: Option<RealVector> = None;
        for _ in 0..=nm.ndim() {
            let vertex = bounds.sample(&mut probe);
            let value = eval.eval(&vertex).expect("evaluate").value;
            let replace = match &initial_best {
                None => true,
                Some(best) => lexical_compare(&value, best) == Ordering::Less,
            };
            if replace {
                initial_best = Some(value);
            }
        }
        let initial_best = initial_best.expect("non-empty simplex");

        let mut rng = SplitMix64::new(seed);
        let optimum = nm.run(&mut eval, &mut rng).expect("optimise");
        assert_ne!(lexical_compare(&optimum.value, &initial_best), Ordering::Greater);
        assert!(bounds.contains(&optimum.point), "{:?} out of bounds", optimum.point);
        assert_eq!(optimum.final_state.len(), 3);
    }
}

#[test]
fn converges_on_one_dimensional_target() {
    let s = scene(Vec3::new(1.3, 0.0, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let nm = ConstrainedNelderMead::new(ActionBounds::new(vec![-2.0], vec![2.0]))
        .with_config(NelderMeadConfig { iterations: 200 });

    let mut eval = TrajEval::new(&model, &objective, &s, 1);
    let optimum = nm.run(&mut eval, &mut SplitMix64::new(5)).expect("optimise");
    assert!(optimum.value[0] < 1e-2, "value {:?}", optimum.value);
    assert!((optimum.point[0] - 1.3).abs() < 1e-2);
}

#[test]
fn same_seed_same_optimum() {
    let s = scene(Vec3::new(0.4, 0.9, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let nm = ConstrainedNelderMead::new(ActionBounds::new(vec![-1.0, -1.0], vec![1.0, 1.0]));

    let mut e1 = TrajEval::new(&model, &objective, &s, 2);
    let mut e2 = TrajEval::new(&model, &objective, &s, 2);
    let a = nm.run(&mut e1, &mut SplitMix64::new(9)).expect("optimise");
    let b = nm.run(&mut e2, &mut SplitMix64::new(9)).expect("optimise");
    assert_eq!(a, b);
}

#[test]
fn prediction_failure_aborts_the_run() {
    let s = scene(Vec3::new(1.0, 0.0, 0.0));
    let objective = objective();
    let nm = ConstrainedNelderMead::new(ActionBounds::new(vec![-1.0], vec![1.0]));
    let mut eval = TrajEval::new(&RejectAll, &objective, &s, 1);
    let err = nm.run(&mut eval, &mut SplitMix64::new(1)).unwrap_err();
    assert_eq!(err, SeekError::Prediction { step: 0 });
}

#[test]
fn zero_iterations_returns_best_initial_vertex() {
    let s = scene(Vec3::new(1.0, 0.0, 0.0));
    let model = IntegratorModel::new(0);
    let objective = objective();
    let bounds = ActionBounds::new(vec![-1.0], vec![1.0]);
    let nm = ConstrainedNelderMead::new(bounds.clone())
        .with_config(NelderMeadConfig { iterations: 0 });

    let mut eval = TrajEval::new(&model, &objective, &s, 1);
    let optimum = nm.run(&mut eval, &mut SplitMix64::new(3)).expect("optimise");
    assert_eq!(eval.evaluations(), 2);

    let mut probe = SplitMix64::new(3);
    let v0 = bounds.sample(&mut probe);
    let v1 = bounds.sample(&mut probe);
    let expected = if (v1[0] - 1.0).abs() < (v0[0] - 1.0).abs() { v1 } else { v0 };
    assert_eq!(optimum.point, expected);
}
