use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_motion_planning::path_planning::{
    build_steering, CircleObstacle, ConfigSpace, DynamicBounds, GoalRegion, Interval,
    KinodynamicSteering, Problem, RobotFootprint, Rrt, RrtConfig, SafetyOracle, SteeringMode,
    StraightLineSteering, UnicycleModel,
};
use rust_motion_planning::{MotionModel, PlanningConfig, State2D, StateValidator};

fn space() -> ConfigSpace {
    ConfigSpace::new(0.0, 100.0, 0.0, 100.0)
}

fn dynamics() -> DynamicBounds {
    DynamicBounds {
        velocity: Interval::new(-5.0, 5.0),
        omega: Interval::new(-1.0, 1.0),
        acceleration: Interval::new(-2.0, 2.0),
        steering_rate: Interval::new(-1.0, 1.0),
    }
}

/// Solid wall of overlapping circles along x = 50, open above y = 74
fn wall() -> Vec<CircleObstacle> {
    (0..9).map(|i| CircleObstacle::new(50.0, 4.0 + 8.0 * i as f64, 6.0)).collect()
}

#[test]
fn test_geometric_rrt_around_wall() {
    let oracle = SafetyOracle::new(space(), wall()).with_footprint(RobotFootprint::rectangle(2.0, 1.0));
    let steering = StraightLineSteering::new(3.0, true).unwrap().with_resolution(0.5).unwrap();
    let planner = Rrt::new(space(), steering, oracle.clone(), RrtConfig::default()).unwrap();

    let start = State2D::at(20.0, 20.0);
    let goal = GoalRegion::new(80.0, 20.0, 6.0);
    let result = planner.run_seeded(&start, &goal).unwrap();

    assert_eq!(result.path.first(), Some(&start));
    assert!(goal.contains(result.path.last().unwrap()));
    assert!(result.path.iter().all(|s| oracle.is_safe(s)));
    for pair in result.path.windows(2) {
        assert!(pair[0].distance(&pair[1]) <= 3.0 + 1e-9);
        assert!(oracle.is_segment_valid(&pair[0], &pair[1], 0.5));
    }
    // the only way across is over the top of the wall
    assert!(result.path.iter().any(|s| s.y > 74.0));
}

#[test]
fn test_geometric_rrt_with_explicit_rng() {
    let oracle = SafetyOracle::new(space(), wall());
    let steering = StraightLineSteering::new(5.0, false).unwrap();
    let planner = Rrt::new(space(), steering, oracle, RrtConfig::default()).unwrap();
    let start = State2D::at(20.0, 20.0);
    let goal = GoalRegion::new(80.0, 20.0, 6.0);

    let first = planner.run(&start, &goal, &mut StdRng::seed_from_u64(5)).unwrap();
    let second = planner.run(&start, &goal, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(first.path, second.path);
    assert_eq!(first.tree.len(), second.tree.len());
    // without small steps every edge is exactly one step long
    for edge in first.edges() {
        assert_relative_eq!(edge.tail_state.distance(&edge.head_state), 5.0, epsilon = 1e-9);
    }
}

#[test]
fn test_kinodynamic_rrt() {
    let space = space().with_dynamics(dynamics());
    let oracle = SafetyOracle::new(space.clone(), vec![CircleObstacle::new(30.0, 30.0, 5.0)]);
    let steering = KinodynamicSteering::new(5.0, 0.1, dynamics()).unwrap();
    let config = RrtConfig { max_iterations: 20_000, ..Default::default() };
    let planner = Rrt::new(space, steering, oracle.clone(), config).unwrap();

    let start = State2D::at(50.0, 50.0);
    let goal = GoalRegion::new(60.0, 50.0, 8.0);
    let result = planner.run_seeded(&start, &goal).unwrap();

    let trajectory = &result.trajectory;
    assert!(!trajectory.is_empty());
    assert_relative_eq!(trajectory[0].time, 0.1, epsilon = 1e-12);
    assert!(trajectory.windows(2).all(|w| w[0].time < w[1].time));
    assert!(trajectory.iter().all(|s| oracle.is_safe(&s.state)));
    assert_eq!(trajectory.last().map(|s| s.state), result.path.last().copied());
    assert!(goal.contains(&trajectory[trajectory.len() - 1].state));

    // every sample is one Euler step from its predecessor under its control
    let mut previous = start;
    for sample in trajectory {
        let expected = UnicycleModel.propagate(&previous, &sample.control, 0.1);
        assert_relative_eq!(sample.state.x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(sample.state.y, expected.y, epsilon = 1e-9);
        assert_relative_eq!(sample.state.yaw, expected.yaw, epsilon = 1e-9);
        assert_relative_eq!(sample.state.v, expected.v, epsilon = 1e-9);
        assert_relative_eq!(sample.state.omega, expected.omega, epsilon = 1e-9);
        previous = sample.state;
    }

    // controls respect the limits
    let limits = dynamics();
    for sample in trajectory {
        assert!(sample.control.acceleration >= limits.acceleration.min);
        assert!(sample.control.acceleration <= limits.acceleration.max);
        assert!(sample.control.steering_rate >= limits.steering_rate.min);
        assert!(sample.control.steering_rate <= limits.steering_rate.max);
    }
}

#[test]
fn test_boxed_steering_from_problem() {
    let space = space().with_dynamics(dynamics());
    let problem = Problem::new(State2D::at(50.0, 50.0), GoalRegion::new(60.0, 50.0, 8.0), 5.0)
        .with_steering(SteeringMode::Kinodynamic);
    let steering = build_steering(&problem, &space, 0.1).unwrap();
    let oracle = SafetyOracle::new(space.clone(), Vec::new());
    let planner = Rrt::new(space, steering, oracle, RrtConfig::default()).unwrap();

    let result = planner.run_seeded(&problem.start, &problem.goal).unwrap();
    assert!(!result.trajectory.is_empty());
    assert_eq!(result.path.len(), result.tree.path_indices(result.goal_index).unwrap().len());
}

#[test]
fn test_planning_config_file() {
    let yaml = "
config_space:
  x_min: 0.0
  x_max: 100.0
  y_min: 0.0
  y_max: 100.0
  dynamics:
    velocity: { min: -5.0, max: 5.0 }
    omega: { min: -1.0, max: 1.0 }
    acceleration: { min: -2.0, max: 2.0 }
    steering_rate: { min: -1.0, max: 1.0 }
obstacles:
  - { x: 50.0, y: 20.0, radius: 10.0 }
rrt:
  seed: 3
problems:
  - name: geometric
    start: { x: 10.0, y: 10.0 }
    goal: { x: 90.0, y: 10.0, radius: 6.0 }
    epsilon: 4.0
    delta: 0.5
    allow_small_steps: true
  - name: kinodynamic
    start: { x: 50.0, y: 50.0 }
    goal: { x: 60.0, y: 50.0, radius: 8.0 }
    epsilon: 5.0
    steering: kinodynamic
";
    let path = std::env::temp_dir().join("rust_motion_planning_scenario.yaml");
    std::fs::write(&path, yaml).unwrap();
    let config = PlanningConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.problems.len(), 2);
    assert_eq!(config.rrt.seed, 3);

    let oracle = config.safety_oracle();
    let geometric = config.solve(0).unwrap();
    assert!(geometric.trajectory.is_empty());
    assert!(config.problems[0].goal.contains(geometric.path.last().unwrap()));
    assert!(geometric.path.iter().all(|s| oracle.is_valid(s)));

    let kinodynamic = config.solve(1).unwrap();
    assert!(!kinodynamic.trajectory.is_empty());
    assert!(config.problems[1].goal.contains(kinodynamic.path.last().unwrap()));
}
