//! RRT Path Planning Example
//!
//! Loads a planning configuration (from the path given as the first argument,
//! or a built-in scene) and solves every problem in it.

use std::env;
use std::path::Path;

use rust_motion_planning::PlanningConfig;

const SCENE: &str = "
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
  - { x: 50.0, y: 20.0, radius: 15.0 }
  - { x: 50.0, y: 60.0, radius: 15.0 }
robot: [{ x: 1.0, y: 0.5 }, { x: -1.0, y: 0.5 }, { x: -1.0, y: -0.5 }, { x: 1.0, y: -0.5 }]
rrt:
  seed: 11
  max_duration: 10.0
problems:
  - name: through the gap
    start: { x: 10.0, y: 40.0 }
    goal: { x: 90.0, y: 40.0, radius: 5.0 }
    epsilon: 5.0
    delta: 0.5
    allow_small_steps: true
  - name: kinodynamic hop
    start: { x: 20.0, y: 90.0 }
    goal: { x: 30.0, y: 90.0, radius: 6.0 }
    epsilon: 5.0
    steering: kinodynamic
";

fn main() {
    println!("RRT path planning start!!");

    let config = match env::args().nth(1) {
        Some(path) => PlanningConfig::load(Path::new(&path)),
        None => PlanningConfig::from_yaml(SCENE),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return;
        }
    };
    println!(
        "Loaded {} obstacles and {} problems",
        config.obstacles.len(),
        config.problems.len()
    );

    for (index, problem) in config.problems.iter().enumerate() {
        match config.solve(index) {
            Ok(result) => {
                println!(
                    "[{}] path found with {} states after {} iterations ({} vertices)",
                    problem.name,
                    result.path.len(),
                    result.iterations,
                    result.tree.len()
                );
                if let Some(sample) = result.trajectory.last() {
                    println!(
                        "[{}] trajectory of {} samples, arrival at t = {:.2}s",
                        problem.name,
                        result.trajectory.len(),
                        sample.time
                    );
                }
                for state in &result.path {
                    println!("  ({:.2}, {:.2}, {:.2})", state.x, state.y, state.yaw);
                }
            }
            Err(e) => println!("[{}] no path: {}", problem.name, e),
        }
    }

    println!("RRT path planning finish!!");
}
