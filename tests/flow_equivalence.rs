use std::sync::Arc;

use windtunnel_engine::{
    FlowParams, MatrixPool, ObstacleGrid, ParallelStepper, PhysicsStepper, PoolBounds,
    SequentialStepper, SimulationState,
};

fn wing(width: u32, height: u32) -> ObstacleGrid {
    let mut grid = ObstacleGrid::new(width, height);
    grid.draw_wind_tunnel_borders();
    let mut mask = grid.to_presence_array();
    let cx = width as f32 * 0.35;
    let cy = height as f32 * 0.5;
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 - cx) / 6.0;
            let dy = (y as f32 - cy) / 3.0;
            if dx * dx + dy * dy <= 1.0 {
                mask[grid.index(x, y)] = 1;
            }
        }
    }
    grid.merge_from_presence_array(&mask).unwrap();
    grid.refresh_normals();
    grid
}

#[test]
fn band_split_does_not_change_the_result() {
    let (w, h) = (64, 33);
    let obstacles = wing(w, h);
    let params = FlowParams { inflow_speed: 36.0, diffusion: 0.08, inlet_fraction: 0.7 };
    let dt = 1.0 / 60.0;
    let pool = Arc::new(MatrixPool::unmanaged(w, h, PoolBounds::new(0, 12)));

    let mut reference = SimulationState::new(Arc::clone(&pool), dt);
    let mut sequential = SequentialStepper::new(params);
    for _ in 0..60 {
        sequential.update(&mut reference, &obstacles, dt);
    }

    for bands in [0, 1, 4, 7, 33] {
        let mut state = SimulationState::new(Arc::clone(&pool), dt);
        let mut parallel = ParallelStepper::new(params, bands);
        for _ in 0..60 {
            parallel.update(&mut state, &obstacles, dt);
        }
        assert_eq!(state.current(), reference.current(), "bands = {}", bands);
        assert_eq!(parallel.steps_recorded(), 60);
    }
}

#[test]
fn flow_is_shadowed_behind_an_obstacle() {
    let (w, h) = (80, 40);
    let obstacles = wing(w, h);
    let params = FlowParams { inflow_speed: 30.0, diffusion: 0.0, inlet_fraction: 1.0 };
    let pool = Arc::new(MatrixPool::unmanaged(w, h, PoolBounds::new(0, 4)));
    let mut state = SimulationState::new(pool, 0.1);
    let mut stepper = SequentialStepper::new(params);
    for _ in 0..60 {
        stepper.update(&mut state, &obstacles, 0.1);
    }

    let grid = state.current();
    // open channel far from the body is saturated
    assert!(grid.get(60, 3) > 0.9);
    // values stay a concentration
    assert!(grid.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    // the body itself is empty
    assert_eq!(grid.get(28, 20), 0.0);
}
