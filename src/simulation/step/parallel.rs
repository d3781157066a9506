//! Row-band stepper
//!
//! The output grid is split into contiguous bands of whole rows; each band
//! is written by one worker while all of them read the same prior grid and
//! obstacle grid. With the `parallel` feature the bands run on the rayon
//! pool (the browser pool set up by `init_thread_pool` on wasm32); without
//! it they run on scoped std threads.

use crate::domain::ObstacleGrid;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::kernel::{self, RowContext};
use super::stepper::check_inputs;
use super::{FlowParams, PerfTimer, PhysicsStepper, RunningAverage, SimulationState};

pub struct ParallelStepper {
    params: FlowParams,
    /// Requested band count, 0 = one per worker thread
    bands: usize,
    timings: RunningAverage,
}

impl ParallelStepper {
    pub fn new(params: FlowParams, bands: usize) -> Self {
        Self { params, bands, timings: RunningAverage::default() }
    }

    pub fn params(&self) -> FlowParams {
        self.params
    }

    pub fn set_params(&mut self, params: FlowParams) {
        self.params = params;
    }

    /// Bands actually used for a grid of `height` rows
    pub fn band_count(&self, height: u32) -> usize {
        let wanted = if self.bands == 0 { worker_threads() } else { self.bands };
        wanted.clamp(1, (height as usize).max(1))
    }
}

#[cfg(feature = "parallel")]
fn worker_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn worker_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn fill_band(
    first_row: u32,
    band: &mut [f32],
    prev: &crate::pool::Matrix,
    obstacles: &ObstacleGrid,
    ctx: &RowContext,
) {
    for (offset, row) in band.chunks_mut(ctx.width as usize).enumerate() {
        kernel::update_row(first_row + offset as u32, prev, obstacles, ctx, row);
    }
}

impl PhysicsStepper for ParallelStepper {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn update(&mut self, state: &mut SimulationState, obstacles: &ObstacleGrid, dt: f64) {
        check_inputs(state, obstacles);
        let timer = PerfTimer::start();

        let (width, height) = state.dimensions();
        let ctx = RowContext::new(&self.params, width, height, dt);
        let bands = self.band_count(height);
        let rows_per_band = (height as usize).div_ceil(bands);
        let band_len = rows_per_band * width as usize;

        let mut working = state.borrow_working();
        {
            let prev = state.current();

            #[cfg(feature = "parallel")]
            {
                working
                    .as_mut_slice()
                    .par_chunks_mut(band_len)
                    .enumerate()
                    .for_each(|(i, band)| {
                        fill_band((i * rows_per_band) as u32, band, prev, obstacles, &ctx);
                    });
            }

            #[cfg(not(feature = "parallel"))]
            {
                std::thread::scope(|scope| {
                    for (i, band) in working.as_mut_slice().chunks_mut(band_len).enumerate() {
                        let ctx = &ctx;
                        scope.spawn(move || {
                            fill_band((i * rows_per_band) as u32, band, prev, obstacles, ctx);
                        });
                    }
                });
            }
        }
        state.publish(working);

        self.timings.record(timer.elapsed_ms());
    }

    fn average_step_ms(&self) -> f64 {
        self.timings.mean_ms()
    }

    fn steps_recorded(&self) -> u64 {
        self.timings.samples()
    }

    fn reset_average(&mut self) {
        self.timings.reset();
    }
}
