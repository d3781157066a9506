//! Background stepping for native hosts
//!
//! The worker thread owns the cadence: it locks the engine for one step,
//! releases it, and sleeps out the rest of the interval. Edits take the lock
//! too, so a merge always lands between two steps. The render side polls
//! with `try_lock` and simply gets nothing while a step is in flight. Polled
//! grids go back through the pool that lent them, never through the engine
//! lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::domain::MergeReport;
use crate::foundation::{EngineError, EngineResult};
use crate::pool::{Matrix, MatrixPool};

use super::FlowEngine;

pub struct SimulationRunner {
    engine: Arc<Mutex<FlowEngine>>,
    // pool behind the last polled grid; swapped when the engine is resized
    pool: Mutex<Arc<MatrixPool>>,
    worker: Option<JoinHandle<()>>,
    shutdown_flag: Arc<AtomicBool>,
    steps: Arc<AtomicU64>,
}

impl SimulationRunner {
    /// Step in real time: one step per configured time step.
    pub fn start(engine: FlowEngine) -> EngineResult<Self> {
        let interval = Duration::try_from_secs_f64(engine.config().time_step)
            .map_err(|e| EngineError::invalid_config(format!("time step as interval: {}", e)))?;
        Self::with_interval(engine, interval)
    }

    /// Step every `interval`; zero steps back to back.
    pub fn with_interval(engine: FlowEngine, interval: Duration) -> EngineResult<Self> {
        let pool = Mutex::new(Arc::clone(engine.pool()));
        let engine = Arc::new(Mutex::new(engine));
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let steps = Arc::new(AtomicU64::new(0));

        let engine_clone = Arc::clone(&engine);
        let shutdown_clone = Arc::clone(&shutdown_flag);
        let steps_clone = Arc::clone(&steps);

        let worker = thread::Builder::new()
            .name("flow-engine-stepper".to_string())
            .spawn(move || Self::worker_loop(engine_clone, shutdown_clone, steps_clone, interval))
            .map_err(|e| EngineError::Worker(e.to_string()))?;

        log::debug!("simulation runner started, interval {:?}", interval);
        Ok(Self {
            engine,
            pool,
            worker: Some(worker),
            shutdown_flag,
            steps,
        })
    }

    fn worker_loop(
        engine: Arc<Mutex<FlowEngine>>,
        shutdown_flag: Arc<AtomicBool>,
        steps: Arc<AtomicU64>,
        interval: Duration,
    ) {
        while !shutdown_flag.load(Ordering::SeqCst) {
            let started = Instant::now();
            engine.lock().step();
            steps.fetch_add(1, Ordering::SeqCst);

            let spare = interval.saturating_sub(started.elapsed());
            if spare.is_zero() {
                thread::yield_now();
            } else {
                thread::sleep(spare);
            }
        }
    }

    /// Steps completed by the worker so far
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Shared handle; stays usable after `shutdown`.
    pub fn engine(&self) -> Arc<Mutex<FlowEngine>> {
        Arc::clone(&self.engine)
    }

    /// Run `f` with exclusive access between two steps.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut FlowEngine) -> R) -> R {
        f(&mut self.engine.lock())
    }

    pub fn merge_obstacles(&self, presence: &[u8]) -> EngineResult<MergeReport> {
        self.engine.lock().merge_obstacles(presence)
    }

    /// Latest render grid. Never waits: `None` while a step holds the
    /// engine or when nothing new is ready.
    pub fn poll_render_grid(&self) -> Option<Matrix> {
        let mut engine = self.engine.try_lock()?;
        let grid = engine.poll_render_grid()?;
        let mut pool = self.pool.lock();
        if !Arc::ptr_eq(&*pool, engine.pool()) {
            *pool = Arc::clone(engine.pool());
        }
        Some(grid)
    }

    /// Give a polled grid back without waiting for the engine.
    pub fn return_grid_to_pool(&self, grid: Matrix) -> EngineResult<()> {
        let pool = Arc::clone(&*self.pool.lock());
        pool.release(grid)
    }

    /// Stop and join the worker. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.shutdown_flag.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("simulation runner thread panicked");
            }
            log::debug!("simulation runner stopped after {} steps", self.steps());
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
