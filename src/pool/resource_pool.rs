//! Generic reusable-object pool
//!
//! `borrow` pops an idle instance or builds a new one, so it never waits on
//! anything but the idle-list lock. `release` keeps the instance while the
//! pool is below `max_idle` and drops it otherwise.
//!
//! A maintenance thread owned by the pool wakes every `interval` and pulls
//! the idle count back into `min_idle..=max_idle`. Dropping the pool stops
//! and joins it. Instances out on loan are not tracked; they come back (or
//! not) through `release`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::thread::{self, JoinHandle};

type Factory<T> = dyn Fn() -> T + Send + Sync;

/// Size band the maintenance task steers towards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolBounds {
    pub min_idle: usize,
    pub max_idle: usize,
}

impl PoolBounds {
    pub fn new(min_idle: usize, max_idle: usize) -> Self {
        Self {
            min_idle: min_idle.min(max_idle),
            max_idle,
        }
    }
}

/// Outcome of one maintenance pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub created: usize,
    pub evicted: usize,
}

struct Shared<T> {
    idle: Mutex<Vec<T>>,
    factory: Box<Factory<T>>,
    bounds: PoolBounds,
    stop: Mutex<bool>,
    wake: Condvar,
}

impl<T> Shared<T> {
    fn maintain(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        let missing = self.bounds.min_idle.saturating_sub(self.idle.lock().len());
        if missing > 0 {
            // build outside the lock so borrowers are never held up by allocation
            let fresh: Vec<T> = (0..missing).map(|_| (self.factory)()).collect();
            let mut idle = self.idle.lock();
            let room = self.bounds.max_idle.saturating_sub(idle.len());
            report.created = fresh.len().min(room);
            idle.extend(fresh.into_iter().take(room));
        }

        // release and warm_up already stop at max_idle, so this only trims
        // if that cap is ever bypassed
        let mut idle = self.idle.lock();
        if idle.len() > self.bounds.max_idle {
            report.evicted = idle.len() - self.bounds.max_idle;
            let keep = self.bounds.max_idle;
            idle.truncate(keep);
        }
        report
    }
}

pub struct ResourcePool<T: Send + 'static> {
    shared: Arc<Shared<T>>,
    #[cfg(not(target_arch = "wasm32"))]
    maintenance: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> ResourcePool<T> {
    /// Pool with a background maintenance task running every `interval`.
    /// A zero interval disables the task; `maintain` can still be called.
    pub fn new<F>(factory: F, bounds: PoolBounds, interval: Duration) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            idle: Mutex::new(Vec::with_capacity(bounds.max_idle)),
            factory: Box::new(factory),
            bounds,
            stop: Mutex::new(false),
            wake: Condvar::new(),
        });

        #[cfg(not(target_arch = "wasm32"))]
        {
            let maintenance = if interval.is_zero() {
                None
            } else {
                spawn_maintenance(Arc::clone(&shared), interval)
            };
            Self { shared, maintenance }
        }

        #[cfg(target_arch = "wasm32")]
        {
            // no timer thread in the browser; `release` runs the pass instead
            let _ = interval;
            Self { shared }
        }
    }

    /// Pool without a maintenance task
    pub fn unmanaged<F>(factory: F, bounds: PoolBounds) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(factory, bounds, Duration::ZERO)
    }

    /// Take an idle instance, or build one if none is idle.
    pub fn borrow(&self) -> T {
        let reused = self.shared.idle.lock().pop();
        reused.unwrap_or_else(|| (self.shared.factory)())
    }

    /// Give an instance back. Returns false if the pool was full and the
    /// instance was dropped.
    pub fn release(&self, item: T) -> bool {
        let kept = {
            let mut idle = self.shared.idle.lock();
            if idle.len() < self.shared.bounds.max_idle {
                idle.push(item);
                true
            } else {
                false
            }
        };
        #[cfg(target_arch = "wasm32")]
        {
            let _ = self.shared.maintain();
        }
        kept
    }

    /// Run one maintenance pass on the calling thread.
    pub fn maintain(&self) -> MaintenanceReport {
        self.shared.maintain()
    }

    /// Pre-build up to `count` idle instances, never past `max_idle`.
    pub fn warm_up(&self, count: usize) {
        let room = self.shared.bounds.max_idle.saturating_sub(self.available());
        let fresh: Vec<T> = (0..count.min(room)).map(|_| (self.shared.factory)()).collect();
        let mut idle = self.shared.idle.lock();
        let room = self.shared.bounds.max_idle.saturating_sub(idle.len());
        idle.extend(fresh.into_iter().take(room));
    }

    pub fn available(&self) -> usize {
        self.shared.idle.lock().len()
    }

    pub fn bounds(&self) -> PoolBounds {
        self.shared.bounds
    }

    /// Whether the background task is alive
    pub fn is_maintained(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.maintenance.is_some()
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_maintenance<T: Send + 'static>(
    shared: Arc<Shared<T>>,
    interval: Duration,
) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("resource-pool-maintenance".to_string())
        .spawn(move || loop {
            {
                let mut stop = shared.stop.lock();
                if !*stop {
                    shared.wake.wait_for(&mut stop, interval);
                }
                if *stop {
                    break;
                }
            }
            let report = shared.maintain();
            if report != MaintenanceReport::default() {
                log::trace!(
                    "pool maintenance: +{} -{}",
                    report.created,
                    report.evicted
                );
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("pool maintenance thread unavailable, running unmanaged: {}", e);
            None
        }
    }
}

impl<T: Send + 'static> Drop for ResourcePool<T> {
    fn drop(&mut self) {
        *self.shared.stop.lock() = true;
        self.shared.wake.notify_all();
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(handle) = self.maintenance.take() {
                let _ = handle.join();
            }
        }
    }
}
