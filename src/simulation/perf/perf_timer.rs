//! Wall-clock stopwatch for step and advisor timings

#[cfg(target_arch = "wasm32")]
mod clock {
    pub(super) type Stamp = f64;

    pub(super) fn now() -> Stamp {
        js_sys::Date::now()
    }

    // Date::now can step backwards when the system clock is adjusted
    pub(super) fn ms_since(start: Stamp) -> f64 {
        (js_sys::Date::now() - start).max(0.0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod clock {
    use std::time::Instant;

    pub(super) type Stamp = Instant;

    pub(super) fn now() -> Stamp {
        Instant::now()
    }

    pub(super) fn ms_since(start: Stamp) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }
}

#[derive(Clone, Copy)]
pub(crate) struct PerfTimer {
    started: clock::Stamp,
}

impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer { started: clock::now() }
    }

    /// Milliseconds since `start`; never negative
    pub(crate) fn elapsed_ms(&self) -> f64 {
        clock::ms_since(self.started)
    }
}

/// Incremental mean of step durations
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RunningAverage {
    mean_ms: f64,
    samples: u64,
}

impl RunningAverage {
    pub(crate) fn record(&mut self, ms: f64) {
        self.samples += 1;
        self.mean_ms += (ms - self.mean_ms) / self.samples as f64;
    }

    pub(crate) fn mean_ms(&self) -> f64 {
        self.mean_ms
    }

    pub(crate) fn samples(&self) -> u64 {
        self.samples
    }

    pub(crate) fn reset(&mut self) {
        *self = RunningAverage::default();
    }
}
