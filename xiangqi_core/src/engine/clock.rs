/// Milliseconds since an arbitrary origin; only differences are meaningful.
pub fn now() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        if let Some(window) = web_sys::window() {
            return window.performance().map(|p| p.now()).unwrap_or(0.0);
        }
        let global = js_sys::global();
        if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
            return worker.performance().map(|p| p.now()).unwrap_or(0.0);
        }
        0.0 // Fail safe instead of panic
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        let since_the_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        #[allow(clippy::cast_precision_loss)]
        let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
            1000.0,
            f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
        );
        time_ms
    }
}

/// How many nodes pass between clock reads.
const CHECK_INTERVAL: u64 = 256;

/// Cooperative search deadline. Once expired it stays expired.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: f64,
    limit_ms: Option<f64>,
    expired: bool,
}

impl Deadline {
    #[allow(clippy::cast_precision_loss)]
    pub fn start(limit_ms: Option<u64>) -> Self {
        Self {
            start: now(),
            limit_ms: limit_ms.map(|ms| ms as f64),
            expired: false,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        now() - self.start
    }

    /// Called once per node; reads the clock every `CHECK_INTERVAL` nodes.
    pub fn check(&mut self, nodes: u64) -> bool {
        if self.expired {
            return true;
        }
        if let Some(limit) = self.limit_ms {
            if nodes % CHECK_INTERVAL == 0 && self.elapsed_ms() >= limit {
                self.expired = true;
            }
        }
        self.expired
    }

    pub const fn expired(&self) -> bool {
        self.expired
    }
}
