//! Thread-safe handle around one [`HawkEye`] engine.
//!
//! The engine itself has no internal locking.  When a sensor loop and a
//! render loop run on different threads, give each a clone of a
//! [`SharedHawkEye`]: every call takes the same mutex, so a pose update can
//! never interleave with a cast.
//!
//! A panic while the lock is held poisons the mutex; the handle recovers the
//! inner engine and keeps going, since every engine operation leaves the maps
//! in a valid state.
//!
//! # Example
//!
//! ```rust
//! use hawkeye_mapping::engine::{HawkEye, MapConfig};
//! use hawkeye_mapping::shared::SharedHawkEye;
//! use hawkeye_types::{CartCoord, MapObject};
//!
//! let engine = HawkEye::new(&MapConfig::default(), &MapObject::new("0")).unwrap();
//! let shared = SharedHawkEye::new(engine);
//!
//! let sensor = shared.clone();
//! std::thread::spawn(move || {
//!     sensor.with(|h| h.cast_point(CartCoord::new(0, 1), &MapObject::new("1")));
//! })
//! .join()
//! .unwrap();
//!
//! let snapshot = shared.local_snapshot();
//! assert_eq!(snapshot[21][20].as_ref().map(|c| c.state()), Some("1"));
//! ```

use hawkeye_types::{CellGrid, FrameId};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::HawkEye;

/// Cloneable, mutex-guarded engine handle.
#[derive(Clone)]
pub struct SharedHawkEye {
    inner: Arc<Mutex<HawkEye>>,
}

impl SharedHawkEye {
    pub fn new(engine: HawkEye) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut HawkEye) -> R) -> R {
        f(&mut self.lock())
    }

    /// A copy of the current local map's cells, taken under the lock.
    pub fn local_snapshot(&self) -> CellGrid {
        self.lock().local_map().cells().clone()
    }

    /// A copy of the global map's cells, taken under the lock.
    pub fn global_snapshot(&self) -> CellGrid {
        self.lock().global_map().cells().clone()
    }

    /// Id of the current local map.  Renderers compare it with the id of the
    /// snapshot they hold to notice a pose update.
    pub fn local_frame_id(&self) -> FrameId {
        self.lock().local_map().id()
    }

    fn lock(&self) -> MutexGuard<'_, HawkEye> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
