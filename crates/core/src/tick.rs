//! Gravity clock seam.
//!
//! A session asks its [`TickSource`] for a clock when it becomes Active and
//! cancels the returned [`TickHandle`] when it ends. The source decides how
//! ticks are delivered; the session only cares that `tick()` gets called.

use std::sync::{Arc, Mutex};

use crate::types::RoomId;

/// A running periodic tick for one room.
pub trait TickHandle: Send {
    /// Stop delivering ticks. Must take effect before returning.
    fn cancel(&mut self);
}

/// Factory for per-room tick clocks.
pub trait TickSource: Send + Sync {
    fn start(&self, room_id: &RoomId) -> Box<dyn TickHandle>;
}

/// Tick source driven by the caller.
///
/// No timer is involved: whoever owns the registry calls `tick` directly.
/// Starts and cancellations are recorded, which makes it handy for headless
/// runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    log: Arc<Mutex<ManualTickLog>>,
}

#[derive(Debug, Default)]
struct ManualTickLog {
    started: Vec<RoomId>,
    cancelled: Vec<RoomId>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rooms whose clock was started, in order.
    pub fn started(&self) -> Vec<RoomId> {
        self.log.lock().map(|l| l.started.clone()).unwrap_or_default()
    }

    /// Rooms whose clock was cancelled, in order.
    pub fn cancelled(&self) -> Vec<RoomId> {
        self.log
            .lock()
            .map(|l| l.cancelled.clone())
            .unwrap_or_default()
    }

    /// Rooms started and not yet cancelled.
    pub fn running(&self) -> Vec<RoomId> {
        let Ok(log) = self.log.lock() else {
            return Vec::new();
        };
        let mut running = log.started.clone();
        for room in &log.cancelled {
            if let Some(pos) = running.iter().position(|r| r == room) {
                running.remove(pos);
            }
        }
        running
    }
}

impl TickSource for ManualTicks {
    fn start(&self, room_id: &RoomId) -> Box<dyn TickHandle> {
        if let Ok(mut log) = self.log.lock() {
            log.started.push(room_id.clone());
        }
        Box::new(ManualTickHandle {
            room_id: room_id.clone(),
            log: Arc::clone(&self.log),
            cancelled: false,
        })
    }
}

struct ManualTickHandle {
    room_id: RoomId,
    log: Arc<Mutex<ManualTickLog>>,
    cancelled: bool,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Ok(mut log) = self.log.lock() {
            log.cancelled.push(self.room_id.clone());
        }
    }
}
