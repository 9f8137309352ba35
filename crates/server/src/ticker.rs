//! Tokio-backed gravity clock.
//!
//! Each running room gets its own interval task that posts
//! [`EngineEvent::Tick`] into the engine queue. The first tick fires one full
//! period after the match starts.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use tetris_duel_core::{TickHandle, TickSource};
use tetris_duel_types::RoomId;

use crate::engine::EngineEvent;

/// [`TickSource`] that spawns one interval task per room.
///
/// `start` must be called from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct IntervalTicks {
    period: Duration,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl IntervalTicks {
    pub fn new(period: Duration, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { period, events }
    }
}

impl TickSource for IntervalTicks {
    fn start(&self, room_id: &RoomId) -> Box<dyn TickHandle> {
        let period = self.period;
        let events = self.events.clone();
        let room_id = room_id.clone();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let tick = EngineEvent::Tick {
                    room_id: room_id.clone(),
                };
                if events.send(tick).is_err() {
                    debug!(room = %room_id, "engine gone, clock stopping");
                    break;
                }
            }
        });

        Box::new(IntervalTickHandle { task: Some(task) })
    }
}

/// Aborts its task on cancel or drop.
struct IntervalTickHandle {
    task: Option<JoinHandle<()>>,
}

impl TickHandle for IntervalTickHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for IntervalTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticks = IntervalTicks::new(Duration::from_millis(100), tx);
        let room = RoomId::from("r");

        let mut handle = ticks.start(&room);
        tokio::time::sleep(Duration::from_millis(350)).await;

        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(event, EngineEvent::Tick { ref room_id } if *room_id == room));
            count += 1;
        }
        assert_eq!(count, 3);

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
