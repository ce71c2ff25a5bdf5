//! Frame scheduling capability for the timer engine.
//!
//! The engine never sleeps or spawns anything itself. It asks a
//! [`FrameScheduler`] for "one more frame" after every tick and cancels that
//! request when paused or reset. A driver loop pulls due frames back out with
//! [`FrameScheduler::next_frame`] and hands them to the engine.

use std::time::{Duration, Instant};

/// Opaque identifier for a requested frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Schedule-next-frame / cancel-pending capability
pub trait FrameScheduler {
    /// Request a frame to be delivered later.
    fn schedule_frame(&mut self) -> FrameHandle;

    /// Withdraw a requested frame. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Deliver the next due frame, or `None` when nothing is scheduled.
    fn next_frame(&mut self) -> Option<FrameHandle>;
}

/// Delivers the outstanding frame immediately.
///
/// Pair with [`crate::ManualClock`] to drive the engine in virtual time.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

/// Delivers frames at a fixed real-time interval, blocking the caller of
/// `next_frame` until the frame is due.
#[derive(Debug)]
pub struct PacedFrames {
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameHandle, Instant)>,
}

impl PacedFrames {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for PacedFrames {
    fn schedule_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some((handle, Instant::now() + self.interval));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn next_frame(&mut self) -> Option<FrameHandle> {
        let (handle, due) = self.pending.take()?;
        let wait = due.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        Some(handle)
    }
}
