//! Next-frame scheduling with cancellation.
//!
//! A [`FrameScheduler`] hands out a [`FrameHandle`] per request; the host
//! reports fired handles back to whoever asked. [`FrameDebouncer`] keeps at
//! most one request outstanding.

/// Identifies one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source of animation-frame callbacks.
pub trait FrameScheduler {
    /// Request a callback on the next frame.
    fn schedule(&mut self) -> FrameHandle;

    /// Drop a pending request. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Deterministic scheduler driven by explicit [`tick`](Self::tick) calls.
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    frame: u64,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame, returning the handles that fire in it.
    pub fn tick(&mut self) -> Vec<FrameHandle> {
        self.frame += 1;
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Frames elapsed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl FrameScheduler for VirtualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

/// Coalesces requests so only the latest one can fire.
#[derive(Debug)]
pub struct FrameDebouncer<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> FrameDebouncer<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Schedule a callback, cancelling any previous pending one.
    pub fn request(&mut self) -> FrameHandle {
        self.cancel_pending();
        let handle = self.scheduler.schedule();
        self.pending = Some(handle);
        handle
    }

    /// Consume a fired handle. Returns true only for the pending request.
    pub fn fire(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_pending(&mut self) {
        if let Some(old) = self.pending.take() {
            self.scheduler.cancel(old);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
