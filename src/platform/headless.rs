//! Manually fired frame scheduler

use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::{FrameCallback, FrameRequest, FrameScheduler};

#[derive(Default)]
struct Queue {
    next_id: i32,
    pending: Vec<(FrameRequest, FrameCallback)>,
}

/// Queues frame callbacks until [`fire`](ManualScheduler::fire) is called
///
/// Clones share one queue, so the host can keep a handle while the frame
/// loop owns another.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback pending at the time of the call
    ///
    /// Callbacks requested while firing wait for the next call. Returns the
    /// number of callbacks run.
    pub fn fire(&self, now_ms: f64) -> usize {
        let due = std::mem::take(&mut self.queue.borrow_mut().pending);
        let count = due.len();
        for (_, callback) in due {
            callback(now_ms);
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequest {
        let mut queue = self.queue.borrow_mut();
        queue.next_id = queue.next_id.wrapping_add(1);
        let request = FrameRequest(queue.next_id);
        queue.pending.push((request, callback));
        request
    }

    fn cancel_frame(&self, request: FrameRequest) {
        self.queue
            .borrow_mut()
            .pending
            .retain(|(pending, _)| *pending != request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fire_runs_pending_once() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0.0));
        let h = hits.clone();
        scheduler.request_frame(Box::new(move |now| h.set(now)));

        assert_eq!(scheduler.fire(42.0), 1);
        assert_eq!(hits.get(), 42.0);
        assert_eq!(scheduler.fire(50.0), 0);
    }

    #[test]
    fn test_cancel_removes_only_that_request() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let a = {
            let hits = hits.clone();
            scheduler.request_frame(Box::new(move |_| hits.set(hits.get() + 1)))
        };
        {
            let hits = hits.clone();
            scheduler.request_frame(Box::new(move |_| hits.set(hits.get() + 10)));
        }
        assert_ne!(a, FrameRequest(2));

        scheduler.cancel_frame(a);
        scheduler.cancel_frame(FrameRequest(999));
        assert_eq!(scheduler.pending_count(), 1);
        scheduler.fire(0.0);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_requests_during_fire_wait_for_next_call() {
        let scheduler = ManualScheduler::new();
        let inner = scheduler.clone();
        scheduler.request_frame(Box::new(move |_| {
            inner.request_frame(Box::new(|_| {}));
        }));

        assert_eq!(scheduler.fire(0.0), 1);
        assert_eq!(scheduler.pending_count(), 1);
    }
}
