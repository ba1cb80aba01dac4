//! Blocking task queue with multiple priority levels.
//!
//! Priorities are `0, 1, 2 .. levels`, where 0 is the highest. The queue is
//! unbounded: producers never block. Consumers block in [`PriorityTaskQueue::pop`]
//! until a task arrives or the queue is closed and drained.

use crate::error::{Error, Result};
use crate::task::Task;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

struct State {
    // one FIFO per priority level, index 0 checked first
    queues: Vec<VecDeque<Task>>,
    closed: bool,
}

impl State {
    fn next_task(&mut self) -> Option<Task> {
        self.queues.iter_mut().find_map(VecDeque::pop_front)
    }

    fn len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }
}

/// Thread-safe blocking queue holding one FIFO sub-queue per priority level.
///
/// `push`, `pop`, and `close` serialize on a single lock, so enqueue,
/// dequeue, and close events are totally ordered per queue. Once closed the
/// queue never reopens; pending tasks are still served until it drains.
pub struct PriorityTaskQueue {
    state: Mutex<State>,
    available: Condvar,
    levels: usize,
}

impl PriorityTaskQueue {
    /// Create a queue with `levels` priority levels.
    ///
    /// The level count is fixed for the lifetime of the queue.
    pub fn new(levels: usize) -> Result<Self> {
        if levels == 0 {
            return Err(Error::config("priority levels must be > 0"));
        }
        if levels > 256 {
            return Err(Error::config("too many priority levels (max 256)"));
        }

        Ok(Self {
            state: Mutex::new(State {
                queues: (0..levels).map(|_| VecDeque::new()).collect(),
                closed: false,
            }),
            available: Condvar::new(),
            levels,
        })
    }

    /// Append `task` to the tail of the given priority's sub-queue and wake
    /// one blocked consumer.
    ///
    /// Fails with [`Error::InvalidPriority`] if `priority >= levels` and with
    /// [`Error::QueueClosed`] if the queue has been closed; neither case
    /// enqueues anything. Never blocks.
    pub fn push(&self, task: Task, priority: usize) -> Result<()> {
        if priority >= self.levels {
            return Err(Error::InvalidPriority {
                priority,
                levels: self.levels,
            });
        }

        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::QueueClosed);
        }
        state.queues[priority].push_back(task);
        drop(state);

        // exactly one task became available
        self.available.notify_one();
        Ok(())
    }

    /// Blocking dequeue.
    ///
    /// Returns the head of the lowest-indexed non-empty sub-queue, waiting on
    /// the condvar while the queue is empty but still active. Returns `None`
    /// only once the queue is closed *and* empty; a closed queue with pending
    /// tasks keeps serving them.
    pub fn pop(&self) -> Option<Task> {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.next_task() {
                return Some(task);
            }
            if state.closed {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Close the queue and wake every blocked consumer.
    ///
    /// Idempotent. Pending tasks are not discarded; consumers keep draining
    /// them before observing the closed state.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);

        // all waiters must re-check and observe the terminal state
        self.available.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Number of queued tasks across all levels (a snapshot).
    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    /// Whether no tasks are queued (a snapshot).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of priority levels the queue was built with.
    pub fn levels(&self) -> usize {
        self.levels
    }
}

impl std::fmt::Debug for PriorityTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PriorityTaskQueue")
            .field("levels", &self.levels)
            .field("len", &state.len())
            .field("closed", &state.closed)
            .finish()
    }
}
