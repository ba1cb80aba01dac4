//! Task panic capture and observation.

use crate::task::TaskId;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Callback observing discarded task failures.
pub type FailureHook = Arc<dyn Fn(&TaskFailure) + Send + Sync>;

/// A task that panicked during execution.
///
/// Failures are swallowed by the worker loop; this record is what an
/// [`on_task_failure`](crate::ConfigBuilder::on_task_failure) hook gets to see.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Id of the task that panicked.
    pub task: TaskId,
    /// The panic message, when one could be extracted from the payload.
    pub message: String,
}

impl TaskFailure {
    pub(crate) fn from_payload(task: TaskId, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };

        Self { task, message }
    }
}

pub(crate) struct FailureHandler {
    hook: Option<FailureHook>,
    count: AtomicUsize,
}

impl FailureHandler {
    pub fn new(hook: Option<FailureHook>) -> Self {
        Self {
            hook,
            count: AtomicUsize::new(0),
        }
    }

    pub fn record(&self, failure: TaskFailure) {
        self.count.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(task = ?failure.task, message = %failure.message, "task panicked");

        if let Some(hook) = &self.hook {
            // a panicking hook must not take the worker down either
            let _ = catch_unwind(AssertUnwindSafe(|| hook(&failure)));
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use parking_lot::Mutex;

    fn payload_of(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn Any + Send> {
        catch_unwind(f).unwrap_err()
    }

    #[test]
    fn test_str_payload_message() {
        let id = Task::new(|| {}).id();
        let failure = TaskFailure::from_payload(id, payload_of(|| panic!("boom")));
        assert_eq!(failure.message, "boom");
    }

    #[test]
    fn test_string_payload_message() {
        let id = Task::new(|| {}).id();
        let failure = TaskFailure::from_payload(id, payload_of(|| panic!("code {}", 7)));
        assert_eq!(failure.message, "code 7");
    }

    #[test]
    fn test_opaque_payload_message() {
        let id = Task::new(|| {}).id();
        let failure =
            TaskFailure::from_payload(id, payload_of(|| std::panic::panic_any(42usize)));
        assert_eq!(failure.message, "unknown panic");
    }

    #[test]
    fn test_counter_and_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handler = FailureHandler::new(Some(Arc::new(move |failure: &TaskFailure| {
            sink.lock().push(failure.message.clone());
        })));

        let id = Task::new(|| {}).id();
        handler.record(TaskFailure::from_payload(id, payload_of(|| panic!("first"))));
        handler.record(TaskFailure::from_payload(id, payload_of(|| panic!("second"))));

        assert_eq!(handler.count(), 2);
        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_panicking_hook_contained() {
        let handler = FailureHandler::new(Some(Arc::new(|_: &TaskFailure| {
            panic!("hook gone wrong");
        })));

        let id = Task::new(|| {}).id();
        handler.record(TaskFailure::from_payload(id, payload_of(|| panic!("task"))));
        assert_eq!(handler.count(), 1);
    }
}
