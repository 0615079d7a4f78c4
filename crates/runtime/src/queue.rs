//! Sequential action queue.
//!
//! The queue is the only serialization point of a battle: actions run one at
//! a time, each to completion, in the order they were enqueued.
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};

use battle_core::BattleError;
use tracing::{debug, error, warn};

use crate::actions::BattleAction;
use crate::api::QueueError;
use crate::context::BattleContext;
use crate::events::BattleEvent;

/// Counts from one [`ActionQueue::run_all`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueReport {
    pub executed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl QueueReport {
    pub fn total(&self) -> usize {
        self.executed + self.skipped + self.failed
    }
}

/// Append-only FIFO of pending actions.
///
/// - Invalid actions are skipped when popped; validity is checked against the
///   state left behind by every earlier action.
/// - Actions enqueued while a pass is running are processed in that same pass.
/// - The queue is empty when `run_all` returns.
#[derive(Default)]
pub struct ActionQueue {
    pending: Mutex<VecDeque<Box<dyn BattleAction>>>,
    running: AtomicBool,
}

/// Clears the running flag even if the pass is dropped mid-action.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, action: impl BattleAction + 'static) {
        self.enqueue_boxed(Box::new(action));
    }

    pub fn enqueue_boxed(&self, action: Box<dyn BattleAction>) {
        debug!(
            target: "runtime::queue",
            action = action.name(),
            unit = %action.actor(),
            "Action enqueued"
        );
        self.lock().push_back(action);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Drops every pending action without running it. Returns how many were
    /// dropped.
    pub fn clear(&self) -> usize {
        let mut pending = self.lock();
        let dropped = pending.len();
        pending.clear();
        dropped
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Box<dyn BattleAction>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pop(&self) -> Option<Box<dyn BattleAction>> {
        self.lock().pop_front()
    }

    /// Run every pending action to completion, in order.
    ///
    /// Returns [`QueueError::AlreadyRunning`] if another pass is in progress.
    pub async fn run_all(&self, battle: &BattleContext) -> Result<QueueReport, QueueError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(QueueError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        let mut report = QueueReport::default();

        while let Some(action) = self.pop() {
            let name = action.name();
            let unit = action.actor();

            if !action.is_valid(battle) {
                debug!(
                    target: "runtime::queue",
                    action = name,
                    unit = %unit,
                    "Skipping invalid action"
                );
                report.skipped += 1;
                battle.publish(BattleEvent::ActionSkipped { unit, action: name });
                continue;
            }

            match action.execute(battle).await {
                Ok(()) => {
                    debug!(
                        target: "runtime::queue",
                        action = name,
                        unit = %unit,
                        "Action completed"
                    );
                    report.executed += 1;
                    battle.publish(BattleEvent::ActionCompleted { unit, action: name });
                }
                Err(error) => {
                    let severity = error.severity();
                    if severity.is_internal() {
                        error!(
                            target: "runtime::queue",
                            action = name,
                            unit = %unit,
                            code = error.error_code(),
                            severity = severity.as_str(),
                            error = %error,
                            "Action failed"
                        );
                    } else {
                        warn!(
                            target: "runtime::queue",
                            action = name,
                            unit = %unit,
                            code = error.error_code(),
                            severity = severity.as_str(),
                            error = %error,
                            "Action failed"
                        );
                    }
                    report.failed += 1;
                    battle.publish(BattleEvent::ActionFailed {
                        unit,
                        action: name,
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for ActionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.len())
            .field("running", &self.is_running())
            .finish()
    }
}
