//! Two-phase startup: collect ready listeners, then fire them once.
//!
//! Block types subscribe while the process is being assembled. Filters have to
//! be registered before [`Lifecycle::fire_ready`] runs to affect default
//! resolution; anything registered later is simply not seen.

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::content::BlockRegistry;
use crate::error::{BlockError, BlockResult};
use crate::tap::TapDispatcher;

/// Services handed to every ready listener.
#[derive(Debug, Clone, Copy)]
pub struct ReadyContext<'a> {
    dispatcher: &'a TapDispatcher,
    registry: &'a BlockRegistry,
}

impl<'a> ReadyContext<'a> {
    pub fn new(dispatcher: &'a TapDispatcher, registry: &'a BlockRegistry) -> Self {
        Self {
            dispatcher,
            registry,
        }
    }

    /// Dispatcher used to filter default attributes.
    pub fn dispatcher(&self) -> &'a TapDispatcher {
        self.dispatcher
    }

    /// Registry that resolved block types are handed to.
    pub fn registry(&self) -> &'a BlockRegistry {
        self.registry
    }
}

type ReadyCallback = Box<dyn for<'a> FnOnce(ReadyContext<'a>) -> BlockResult<()> + Send>;

struct Listener {
    label: String,
    callback: ReadyCallback,
}

enum LifecycleState {
    Pending(Vec<Listener>),
    Fired,
}

/// Outcome of firing the ready event.
#[derive(Debug, Default)]
pub struct ReadyReport {
    /// Listeners that completed successfully.
    pub completed: usize,
    /// Listeners that failed, by label, in the order they ran.
    pub failures: Vec<(String, BlockError)>,
}

impl ReadyReport {
    /// Whether every listener succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One-shot ready event.
pub struct Lifecycle {
    state: Mutex<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Create a lifecycle whose ready event has not fired.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::Pending(Vec::new())),
        }
    }

    /// Run `callback` when the ready event fires.
    ///
    /// Listeners run in subscription order. Subscribing after the event has
    /// fired does nothing beyond a warning.
    pub fn on_ready<F>(&self, label: &str, callback: F)
    where
        F: for<'a> FnOnce(ReadyContext<'a>) -> BlockResult<()> + Send + 'static,
    {
        let mut state = self.state.lock();
        match &mut *state {
            LifecycleState::Pending(listeners) => listeners.push(Listener {
                label: label.to_string(),
                callback: Box::new(callback),
            }),
            LifecycleState::Fired => {
                warn!(listener = %label, "ready event already fired, listener ignored");
            }
        }
    }

    /// Whether the ready event has fired.
    pub fn has_fired(&self) -> bool {
        matches!(*self.state.lock(), LifecycleState::Fired)
    }

    /// Number of listeners waiting for the ready event.
    pub fn pending_count(&self) -> usize {
        match &*self.state.lock() {
            LifecycleState::Pending(listeners) => listeners.len(),
            LifecycleState::Fired => 0,
        }
    }

    /// Fire the ready event, running every listener synchronously.
    ///
    /// A failing listener is logged and recorded; the rest still run. Firing a
    /// second time returns `LifecycleAlreadyFired`.
    pub fn fire_ready(&self, ctx: ReadyContext<'_>) -> BlockResult<ReadyReport> {
        let listeners = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, LifecycleState::Fired) {
                LifecycleState::Pending(listeners) => listeners,
                LifecycleState::Fired => return Err(BlockError::LifecycleAlreadyFired),
            }
        };

        info!(listeners = listeners.len(), "firing ready event");

        let mut report = ReadyReport::default();
        for Listener { label, callback } in listeners {
            match callback(ctx) {
                Ok(()) => report.completed += 1,
                Err(e) => {
                    error!(listener = %label, error = %e, "ready listener failed");
                    report.failures.push((label, e));
                }
            }
        }

        info!(
            completed = report.completed,
            failed = report.failures.len(),
            "ready event complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn services() -> (TapDispatcher, BlockRegistry) {
        (TapDispatcher::default(), BlockRegistry::new())
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let lifecycle = Lifecycle::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            lifecycle.on_ready(name, move |_| {
                order.lock().push(name);
                Ok(())
            });
        }
        assert_eq!(lifecycle.pending_count(), 3);

        let (dispatcher, registry) = services();
        let report = lifecycle
            .fire_ready(ReadyContext::new(&dispatcher, &registry))
            .unwrap();

        assert_eq!(report.completed, 3);
        assert!(report.is_success());
        assert_eq!(*order.lock(), ["first", "second", "third"]);
    }

    #[test]
    fn nothing_runs_before_fire() {
        let lifecycle = Lifecycle::new();
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        lifecycle.on_ready("probe", move |_| {
            *flag.lock() = true;
            Ok(())
        });

        assert!(!*ran.lock());
        assert!(!lifecycle.has_fired());
    }

    #[test]
    fn failures_are_collected_and_others_continue() {
        let lifecycle = Lifecycle::new();
        lifecycle.on_ready("bad", |_| Err(BlockError::duplicate("ns/x")));
        lifecycle.on_ready("good", |_| Ok(()));

        let (dispatcher, registry) = services();
        let report = lifecycle
            .fire_ready(ReadyContext::new(&dispatcher, &registry))
            .unwrap();

        assert_eq!(report.completed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "bad");
    }

    #[test]
    fn fires_only_once() {
        let lifecycle = Lifecycle::new();
        let (dispatcher, registry) = services();
        let ctx = ReadyContext::new(&dispatcher, &registry);

        lifecycle.fire_ready(ctx).unwrap();
        assert!(lifecycle.has_fired());
        assert!(matches!(
            lifecycle.fire_ready(ctx),
            Err(BlockError::LifecycleAlreadyFired)
        ));
    }

    #[test]
    fn late_listener_is_ignored() {
        let lifecycle = Lifecycle::new();
        let (dispatcher, registry) = services();
        lifecycle
            .fire_ready(ReadyContext::new(&dispatcher, &registry))
            .unwrap();

        lifecycle.on_ready("late", |_| panic!("must not run"));
        assert_eq!(lifecycle.pending_count(), 0);
    }
}
