use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Poll cadence and deadline for a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval_ms: u32,
    pub timeout_ms: u32,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
        }
    }
}

impl WaitPolicy {
    pub fn new(interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            timeout_ms,
        }
    }

    /// Re-checks allowed after the first check before the deadline passes.
    pub fn max_rechecks(&self) -> u32 {
        self.timeout_ms.div_ceil(self.interval_ms.max(1))
    }
}

/// Shared flag that stops a wait at its next re-check.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WaitError {
    #[error("{name} did not become available within {waited_ms}ms")]
    TimedOut { name: String, waited_ms: u32 },
    #[error("wait for {name} was cancelled")]
    Cancelled { name: String },
}

type Outcome = Result<u32, WaitError>;
type Followers = Vec<oneshot::Sender<Outcome>>;

/// Names with a wait in flight. The first caller for a name polls; later
/// callers for the same name get its outcome.
#[derive(Debug, Clone, Default)]
pub struct PendingWaits(Rc<RefCell<HashMap<String, Followers>>>);

enum Role {
    Leader(WaitTicket),
    Follower(oneshot::Receiver<Outcome>),
}

impl PendingWaits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    fn join(&self, name: &str) -> Role {
        let mut in_flight = self.0.borrow_mut();
        if let Some(followers) = in_flight.get_mut(name) {
            let (tx, rx) = oneshot::channel();
            followers.push(tx);
            return Role::Follower(rx);
        }
        in_flight.insert(name.to_string(), Vec::new());
        Role::Leader(WaitTicket {
            name: name.to_string(),
            pending: self.clone(),
            settled: false,
        })
    }

    /// Wait until `is_ready` reports true.
    ///
    /// Checks once immediately, then once per `policy.interval_ms` (slept via
    /// `sleep`) until the deadline. Returns how many re-checks it took.
    ///
    /// If another wait for `name` is already polling, this one shares its
    /// outcome instead. When that wait is cancelled or dropped, the next
    /// waiter in line takes over polling. A follower's own `cancel` is checked
    /// when the shared outcome arrives.
    pub async fn wait_for<P, S, F>(
        &self,
        name: &str,
        policy: WaitPolicy,
        cancel: &CancelToken,
        mut is_ready: P,
        mut sleep: S,
    ) -> Result<u32, WaitError>
    where
        P: FnMut() -> bool,
        S: FnMut(u32) -> F,
        F: Future<Output = ()>,
    {
        loop {
            match self.join(name) {
                Role::Follower(rx) => {
                    // A closed channel means the leader gave up without an outcome.
                    let Ok(outcome) = rx.await else {
                        continue;
                    };
                    if cancel.is_cancelled() {
                        return Err(WaitError::Cancelled {
                            name: name.to_string(),
                        });
                    }
                    return outcome;
                }
                Role::Leader(mut ticket) => {
                    let outcome = poll_until(name, policy, cancel, &mut is_ready, &mut sleep).await;
                    if !matches!(outcome, Err(WaitError::Cancelled { .. })) {
                        ticket.settle(&outcome);
                    }
                    return outcome;
                }
            }
        }
    }
}

async fn poll_until<P, S, F>(
    name: &str,
    policy: WaitPolicy,
    cancel: &CancelToken,
    is_ready: &mut P,
    sleep: &mut S,
) -> Outcome
where
    P: FnMut() -> bool,
    S: FnMut(u32) -> F,
    F: Future<Output = ()>,
{
    let max_rechecks = policy.max_rechecks();
    let mut rechecks = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled {
                name: name.to_string(),
            });
        }
        if is_ready() {
            return Ok(rechecks);
        }
        if rechecks >= max_rechecks {
            return Err(WaitError::TimedOut {
                name: name.to_string(),
                waited_ms: rechecks.saturating_mul(policy.interval_ms),
            });
        }
        sleep(policy.interval_ms).await;
        rechecks += 1;
    }
}

struct WaitTicket {
    name: String,
    pending: PendingWaits,
    settled: bool,
}

impl WaitTicket {
    fn settle(&mut self, outcome: &Outcome) {
        self.settled = true;
        let followers = self.pending.0.borrow_mut().remove(&self.name);
        for tx in followers.into_iter().flatten() {
            let _ = tx.send(outcome.clone());
        }
    }
}

impl Drop for WaitTicket {
    fn drop(&mut self) {
        // Unsettled: dropping the senders wakes followers so one can take over.
        if !self.settled {
            self.pending.0.borrow_mut().remove(&self.name);
        }
    }
}
