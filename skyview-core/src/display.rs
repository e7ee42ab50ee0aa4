//! The single displayed view-model and the rule for which query result may
//! replace it.
//!
//! Queries are never cancelled. When two are in flight, their responses can
//! arrive in either order; [`DisplayPolicy`] decides whether a late response
//! from an older query may overwrite a newer one.

use parking_lot::Mutex;

use crate::model::DashboardView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPolicy {
    /// Only the most recently issued query may update the display.
    #[default]
    LatestWins,
    /// Every successful response overwrites the display as it arrives.
    ArrivalOrder,
}

/// Handle for one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Inner {
    issued: u64,
    settled: u64,
    current: Option<DashboardView>,
}

#[derive(Debug, Default)]
pub struct DisplayState {
    policy: DisplayPolicy,
    inner: Mutex<Inner>,
}

impl DisplayState {
    pub fn new(policy: DisplayPolicy) -> Self {
        Self {
            policy,
            inner: Mutex::default(),
        }
    }

    pub fn begin(&self) -> Ticket {
        let mut inner = self.inner.lock();
        inner.issued += 1;
        Ticket(inner.issued)
    }

    /// Returns whether `view` replaced the displayed state.
    pub fn apply(&self, ticket: Ticket, view: DashboardView) -> bool {
        let mut inner = self.inner.lock();
        inner.settled = inner.settled.max(ticket.0);

        if self.policy == DisplayPolicy::LatestWins && ticket.0 != inner.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = inner.issued,
                "discarding stale result"
            );
            return false;
        }

        inner.current = Some(view);
        true
    }

    /// A failed query leaves the displayed state untouched.
    pub fn fail(&self, ticket: Ticket) {
        let mut inner = self.inner.lock();
        inner.settled = inner.settled.max(ticket.0);
    }

    /// True while the most recently issued query is unsettled.
    pub fn is_loading(&self) -> bool {
        let inner = self.inner.lock();
        inner.settled < inner.issued
    }

    pub fn current(&self) -> Option<DashboardView> {
        self.inner.lock().current.clone()
    }
}
