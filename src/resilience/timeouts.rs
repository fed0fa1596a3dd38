//! Timeout enforcement.
//!
//! # Responsibilities
//! - Represent a tier's budget as an absolute deadline
//! - Bound a future by a deadline and cancel it on expiry
//! - Derive each server-side tier's deadline from its own budget
//!
//! # Design Decisions
//! - Uses Tokio's clock, so paused-time tests behave
//! - A deadline starts when its tier starts work, not when the request arrives
//! - Under `Chained`, a tier takes `min(local budget, request remaining)`;
//!   nothing is ever forwarded across the HTTP boundary

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{error::Elapsed, Instant};

/// An absolute expiry point together with the budget it was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start a deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now() + budget,
            budget,
        }
    }

    /// A deadline that has already passed.
    pub fn expired() -> Self {
        Self {
            expires_at: Instant::now(),
            budget: Duration::ZERO,
        }
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// The budget this deadline was started with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left, saturating at zero.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Whichever of the two deadlines expires first.
    pub fn earliest(self, other: Deadline) -> Deadline {
        if other.expires_at < self.expires_at {
            other
        } else {
            self
        }
    }

    /// Run `future` until it completes or the deadline passes. On expiry the
    /// future is dropped, which cancels whatever I/O it had in flight.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Elapsed> {
        tokio::time::timeout_at(self.expires_at, future).await
    }
}

/// How server-side tier deadlines relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePolicy {
    /// Every tier starts a fresh timer from its own budget.
    #[default]
    Independent,
    /// A request-level deadline caps every tier.
    Chained,
}

/// Headroom between the slowest tier path and the handler ceiling.
pub const HANDLER_CEILING_MARGIN: Duration = Duration::from_secs(1);

/// Per-tier budgets owned by the quote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierBudgets {
    pub fetch: Duration,
    pub persist: Duration,
    pub request: Duration,
    pub policy: DeadlinePolicy,
}

impl TierBudgets {
    /// Deadline for the whole request, started on arrival. `None` when tiers
    /// are independent.
    pub fn request_deadline(&self) -> Option<Deadline> {
        match self.policy {
            DeadlinePolicy::Independent => None,
            DeadlinePolicy::Chained => Some(Deadline::after(self.request)),
        }
    }

    /// Deadline for the provider fetch, started now.
    pub fn fetch_deadline(&self, request: Option<Deadline>) -> Deadline {
        Self::local(self.fetch, request)
    }

    /// Deadline for the store insert, started now.
    pub fn persist_deadline(&self, request: Option<Deadline>) -> Deadline {
        Self::local(self.persist, request)
    }

    /// Hard ceiling for the whole handler. Strictly above both the request
    /// budget and fetch plus persist, so it only fires when a tier fails to
    /// honor its own deadline.
    pub fn handler_ceiling(&self) -> Duration {
        self.request.max(self.fetch + self.persist) + HANDLER_CEILING_MARGIN
    }

    fn local(budget: Duration, request: Option<Deadline>) -> Deadline {
        let local = Deadline::after(budget);
        match request {
            Some(request) => local.earliest(request),
            None => local,
        }
    }
}
