//! Entitlement session
//!
//! Explicit session state for a signed-in user's entitlement. Instead of a
//! shared global cache, each session owns its last-known entitlement and
//! profile plus the timestamp they were fetched at, and callers decide when
//! to refresh.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use videocut_types::{Entitlement, Profile};

use crate::{BillingClient, Result};

/// Point-in-time view of a session's state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Last-known entitlement (inactive until the first fetch completes)
    pub entitlement: Entitlement,
    /// Last-fetched profile, None before the first fetch
    pub profile: Option<Profile>,
    /// When the entitlement was last fetched, None before the first fetch
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Whether a refresh is currently in flight
    pub refreshing: bool,
}

impl SessionSnapshot {
    /// Whether the entitlement is stale at `now` for the given freshness
    /// window. A never-fetched session is always stale.
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match self.last_fetched_at {
            Some(fetched) => now - fetched > chrono::Duration::from_std(ttl).unwrap_or_default(),
            None => true,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    entitlement: Entitlement,
    profile: Option<Profile>,
    last_fetched_at: Option<DateTime<Utc>>,
    refreshing: bool,
}

/// Whether the cached profile disagrees with the reconciled entitlement.
///
/// True when no profile has been fetched yet, or when its tier differs from
/// the tier the entitlement implies.
fn profile_out_of_sync(profile: Option<&Profile>, entitlement: &Entitlement) -> bool {
    match profile {
        Some(profile) => profile.subscription_tier != entitlement.effective_tier(),
        None => true,
    }
}

/// Entitlement session for one signed-in user.
///
/// Thread-safe; the state lock is never held across a network call, so a
/// snapshot is always available while a refresh is in flight.
#[derive(Debug)]
pub struct EntitlementSession {
    client: BillingClient,
    state: Mutex<SessionState>,
}

impl EntitlementSession {
    /// Create a session with nothing fetched yet
    pub fn new(client: BillingClient) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState {
                entitlement: Entitlement::inactive(),
                profile: None,
                last_fetched_at: None,
                refreshing: false,
            }),
        }
    }

    /// Current session state without touching the network
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().expect("session state lock poisoned");
        SessionSnapshot {
            entitlement: state.entitlement,
            profile: state.profile.clone(),
            last_fetched_at: state.last_fetched_at,
            refreshing: state.refreshing,
        }
    }

    /// Force a refresh from the billing API.
    ///
    /// Runs check-subscription, then re-fetches the profile when its cached
    /// tier disagrees with the result, so the session converges on the
    /// reconciler's write. On failure the previous state is kept and the
    /// error returned; the session never downgrades on a failed fetch.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Entitlement> {
        {
            let mut state = self.state.lock().expect("session state lock poisoned");
            state.refreshing = true;
        }

        let result = self.client.check_subscription().await;

        let entitlement = match result {
            Ok(entitlement) => entitlement,
            Err(e) => {
                let mut state = self.state.lock().expect("session state lock poisoned");
                state.refreshing = false;
                return Err(e);
            }
        };

        let stale_profile = {
            let state = self.state.lock().expect("session state lock poisoned");
            profile_out_of_sync(state.profile.as_ref(), &entitlement)
        };

        // Best-effort: the entitlement is already authoritative, a failed
        // profile fetch just leaves the cached copy behind one refresh.
        let profile = if stale_profile {
            match self.client.get_profile().await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "Profile re-fetch failed; keeping cached profile");
                    None
                }
            }
        } else {
            None
        };

        let mut state = self.state.lock().expect("session state lock poisoned");
        state.refreshing = false;
        state.entitlement = entitlement;
        state.last_fetched_at = Some(Utc::now());
        if let Some(profile) = profile {
            debug!(tier = %profile.subscription_tier, "Profile converged after refresh");
            state.profile = Some(profile);
        }

        debug!(subscribed = entitlement.subscribed, "Entitlement refreshed");
        Ok(entitlement)
    }

    /// Entitlement, refreshed first when stale.
    ///
    /// Uses the freshness window from the client configuration.
    pub async fn entitlement(&self) -> Result<Entitlement> {
        let ttl = self.client.config().entitlement_ttl;
        if self.snapshot().is_stale(ttl, Utc::now()) {
            return self.refresh().await;
        }
        Ok(self.snapshot().entitlement)
    }

    /// Reset to the signed-out state
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("session state lock poisoned");
        state.entitlement = Entitlement::inactive();
        state.profile = None;
        state.last_fetched_at = None;
        state.refreshing = false;
    }
}
