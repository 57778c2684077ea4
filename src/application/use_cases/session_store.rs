//! In-memory owner of all platform sessions.
//!
//! Every mutation builds a new [`SessionSnapshot`] from the current one and
//! swaps it in under a single mutex, so readers see either the whole update or
//! none of it. Sessions a mutation does not touch keep their `Arc`.

use crate::domain::error::{AppError, Result};
use crate::domain::platform_session::{PlatformSession, PlatformType, SessionSeed};
use crate::domain::test_case::{CasePayload, TestStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub active_platform: Option<PlatformType>,
    pub sessions: Vec<Arc<PlatformSession>>,
}

impl SessionSnapshot {
    pub fn from_seed(seeds: Vec<SessionSeed>, now: DateTime<Utc>) -> Self {
        Self {
            active_platform: None,
            sessions: seeds
                .into_iter()
                .map(|seed| Arc::new(seed.into_session(now)))
                .collect(),
        }
    }

    pub fn select_session(&self, platform: PlatformType) -> Option<&Arc<PlatformSession>> {
        self.sessions.iter().find(|session| session.id == platform)
    }

    pub fn active_session(&self) -> Option<&Arc<PlatformSession>> {
        self.active_platform
            .and_then(|platform| self.select_session(platform))
    }

    pub fn with_active(&self, platform: Option<PlatformType>) -> Result<SessionSnapshot> {
        if let Some(platform) = platform {
            if self.select_session(platform).is_none() {
                return Err(AppError::NotFound(format!(
                    "No session for platform {}",
                    platform
                )));
            }
        }

        Ok(SessionSnapshot {
            active_platform: platform,
            sessions: self.sessions.clone(),
        })
    }

    /// Rebuilds only the session matching `platform`; `None` when nothing
    /// would change.
    fn replace_session<F>(
        &self,
        platform: Option<PlatformType>,
        update: F,
    ) -> Option<SessionSnapshot>
    where
        F: FnOnce(&PlatformSession) -> Option<PlatformSession>,
    {
        let platform = platform?;
        let index = self
            .sessions
            .iter()
            .position(|session| session.id == platform)?;
        let updated = update(&self.sessions[index])?;

        let mut sessions = self.sessions.clone();
        sessions[index] = Arc::new(updated);
        Some(SessionSnapshot {
            active_platform: self.active_platform,
            sessions,
        })
    }

    pub fn with_status(
        &self,
        platform: Option<PlatformType>,
        test_id: &str,
        status: TestStatus,
        now: DateTime<Utc>,
    ) -> Option<SessionSnapshot> {
        self.replace_session(platform, |session| session.with_status(test_id, status, now))
    }

    /// Adds each payload in turn, so the last one ends up first.
    pub fn with_new_cases<I>(
        &self,
        platform: Option<PlatformType>,
        payloads: I,
    ) -> Option<SessionSnapshot>
    where
        I: IntoIterator<Item = CasePayload>,
    {
        self.replace_session(platform, |session| {
            let mut payloads = payloads.into_iter().peekable();
            payloads.peek()?;
            Some(payloads.fold(session.clone(), |acc, payload| {
                acc.with_new_case(payload.into_test_case())
            }))
        })
    }
}

pub struct SessionStore {
    current: Mutex<Arc<SessionSnapshot>>,
}

impl SessionStore {
    pub fn new(seeds: Vec<SessionSeed>) -> Self {
        let snapshot = SessionSnapshot::from_seed(seeds, Utc::now());
        info!(sessions = snapshot.sessions.len(), "Session store seeded");
        Self {
            current: Mutex::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `update` against the current snapshot and installs its result.
    /// Returns the snapshot visible after the call.
    fn apply<F>(&self, update: F) -> Result<Arc<SessionSnapshot>>
    where
        F: FnOnce(&SessionSnapshot) -> Result<Option<SessionSnapshot>>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = update(&current)? {
            *current = Arc::new(next);
        }
        Ok(current.clone())
    }

    pub fn sessions(&self) -> Vec<Arc<PlatformSession>> {
        self.snapshot().sessions.clone()
    }

    pub fn select_session(&self, platform: PlatformType) -> Option<Arc<PlatformSession>> {
        self.snapshot().select_session(platform).cloned()
    }

    pub fn active_platform(&self) -> Option<PlatformType> {
        self.snapshot().active_platform
    }

    pub fn active_session(&self) -> Option<Arc<PlatformSession>> {
        self.snapshot().active_session().cloned()
    }

    /// Opens a platform's checklist, or returns to the dashboard with `None`.
    pub fn select_platform(&self, platform: Option<PlatformType>) -> Result<Arc<SessionSnapshot>> {
        let snapshot = self.apply(|current| current.with_active(platform).map(Some))?;
        debug!(platform = ?platform, "Active platform changed");
        Ok(snapshot)
    }

    /// Sets the status of `test_id` in the `active_platform` session.
    /// No active platform or an unknown id leaves the store untouched.
    pub fn update_status(
        &self,
        active_platform: Option<PlatformType>,
        test_id: &str,
        status: TestStatus,
    ) -> Arc<SessionSnapshot> {
        self.apply_infallible(|current| {
            let next = current.with_status(active_platform, test_id, status, Utc::now());
            if next.is_none() {
                debug!(platform = ?active_platform, test_id, "Status update ignored");
            }
            next
        })
    }

    /// Same as [`update_status`](Self::update_status) for whatever platform is
    /// active when the lock is taken.
    pub fn update_active_status(&self, test_id: &str, status: TestStatus) -> Arc<SessionSnapshot> {
        self.apply_infallible(|current| {
            current.with_status(current.active_platform, test_id, status, Utc::now())
        })
    }

    /// Prepends a Pending case to the `active_platform` session.
    pub fn add_test_case(
        &self,
        active_platform: Option<PlatformType>,
        payload: CasePayload,
    ) -> Arc<SessionSnapshot> {
        self.add_test_cases(active_platform, std::iter::once(payload))
    }

    pub fn add_active_test_case(&self, payload: CasePayload) -> Arc<SessionSnapshot> {
        self.apply_infallible(|current| {
            current.with_new_cases(current.active_platform, std::iter::once(payload))
        })
    }

    pub fn add_test_cases<I>(
        &self,
        active_platform: Option<PlatformType>,
        payloads: I,
    ) -> Arc<SessionSnapshot>
    where
        I: IntoIterator<Item = CasePayload>,
    {
        self.apply_infallible(|current| current.with_new_cases(active_platform, payloads))
    }

    fn apply_infallible<F>(&self, update: F) -> Arc<SessionSnapshot>
    where
        F: FnOnce(&SessionSnapshot) -> Option<SessionSnapshot>,
    {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = update(&current) {
            *current = Arc::new(next);
        }
        current.clone()
    }
}
