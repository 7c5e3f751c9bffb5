use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use roadmap_core::model::{
    CareerId, CareerRoadmap, ProgressUpdate, StepId, UserProgress, display_percent,
};

use crate::api::RoadmapApi;
use crate::error::ProgressError;
use crate::session::SessionContext;

/// Point-in-time view of a roadmap's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub completed_steps: BTreeSet<StepId>,
    pub percentage: f64,
    pub display_percent: u8,
    pub in_flight: BTreeSet<StepId>,
}

impl ProgressSnapshot {
    #[must_use]
    pub fn is_completed(&self, step_id: &StepId) -> bool {
        self.completed_steps.contains(step_id)
    }

    #[must_use]
    pub fn is_in_flight(&self, step_id: &StepId) -> bool {
        self.in_flight.contains(step_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The server accepted the change and the local record now reflects it.
    Applied(ProgressSnapshot),
    /// A toggle for the same step was already in flight; nothing was sent.
    Suppressed,
    /// The response arrived after `detach` or `refresh`; local state untouched.
    Stale,
}

/// Opens roadmaps for progress tracking.
#[derive(Clone)]
pub struct ProgressService {
    api: Arc<dyn RoadmapApi>,
    session: Arc<SessionContext>,
}

impl ProgressService {
    #[must_use]
    pub fn new(api: Arc<dyn RoadmapApi>, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// Fetch a roadmap and the user's progress on it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NotAuthenticated` without a stored token,
    /// `ProgressError::Api` if either request fails and
    /// `ProgressError::Roadmap` if the roadmap has duplicate step ids.
    pub async fn open(&self, career_id: &CareerId) -> Result<ProgressReconciler, ProgressError> {
        let token = self
            .session
            .token()
            .await?
            .ok_or(ProgressError::NotAuthenticated)?;
        let roadmap = self
            .session
            .expire_on_rejection(self.api.get_roadmap(&token, career_id).await)
            .await?;
        roadmap.validate()?;
        let progress = self
            .session
            .expire_on_rejection(self.api.get_progress(&token, career_id).await)
            .await?;
        Ok(ProgressReconciler::new(
            Arc::clone(&self.api),
            Arc::clone(&self.session),
            roadmap,
            progress,
        ))
    }
}

struct State {
    progress: UserProgress,
    in_flight: HashSet<StepId>,
    generation: u64,
    /// Refreshes waiting on the server.
    refreshing: usize,
    /// Toggles applied while any refresh was waiting, oldest first.
    applied_during_refresh: Vec<(StepId, bool)>,
}

/// Optimistic local copy of one roadmap's progress.
///
/// The server stays the source of truth: a toggle only changes local state
/// once the server accepted it, and `refresh` replaces the local record with
/// the server's, keeping toggles the server accepted after the fetch began.
/// At most one request per step is in flight at a time.
pub struct ProgressReconciler {
    api: Arc<dyn RoadmapApi>,
    session: Arc<SessionContext>,
    roadmap: CareerRoadmap,
    state: Mutex<State>,
}

impl ProgressReconciler {
    #[must_use]
    pub fn new(
        api: Arc<dyn RoadmapApi>,
        session: Arc<SessionContext>,
        roadmap: CareerRoadmap,
        mut progress: UserProgress,
    ) -> Self {
        reconcile(&roadmap, &mut progress);
        Self {
            api,
            session,
            roadmap,
            state: Mutex::new(State {
                progress,
                in_flight: HashSet::new(),
                generation: 0,
                refreshing: 0,
                applied_during_refresh: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn roadmap(&self) -> &CareerRoadmap {
        &self.roadmap
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        snapshot_of(&self.lock())
    }

    #[must_use]
    pub fn is_in_flight(&self, step_id: &StepId) -> bool {
        self.lock().in_flight.contains(step_id)
    }

    /// Mark `step_id` complete or incomplete.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownStep` for a step outside the roadmap,
    /// `ProgressError::NotAuthenticated` without a stored token and
    /// `ProgressError::Api` if the server call fails. Failures never change
    /// local state and are not retried.
    pub async fn toggle_step(
        &self,
        step_id: &StepId,
        completed: bool,
    ) -> Result<ToggleOutcome, ProgressError> {
        if !self.roadmap.contains_step(step_id) {
            return Err(ProgressError::UnknownStep(step_id.clone()));
        }

        let generation = {
            let mut state = self.lock();
            if !state.in_flight.insert(step_id.clone()) {
                tracing::debug!(%step_id, "toggle already in flight");
                return Ok(ToggleOutcome::Suppressed);
            }
            state.generation
        };
        let _guard = InFlightGuard {
            state: &self.state,
            step_id,
        };

        let token = self
            .session
            .token()
            .await?
            .ok_or(ProgressError::NotAuthenticated)?;
        let update = ProgressUpdate {
            career_id: self.roadmap.id.clone(),
            step_id: step_id.clone(),
            completed,
        };
        self.session
            .expire_on_rejection(self.api.update_progress(&token, &update).await)
            .await?;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(%step_id, "discarding stale toggle response");
            return Ok(ToggleOutcome::Stale);
        }
        state
            .progress
            .apply_toggle(step_id, completed, self.roadmap.total_steps());
        if state.refreshing > 0 {
            state
                .applied_during_refresh
                .push((step_id.clone(), completed));
        }
        state.in_flight.remove(step_id);
        Ok(ToggleOutcome::Applied(snapshot_of(&state)))
    }

    /// Replace the local record with the server's. Toggles still in flight
    /// will come back as `Stale`; toggles that start and succeed while the
    /// fetch is pending are replayed onto the fetched record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NotAuthenticated` without a stored token and
    /// `ProgressError::Api` if the request fails; local state is kept then.
    pub async fn refresh(&self) -> Result<ProgressSnapshot, ProgressError> {
        let (generation, replay_from) = {
            let mut state = self.lock();
            state.generation += 1;
            state.refreshing += 1;
            (state.generation, state.applied_during_refresh.len())
        };
        let _guard = RefreshGuard { state: &self.state };

        let token = self
            .session
            .token()
            .await?
            .ok_or(ProgressError::NotAuthenticated)?;
        let mut progress = self
            .session
            .expire_on_rejection(self.api.get_progress(&token, &self.roadmap.id).await)
            .await?;
        reconcile(&self.roadmap, &mut progress);

        let mut state = self.lock();
        if state.generation == generation {
            let total = self.roadmap.total_steps();
            for (step_id, completed) in &state.applied_during_refresh[replay_from..] {
                progress.apply_toggle(step_id, *completed, total);
            }
            state.progress = progress;
        }
        Ok(snapshot_of(&state))
    }

    /// Stop applying responses; called when the roadmap view goes away.
    pub fn detach(&self) {
        self.lock().generation += 1;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight mark on every exit path of `toggle_step`.
struct InFlightGuard<'a> {
    state: &'a Mutex<State>,
    step_id: &'a StepId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(self.step_id);
    }
}

/// Ends one pending refresh; the replay log goes with the last one.
struct RefreshGuard<'a> {
    state: &'a Mutex<State>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refreshing = state.refreshing.saturating_sub(1);
        if state.refreshing == 0 {
            state.applied_during_refresh.clear();
        }
    }
}

fn reconcile(roadmap: &CareerRoadmap, progress: &mut UserProgress) {
    if let Some(reported) = progress.reconcile_with(roadmap) {
        tracing::warn!(
            career_id = %roadmap.id,
            reported,
            recomputed = progress.progress_percentage,
            "server progress disagrees with roadmap"
        );
    }
}

fn snapshot_of(state: &State) -> ProgressSnapshot {
    ProgressSnapshot {
        completed_steps: state.progress.completed_steps.clone(),
        percentage: state.progress.progress_percentage,
        display_percent: display_percent(state.progress.progress_percentage),
        in_flight: state.in_flight.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Endpoint, InMemoryRoadmapApi, RegisterRequest};
    use crate::error::ErrorKind;
    use storage::repository::InMemoryCredentialStore;

    const CAREER: &str = "science-full-stack-developer";

    async fn open() -> (ProgressReconciler, InMemoryRoadmapApi) {
        let api = InMemoryRoadmapApi::with_seed_catalog().unwrap();
        let session = Arc::new(SessionContext::new(Arc::new(InMemoryCredentialStore::new())));
        let auth = api
            .register(&RegisterRequest {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        session.save(&auth.access_token, &auth.user).await.unwrap();
        let service = ProgressService::new(Arc::new(api.clone()), session);
        let reconciler = service.open(&CareerId::new(CAREER)).await.unwrap();
        (reconciler, api)
    }

    #[tokio::test]
    async fn first_step_of_six_shows_seventeen_percent() {
        let (reconciler, _) = open().await;
        let outcome = reconciler
            .toggle_step(&StepId::from("1"), true)
            .await
            .unwrap();
        let ToggleOutcome::Applied(snapshot) = outcome else {
            panic!("expected the toggle to apply");
        };
        assert!((snapshot.percentage - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(snapshot.display_percent, 17);
        assert!(snapshot.in_flight.is_empty());
    }

    #[tokio::test]
    async fn unknown_step_sends_nothing() {
        let (reconciler, api) = open().await;
        let err = reconciler
            .toggle_step(&StepId::from("42"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownStep(_)));
        assert_eq!(api.request_count(Endpoint::UpdateProgress), 0);
    }

    #[tokio::test]
    async fn failed_toggle_keeps_state_and_releases_step() {
        let (reconciler, api) = open().await;
        api.set_offline(true);
        let step = StepId::from("2");

        let err = reconciler.toggle_step(&step, true).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!reconciler.is_in_flight(&step));
        assert!(reconciler.snapshot().completed_steps.is_empty());
        assert_eq!(api.request_count(Endpoint::UpdateProgress), 1);
    }

    #[tokio::test]
    async fn toggle_round_trip_restores_previous_set() {
        let (reconciler, _) = open().await;
        reconciler.toggle_step(&StepId::from("1"), true).await.unwrap();
        let before = reconciler.snapshot();

        reconciler.toggle_step(&StepId::from("4"), true).await.unwrap();
        reconciler.toggle_step(&StepId::from("4"), false).await.unwrap();

        assert_eq!(reconciler.snapshot(), before);
    }

    #[tokio::test]
    async fn completing_every_step_reaches_one_hundred() {
        let (reconciler, _) = open().await;
        let ids: Vec<StepId> = reconciler.roadmap().step_ids().cloned().collect();
        for id in &ids {
            reconciler.toggle_step(id, true).await.unwrap();
        }
        let refreshed = reconciler.refresh().await.unwrap();
        assert_eq!(refreshed.display_percent, 100);
        assert_eq!(refreshed.completed_steps.len(), ids.len());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_local_state() {
        let (reconciler, api) = open().await;
        reconciler.toggle_step(&StepId::from("3"), true).await.unwrap();
        api.fail_next_with(ApiError::Network("reset".into()));
        assert!(reconciler.refresh().await.is_err());
        assert!(reconciler.snapshot().is_completed(&StepId::from("3")));
    }

    #[tokio::test]
    async fn missing_roadmap_is_a_server_rejection() {
        let api = InMemoryRoadmapApi::with_seed_catalog().unwrap();
        let session = Arc::new(SessionContext::new(Arc::new(InMemoryCredentialStore::new())));
        let auth = api
            .register(&RegisterRequest {
                name: "Asha".into(),
                email: "asha@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        session.save(&auth.access_token, &auth.user).await.unwrap();
        let service = ProgressService::new(Arc::new(api), session);

        let Err(err) = service.open(&CareerId::new("nope")).await else {
            panic!("expected an error");
        };
        assert_eq!(err.kind(), ErrorKind::ServerRejection);
        assert_eq!(err.user_message(), "Roadmap not found");
    }
}
