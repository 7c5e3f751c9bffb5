use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use roadmap_core::model::{
    AuthToken, CareerId, CareerRoadmap, ProgressUpdate, StepId, Stream, User, UserProgress,
};
use services::api::{AuthResponse, LoginRequest, RegisterRequest};
use services::{
    ApiError, Endpoint, InMemoryRoadmapApi, ProgressReconciler, ProgressService, RoadmapApi,
    SessionContext, ToggleOutcome,
};
use storage::repository::InMemoryCredentialStore;

const CAREER: &str = "commerce-business-analyst";

/// Holds `update_progress` for one step, and optionally the answer to
/// `get_progress`, until the test opens the matching gate.
struct GatedApi {
    inner: InMemoryRoadmapApi,
    gated_step: StepId,
    gates: Arc<Gates>,
}

#[derive(Default)]
struct Gates {
    update: Notify,
    progress: Notify,
    hold_progress: AtomicBool,
}

#[async_trait]
impl RoadmapApi for GatedApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.inner.register(request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.inner.login(request).await
    }

    async fn current_user(&self, token: &AuthToken) -> Result<User, ApiError> {
        self.inner.current_user(token).await
    }

    async fn update_stream(&self, token: &AuthToken, stream: Stream) -> Result<(), ApiError> {
        self.inner.update_stream(token, stream).await
    }

    async fn list_roadmaps(
        &self,
        token: &AuthToken,
        stream: Option<Stream>,
    ) -> Result<Vec<CareerRoadmap>, ApiError> {
        self.inner.list_roadmaps(token, stream).await
    }

    async fn get_roadmap(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<CareerRoadmap, ApiError> {
        self.inner.get_roadmap(token, career_id).await
    }

    async fn list_progress(&self, token: &AuthToken) -> Result<Vec<UserProgress>, ApiError> {
        self.inner.list_progress(token).await
    }

    async fn get_progress(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<UserProgress, ApiError> {
        let record = self.inner.get_progress(token, career_id).await;
        if self.gates.hold_progress.load(Ordering::SeqCst) {
            self.gates.progress.notified().await;
        }
        record
    }

    async fn update_progress(
        &self,
        token: &AuthToken,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError> {
        if update.step_id == self.gated_step {
            self.gates.update.notified().await;
        }
        self.inner.update_progress(token, update).await
    }
}

async fn open_gated(
    gated_step: &str,
) -> (Arc<ProgressReconciler>, InMemoryRoadmapApi, Arc<Gates>) {
    let inner = InMemoryRoadmapApi::with_seed_catalog().unwrap();
    let gates = Arc::new(Gates::default());
    let api = GatedApi {
        inner: inner.clone(),
        gated_step: StepId::from(gated_step),
        gates: Arc::clone(&gates),
    };
    let session = Arc::new(SessionContext::new(Arc::new(InMemoryCredentialStore::new())));
    let auth = inner
        .register(&RegisterRequest {
            name: "Rohan Mehta".into(),
            email: "rohan@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    session.save(&auth.access_token, &auth.user).await.unwrap();

    let service = ProgressService::new(Arc::new(api), session);
    let reconciler = service.open(&CareerId::new(CAREER)).await.unwrap();
    (Arc::new(reconciler), inner, gates)
}

async fn wait_until_in_flight(reconciler: &ProgressReconciler, step: &StepId) {
    while !reconciler.is_in_flight(step) {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn same_step_toggle_is_suppressed_while_in_flight() {
    let (reconciler, inner, gates) = open_gated("1").await;
    let first = StepId::from("1");

    let pending = {
        let reconciler = Arc::clone(&reconciler);
        let step = first.clone();
        tokio::spawn(async move { reconciler.toggle_step(&step, true).await })
    };
    wait_until_in_flight(&reconciler, &first).await;

    let second = reconciler.toggle_step(&first, true).await.unwrap();
    assert_eq!(second, ToggleOutcome::Suppressed);
    assert_eq!(inner.request_count(Endpoint::UpdateProgress), 0);

    // Other steps are never blocked by the pending one.
    let other = reconciler
        .toggle_step(&StepId::from("2"), true)
        .await
        .unwrap();
    let ToggleOutcome::Applied(snapshot) = other else {
        panic!("expected step 2 to apply");
    };
    assert!(snapshot.is_in_flight(&first));

    gates.update.notify_one();
    let outcome = pending.await.unwrap().unwrap();
    let ToggleOutcome::Applied(snapshot) = outcome else {
        panic!("expected step 1 to apply");
    };
    assert_eq!(snapshot.completed_steps.len(), 2);
    assert!(snapshot.in_flight.is_empty());
    assert_eq!(inner.request_count(Endpoint::UpdateProgress), 2);
}

#[tokio::test]
async fn response_after_detach_is_stale() {
    let (reconciler, _inner, gates) = open_gated("3").await;
    let step = StepId::from("3");

    let pending = {
        let reconciler = Arc::clone(&reconciler);
        let step = step.clone();
        tokio::spawn(async move { reconciler.toggle_step(&step, true).await })
    };
    wait_until_in_flight(&reconciler, &step).await;

    reconciler.detach();
    gates.update.notify_one();

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, ToggleOutcome::Stale);
    assert!(!reconciler.snapshot().is_completed(&step));
    assert!(!reconciler.is_in_flight(&step));

    // The server kept the change; the next full fetch picks it up.
    let refreshed = reconciler.refresh().await.unwrap();
    assert!(refreshed.is_completed(&step));
    assert_eq!(refreshed.display_percent, 17);
}

#[tokio::test]
async fn rejected_token_surfaces_session_expiry() {
    let (reconciler, inner, _gates) = open_gated("6").await;
    inner.fail_next_with(ApiError::Unauthorized(
        "Invalid authentication credentials".into(),
    ));

    let err = reconciler
        .toggle_step(&StepId::from("1"), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), services::ErrorKind::Auth);
    assert_eq!(
        err.user_message(),
        "Your session has expired. Please log in again."
    );
    assert!(reconciler.snapshot().completed_steps.is_empty());
}

#[tokio::test]
async fn toggle_accepted_during_refresh_survives_it() {
    let (reconciler, inner, gates) = open_gated("6").await;
    let step = StepId::from("1");
    gates.hold_progress.store(true, Ordering::SeqCst);

    let pending = {
        let reconciler = Arc::clone(&reconciler);
        tokio::spawn(async move { reconciler.refresh().await })
    };
    // The fetch has been answered but the answer has not reached us yet.
    while inner.request_count(Endpoint::GetProgress) < 2 {
        tokio::task::yield_now().await;
    }

    let outcome = reconciler.toggle_step(&step, true).await.unwrap();
    assert!(matches!(outcome, ToggleOutcome::Applied(_)));

    gates.progress.notify_one();
    let refreshed = pending.await.unwrap().unwrap();

    assert!(refreshed.is_completed(&step));
    assert_eq!(refreshed.display_percent, 17);
    assert!(reconciler.snapshot().is_completed(&step));

    // A later plain refresh agrees with the server.
    gates.hold_progress.store(false, Ordering::SeqCst);
    let again = reconciler.refresh().await.unwrap();
    assert_eq!(again.completed_steps, refreshed.completed_steps);
}
