//! Job store integration tests
//!
//! Drive [`JobStore`] through a scripted API and check the cached list,
//! status and error after each operation.

mod common;

use common::mocks::{job, Call, ScriptedJobApi};
use jobboard::auth::credentials::MemoryCredentials;
use jobboard::auth::Token;
use jobboard::types::{AppError, JobId, JobPatch, Role};
use jobboard::{JobStore, JobStoreState, RequestStatus, StoreError};
use serde_json::json;
use std::sync::Arc;

fn seeded(api: &Arc<ScriptedJobApi>, credentials: Arc<MemoryCredentials>, jobs: Vec<jobboard::types::Job>) -> JobStore {
    JobStore::with_state(
        api.clone(),
        credentials,
        JobStoreState {
            jobs,
            ..Default::default()
        },
    )
}

fn hr() -> Arc<MemoryCredentials> {
    Arc::new(MemoryCredentials::logged_in("hr-token", Role::Hr))
}

async fn wait_for_calls(api: &ScriptedJobApi, count: usize) {
    while api.calls().len() < count {
        tokio::task::yield_now().await;
    }
}

// ============= Fetch =============

#[tokio::test]
async fn test_fetch_replaces_list_wholesale() {
    let api = ScriptedJobApi::new();
    api.on_list(Ok(vec![job(3, "C")]));

    let store = seeded(&api, hr(), vec![job(1, "A"), job(2, "B")]);
    store.fetch_all().await.unwrap();

    assert_eq!(store.jobs(), vec![job(3, "C")]);
    assert_eq!(store.status(), RequestStatus::Success);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_fetch_empty_collection() {
    let api = ScriptedJobApi::new();
    api.on_list(Ok(vec![]));

    let store = seeded(&api, hr(), vec![job(1, "A")]);
    store.fetch_all().await.unwrap();

    assert!(store.jobs().is_empty());
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_list() {
    let api = ScriptedJobApi::new();
    api.on_list(Err(AppError::Server {
        status: 401,
        body: json!({"detail": "Authentication credentials were not provided."}),
    }));

    let store = seeded(&api, hr(), vec![job(1, "A")]);
    let err = store.fetch_all().await.unwrap_err();

    assert_eq!(store.jobs(), vec![job(1, "A")]);
    assert_eq!(store.status(), RequestStatus::Failed);
    assert_eq!(store.error(), Some(err.clone()));
    assert_eq!(err.message(), "Authentication credentials were not provided.");
}

// ============= Update =============

#[tokio::test]
async fn test_update_replaces_record_by_id() {
    let api = ScriptedJobApi::new();
    api.on_update(Ok(job(1, "Y")));

    let store = seeded(&api, hr(), vec![job(1, "X")]);
    let patch = JobPatch {
        title: Some("Y".to_string()),
        ..Default::default()
    };
    store.update_one(&JobId::Number(1), &patch).await.unwrap();

    assert_eq!(store.jobs(), vec![job(1, "Y")]);
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_update_keeps_fields_the_server_returns() {
    let api = ScriptedJobApi::new();
    let returned = job(1, "Y").with_field("Pay", 120000).with_field("Extra", json!({"a": 1}));
    api.on_update(Ok(returned.clone()));

    let store = seeded(&api, hr(), vec![job(1, "X").with_field("Pay", 1)]);
    store
        .update_one(&JobId::Number(1), &JobPatch::default())
        .await
        .unwrap();

    assert_eq!(store.jobs(), vec![returned]);
}

#[tokio::test]
async fn test_update_unknown_id_leaves_list_unchanged() {
    let api = ScriptedJobApi::new();
    api.on_update(Ok(job(9, "Elsewhere")));

    let store = seeded(&api, hr(), vec![job(1, "A"), job(2, "B")]);
    store
        .update_one(&JobId::Number(9), &JobPatch::default())
        .await
        .unwrap();

    assert_eq!(store.jobs(), vec![job(1, "A"), job(2, "B")]);
    assert_eq!(store.status(), RequestStatus::Success);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn test_update_failure_keeps_list() {
    let api = ScriptedJobApi::new();
    api.on_update(Err(AppError::Server {
        status: 400,
        body: json!({"Pay": ["A valid integer is required."]}),
    }));

    let store = seeded(&api, hr(), vec![job(1, "A")]);
    let err = store
        .update_one(&JobId::Number(1), &JobPatch::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        StoreError::Server {
            status: 400,
            body: json!({"Pay": ["A valid integer is required."]})
        }
    );
    assert_eq!(store.jobs(), vec![job(1, "A")]);
    assert_eq!(store.status(), RequestStatus::Failed);
}

// ============= Delete =============

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let api = ScriptedJobApi::new();
    api.on_delete(Ok(()));

    let store = seeded(&api, hr(), vec![job(1, "A"), job(2, "B")]);
    store.delete_one(&JobId::Number(1)).await.unwrap();

    assert_eq!(store.jobs(), vec![job(2, "B")]);
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_delete_absent_id_is_success() {
    let api = ScriptedJobApi::new();
    api.on_delete(Ok(()));

    let store = seeded(&api, hr(), vec![job(1, "A")]);
    store.delete_one(&JobId::Number(42)).await.unwrap();

    assert_eq!(store.jobs(), vec![job(1, "A")]);
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_delete_transport_failure_uses_fallback_message() {
    let api = ScriptedJobApi::new();
    api.on_delete(Err(AppError::Transport("dns error".to_string())));

    let store = seeded(&api, hr(), vec![job(1, "A")]);
    let err = store.delete_one(&JobId::Number(1)).await.unwrap_err();

    assert_eq!(err, StoreError::Transport("Error deleting job".to_string()));
    assert_eq!(store.jobs(), vec![job(1, "A")]);
}

// ============= Status and Credentials =============

#[tokio::test]
async fn test_success_clears_previous_error() {
    let api = ScriptedJobApi::new();
    api.on_list(Err(AppError::Transport("down".to_string())));
    api.on_list(Ok(vec![job(1, "A")]));

    let store = seeded(&api, hr(), vec![]);
    assert!(store.fetch_all().await.is_err());
    assert!(store.error().is_some());

    store.fetch_all().await.unwrap();
    assert_eq!(store.error(), None);
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_status_is_loading_while_request_is_pending() {
    let api = ScriptedJobApi::new();
    let gate = api.on_list_gated(Ok(vec![job(1, "A")]));
    let store = Arc::new(seeded(&api, hr(), vec![]));

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_all().await })
    };
    wait_for_calls(&api, 1).await;

    assert_eq!(store.status(), RequestStatus::Loading);
    assert_eq!(store.error(), None);

    gate.notify_one();
    pending.await.unwrap().unwrap();
    assert_eq!(store.status(), RequestStatus::Success);
}

#[tokio::test]
async fn test_token_is_read_at_start_of_each_operation() {
    let api = ScriptedJobApi::new();
    api.on_list(Ok(vec![job(1, "A")]));
    api.on_delete(Ok(()));
    api.on_list(Ok(vec![]));

    let credentials = hr();
    let store = seeded(&api, credentials.clone(), vec![]);

    store.fetch_all().await.unwrap();
    credentials.set_token(Some(Token::new("rotated")));
    store.delete_one(&JobId::Number(1)).await.unwrap();
    credentials.set_token(None);
    store.fetch_all().await.unwrap();

    assert_eq!(
        api.tokens(),
        vec![
            Some("hr-token".to_string()),
            Some("rotated".to_string()),
            None
        ]
    );
    let calls: Vec<Call> = api.calls().into_iter().map(|(call, _)| call).collect();
    assert_eq!(
        calls,
        vec![Call::List, Call::Delete(JobId::Number(1)), Call::List]
    );
}

#[tokio::test]
async fn test_last_operation_to_resolve_sets_status() {
    let api = ScriptedJobApi::new();
    let fetch_gate = api.on_list_gated(Err(AppError::Transport("timeout".to_string())));
    let update_gate = api.on_update_gated(Ok(job(1, "Y")));
    let store = Arc::new(seeded(&api, hr(), vec![job(1, "X")]));

    let fetch = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_all().await })
    };
    wait_for_calls(&api, 1).await;
    let update = {
        let store = store.clone();
        tokio::spawn(async move {
            store
                .update_one(&JobId::Number(1), &JobPatch::default())
                .await
        })
    };
    wait_for_calls(&api, 2).await;

    // The update resolves first, then the fetch fails.
    update_gate.notify_one();
    update.await.unwrap().unwrap();
    assert_eq!(store.status(), RequestStatus::Success);

    fetch_gate.notify_one();
    assert!(fetch.await.unwrap().is_err());

    assert_eq!(store.status(), RequestStatus::Failed);
    assert_eq!(
        store.error(),
        Some(StoreError::Transport("Error fetching jobs".to_string()))
    );
    assert_eq!(store.jobs(), vec![job(1, "Y")]);
}

#[tokio::test]
async fn test_subscriber_observes_loading_then_result() {
    let api = ScriptedJobApi::new();
    let gate = api.on_list_gated(Ok(vec![job(7, "G")]));
    let store = Arc::new(seeded(&api, hr(), vec![]));
    let mut rx = store.subscribe();

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.fetch_all().await })
    };

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status, RequestStatus::Loading);

    gate.notify_one();
    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.status, RequestStatus::Success);
    assert_eq!(state.jobs, vec![job(7, "G")]);

    pending.await.unwrap().unwrap();
}
