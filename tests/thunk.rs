mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{count_notifications, counter_reducer, counter_state};
use fluxion::{Action, Dispatched, Store, StoreError, Thunk};

type FetchLog = Arc<Vec<String>>;

/// Appends every fetch-phase action kind to the log.
fn fetch_reducer(state: &FetchLog, action: &Action) -> FetchLog {
    match action.kind() {
        "FETCH_PENDING" | "FETCH_DONE" | "FETCH_REJECTED" => {
            let mut log = (**state).clone();
            log.push(action.kind().to_string());
            Arc::new(log)
        }
        _ => Arc::clone(state),
    }
}

#[tokio::test]
async fn fetch_flow_dispatches_pending_then_done() {
    let store = Store::new(fetch_reducer, Arc::new(Vec::new()));
    let notifications = count_notifications(&store);

    let (io_tx, io_rx) = tokio::sync::oneshot::channel::<Vec<i64>>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    let outcome = store
        .dispatch(Thunk::named("fetch", move |store: Store<FetchLog>| {
            async move {
                store.dispatch(Action::new("FETCH_PENDING")).unwrap();
                let rows = io_rx.await.unwrap();
                store
                    .dispatch(Action::with_payload(
                        "FETCH_DONE",
                        serde_json::json!(rows),
                    ))
                    .unwrap();
                let _ = done_tx.send(());
            }
        }))
        .unwrap();
    assert_eq!(outcome, Dispatched::Deferred);

    // Simulated I/O completion.
    io_tx.send(vec![1, 2, 3]).unwrap();
    done_rx.await.unwrap();

    assert_eq!(*store.state(), vec!["FETCH_PENDING", "FETCH_DONE"]);
    assert_eq!(notifications.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_fetch_follows_the_rejected_convention() {
    let store = Store::new(fetch_reducer, Arc::new(Vec::new()));
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();

    store
        .dispatch(Thunk::named("fetch", move |store: Store<FetchLog>| {
            async move {
                store.dispatch(Action::new("FETCH_PENDING")).unwrap();
                let io: Result<Vec<i64>, &str> = Err("connection refused");
                match io {
                    Ok(rows) => {
                        store
                            .dispatch(Action::with_payload(
                                "FETCH_DONE",
                                serde_json::json!(rows),
                            ))
                            .unwrap();
                    }
                    Err(reason) => {
                        store
                            .dispatch(Action::with_payload(
                                "FETCH_REJECTED",
                                serde_json::json!(reason),
                            ))
                            .unwrap();
                    }
                }
                let _ = done_tx.send(());
            }
        }))
        .unwrap();

    done_rx.await.unwrap();
    assert_eq!(*store.state(), vec!["FETCH_PENDING", "FETCH_REJECTED"]);
}

#[tokio::test]
async fn thunk_reads_current_state_through_its_handle() {
    let store = Store::new(counter_reducer, counter_state(41));
    let (seen_tx, seen_rx) = tokio::sync::oneshot::channel::<i64>();

    store
        .dispatch(Thunk::new(move |store: Store<Arc<common::Counter>>| {
            async move {
                let _ = seen_tx.send(store.state().count);
                store.dispatch(Action::new("INC")).unwrap();
            }
        }))
        .unwrap();

    assert_eq!(seen_rx.await.unwrap(), 41);
}

#[test]
fn thunk_without_a_runtime_is_rejected() {
    let store = Store::new(counter_reducer, counter_state(0));

    let result = store.dispatch(Thunk::new(|_store| async {}));

    assert!(matches!(result, Err(StoreError::NoAsyncRuntime)));
    assert_eq!(store.state().count, 0);
}
