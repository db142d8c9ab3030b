mod common;

use std::sync::Arc;

use common::{Harness, page};
use shelf_core::config::Config;
use shelf_core::controller::action_dispatcher::ModularActionDispatcher;
use shelf_core::controller::action_dispatcher::utils::SESSION_EXPIRED;
use shelf_core::controller::state_coordinator::StateCoordinator;
use shelf_core::controller::{Action, EventLoop, TaskResult};
use shelf_core::error::{ApiError, OpError};
use shelf_core::model::{MovieQuery, UIOverlay};
use tokio::sync::mpsc;

struct Rig {
    harness: Harness,
    state: Arc<StateCoordinator>,
    dispatcher: ModularActionDispatcher,
    tasks: mpsc::UnboundedReceiver<TaskResult>,
}

async fn rig_with_page(ids: &[&str]) -> Rig {
    let harness = Harness::signed_in(MovieQuery::default());
    harness.backend.push_list(Ok(page(ids, ids.len() as u64)));
    harness.movies.refresh().await.unwrap();

    let state = Arc::new(StateCoordinator::new(
        Arc::new(Config::default()),
        harness.movies.clone(),
        harness.auth.clone(),
    ));
    let (task_tx, tasks) = mpsc::unbounded_channel();
    let dispatcher = ModularActionDispatcher::new(state.clone(), task_tx);
    Rig {
        harness,
        state,
        dispatcher,
        tasks,
    }
}

fn notification(state: &StateCoordinator) -> Option<String> {
    state
        .ui_state()
        .notification
        .as_ref()
        .map(|n| n.message.as_str().to_owned())
}

#[tokio::test]
async fn delete_goes_through_confirmation() {
    let mut rig = rig_with_page(&["1", "2"]).await;
    rig.harness.backend.push_delete(Ok(()));

    assert!(rig.dispatcher.handle(Action::RequestDelete).await);
    {
        let ui = rig.state.ui_state();
        assert_eq!(ui.overlay, UIOverlay::ConfirmDelete);
        assert_eq!(
            ui.pending_delete.as_ref().map(|p| p.title.as_str()),
            Some("Movie 1")
        );
    }

    assert!(rig.dispatcher.handle(Action::ConfirmDelete).await);
    assert_eq!(rig.state.ui_state().overlay, UIOverlay::None);

    let finished = rig.tasks.recv().await.unwrap();
    assert!(matches!(finished, TaskResult::MovieDeleted { .. }));
    assert!(rig.dispatcher.handle(Action::TaskResult(finished)).await);

    assert_eq!(
        notification(&rig.state).as_deref(),
        Some("Deleted \"Movie 1\"")
    );
    assert_eq!(rig.harness.movies.state().movies().len(), 1);
}

#[tokio::test]
async fn cancelled_delete_sends_nothing() {
    let mut rig = rig_with_page(&["1"]).await;

    rig.dispatcher.handle(Action::RequestDelete).await;
    rig.dispatcher.handle(Action::CloseOverlay).await;

    assert_eq!(rig.state.ui_state().overlay, UIOverlay::None);
    assert!(!rig.harness.backend.calls().contains(&"delete"));
}

#[tokio::test]
async fn expired_session_resets_everything() {
    let mut rig = rig_with_page(&["1", "2"]).await;
    rig.harness.session.expire();

    let expired = OpError::from(ApiError::Unauthorized);
    let action = Action::TaskResult(TaskResult::MoviesLoaded(Err(expired)));
    assert!(rig.dispatcher.handle(action).await);

    assert_eq!(notification(&rig.state).as_deref(), Some(SESSION_EXPIRED));
    assert!(!rig.state.is_authenticated());
    assert!(rig.harness.movies.state().movies().is_empty());
}

#[tokio::test]
async fn selection_stays_inside_the_page() {
    let mut rig = rig_with_page(&["1", "2"]).await;

    for _ in 0..5 {
        rig.dispatcher.handle(Action::MoveSelectionDown).await;
    }
    assert_eq!(rig.state.ui_state().selected, 1);

    for _ in 0..5 {
        rig.dispatcher.handle(Action::MoveSelectionUp).await;
    }
    assert_eq!(rig.state.ui_state().selected, 0);
}

#[tokio::test]
async fn quit_stops_the_loop() {
    let mut rig = rig_with_page(&[]).await;
    assert!(!rig.dispatcher.handle(Action::Quit).await);
}

#[tokio::test]
async fn failures_from_an_earlier_session_are_silent() {
    let mut rig = rig_with_page(&["1"]).await;
    rig.state.update_ui_state(|ui| ui.notification = None);

    let late = Action::TaskResult(TaskResult::MovieCreated(Err(OpError::superseded())));
    assert!(rig.dispatcher.handle(late).await);
    let late = Action::TaskResult(TaskResult::Imported(Err(OpError::superseded())));
    assert!(rig.dispatcher.handle(late).await);

    assert_eq!(notification(&rig.state), None);
    assert!(rig.state.ui_state().import_form.error.is_none());
    assert!(rig.state.is_authenticated());
    assert_eq!(rig.harness.movies.state().movies().len(), 1);
}

#[tokio::test]
async fn event_loop_turns_task_results_into_actions() {
    let rig = rig_with_page(&[]).await;
    let (task_tx, task_rx) = mpsc::unbounded_channel();
    let mut event_loop = EventLoop::new(task_rx, rig.state.clone());

    task_tx.send(TaskResult::MoviesLoaded(Ok(true))).unwrap();

    let action = event_loop.next_action().await;
    assert!(matches!(
        action,
        Action::TaskResult(TaskResult::MoviesLoaded(Ok(true)))
    ));
    assert_eq!(event_loop.snapshot_metrics().tasks, 1);
}
