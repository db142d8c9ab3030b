mod common;

use common::{Harness, ids, movie, page};
use shelf_core::api::TokenStore;
use shelf_core::api::backend::{ImportReceipt, ImportUpload};
use shelf_core::controller::movie_store::NO_VALID_MOVIES;
use shelf_core::error::{ApiError, ErrorKind};
use shelf_core::import::CatalogFile;
use shelf_core::model::movie::{MovieDraft, MovieFormat};
use shelf_core::model::{MovieQuery, OpKind, SortField};
use tokio::sync::oneshot;

const YEAR: i32 = 2026;

fn draft(title: &str) -> MovieDraft {
    MovieDraft {
        title: title.to_owned(),
        year: 1999,
        format: MovieFormat::BluRay,
        actors: vec!["Keanu Reeves".to_owned()],
    }
}

#[tokio::test]
async fn load_replaces_page_and_total() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1", "2"], 7)));

    assert_eq!(h.movies.refresh().await, Ok(true));

    let state = h.movies.state();
    assert!(state.initialized());
    assert_eq!(state.total(), 7);
    assert!(!state.is_loading(OpKind::List));
    drop(state);
    assert_eq!(ids(&h.movies), ["1", "2"]);
}

#[tokio::test]
async fn out_of_order_list_response_is_dropped() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend.push_list_gated(gate, Ok(page(&["old"], 1)));
    h.backend.push_list(Ok(page(&["new"], 1)));

    let slow = h.movies.refresh();
    let fast = h.movies.set_sort(SortField::Year);
    let (slow, fast) = tokio::join!(slow, async {
        let done = fast.await;
        let _ = release.send(());
        done
    });

    assert_eq!(fast, Ok(true));
    assert_eq!(slow, Ok(false));
    assert_eq!(ids(&h.movies), ["new"]);
    assert_eq!(h.movies.state().query().sort, SortField::Year);
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_page() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1", "2"], 2)));
    h.backend
        .push_list(Err(ApiError::Transport("connection refused".into())));

    h.movies.refresh().await.unwrap();
    let err = h.movies.set_sort(SortField::Year).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    let state = h.movies.state();
    assert_eq!(state.movies().len(), 2);
    assert_eq!(state.query().sort, SortField::Title);
    assert_eq!(state.error(OpKind::List), Some(&err));
}

#[tokio::test]
async fn paging_stops_at_either_end() {
    let h = Harness::signed_in(MovieQuery::with_limit(2).unwrap());
    h.backend.push_list(Ok(page(&["1", "2"], 3)));
    h.backend.push_list(Ok(page(&["3"], 3)));

    h.movies.refresh().await.unwrap();
    assert_eq!(h.movies.prev_page().await, Ok(false));
    assert_eq!(h.movies.next_page().await, Ok(true));
    assert_eq!(h.movies.next_page().await, Ok(false));

    let offsets: Vec<u32> = h.backend.queries().iter().map(|q| q.offset).collect();
    assert_eq!(offsets, [0, 2]);
    assert_eq!(h.movies.state().pagination().current_page(), 2);
}

#[tokio::test]
async fn unauthorized_response_signs_out_once() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Err(ApiError::Unauthorized));
    h.backend.push_detail(Err(ApiError::Unauthorized));

    let (list, detail) = tokio::join!(h.movies.refresh(), h.movies.load_by_id("9".into()));

    assert!(list.unwrap_err().is_session_expired());
    assert!(detail.unwrap_err().is_session_expired());

    let auth = h.session.snapshot();
    assert!(!auth.is_authenticated);
    assert!(auth.expired);
    assert_eq!(h.tokens.load(), None);
    assert!(!h.session.expire());
}

#[tokio::test]
async fn created_movie_goes_first_and_bumps_total() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1", "2"], 2)));
    h.backend.push_write(Ok(movie("3")));

    h.movies.refresh().await.unwrap();
    let created = h.movies.create(draft("The Matrix"), YEAR).await.unwrap();

    assert_eq!(created.id, "3");
    assert_eq!(ids(&h.movies), ["3", "1", "2"]);
    assert_eq!(h.movies.state().total(), 3);
    assert_eq!(h.backend.calls(), ["list", "create"]);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_backend() {
    let h = Harness::signed_in(MovieQuery::default());

    let err = h.movies.create(draft("  "), YEAR).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.backend.calls().is_empty());
    assert_eq!(h.movies.state().error(OpKind::Create), Some(&err));
}

#[tokio::test]
async fn update_replaces_row_and_open_details() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1", "2"], 2)));
    h.backend.push_detail(Ok(movie("2")));
    let mut renamed = movie("2");
    renamed.title = "Renamed".into();
    h.backend.push_write(Ok(renamed));

    h.movies.refresh().await.unwrap();
    h.movies.load_by_id("2".into()).await.unwrap();
    let patch = shelf_core::model::MoviePatch {
        title: Some("Renamed".into()),
        ..Default::default()
    };
    h.movies.update("2".into(), patch, YEAR).await.unwrap();

    let state = h.movies.state();
    assert_eq!(state.find("2").map(|m| m.title.as_str()), Some("Renamed"));
    assert_eq!(state.selected().map(|m| m.title.as_str()), Some("Renamed"));
}

#[tokio::test]
async fn deleting_the_open_movie_clears_it() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1"], 1)));
    h.backend.push_detail(Ok(movie("1")));
    h.backend.push_delete(Ok(()));
    h.backend.push_delete(Ok(()));

    h.movies.refresh().await.unwrap();
    h.movies.load_by_id("1".into()).await.unwrap();
    h.movies.remove("1".into()).await.unwrap();

    {
        let state = h.movies.state();
        assert!(state.movies().is_empty());
        assert!(state.selected().is_none());
        assert_eq!(state.total(), 0);
    }

    // Never below zero.
    h.movies.remove("ghost".into()).await.unwrap();
    assert_eq!(h.movies.state().total(), 0);
}

#[tokio::test]
async fn failed_delete_keeps_the_row() {
    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1"], 1)));
    h.backend
        .push_delete(Err(ApiError::rejected(Some(404), "MOVIE_NOT_FOUND")));

    h.movies.refresh().await.unwrap();
    let err = h.movies.remove("1".into()).await.unwrap_err();

    assert_eq!(err.message, "MOVIE_NOT_FOUND");
    assert_eq!(ids(&h.movies), ["1"]);
    assert_eq!(h.movies.state().error(OpKind::Delete), Some(&err));
}

#[tokio::test]
async fn import_merges_only_unseen_movies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.txt");
    tokio::fs::write(
        &path,
        "Title: Two\nRelease Year: 2001\nFormat: DVD\n\n\
         Title: Three\nRelease Year: 2002\nFormat: VHS\nStars: A, B\n\n\
         Title: Broken\nFormat: VHS\n",
    )
    .await
    .unwrap();
    let file = CatalogFile::read(&path, YEAR).await.unwrap();
    assert_eq!(file.outcome.movies.len(), 2);

    let h = Harness::signed_in(MovieQuery::default());
    h.backend.push_list(Ok(page(&["1", "2"], 2)));
    h.backend.push_import(Ok(ImportReceipt {
        movies: vec![movie("2"), movie("3")],
        imported: 2,
        total: 2,
    }));

    h.movies.refresh().await.unwrap();
    let summary = h.movies.import_catalog(&file).await.unwrap();

    assert_eq!(summary.merged, 1);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.parse_errors.len(), 1);
    assert_eq!(ids(&h.movies), ["3", "1", "2"]);
    assert_eq!(h.movies.state().total(), 3);
}

#[tokio::test]
async fn import_without_valid_movies_is_refused_locally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.txt");
    tokio::fs::write(&path, "Title: Only a title\n").await.unwrap();
    let file = CatalogFile::read(&path, YEAR).await.unwrap();

    let h = Harness::signed_in(MovieQuery::default());
    let err = h.movies.import_catalog(&file).await.unwrap_err();

    assert_eq!(err.message, NO_VALID_MOVIES);
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn reset_returns_to_an_empty_container() {
    let h = Harness::signed_in(MovieQuery::with_limit(5).unwrap());
    h.backend.push_list(Ok(page(&["1"], 1)));

    h.movies.refresh().await.unwrap();
    h.movies.reset();

    let state = h.movies.state();
    assert!(!state.initialized());
    assert!(state.movies().is_empty());
    assert_eq!(state.query().limit, 5);
}

#[tokio::test]
async fn list_response_from_before_a_reset_is_dropped() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend
        .push_list_gated(gate, Ok(page(&["prev-session"], 1)));
    h.backend.push_list(Ok(page(&["new-session"], 1)));

    let (old, new) = tokio::join!(h.movies.refresh(), async {
        h.movies.reset();
        let done = h.movies.refresh().await;
        let _ = release.send(());
        done
    });

    assert_eq!(new, Ok(true));
    assert_eq!(old, Ok(false));
    assert_eq!(ids(&h.movies), ["new-session"]);
    assert_eq!(h.movies.state().total(), 1);
}

#[tokio::test]
async fn create_finishing_after_a_reset_is_not_applied() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend.push_write_gated(gate, Ok(movie("late")));

    let (created, ()) = tokio::join!(h.movies.create(draft("Late"), YEAR), async {
        h.movies.reset();
        let _ = release.send(());
    });

    assert!(created.unwrap_err().is_superseded());
    let state = h.movies.state();
    assert!(state.movies().is_empty());
    assert_eq!(state.total(), 0);
    assert!(!state.is_loading(OpKind::Create));
    assert!(state.error(OpKind::Create).is_none());
}

#[tokio::test]
async fn import_finishing_after_a_reset_is_not_applied() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend.push_import_gated(
        gate,
        Ok(ImportReceipt {
            movies: vec![movie("1"), movie("2")],
            imported: 2,
            total: 2,
        }),
    );
    let upload = ImportUpload {
        file_name: "movies.txt".into(),
        bytes: b"Title: One\nRelease Year: 2001\nFormat: DVD\n".to_vec(),
    };

    let (imported, ()) = tokio::join!(h.movies.import_batch(&upload, Vec::new()), async {
        h.movies.reset();
        let _ = release.send(());
    });

    assert!(imported.unwrap_err().is_superseded());
    let state = h.movies.state();
    assert!(state.movies().is_empty());
    assert!(state.import_summary().is_none());
}

#[tokio::test]
async fn late_rejection_of_a_replaced_token_keeps_the_new_session() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend.push_list_gated(gate, Err(ApiError::Unauthorized));
    h.backend.push_token(Ok("new".into()));

    let (stale, ()) = tokio::join!(h.movies.refresh(), async {
        h.auth.logout();
        h.auth.login("ann@example.com", "secret").await.unwrap();
        let _ = release.send(());
    });

    assert_eq!(stale, Ok(false));
    let auth = h.session.snapshot();
    assert!(auth.is_authenticated);
    assert!(!auth.expired);
    assert_eq!(h.tokens.load().as_deref(), Some("new"));
    assert_eq!(h.session.token().as_deref(), Some("new"));
}

#[tokio::test]
async fn cycling_sort_builds_on_the_pending_request() {
    let h = Harness::signed_in(MovieQuery::default());
    let (release, gate) = oneshot::channel();
    h.backend.push_list_gated(gate, Ok(page(&["by-year"], 1)));
    h.backend.push_list(Ok(page(&["by-id"], 1)));

    let (first, second) = tokio::join!(h.movies.cycle_sort(), async {
        let done = h.movies.cycle_sort().await;
        let _ = release.send(());
        done
    });

    assert_eq!(first, Ok(false));
    assert_eq!(second, Ok(true));
    let sorts: Vec<SortField> = h.backend.queries().iter().map(|q| q.sort).collect();
    assert_eq!(sorts, [SortField::Year, SortField::Id]);
    assert_eq!(h.movies.state().query().sort, SortField::Id);
    assert_eq!(ids(&h.movies), ["by-id"]);
}
