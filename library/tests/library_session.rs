mod common;

use clip_library::controller::{FavoriteMutation, LibraryConfig, Phase, AUTO_PAGINATE_DELAY};
use clip_library::models::{LibraryMeta, ViewVariant};
use clip_library::session::{LibrarySession, MountGuard};
use clip_library::{FetchError, LibraryController};
use common::{page, ApiCall, Harness, MockApi};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

fn meta() -> LibraryMeta {
    LibraryMeta {
        main_tag_options: vec!["guard".to_string()],
        video_tag_options: vec!["fundamentals".to_string()],
        sub_tag_options: vec![],
        position_options: vec!["mount".to_string()],
    }
}

#[tokio::test(start_paused = true)]
async fn empty_cache_loads_every_page_in_the_background() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 30, true, false))
        .with_page(ViewVariant::All, page(30, 10, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);

    session.start().await;

    let controller = session.controller().borrow();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.clips().len(), 40);
    assert!(!controller.has_more());
    assert_eq!(controller.next_offset(), 40);

    let page_calls = harness.api.page_calls();
    let offsets: Vec<usize> = page_calls.iter().map(|(_, offset)| *offset).collect();
    assert_eq!(offsets, vec![0, 30]);
    assert!(page_calls[1].0 - page_calls[0].0 >= AUTO_PAGINATE_DELAY);
    assert_eq!(*harness.delay.requested.borrow(), vec![Duration::from_millis(350)]);

    let cached = harness.cache.read(ViewVariant::All).expect("snapshot");
    assert_eq!(cached.clips.len(), 40);
    assert!(!cached.has_more_from_server);
    assert_eq!(cached.next_offset, 40);
}

#[tokio::test(start_paused = true)]
async fn accumulated_pages_have_no_duplicates_and_keep_order() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 36, true, false))
        .with_page(ViewVariant::All, page(36, 36, true, false))
        .with_page(ViewVariant::All, page(72, 5, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);

    session.start().await;

    let controller = session.controller().borrow();
    let ids: Vec<usize> = controller
        .clips()
        .iter()
        .map(|c| c.id.parse().unwrap())
        .collect();
    assert_eq!(ids, (0..77).collect::<Vec<_>>());
    let unique: HashSet<usize> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test(start_paused = true)]
async fn fresh_cache_skips_the_network() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 5, false, false));
    let harness = Harness::new(api);
    harness.session(ViewVariant::All).start().await;
    let calls_after_first_mount = harness.api.calls().len();

    harness.clock.advance(Duration::from_secs(9 * 60));
    let remount = harness.session(ViewVariant::All);
    remount.start().await;

    assert_eq!(harness.api.calls().len(), calls_after_first_mount);
    let controller = remount.controller().borrow();
    assert_eq!(controller.clips().len(), 5);
    assert!(controller.options().positions.contains("mount"));
}

#[tokio::test(start_paused = true)]
async fn expired_cache_goes_back_to_the_server() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 5, false, false));
    let harness = Harness::new(api);
    harness.session(ViewVariant::All).start().await;

    harness.clock.advance(Duration::from_secs(10 * 60 + 1));
    harness.session(ViewVariant::All).start().await;

    let page_requests = harness
        .api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ApiCall::Page { .. }))
        .count();
    assert_eq!(page_requests, 2);
}

#[tokio::test(start_paused = true)]
async fn meta_and_clip_tags_are_joined() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 3, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);

    session.start().await;

    let controller = session.controller().borrow();
    let main: Vec<String> = controller.options().main_tags.to_vec();
    assert_eq!(main, vec!["guard", "main-0", "main-1", "main-2"]);
    assert!(controller.options().video_tags.contains("fundamentals"));
}

#[tokio::test(start_paused = true)]
async fn meta_failure_is_not_fatal() {
    let api = MockApi::new().with_page(ViewVariant::All, page(0, 3, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);

    session.start().await;

    let controller = session.controller().borrow();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.options().main_tags.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn first_page_failure_is_visible_and_retryable() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 3, false, false));
    api.fail_pages_with(500);
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);

    session.start().await;
    {
        let controller = session.controller().borrow();
        assert_eq!(controller.phase(), Phase::Error);
        assert_eq!(controller.error(), Some("Failed to load clips (HTTP 500)"));
        assert!(controller.clips().is_empty());
    }

    *harness.api.page_status.borrow_mut() = None;
    session.retry().await;

    let controller = session.controller().borrow();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.clips().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn background_failure_keeps_loaded_clips() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 30, true, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);
    session.activate().await;

    harness.api.fail_pages_with(503);
    session.auto_paginate().await;

    let controller = session.controller().borrow();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(controller.clips().len(), 30);
    assert_eq!(controller.error(), Some("Failed to load clips (HTTP 503)"));
    // One failed attempt, then the loop stops.
    assert_eq!(harness.api.page_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn favorite_toggle_is_optimistic_and_rolls_back() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 3, false, false));
    let harness = Harness::new(api);

    let observed = Rc::new(RefCell::new(Vec::new()));
    let controller_slot: Rc<RefCell<Option<Rc<RefCell<LibraryController>>>>> =
        Rc::new(RefCell::new(None));
    let on_change: Rc<dyn Fn()> = {
        let observed = observed.clone();
        let controller_slot = controller_slot.clone();
        Rc::new(move || {
            if let Some(controller) = controller_slot.borrow().as_ref() {
                let flag = controller
                    .borrow()
                    .clips()
                    .iter()
                    .find(|c| c.id == "1")
                    .map(|c| c.is_favorite);
                observed.borrow_mut().push(flag);
            }
        })
    };
    let session = harness.session_with(ViewVariant::All, on_change);
    *controller_slot.borrow_mut() = Some(session.controller().clone());
    session.start().await;
    session.controller().borrow_mut().select_clip("1");
    observed.borrow_mut().clear();

    harness.api.fail_favorites_with(500);
    let outcome = session.toggle_favorite("1").await.expect("toggle accepted");

    assert_eq!(*observed.borrow(), vec![Some(true), Some(false)]);
    assert_eq!(
        outcome,
        FavoriteMutation::RolledBack {
            clip_id: "1".to_string(),
            restored: false,
            error: FetchError::Status {
                context: "Failed to update favorite",
                status: 500,
            },
        }
    );
    let controller = session.controller().borrow();
    assert!(!controller.selected_clip().unwrap().is_favorite);
    let cached = harness.cache.read(ViewVariant::All).unwrap();
    assert!(cached.clips.iter().all(|c| !c.is_favorite));
}

#[tokio::test(start_paused = true)]
async fn committed_favorite_clears_both_variants() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 3, false, false))
        .with_page(ViewVariant::FavoritesOnly, page(0, 2, false, true));
    let harness = Harness::new(api);
    let all = harness.session(ViewVariant::All);
    let favorites = harness.session(ViewVariant::FavoritesOnly);
    all.start().await;
    favorites.start().await;
    assert!(harness.cache.read(ViewVariant::FavoritesOnly).is_some());

    let outcome = all.toggle_favorite("2").await.unwrap();

    assert!(matches!(outcome, FavoriteMutation::Committed { value: true, .. }));
    assert!(harness.cache.read(ViewVariant::All).is_none());
    assert!(harness.cache.read(ViewVariant::FavoritesOnly).is_none());
    assert!(harness.api.calls().contains(&ApiCall::SetFavorite {
        clip_id: "2".to_string(),
        value: true,
    }));
}

#[tokio::test(start_paused = true)]
async fn unfavoriting_in_favorites_view_removes_the_clip() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::FavoritesOnly, page(0, 3, false, true));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::FavoritesOnly);
    session.start().await;
    session.controller().borrow_mut().select_clip("1");

    session.toggle_favorite("1").await.unwrap();

    let controller = session.controller().borrow();
    let ids: Vec<&str> = controller.clips().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["0", "2"]);
    assert!(controller.selected_clip().is_none());
    let cached = harness.cache.read(ViewVariant::FavoritesOnly).unwrap();
    assert_eq!(cached.clips.len(), 2);
    assert!(harness.cache.read(ViewVariant::All).is_none());
}

#[tokio::test(start_paused = true)]
async fn results_after_unmount_are_discarded() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 30, true, false))
        .with_page(ViewVariant::All, page(30, 10, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);
    session.activate().await;

    let guard = harness.guard.clone();
    *harness.api.before_response.borrow_mut() = Some(Box::new(move || guard.unmount()));
    session.auto_paginate().await;

    let controller = session.controller().borrow();
    assert_eq!(controller.clips().len(), 30);
    assert_eq!(harness.api.page_calls().len(), 2);
    let cached = harness.cache.read(ViewVariant::All).unwrap();
    assert_eq!(cached.clips.len(), 30);
}

#[tokio::test(start_paused = true)]
async fn failed_toggle_during_the_delay_keeps_pages_coming() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 30, true, false))
        .with_page(ViewVariant::All, page(30, 10, false, false));
    let harness = Harness::new(api);
    let session = harness.session(ViewVariant::All);
    session.activate().await;
    harness.api.fail_favorites_with(500);

    let toggle = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.toggle_favorite("3").await
    };
    let ((), outcome) = tokio::join!(session.auto_paginate(), toggle);

    assert!(matches!(outcome, Some(FavoriteMutation::RolledBack { .. })));
    let controller = session.controller().borrow();
    assert_eq!(controller.clips().len(), 40);
    assert!(!controller.has_more());
    assert!(!controller.clips()[3].is_favorite);
    assert_eq!(controller.error(), Some("Failed to update favorite (HTTP 500)"));
    let offsets: Vec<usize> = harness.api.page_calls().iter().map(|(_, o)| *o).collect();
    assert_eq!(offsets, vec![0, 30]);
}

#[tokio::test(start_paused = true)]
async fn remount_during_pending_toggle_never_sees_the_rejected_value() {
    let api = MockApi::new()
        .with_meta(meta())
        .with_page(ViewVariant::All, page(0, 30, true, false))
        .with_page(ViewVariant::All, page(30, 10, false, false));
    let harness = Harness::new(api);
    let first_mount = harness.session(ViewVariant::All);
    first_mount.activate().await;
    harness.api.fail_favorites_with(500);
    harness.api.delay_favorites_by(Duration::from_millis(500));

    let navigate_away_and_back = async {
        // The merge persists a snapshot while the toggle is still pending.
        assert!(first_mount.load_more().await);
        harness.guard.unmount();

        let controller = LibraryController::new(
            ViewVariant::All,
            harness.cache.clone(),
            LibraryConfig::default(),
        );
        let second_mount = LibrarySession::new(
            Rc::new(RefCell::new(controller)),
            harness.api.clone(),
            harness.delay.clone(),
            MountGuard::new(),
            Rc::new(|| {}),
        );
        second_mount.start().await;
        second_mount
    };
    let (outcome, second_mount) = tokio::join!(
        first_mount.toggle_favorite("3"),
        navigate_away_and_back
    );

    assert!(matches!(outcome, Some(FavoriteMutation::RolledBack { .. })));
    let controller = second_mount.controller().borrow();
    assert_eq!(controller.clips().len(), 40);
    assert!(controller.clips().iter().all(|c| !c.is_favorite));
    let cached = harness.cache.read(ViewVariant::All).unwrap();
    assert!(cached.clips.iter().all(|c| !c.is_favorite));
    // The second mount hydrated; nothing was fetched again.
    assert_eq!(harness.api.page_calls().len(), 2);
}
