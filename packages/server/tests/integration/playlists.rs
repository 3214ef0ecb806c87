use serde_json::json;

use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn keeps_videos_in_insertion_order() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let first = app.publish_video(&alice.token, "One").await;
    let second = app.publish_video(&alice.token, "Two").await;
    let playlist = app.create_playlist(&alice.token, "Mix").await;

    for video in [second, first] {
        let res = app
            .patch_empty_with_token(&routes::playlist_add(video, playlist), &alice.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    let res = app.get_without_token(&routes::playlist(playlist)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data()["name"], "Mix");
    let entries = res.data()["videos"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["video"]["title"], "Two");
    assert_eq!(entries[0]["position"], 0);
    assert_eq!(entries[1]["video"]["title"], "One");
    assert_eq!(entries[1]["position"], 1);
}

#[tokio::test]
async fn adding_the_same_video_twice_conflicts() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Once").await;
    let playlist = app.create_playlist(&alice.token, "Mix").await;

    app.patch_empty_with_token(&routes::playlist_add(video, playlist), &alice.token)
        .await;
    let res = app
        .patch_empty_with_token(&routes::playlist_add(video, playlist), &alice.token)
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["message"], "Video already in playlist");
}

#[tokio::test]
async fn removing_is_idempotent() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Gone").await;
    let playlist = app.create_playlist(&alice.token, "Mix").await;
    app.patch_empty_with_token(&routes::playlist_add(video, playlist), &alice.token)
        .await;

    for _ in 0..2 {
        let res = app
            .patch_empty_with_token(&routes::playlist_remove(video, playlist), &alice.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    let res = app.get_without_token(&routes::playlist(playlist)).await;
    assert!(res.data()["videos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_owner_can_modify() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let video = app.publish_video(&bob.token, "Bob's").await;
    let playlist = app.create_playlist(&alice.token, "Alice's").await;

    let add = app
        .patch_empty_with_token(&routes::playlist_add(video, playlist), &bob.token)
        .await;
    assert_eq!(add.status, 403);
    let rename = app
        .patch_with_token(&routes::playlist(playlist), &json!({ "name": "Bob's now" }), &bob.token)
        .await;
    assert_eq!(rename.status, 403);
    let delete = app.delete_with_token(&routes::playlist(playlist), &bob.token).await;
    assert_eq!(delete.status, 403);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let res = app
        .post_with_token(
            routes::PLAYLISTS,
            &json!({ "name": "Road trip", "description": "Songs" }),
            &alice.token,
        )
        .await;
    let playlist = res.id();

    let res = app
        .patch_with_token(
            &routes::playlist(playlist),
            &json!({ "description": "Long drives" }),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data()["name"], "Road trip");
    assert_eq!(res.data()["description"], "Long drives");
}

#[tokio::test]
async fn user_playlists_report_video_counts() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Solo").await;
    let full = app.create_playlist(&alice.token, "Full").await;
    app.create_playlist(&alice.token, "Empty").await;
    app.patch_empty_with_token(&routes::playlist_add(video, full), &alice.token)
        .await;

    let res = app.get_without_token(&routes::user_playlists(alice.id)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let playlists = res.data()["playlists"].as_array().unwrap();
    assert_eq!(playlists.len(), 2);
    let count_of = |name: &str| {
        playlists
            .iter()
            .find(|p| p["name"] == name)
            .map(|p| p["video_count"].as_i64().unwrap())
    };
    assert_eq!(count_of("Full"), Some(1));
    assert_eq!(count_of("Empty"), Some(0));
}

#[tokio::test]
async fn deleted_playlist_is_gone() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let playlist = app.create_playlist(&alice.token, "Temp").await;

    let res = app.delete_with_token(&routes::playlist(playlist), &alice.token).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get_without_token(&routes::playlist(playlist)).await;
    assert_eq!(res.status, 404);
}
