use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn empty_channel_reports_zeros() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;

    let res = app.get_without_token(&routes::channel_stats(alice.id)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    for key in ["total_videos", "total_views", "total_likes", "total_subscribers"] {
        assert_eq!(res.data()[key], 0, "{key}");
    }
}

#[tokio::test]
async fn stats_add_up_views_likes_and_subscribers() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let first = app.publish_video(&alice.token, "One").await;
    let second = app.publish_video(&alice.token, "Two").await;
    app.get_without_token(&routes::video(first)).await;
    app.get_without_token(&routes::video(first)).await;
    app.get_without_token(&routes::video(second)).await;
    app.toggle_with_token(&routes::like_video(first), &bob.token).await;
    app.toggle_with_token(&routes::like_video(second), &bob.token).await;
    app.toggle_with_token(&routes::like_video(second), &alice.token).await;
    app.toggle_with_token(&routes::channel_subscription(alice.id), &bob.token)
        .await;

    let res = app.get_without_token(&routes::channel_stats(alice.id)).await;

    let data = res.data();
    assert_eq!(data["total_videos"], 2);
    assert_eq!(data["total_views"], 3);
    assert_eq!(data["total_likes"], 3);
    assert_eq!(data["total_subscribers"], 1);
}

#[tokio::test]
async fn channel_videos_paginate_with_engagement_counts() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let mut ids = Vec::new();
    for i in 0..15 {
        ids.push(app.publish_video(&alice.token, &format!("Video {i}")).await);
    }
    // Oldest video ends up on the second page.
    app.toggle_with_token(&routes::like_video(ids[0]), &bob.token).await;
    app.add_comment(&bob.token, ids[0], "first!").await;

    let res = app
        .get_without_token(&format!("{}?page=2&limit=10", routes::channel_videos(alice.id)))
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let videos = res.data()["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 5);
    let pagination = &res.data()["pagination"];
    assert_eq!(pagination["total"], 15);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(pagination["has_next_page"], false);
    let oldest = videos.last().unwrap();
    assert_eq!(oldest["title"], "Video 0");
    assert_eq!(oldest["like_count"], 1);
    assert_eq!(oldest["comment_count"], 1);
}

#[tokio::test]
async fn drafts_are_listed_only_for_the_owner() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let draft = app.publish_video(&alice.token, "Draft").await;
    app.patch_empty_with_token(&routes::toggle_publish(draft), &alice.token)
        .await;

    let anonymous = app.get_without_token(&routes::channel_videos(alice.id)).await;
    let owner = app
        .get_with_token(&routes::channel_videos(alice.id), &alice.token)
        .await;

    assert_eq!(anonymous.data()["pagination"]["total"], 0);
    assert_eq!(owner.data()["pagination"]["total"], 1);
}
