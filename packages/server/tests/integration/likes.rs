use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tubehub::entity::like::{self, LikeTarget};
use tubehub::error::AppError;
use tubehub::utils::toggle::{LikeRelation, insert_relation, toggle};

use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn liking_twice_restores_original_state() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let video = app.publish_video(&alice.token, "Likeable").await;

    let like = app.toggle_with_token(&routes::like_video(video), &bob.token).await;
    assert_eq!(like.status, 201, "{}", like.text);
    assert_eq!(like.body["message"], "Video liked successfully");
    assert_eq!(like.data()["liked"], true);
    assert_eq!(like.data()["like_count"], 1);

    let unlike = app.toggle_with_token(&routes::like_video(video), &bob.token).await;
    assert_eq!(unlike.status, 200);
    assert_eq!(unlike.body["message"], "Video unliked successfully");
    assert_eq!(unlike.data()["liked"], false);
    assert_eq!(unlike.data()["like_count"], 0);
}

#[tokio::test]
async fn likes_are_counted_per_user() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let tweet = app.create_tweet(&alice.token, "like me").await;

    app.toggle_with_token(&routes::like_tweet(tweet), &alice.token).await;
    let res = app.toggle_with_token(&routes::like_tweet(tweet), &bob.token).await;

    assert_eq!(res.body["message"], "Tweet liked successfully");
    assert_eq!(res.data()["like_count"], 2);
}

#[tokio::test]
async fn missing_target_is_not_found() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;

    let res = app
        .toggle_with_token(&routes::like_comment(uuid::Uuid::now_v7()), &alice.token)
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn duplicate_insert_is_a_conflict() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Raced").await;
    let relation = LikeRelation {
        actor: alice.id,
        target: LikeTarget::Video(video),
    };

    insert_relation(&app.db, &relation).await.unwrap();
    let err = insert_relation(&app.db, &relation).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn liked_videos_skip_other_peoples_drafts() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let public = app.publish_video(&alice.token, "Public").await;
    let draft = app.publish_video(&alice.token, "Draft").await;
    app.toggle_with_token(&routes::like_video(public), &bob.token).await;
    app.toggle_with_token(&routes::like_video(draft), &bob.token).await;
    app.patch_empty_with_token(&routes::toggle_publish(draft), &alice.token)
        .await;

    let res = app.get_with_token(routes::LIKED_VIDEOS, &bob.token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let videos = res.data()["videos"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["video"]["title"], "Public");
    assert!(videos[0]["liked_at"].is_string());
}

async fn like_rows(app: &crate::common::TestApp, video: uuid::Uuid) -> u64 {
    like::Entity::find()
        .filter(like::Column::TargetId.eq(video))
        .count(&app.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn racing_inserts_leave_one_row() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Raced").await;
    let relation = LikeRelation {
        actor: alice.id,
        target: LikeTarget::Video(video),
    };

    let (a, b) = tokio::join!(
        insert_relation(&app.db, &relation),
        insert_relation(&app.db, &relation)
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_))))
    );
    assert_eq!(like_rows(&app, video).await, 1);
}

#[tokio::test]
async fn racing_toggles_never_duplicate_a_like() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Raced").await;
    let relation = LikeRelation {
        actor: alice.id,
        target: LikeTarget::Video(video),
    };

    let (a, b) = tokio::join!(toggle(&app.db, &relation), toggle(&app.db, &relation));

    // Either both ran in turn (like, then unlike) or both tried to insert and
    // the loser got a Conflict.
    let mut added = 0;
    let mut removed = 0;
    for result in [a, b] {
        match result {
            Ok(outcome) if outcome.active => added += 1,
            Ok(_) => removed += 1,
            Err(AppError::Conflict(_)) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }
    assert_eq!(added, 1);
    assert_eq!(like_rows(&app, video).await, added - removed);
}

#[tokio::test]
async fn drafts_cannot_be_liked_by_others() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let draft = app.publish_video(&alice.token, "Draft").await;
    let comment = app.add_comment(&alice.token, draft, "first").await;
    app.patch_empty_with_token(&routes::toggle_publish(draft), &alice.token)
        .await;

    let video_like = app.toggle_with_token(&routes::like_video(draft), &bob.token).await;
    let comment_like = app
        .toggle_with_token(&routes::like_comment(comment), &bob.token)
        .await;
    let own_like = app.toggle_with_token(&routes::like_video(draft), &alice.token).await;

    assert_eq!(video_like.status, 404, "{}", video_like.text);
    assert_eq!(video_like.body["message"], "Video not found");
    assert_eq!(comment_like.status, 404, "{}", comment_like.text);
    assert_eq!(comment_like.body["message"], "Comment not found");
    assert_eq!(own_like.status, 201, "{}", own_like.text);
}
