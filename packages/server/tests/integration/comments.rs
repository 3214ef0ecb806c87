use serde_json::json;

use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn lists_newest_first_with_authors() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let video = app.publish_video(&alice.token, "Talk").await;
    app.add_comment(&alice.token, video, "first").await;
    app.add_comment(&bob.token, video, "second").await;

    let res = app.get_without_token(&routes::video_comments(video)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    let comments = res.data()["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "second");
    assert_eq!(comments[0]["owner"]["username"], "bob");
    assert_eq!(comments[1]["content"], "first");
    assert_eq!(res.data()["pagination"]["total"], 2);
}

#[tokio::test]
async fn paginates() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Talk").await;
    for i in 0..3 {
        app.add_comment(&alice.token, video, &format!("comment {i}")).await;
    }

    let res = app
        .get_without_token(&format!("{}?page=2&limit=2", routes::video_comments(video)))
        .await;

    assert_eq!(res.data()["comments"].as_array().unwrap().len(), 1);
    let pagination = &res.data()["pagination"];
    assert_eq!(pagination["page"], 2);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(pagination["has_next_page"], false);
}

#[tokio::test]
async fn commenting_on_missing_video_is_not_found() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;

    let res = app
        .post_with_token(
            &routes::video_comments(uuid::Uuid::now_v7()),
            &json!({ "content": "hello?" }),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Talk").await;

    let res = app
        .post_with_token(
            &routes::video_comments(video),
            &json!({ "content": "   " }),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn only_author_can_edit_or_delete() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let video = app.publish_video(&alice.token, "Talk").await;
    let comment = app.add_comment(&bob.token, video, "typo").await;

    let stolen = app
        .patch_with_token(&routes::comment(comment), &json!({ "content": "mine" }), &alice.token)
        .await;
    assert_eq!(stolen.status, 403);

    let edited = app
        .patch_with_token(&routes::comment(comment), &json!({ "content": "fixed" }), &bob.token)
        .await;
    assert_eq!(edited.status, 200, "{}", edited.text);
    assert_eq!(edited.data()["content"], "fixed");

    assert_eq!(
        app.delete_with_token(&routes::comment(comment), &alice.token)
            .await
            .status,
        403
    );
    let deleted = app.delete_with_token(&routes::comment(comment), &bob.token).await;
    assert_eq!(deleted.status, 200);

    let res = app.get_without_token(&routes::video_comments(video)).await;
    assert_eq!(res.data()["pagination"]["total"], 0);
}

#[tokio::test]
async fn deleting_comment_removes_its_likes() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let video = app.publish_video(&alice.token, "Talk").await;
    let comment = app.add_comment(&alice.token, video, "liked").await;
    let liked = app
        .toggle_with_token(&routes::like_comment(comment), &alice.token)
        .await;
    assert_eq!(liked.status, 201);

    app.delete_with_token(&routes::comment(comment), &alice.token)
        .await;

    let relike = app
        .toggle_with_token(&routes::like_comment(comment), &alice.token)
        .await;
    assert_eq!(relike.status, 404);
}

#[tokio::test]
async fn draft_comments_are_owner_only() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let draft = app.publish_video(&alice.token, "Draft").await;
    let comment = app.add_comment(&bob.token, draft, "early bird").await;
    app.patch_empty_with_token(&routes::toggle_publish(draft), &alice.token)
        .await;

    let anonymous = app.get_without_token(&routes::video_comments(draft)).await;
    let stranger_post = app
        .post_with_token(
            &routes::video_comments(draft),
            &json!({ "content": "hello?" }),
            &bob.token,
        )
        .await;
    let stranger_edit = app
        .patch_with_token(&routes::comment(comment), &json!({ "content": "edited" }), &bob.token)
        .await;
    let owner_list = app
        .get_with_token(&routes::video_comments(draft), &alice.token)
        .await;

    assert_eq!(anonymous.status, 404, "{}", anonymous.text);
    assert_eq!(stranger_post.status, 404, "{}", stranger_post.text);
    assert_eq!(stranger_edit.status, 404, "{}", stranger_edit.text);
    assert_eq!(stranger_edit.body["message"], "Comment not found");
    assert_eq!(owner_list.status, 200, "{}", owner_list.text);
    assert_eq!(owner_list.data()["comments"].as_array().unwrap().len(), 1);

    // Authors can still clean up after themselves.
    let delete = app.delete_with_token(&routes::comment(comment), &bob.token).await;
    assert_eq!(delete.status, 200, "{}", delete.text);
}
