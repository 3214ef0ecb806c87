use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn subscribing_twice_unsubscribes() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;

    let first = app
        .toggle_with_token(&routes::channel_subscription(alice.id), &bob.token)
        .await;
    assert_eq!(first.status, 201, "{}", first.text);
    assert_eq!(first.data()["subscribed"], true);
    assert_eq!(first.data()["subscriber_count"], 1);

    let second = app
        .toggle_with_token(&routes::channel_subscription(alice.id), &bob.token)
        .await;
    assert_eq!(second.status, 200);
    assert_eq!(second.body["message"], "Unsubscribed successfully");
    assert_eq!(second.data()["subscriber_count"], 0);
}

#[tokio::test]
async fn cannot_subscribe_to_self() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;

    let res = app
        .toggle_with_token(&routes::channel_subscription(alice.id), &alice.token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "You cannot subscribe to yourself");
}

#[tokio::test]
async fn unknown_channel_is_not_found() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;

    let res = app
        .toggle_with_token(
            &routes::channel_subscription(uuid::Uuid::now_v7()),
            &alice.token,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn lists_both_directions() {
    let app = spawn_app!();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let carol = app.create_user("carol").await;
    app.toggle_with_token(&routes::channel_subscription(alice.id), &bob.token)
        .await;
    app.toggle_with_token(&routes::channel_subscription(alice.id), &carol.token)
        .await;
    app.toggle_with_token(&routes::channel_subscription(carol.id), &bob.token)
        .await;

    let subscribers = app
        .get_without_token(&routes::channel_subscription(alice.id))
        .await;
    assert_eq!(subscribers.status, 200, "{}", subscribers.text);
    let names: Vec<&str> = subscribers.data()["subscribers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["user"]["username"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"bob"));
    assert!(names.contains(&"carol"));

    let channels = app
        .get_without_token(&routes::subscribed_channels(bob.id))
        .await;
    assert_eq!(channels.data()["pagination"]["total"], 2);
    assert!(channels.data()["channels"][0]["subscribed_at"].is_string());
}
