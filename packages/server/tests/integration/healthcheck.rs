use crate::common::routes;
use crate::spawn_app;

#[tokio::test]
async fn healthcheck_reports_ok() {
    let app = spawn_app!();

    let res = app.get_without_token(routes::HEALTHCHECK).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.data()["status"], "OK");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = spawn_app!();

    let res = app.get_without_token("/api/v1/nothing-here").await;

    assert_eq!(res.status, 404);
}
