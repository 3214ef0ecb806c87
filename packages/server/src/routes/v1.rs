use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{comment, dashboard, healthcheck, like, playlist, subscription, tweet, video};
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/healthcheck", healthcheck_routes())
        .nest("/videos", video_routes(config))
        .nest("/comments", comment_routes())
        .nest("/likes", like_routes())
        .nest("/tweets", tweet_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/playlists", playlist_routes())
        .nest("/dashboard", dashboard_routes())
}

fn healthcheck_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(healthcheck::healthcheck))
}

fn video_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(video::list_videos, video::publish_video))
        .routes(routes!(
            video::get_video,
            video::update_video,
            video::delete_video
        ))
        .routes(routes!(video::toggle_publish_status))
        .layer(video::upload_body_limit(config.storage.max_upload_size))
}

fn comment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(comment::list_comments, comment::add_comment))
        .routes(routes!(comment::update_comment, comment::delete_comment))
}

fn like_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(like::toggle_video_like))
        .routes(routes!(like::toggle_comment_like))
        .routes(routes!(like::toggle_tweet_like))
        .routes(routes!(like::liked_videos))
}

fn tweet_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(tweet::create_tweet))
        .routes(routes!(tweet::user_tweets))
        .routes(routes!(tweet::update_tweet, tweet::delete_tweet))
}

fn subscription_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            subscription::toggle_subscription,
            subscription::channel_subscribers
        ))
        .routes(routes!(subscription::subscribed_channels))
}

fn playlist_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(playlist::create_playlist))
        .routes(routes!(playlist::user_playlists))
        .routes(routes!(
            playlist::get_playlist,
            playlist::update_playlist,
            playlist::delete_playlist
        ))
        .routes(routes!(playlist::add_video_to_playlist))
        .routes(routes!(playlist::remove_video_from_playlist))
}

fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(dashboard::channel_stats))
        .routes(routes!(dashboard::channel_videos))
}
