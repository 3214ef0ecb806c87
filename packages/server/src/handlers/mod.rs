pub mod comment;
pub mod dashboard;
pub mod healthcheck;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod video;
