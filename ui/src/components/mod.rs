pub mod activity_feed;
pub mod app;
