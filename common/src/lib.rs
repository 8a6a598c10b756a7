pub mod describe;
pub mod error;
pub mod feed;
pub mod i18n;
pub mod identity;
pub mod message;
pub mod render;
pub mod transaction;

pub use error::FeedError;
pub use render::{render_feed, FeedAction, FeedEntry, FeedInput, RenderedFeed};
