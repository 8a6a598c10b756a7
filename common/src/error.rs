use crate::identity::TransitionActor;

/// Anomalies found while building a feed.
///
/// Rendering never stops on these. The renderer collects them next to the
/// rendered entries and the caller decides how to report them.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A transition reached the describer that has no phrasing.
    #[error("unknown transaction transition type: {transition}")]
    UnknownTransition { transition: String },

    /// Reviews are completed but the review written by this party is not in the transaction.
    #[error("review by {author} not found in transaction")]
    MissingReview { author: TransitionActor },

    /// The viewer, a party, or the listing is missing, so transitions cannot be phrased.
    #[error("incomplete transaction: missing {0}")]
    IncompleteTransaction(&'static str),

    /// Review ratings are whole stars from 1 to 5.
    #[error("invalid review rating {0}, expected 1-5")]
    InvalidRating(u8),

    /// Catalog UTC offsets must stay within a day.
    #[error("invalid UTC offset of {0} minutes")]
    InvalidOffset(i32),

    /// A catalog date or time pattern has a specifier chrono cannot format.
    #[error("invalid date/time pattern {0:?}")]
    InvalidDateFormat(String),

    /// A localization catalog could not be parsed.
    #[error("invalid message catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
