use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::identity::{TransitionActor, User, UserId};

const TRANSITION_PREFIX: &str = "transition/";

/// Highest review rating, in whole stars.
pub const MAX_STARS: u8 = 5;

/// Every transition the marketplace process can produce.
///
/// Transitions are decided upstream; this type only names them. Names the
/// process does not know survive as `Other` so they can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    Enquire,
    Preauthorize,
    PreauthorizeEnquiry,
    Accept,
    Decline,
    AutoDecline,
    Expire,
    Cancel,
    MarkDelivered,
    ReviewByProviderFirst,
    ReviewByProviderSecond,
    ReviewByCustomerFirst,
    ReviewByCustomerSecond,
    ExpireReviewPeriod,
    Other(String),
}

impl TransitionKind {
    /// Wire name without the `transition/` prefix.
    pub fn name(&self) -> &str {
        match self {
            TransitionKind::Enquire => "enquire",
            TransitionKind::Preauthorize => "preauthorize",
            TransitionKind::PreauthorizeEnquiry => "preauthorize-enquiry",
            TransitionKind::Accept => "accept",
            TransitionKind::Decline => "decline",
            TransitionKind::AutoDecline => "auto-decline",
            TransitionKind::Expire => "expire",
            TransitionKind::Cancel => "cancel",
            TransitionKind::MarkDelivered => "mark-delivered",
            TransitionKind::ReviewByProviderFirst => "review-1-by-provider",
            TransitionKind::ReviewByProviderSecond => "review-2-by-provider",
            TransitionKind::ReviewByCustomerFirst => "review-1-by-customer",
            TransitionKind::ReviewByCustomerSecond => "review-2-by-customer",
            TransitionKind::ExpireReviewPeriod => "expire-review-period",
            TransitionKind::Other(raw) => raw.strip_prefix(TRANSITION_PREFIX).unwrap_or(raw),
        }
    }

    /// Any of the four review submissions.
    pub fn is_review(&self) -> bool {
        self.review_author().is_some()
    }

    /// Party whose review is submitted by this transition.
    pub fn review_author(&self) -> Option<TransitionActor> {
        match self {
            TransitionKind::ReviewByCustomerFirst | TransitionKind::ReviewByCustomerSecond => {
                Some(TransitionActor::Customer)
            }
            TransitionKind::ReviewByProviderFirst | TransitionKind::ReviewByProviderSecond => {
                Some(TransitionActor::Provider)
            }
            _ => None,
        }
    }

    /// The first-review transition performed by `actor`.
    pub fn first_review_by(actor: TransitionActor) -> Self {
        match actor {
            TransitionActor::Customer => TransitionKind::ReviewByCustomerFirst,
            TransitionActor::Provider => TransitionKind::ReviewByProviderFirst,
        }
    }
}

impl From<String> for TransitionKind {
    fn from(raw: String) -> Self {
        let name = raw.strip_prefix(TRANSITION_PREFIX).unwrap_or(&raw);
        match name {
            "enquire" => TransitionKind::Enquire,
            "preauthorize" => TransitionKind::Preauthorize,
            "preauthorize-enquiry" => TransitionKind::PreauthorizeEnquiry,
            "accept" => TransitionKind::Accept,
            "decline" => TransitionKind::Decline,
            "auto-decline" => TransitionKind::AutoDecline,
            "expire" => TransitionKind::Expire,
            "cancel" => TransitionKind::Cancel,
            "mark-delivered" => TransitionKind::MarkDelivered,
            "review-1-by-provider" => TransitionKind::ReviewByProviderFirst,
            "review-2-by-provider" => TransitionKind::ReviewByProviderSecond,
            "review-1-by-customer" => TransitionKind::ReviewByCustomerFirst,
            "review-2-by-customer" => TransitionKind::ReviewByCustomerSecond,
            "expire-review-period" => TransitionKind::ExpireReviewPeriod,
            _ => TransitionKind::Other(raw),
        }
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Other(raw) => raw,
            known => format!("{TRANSITION_PREFIX}{}", known.name()),
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Other(raw) => f.write_str(raw),
            known => write!(f, "{TRANSITION_PREFIX}{}", known.name()),
        }
    }
}

/// True once both parties have reviewed (the last transition is a second review).
pub fn are_reviews_completed(last: &TransitionKind) -> bool {
    matches!(
        last,
        TransitionKind::ReviewByProviderSecond | TransitionKind::ReviewByCustomerSecond
    )
}

/// One step in the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub transition: TransitionKind,
    pub by: TransitionActor,
    pub at: DateTime<Utc>,
}

/// Whole stars, 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn value(self) -> u8 {
        self.0
    }

    /// Filled flag per star position, left to right.
    pub fn stars(self) -> [bool; MAX_STARS as usize] {
        let mut stars = [false; MAX_STARS as usize];
        for star in stars.iter_mut().take(self.0 as usize) {
            *star = true;
        }
        stars
    }
}

impl TryFrom<u8> for Rating {
    type Error = FeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(FeedError::InvalidRating(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author_id: UserId,
    pub content: String,
    pub rating: Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// A customer/provider transaction with everything the feed needs.
///
/// Every field may be missing from an API response. Related resources and
/// the last transition stay `None`, everything else defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub customer: Option<User>,
    #[serde(default)]
    pub provider: Option<User>,
    #[serde(default)]
    pub listing: Option<Listing>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// `None` counts as neither delivered nor reviewed.
    #[serde(default)]
    pub last_transition: Option<TransitionKind>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Transaction {
    /// First review written by `author`.
    pub fn review_by(&self, author: &UserId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.author_id == author)
    }
}
