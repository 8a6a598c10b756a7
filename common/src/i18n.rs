//! Message catalog and date labels for the activity feed.
//!
//! Templates use `{name}` placeholders. A placeholder can be filled with plain
//! text or with a link, so a sentence like "The booking was completed. {reviewLink}"
//! keeps its word order in every language while the link stays clickable.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::render::FeedAction;

/// Message ids used by the feed.
pub mod keys {
    pub const TODAY: &str = "ActivityFeed.today";
    pub const SHOW_OLDER_MESSAGES: &str = "ActivityFeed.showOlderMessages";
    pub const OWN_TRANSITION_REQUEST: &str = "ActivityFeed.ownTransitionRequest";
    pub const TRANSITION_REQUEST: &str = "ActivityFeed.transitionRequest";
    pub const OWN_TRANSITION_ACCEPT: &str = "ActivityFeed.ownTransitionAccept";
    pub const TRANSITION_ACCEPT: &str = "ActivityFeed.transitionAccept";
    pub const OWN_TRANSITION_DECLINE: &str = "ActivityFeed.ownTransitionDecline";
    pub const TRANSITION_DECLINE: &str = "ActivityFeed.transitionDecline";
    pub const OWN_TRANSITION_AUTO_DECLINE: &str = "ActivityFeed.ownTransitionAutoDecline";
    pub const TRANSITION_AUTO_DECLINE: &str = "ActivityFeed.transitionAutoDecline";
    pub const TRANSITION_CANCEL: &str = "ActivityFeed.transitionCancel";
    pub const TRANSITION_COMPLETE: &str = "ActivityFeed.transitionComplete";
    pub const LEAVE_A_REVIEW: &str = "ActivityFeed.leaveAReview";
    pub const LEAVE_A_REVIEW_SECOND: &str = "ActivityFeed.leaveAReviewSecond";
    pub const OWN_TRANSITION_REVIEW: &str = "ActivityFeed.ownTransitionReview";
    pub const TRANSITION_REVIEW: &str = "ActivityFeed.transitionReview";
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (keys::TODAY, "Today"),
    (keys::SHOW_OLDER_MESSAGES, "Show older"),
    (keys::OWN_TRANSITION_REQUEST, "You requested to book {listingTitle}."),
    (keys::TRANSITION_REQUEST, "{displayName} requested to book {listingTitle}."),
    (keys::OWN_TRANSITION_ACCEPT, "You accepted the booking request."),
    (keys::TRANSITION_ACCEPT, "{displayName} accepted the booking request."),
    (keys::OWN_TRANSITION_DECLINE, "You declined the booking request."),
    (keys::TRANSITION_DECLINE, "The booking request was declined."),
    (keys::OWN_TRANSITION_AUTO_DECLINE, "You didn't respond to the booking request in time."),
    (
        keys::TRANSITION_AUTO_DECLINE,
        "{displayName} didn't respond to your booking request in time.",
    ),
    (keys::TRANSITION_CANCEL, "The booking was cancelled."),
    (keys::TRANSITION_COMPLETE, "The booking was completed. {reviewLink}"),
    (keys::LEAVE_A_REVIEW, "Leave a review for {displayName}."),
    (keys::LEAVE_A_REVIEW_SECOND, "Leave a review for {displayName} to see their review."),
    (keys::OWN_TRANSITION_REVIEW, "You left a review for {displayName}."),
    (keys::TRANSITION_REVIEW, "{displayName} left you a review. {reviewLink}"),
];

const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
const DEFAULT_TIME_FORMAT: &str = "%-I:%M %p";

/// A run of rendered text. Links carry the action to dispatch when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    Link { label: String, action: FeedAction },
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text { text } => text,
            Segment::Link { label, .. } => label,
        }
    }
}

/// Concatenated text of a segment run, links included.
pub fn plain_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::as_str).collect()
}

/// On-disk catalog shape. Every field is optional; omitted ones keep the defaults.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
    #[serde(default)]
    date_format: Option<String>,
    #[serde(default)]
    time_format: Option<String>,
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
}

/// Localized templates plus the date conventions of one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: HashMap<String, String>,
    date_format: String,
    time_format: String,
    offset: FixedOffset,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            offset: Utc.fix(),
        }
    }
}

impl Catalog {
    /// Load a JSON catalog on top of the built-in English one.
    pub fn from_json(json: &str) -> Result<Self, FeedError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::default();
        catalog.messages.extend(file.messages);
        if let Some(fmt) = file.date_format {
            catalog.date_format = checked_pattern(fmt)?;
        }
        if let Some(fmt) = file.time_format {
            catalog.time_format = checked_pattern(fmt)?;
        }
        if let Some(minutes) = file.utc_offset_minutes {
            catalog.offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or(FeedError::InvalidOffset(minutes))?;
        }
        Ok(catalog)
    }

    pub fn template(&self, id: &str) -> Option<&str> {
        self.messages.get(id).map(String::as_str)
    }

    /// Interpolate `id` with text-only values.
    pub fn format(&self, id: &str, values: &[(&str, &str)]) -> String {
        let values: Vec<(&str, Segment)> = values
            .iter()
            .map(|(name, value)| (*name, Segment::text(*value)))
            .collect();
        plain_text(&self.format_rich(id, &values))
    }

    /// Interpolate `id` with text or link values.
    ///
    /// An unknown id renders as the id itself. Placeholders with no value
    /// render empty; trailing whitespace left behind is trimmed.
    pub fn format_rich(&self, id: &str, values: &[(&str, Segment)]) -> Vec<Segment> {
        let template = self.template(id).unwrap_or(id);
        let mut out = Vec::new();
        let mut buf = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            buf.push_str(&rest[..open]);
            let name = &rest[open + 1..close];
            match values.iter().find(|(n, _)| *n == name) {
                Some((_, Segment::Text { text })) => buf.push_str(text),
                Some((_, link @ Segment::Link { .. })) => {
                    if !buf.is_empty() {
                        out.push(Segment::text(std::mem::take(&mut buf)));
                    }
                    out.push(link.clone());
                }
                None => {}
            }
            rest = &rest[close + 1..];
        }
        buf.push_str(rest);

        let tail = buf.trim_end();
        if !tail.is_empty() || out.is_empty() {
            out.push(Segment::text(tail));
        }
        out
    }

    /// "Today, 2:05 PM" for timestamps on the same local day as `now`, else "3/1/2024, 2:05 PM".
    pub fn format_date(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        let today = now.with_timezone(&self.offset).date_naive();
        let mut out = if local.date_naive() == today {
            self.format(keys::TODAY, &[])
        } else {
            try_format(&local, &self.date_format)
                .unwrap_or_else(|| local.format(DEFAULT_DATE_FORMAT).to_string())
        };
        let time = try_format(&local, &self.time_format)
            .unwrap_or_else(|| local.format(DEFAULT_TIME_FORMAT).to_string());
        out.push_str(", ");
        out.push_str(&time);
        out
    }
}

fn checked_pattern(pattern: String) -> Result<String, FeedError> {
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        return Err(FeedError::InvalidDateFormat(pattern));
    }
    Ok(pattern)
}

/// `None` when chrono cannot format `pattern`.
fn try_format(local: &DateTime<FixedOffset>, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", local.format(pattern)).ok()?;
    Some(out)
}
