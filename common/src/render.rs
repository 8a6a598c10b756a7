use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::describe::{describe_transition, Participants, ReviewView};
use crate::error::FeedError;
use crate::feed::{organize_items, should_render_transition, FeedItem};
use crate::i18n::{keys, Catalog, Segment};
use crate::identity::User;
use crate::message::Message;
use crate::transaction::{Transaction, Transition};

/// User interactions the feed can trigger. The host wires these to its own handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedAction {
    ShowOlderMessages,
    OpenReviewModal,
}

/// Everything the feed is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedInput {
    #[serde(default)]
    pub current_user: Option<User>,
    #[serde(default)]
    pub transaction: Transaction,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_older_messages: bool,
    #[serde(default)]
    pub fetch_messages_in_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStyle {
    /// Sent by the viewer; drawn right-aligned without an avatar.
    Own,
    Counterpart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarView {
    pub initials: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    /// Anchor id so the host can scroll to a message.
    pub dom_id: String,
    pub style: MessageStyle,
    pub avatar: Option<AvatarView>,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionView {
    pub segments: Vec<Segment>,
    pub date: String,
    pub review: Option<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEntry {
    ShowOlder { label: String, action: FeedAction },
    Message(MessageView),
    Transition(TransitionView),
    /// Keeps the transition's slot when the transaction is too incomplete to phrase it.
    EmptyTransition,
}

/// Display-ready feed plus whatever went wrong while building it.
#[derive(Debug, Serialize)]
pub struct RenderedFeed {
    pub entries: Vec<FeedEntry>,
    #[serde(serialize_with = "serialize_diagnostics")]
    pub diagnostics: Vec<FeedError>,
}

fn serialize_diagnostics<S: Serializer>(
    diagnostics: &[FeedError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(diagnostics.iter().map(ToString::to_string))
}

pub fn render_message(
    message: &Message,
    viewer: Option<&User>,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> MessageView {
    let own = viewer.is_some_and(|v| message.is_sent_by(&v.id));
    let avatar = if own {
        None
    } else {
        Some(match &message.sender {
            Some(sender) => AvatarView {
                initials: sender.initials(),
                display_name: sender.display_name.clone(),
            },
            None => AvatarView {
                initials: String::new(),
                display_name: String::new(),
            },
        })
    };

    MessageView {
        dom_id: format!("msg-{}", message.id),
        style: if own {
            MessageStyle::Own
        } else {
            MessageStyle::Counterpart
        },
        avatar,
        content: message.content.clone(),
        date: catalog.format_date(message.at, now),
    }
}

fn render_transition(
    transition: &Transition,
    participants: Option<&Participants<'_>>,
    transaction: &Transaction,
    catalog: &Catalog,
    now: DateTime<Utc>,
    diagnostics: &mut Vec<FeedError>,
) -> FeedEntry {
    let Some(participants) = participants else {
        return FeedEntry::EmptyTransition;
    };
    let description =
        describe_transition(transition, participants, transaction, catalog, diagnostics);
    FeedEntry::Transition(TransitionView {
        segments: description.segments,
        date: catalog.format_date(transition.at, now),
        review: description.review,
    })
}

/// Build the feed for `input` as seen by its current user at time `now`.
pub fn render_feed(input: &FeedInput, catalog: &Catalog, now: DateTime<Utc>) -> RenderedFeed {
    let mut diagnostics = Vec::new();
    let transaction = &input.transaction;
    let viewer = input.current_user.as_ref();

    let participants = match Participants::resolve(viewer.map(|v| &v.id), transaction) {
        Ok(p) => Some(p),
        Err(err) => {
            if !transaction.transitions.is_empty() {
                diagnostics.push(err);
            }
            None
        }
    };

    let mut entries = Vec::new();
    if input.has_older_messages {
        entries.push(FeedEntry::ShowOlder {
            label: catalog.format(keys::SHOW_OLDER_MESSAGES, &[]),
            action: FeedAction::ShowOlderMessages,
        });
    }

    let hide_old_transitions = input.has_older_messages || input.fetch_messages_in_progress;
    for item in organize_items(&input.messages, &transaction.transitions, hide_old_transitions) {
        match item {
            FeedItem::Message(message) => {
                entries.push(FeedEntry::Message(render_message(message, viewer, catalog, now)));
            }
            FeedItem::Transition(transition) => {
                if !should_render_transition(&transition.transition) {
                    continue;
                }
                entries.push(render_transition(
                    transition,
                    participants.as_ref(),
                    transaction,
                    catalog,
                    now,
                    &mut diagnostics,
                ));
            }
        }
    }

    RenderedFeed {
        entries,
        diagnostics,
    }
}
