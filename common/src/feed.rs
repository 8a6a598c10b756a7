use chrono::{DateTime, Utc};

use crate::message::Message;
use crate::transaction::{Transition, TransitionKind};

/// A message or a transition placed in the merged, time-ordered feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedItem<'a> {
    Message(&'a Message),
    Transition(&'a Transition),
}

impl FeedItem<'_> {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            FeedItem::Message(m) => m.at,
            FeedItem::Transition(t) => t.at,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, FeedItem::Message(_))
    }
}

/// Merge messages and transitions into one list ordered by time.
///
/// Messages come before transitions in the concatenation, so on equal
/// timestamps a message stays ahead of a transition (the sort is stable).
/// With `hide_old_transitions` every item before the first message is dropped:
/// older messages exist that are not loaded, and transitions from that
/// unseen stretch would be misleading.
pub fn organize_items<'a>(
    messages: &'a [Message],
    transitions: &'a [Transition],
    hide_old_transitions: bool,
) -> Vec<FeedItem<'a>> {
    let mut items: Vec<FeedItem<'a>> = messages
        .iter()
        .map(FeedItem::Message)
        .chain(transitions.iter().map(FeedItem::Transition))
        .collect();
    items.sort_by_key(|item| item.at());

    if hide_old_transitions {
        let first_message = items
            .iter()
            .position(|item| item.is_message())
            .unwrap_or(items.len());
        items.drain(..first_message);
    }
    items
}

/// Transitions that get an entry in the feed. Everything else is skipped silently.
pub fn should_render_transition(kind: &TransitionKind) -> bool {
    matches!(
        kind,
        TransitionKind::Preauthorize
            | TransitionKind::PreauthorizeEnquiry
            | TransitionKind::Accept
            | TransitionKind::Decline
            | TransitionKind::AutoDecline
            | TransitionKind::Cancel
            | TransitionKind::MarkDelivered
            | TransitionKind::ReviewByProviderFirst
            | TransitionKind::ReviewByProviderSecond
            | TransitionKind::ReviewByCustomerFirst
            | TransitionKind::ReviewByCustomerSecond
    )
}
