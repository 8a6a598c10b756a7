use std::fmt::{self, Write};

use tradefeed_common::i18n::Segment;
use tradefeed_common::render::{MessageStyle, MessageView, TransitionView};
use tradefeed_common::{FeedEntry, RenderedFeed};

const STAR_FILLED: char = '★';
const STAR_EMPTY: char = '☆';

/// One line per entry. Links are bracketed, own messages are marked with `>`.
pub fn to_text(feed: &RenderedFeed) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_feed(&mut out, feed)?;
    Ok(out)
}

fn write_feed(out: &mut impl Write, feed: &RenderedFeed) -> fmt::Result {
    for entry in &feed.entries {
        match entry {
            FeedEntry::ShowOlder { label, .. } => writeln!(out, "[{label}]")?,
            FeedEntry::Message(message) => write_message(out, message)?,
            FeedEntry::Transition(transition) => write_transition(out, transition)?,
            FeedEntry::EmptyTransition => writeln!(out, "  •")?,
        }
    }
    Ok(())
}

fn write_message(out: &mut impl Write, message: &MessageView) -> fmt::Result {
    let who = match (message.style, &message.avatar) {
        (MessageStyle::Own, _) => ">",
        (MessageStyle::Counterpart, Some(avatar)) if !avatar.initials.is_empty() => {
            avatar.initials.as_str()
        }
        (MessageStyle::Counterpart, _) => "?",
    };
    writeln!(out, "{who:>3} {}  ({})", message.content, message.date)
}

fn write_transition(out: &mut impl Write, transition: &TransitionView) -> fmt::Result {
    write!(out, "  • ")?;
    for segment in &transition.segments {
        match segment {
            Segment::Text { text } => out.write_str(text)?,
            Segment::Link { label, .. } => write!(out, "[{label}]")?,
        }
    }
    writeln!(out, "  ({})", transition.date)?;
    if let Some(review) = &transition.review {
        let stars: String = review
            .rating
            .stars()
            .iter()
            .map(|&filled| if filled { STAR_FILLED } else { STAR_EMPTY })
            .collect();
        writeln!(out, "    {stars} {}", review.content)?;
    }
    Ok(())
}
