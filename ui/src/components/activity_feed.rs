use chrono::Utc;
use dioxus::prelude::*;

use tradefeed_common::describe::ReviewView;
use tradefeed_common::i18n::{Catalog, Segment};
use tradefeed_common::render::{AvatarView, MessageStyle, MessageView, TransitionView};
use tradefeed_common::transaction::{Rating, MAX_STARS};
use tradefeed_common::{render_feed, FeedAction, FeedEntry, FeedError, FeedInput};

/// Chronological feed of messages and transaction transitions.
///
/// Reads the `Catalog` from context when one is provided, otherwise uses the
/// built-in English text.
#[component]
pub fn ActivityFeed(
    input: FeedInput,
    on_show_older_messages: EventHandler<()>,
    on_open_review_modal: EventHandler<()>,
) -> Element {
    let catalog = try_use_context::<Catalog>().unwrap_or_default();
    let feed = render_feed(&input, &catalog, Utc::now());

    for diagnostic in &feed.diagnostics {
        match diagnostic {
            FeedError::UnknownTransition { transition } => {
                tracing::error!(
                    transition_type = %transition,
                    "Unknown transaction transition type"
                );
            }
            other => tracing::warn!("Activity feed: {other}"),
        }
    }

    let dispatch = move |action: FeedAction| match action {
        FeedAction::ShowOlderMessages => on_show_older_messages.call(()),
        FeedAction::OpenReviewModal => on_open_review_modal.call(()),
    };

    rsx! {
        ul { class: "activity-feed",
            for (idx, entry) in feed.entries.into_iter().enumerate() {
                {match entry {
                    FeedEntry::ShowOlder { label, action } => rsx! {
                        li { class: "show-older-wrapper", key: "show-older-messages",
                            button {
                                class: "inline-text-button show-older-button",
                                onclick: move |_| dispatch(action),
                                "{label}"
                            }
                        }
                    },
                    FeedEntry::Message(view) => {
                        let dom_id = view.dom_id.clone();
                        rsx! {
                            li { class: "message-item", id: "{dom_id}", key: "{dom_id}",
                                FeedMessage { view }
                            }
                        }
                    }
                    FeedEntry::Transition(view) => rsx! {
                        li { class: "transition-item", key: "transition-{idx}",
                            FeedTransition { view, on_action: dispatch }
                        }
                    },
                    FeedEntry::EmptyTransition => rsx! {
                        li { class: "transition-item", key: "transition-{idx}",
                            EmptyTransition {}
                        }
                    },
                }}
            }
        }
    }
}

#[component]
fn FeedMessage(view: MessageView) -> Element {
    match view.style {
        MessageStyle::Own => rsx! {
            div { class: "own-message",
                div { class: "own-message-content-wrapper",
                    p { class: "own-message-content", "{view.content}" }
                }
                p { class: "own-message-date", "{view.date}" }
            }
        },
        MessageStyle::Counterpart => rsx! {
            div { class: "message",
                {view.avatar.clone().map(|avatar| rsx! { Avatar { avatar } })}
                div {
                    p { class: "message-content", "{view.content}" }
                    p { class: "message-date", "{view.date}" }
                }
            }
        },
    }
}

#[component]
fn Avatar(avatar: AvatarView) -> Element {
    rsx! {
        div { class: "avatar", title: "{avatar.display_name}",
            span { class: "avatar-initials", "{avatar.initials}" }
        }
    }
}

#[component]
fn FeedTransition(view: TransitionView, on_action: EventHandler<FeedAction>) -> Element {
    rsx! {
        div { class: "transition",
            div { class: "bullet",
                p { class: "transition-content", "•" }
            }
            div {
                p { class: "transition-content",
                    for segment in view.segments.iter().cloned() {
                        {match segment {
                            Segment::Text { text } => rsx! { "{text}" },
                            Segment::Link { label, action } => rsx! {
                                button {
                                    class: "inline-text-button",
                                    onclick: move |_| on_action.call(action),
                                    "{label}"
                                }
                            },
                        }}
                    }
                }
                p { class: "transition-date", "{view.date}" }
                {view.review.clone().map(|review| rsx! { Review { review } })}
            }
        }
    }
}

#[component]
fn Review(review: ReviewView) -> Element {
    rsx! {
        div {
            p { class: "review-content", "{review.content}" }
            ReviewRating { rating: review.rating }
        }
    }
}

#[component]
fn ReviewRating(rating: Rating) -> Element {
    let stars = rating.stars();
    let value = rating.value();
    rsx! {
        span { class: "review-stars", title: "{value}/{MAX_STARS}",
            for (idx, filled) in stars.into_iter().enumerate() {
                {
                    let class = if filled { "review-star filled" } else { "review-star" };
                    rsx! {
                        span { key: "{idx}", class: "{class}", "★" }
                    }
                }
            }
        }
    }
}

#[component]
fn EmptyTransition() -> Element {
    rsx! {
        div { class: "transition",
            div { class: "bullet",
                p { class: "transition-content", "•" }
            }
            div {
                p { class: "transition-content" }
                p { class: "transition-date" }
            }
        }
    }
}
