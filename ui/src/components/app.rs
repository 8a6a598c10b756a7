use dioxus::prelude::*;

use tradefeed_common::i18n::Catalog;
use tradefeed_common::FeedInput;

use super::activity_feed::ActivityFeed;

/// Snapshot shown until the host wires in live transaction data.
const SAMPLE_FEED: &str = include_str!("../../../tools/tradefeed-render/fixtures/sample.json");

#[component]
pub fn App() -> Element {
    use_context_provider(Catalog::default);
    let mut review_modal_open = use_signal(|| false);

    let input: FeedInput = match serde_json::from_str(SAMPLE_FEED) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to parse sample feed: {e}");
            return rsx! {
                p { class: "empty-state", "Could not load the activity feed." }
            };
        }
    };
    let listing_title = input
        .transaction
        .listing
        .as_ref()
        .map(|l| l.title.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "tradefeed-app",
            header { class: "app-header",
                h1 { "{listing_title}" }
            }
            ActivityFeed {
                input,
                on_show_older_messages: move |_| {
                    tracing::info!("Older messages requested");
                },
                on_open_review_modal: move |_| review_modal_open.set(true),
            }
            if review_modal_open() {
                div { class: "review-modal",
                    p { "Reviews are submitted from the transaction page." }
                    button {
                        onclick: move |_| review_modal_open.set(false),
                        "Close"
                    }
                }
            }
        }
    }
}
