use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use tradefeed_common::i18n::{plain_text, Catalog, Segment};
use tradefeed_common::render::MessageStyle;
use tradefeed_common::{render_feed, FeedAction, FeedEntry, FeedError, FeedInput};

const CUSTOMER: &str = "5a1f0c1e-0000-4000-8000-000000000001";
const PROVIDER: &str = "5a1f0c1e-0000-4000-8000-000000000002";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
}

fn input(viewer: &str, last: &str, has_older: bool) -> FeedInput {
    serde_json::from_value(json!({
        "current_user": { "id": viewer, "display_name": "Viewer" },
        "transaction": {
            "id": "tx-42",
            "customer": { "id": CUSTOMER, "display_name": "Carla Customer" },
            "provider": { "id": PROVIDER, "display_name": "Pete Provider" },
            "listing": { "id": "listing-7", "title": "Canoe" },
            "last_transition": last,
            "transitions": [
                { "transition": "transition/enquire",
                  "by": "customer", "at": "2024-03-01T08:00:00Z" },
                { "transition": "transition/preauthorize",
                  "by": "customer", "at": "2024-03-01T09:00:00Z" },
                { "transition": "transition/accept",
                  "by": "provider", "at": "2024-03-01T11:00:00Z" },
                { "transition": "transition/mark-delivered",
                  "by": "provider", "at": "2024-03-05T10:00:00Z" },
                { "transition": "transition/review-1-by-customer",
                  "by": "customer", "at": "2024-03-06T10:00:00Z" },
                { "transition": "transition/review-2-by-provider",
                  "by": "provider", "at": "2024-03-07T10:00:00Z" }
            ],
            "reviews": [
                { "author_id": CUSTOMER, "content": "Great canoe", "rating": 5 },
                { "author_id": PROVIDER, "content": "Brought it back dry", "rating": 4 }
            ]
        },
        "messages": [
            { "id": "m1", "sender": { "id": CUSTOMER, "display_name": "Carla Customer" },
              "content": "Is it still available?", "at": "2024-03-01T10:00:00Z" },
            { "id": "m2", "sender": { "id": PROVIDER, "display_name": "Pete Provider" },
              "content": "Yes!", "at": "2024-03-10T09:15:00Z" }
        ],
        "has_older_messages": has_older,
        "fetch_messages_in_progress": false
    }))
    .unwrap()
}

fn describe(entry: &FeedEntry) -> String {
    match entry {
        FeedEntry::ShowOlder { .. } => "older".into(),
        FeedEntry::Message(m) => m.dom_id.clone(),
        FeedEntry::Transition(t) => plain_text(&t.segments),
        FeedEntry::EmptyTransition => "empty".into(),
    }
}

#[test]
fn full_history_for_customer() {
    let feed = render_feed(
        &input(CUSTOMER, "transition/review-2-by-provider", false),
        &Catalog::default(),
        now(),
    );
    assert!(feed.diagnostics.is_empty(), "{:?}", feed.diagnostics);

    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(
        lines,
        [
            "You requested to book Canoe.",
            "msg-m1",
            "Pete Provider accepted the booking request.",
            "The booking was completed.",
            "You left a review for Pete Provider.",
            "Pete Provider left you a review.",
            "msg-m2",
        ]
    );

    let FeedEntry::Transition(own_review) = &feed.entries[4] else {
        panic!("expected transition");
    };
    let review = own_review.review.as_ref().unwrap();
    assert_eq!(review.content, "Great canoe");
    assert_eq!(review.rating.stars(), [true; 5]);

    let FeedEntry::Message(first) = &feed.entries[1] else {
        panic!("expected message");
    };
    assert_eq!(first.style, MessageStyle::Own);
    assert_eq!(first.date, "3/1/2024, 10:00 AM");

    let FeedEntry::Message(last) = &feed.entries[6] else {
        panic!("expected message");
    };
    assert_eq!(last.style, MessageStyle::Counterpart);
    assert_eq!(last.date, "Today, 9:15 AM");
}

#[test]
fn provider_invited_after_customer_reviews_first() {
    let feed = render_feed(
        &input(PROVIDER, "transition/review-1-by-customer", false),
        &Catalog::default(),
        now(),
    );
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines[0], "Carla Customer requested to book Canoe.");
    assert_eq!(lines[2], "You accepted the booking request.");
    assert_eq!(
        lines[3],
        "The booking was completed. Leave a review for Carla Customer."
    );
    assert_eq!(
        lines[4],
        "Carla Customer left you a review. Leave a review for Carla Customer to see their review."
    );

    let FeedEntry::Transition(review) = &feed.entries[4] else {
        panic!("expected transition");
    };
    // Reviews stay hidden until both are in.
    assert!(review.review.is_none());
    assert!(review.segments.iter().any(|s| matches!(
        s,
        Segment::Link {
            action: FeedAction::OpenReviewModal,
            ..
        }
    )));
}

#[test]
fn older_messages_hide_leading_transitions() {
    let mut input = input(CUSTOMER, "transition/accept", true);
    input.messages.remove(0);
    input.transaction.transitions.truncate(3);

    let feed = render_feed(&input, &Catalog::default(), now());
    assert!(matches!(
        &feed.entries[0],
        FeedEntry::ShowOlder {
            action: FeedAction::ShowOlderMessages,
            ..
        }
    ));
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines, ["older", "msg-m2"]);
}

#[test]
fn fetch_in_progress_also_hides_leading_transitions() {
    let mut input = input(CUSTOMER, "transition/accept", false);
    input.fetch_messages_in_progress = true;
    input.messages.remove(0);
    input.transaction.transitions.truncate(3);

    let feed = render_feed(&input, &Catalog::default(), now());
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines, ["msg-m2"]);
}

#[test]
fn incomplete_transaction_renders_placeholders() {
    let mut input = input(CUSTOMER, "transition/accept", false);
    input.transaction.provider = None;
    input.transaction.transitions.truncate(3);

    let feed = render_feed(&input, &Catalog::default(), now());
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines, ["empty", "msg-m1", "empty", "msg-m2"]);
    assert!(matches!(
        feed.diagnostics.as_slice(),
        [FeedError::IncompleteTransaction("provider")]
    ));
}

#[test]
fn no_viewer_still_renders_messages() {
    let mut input = input(CUSTOMER, "transition/accept", false);
    input.current_user = None;
    input.transaction.transitions.clear();

    let feed = render_feed(&input, &Catalog::default(), now());
    assert!(feed.diagnostics.is_empty());
    assert_eq!(feed.entries.len(), 2);
    assert!(feed.entries.iter().all(|e| matches!(
        e,
        FeedEntry::Message(m) if m.style == MessageStyle::Counterpart
    )));
}

#[test]
fn unrendered_and_unknown_transitions_are_skipped() {
    let mut input = input(CUSTOMER, "transition/accept", false);
    input.transaction.transitions = serde_json::from_value(json!([
        { "transition": "transition/expire",
          "by": "provider", "at": "2024-03-02T00:00:00Z" },
        { "transition": "transition/teleport",
          "by": "provider", "at": "2024-03-03T00:00:00Z" }
    ]))
    .unwrap();

    let feed = render_feed(&input, &Catalog::default(), now());
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines, ["msg-m1", "msg-m2"]);
    assert!(feed.diagnostics.is_empty());
}

#[test]
fn localized_catalog() {
    let catalog = Catalog::from_json(
        r#"{
            "messages": {
                "ActivityFeed.today": "Tänään",
                "ActivityFeed.transitionAccept": "{displayName} hyväksyi varauksen."
            },
            "time_format": "%H.%M"
        }"#,
    )
    .unwrap();
    let feed = render_feed(&input(CUSTOMER, "transition/accept", false), &catalog, now());
    let FeedEntry::Transition(accept) = &feed.entries[2] else {
        panic!("expected transition");
    };
    assert_eq!(plain_text(&accept.segments), "Pete Provider hyväksyi varauksen.");
    let FeedEntry::Message(last) = feed.entries.last().unwrap() else {
        panic!("expected message");
    };
    assert_eq!(last.date, "Tänään, 09.15");
}

#[test]
fn rendered_feed_serializes() {
    let feed = render_feed(
        &input(PROVIDER, "transition/mark-delivered", false),
        &Catalog::default(),
        now(),
    );
    let json = serde_json::to_value(&feed).unwrap();
    assert_eq!(json["entries"][0]["type"], "transition");
    assert_eq!(json["entries"][1]["type"], "message");
    assert_eq!(json["entries"][1]["dom_id"], "msg-m1");
    assert_eq!(json["entries"][3]["segments"][1]["kind"], "link");
    assert_eq!(json["entries"][3]["segments"][1]["action"], "open_review_modal");
}

#[test]
fn empty_transaction_still_renders() {
    let input: FeedInput = serde_json::from_value(json!({
        "current_user": { "id": CUSTOMER },
        "transaction": {},
        "messages": [
            { "id": "m1", "content": "Anyone there?", "at": "2024-03-10T09:15:00Z" }
        ]
    }))
    .unwrap();
    assert!(input.transaction.id.is_empty());
    assert!(input.transaction.last_transition.is_none());

    let feed = render_feed(&input, &Catalog::default(), now());
    let lines: Vec<String> = feed.entries.iter().map(describe).collect();
    assert_eq!(lines, ["msg-m1"]);
    assert!(feed.diagnostics.is_empty());

    let input: FeedInput = serde_json::from_str("{}").unwrap();
    assert!(render_feed(&input, &Catalog::default(), now()).entries.is_empty());
}

#[test]
fn missing_last_transition_keeps_review_links_and_hides_reviews() {
    let mut input = input(CUSTOMER, "transition/review-2-by-provider", false);
    input.transaction.last_transition = None;

    let feed = render_feed(&input, &Catalog::default(), now());
    assert!(feed.diagnostics.is_empty(), "{:?}", feed.diagnostics);
    let transitions: Vec<_> = feed
        .entries
        .iter()
        .filter_map(|e| match e {
            FeedEntry::Transition(t) => Some(t),
            _ => None,
        })
        .collect();
    assert!(transitions.iter().all(|t| t.review.is_none()));
    assert_eq!(
        plain_text(&transitions[2].segments),
        "The booking was completed. Leave a review for Pete Provider."
    );
}
