use serde::Serialize;

use crate::error::FeedError;
use crate::i18n::{keys, Catalog, Segment};
use crate::identity::{TransitionActor, User, UserId};
use crate::render::FeedAction;
use crate::transaction::{are_reviews_completed, Rating, Transaction, Transition, TransitionKind};

/// Everything a transition needs to be phrased from the viewer's side.
///
/// Resolving this up front replaces scattered "is the user loaded" checks:
/// either the viewer, both parties, and the listing are known, or transitions
/// render as placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Participants<'a> {
    pub role: TransitionActor,
    pub customer: &'a User,
    pub provider: &'a User,
    pub listing_title: &'a str,
    pub last_transition: Option<&'a TransitionKind>,
}

impl<'a> Participants<'a> {
    pub fn resolve(
        viewer: Option<&UserId>,
        transaction: &'a Transaction,
    ) -> Result<Self, FeedError> {
        let viewer = viewer.ok_or(FeedError::IncompleteTransaction("current user"))?;
        let customer = transaction
            .customer
            .as_ref()
            .ok_or(FeedError::IncompleteTransaction("customer"))?;
        let provider = transaction
            .provider
            .as_ref()
            .ok_or(FeedError::IncompleteTransaction("provider"))?;
        let listing = transaction
            .listing
            .as_ref()
            .ok_or(FeedError::IncompleteTransaction("listing"))?;

        let role = if *viewer == customer.id {
            TransitionActor::Customer
        } else {
            TransitionActor::Provider
        };

        Ok(Self {
            role,
            customer,
            provider,
            listing_title: &listing.title,
            last_transition: transaction.last_transition.as_ref(),
        })
    }

    pub fn party(&self, actor: TransitionActor) -> &'a User {
        match actor {
            TransitionActor::Customer => self.customer,
            TransitionActor::Provider => self.provider,
        }
    }

    /// Display name of whoever is not viewing.
    pub fn counterpart_name(&self) -> &'a str {
        &self.party(self.role.counterpart()).display_name
    }
}

/// True when the viewer has no review left to write: they reviewed first, or both are done.
///
/// An unknown last transition means nothing has been reviewed yet.
pub fn has_user_left_a_review_first(role: TransitionActor, last: Option<&TransitionKind>) -> bool {
    last.is_some_and(|last| {
        *last == TransitionKind::first_review_by(role) || are_reviews_completed(last)
    })
}

/// A submitted review shown under its transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub content: String,
    pub rating: Rating,
}

/// Phrasing of one transition plus the review it carries, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransitionDescription {
    pub segments: Vec<Segment>,
    pub review: Option<ReviewView>,
}

/// Phrase `transition` for the viewer in `participants`.
///
/// Never fails: anomalies are pushed onto `diagnostics` and the affected
/// part of the description is left empty.
pub fn describe_transition(
    transition: &Transition,
    participants: &Participants<'_>,
    transaction: &Transaction,
    catalog: &Catalog,
    diagnostics: &mut Vec<FeedError>,
) -> TransitionDescription {
    let segments = match transition_message(transition, participants, catalog) {
        Ok(segments) => segments,
        Err(err) => {
            diagnostics.push(err);
            Vec::new()
        }
    };

    let review = match review_for(transition, participants, transaction) {
        Ok(review) => review,
        Err(err) => {
            diagnostics.push(err);
            None
        }
    };

    TransitionDescription { segments, review }
}

fn transition_message(
    transition: &Transition,
    participants: &Participants<'_>,
    catalog: &Catalog,
) -> Result<Vec<Segment>, FeedError> {
    let own = transition.by == participants.role;
    let role = participants.role;
    let last = participants.last_transition;
    let display_name = Segment::text(participants.counterpart_name());
    let listing_title = Segment::text(participants.listing_title);

    let review_link = |id: &str| Segment::Link {
        label: catalog.format(id, &[("displayName", participants.counterpart_name())]),
        action: FeedAction::OpenReviewModal,
    };

    let segments = match &transition.transition {
        TransitionKind::Preauthorize | TransitionKind::PreauthorizeEnquiry => {
            if own {
                catalog.format_rich(
                    keys::OWN_TRANSITION_REQUEST,
                    &[("listingTitle", listing_title)],
                )
            } else {
                catalog.format_rich(
                    keys::TRANSITION_REQUEST,
                    &[("displayName", display_name), ("listingTitle", listing_title)],
                )
            }
        }
        TransitionKind::Accept => {
            if own {
                catalog.format_rich(keys::OWN_TRANSITION_ACCEPT, &[])
            } else {
                catalog.format_rich(keys::TRANSITION_ACCEPT, &[("displayName", display_name)])
            }
        }
        TransitionKind::Decline => {
            if own {
                catalog.format_rich(keys::OWN_TRANSITION_DECLINE, &[])
            } else {
                catalog.format_rich(keys::TRANSITION_DECLINE, &[])
            }
        }
        // Performed by the system on the provider's behalf.
        TransitionKind::AutoDecline => {
            if role == TransitionActor::Provider {
                catalog.format_rich(keys::OWN_TRANSITION_AUTO_DECLINE, &[])
            } else {
                catalog.format_rich(
                    keys::TRANSITION_AUTO_DECLINE,
                    &[("displayName", display_name)],
                )
            }
        }
        TransitionKind::Cancel => catalog.format_rich(keys::TRANSITION_CANCEL, &[]),
        TransitionKind::MarkDelivered => {
            let delivered = last == Some(&TransitionKind::MarkDelivered);
            let mut values = Vec::new();
            if delivered || !has_user_left_a_review_first(role, last) {
                values.push(("reviewLink", review_link(keys::LEAVE_A_REVIEW)));
            }
            catalog.format_rich(keys::TRANSITION_COMPLETE, &values)
        }
        TransitionKind::ReviewByProviderFirst | TransitionKind::ReviewByCustomerFirst => {
            if own {
                catalog.format_rich(keys::OWN_TRANSITION_REVIEW, &[("displayName", display_name)])
            } else {
                let mut values = vec![("displayName", display_name)];
                if !has_user_left_a_review_first(role, last) {
                    values.push(("reviewLink", review_link(keys::LEAVE_A_REVIEW_SECOND)));
                }
                catalog.format_rich(keys::TRANSITION_REVIEW, &values)
            }
        }
        TransitionKind::ReviewByProviderSecond | TransitionKind::ReviewByCustomerSecond => {
            if own {
                catalog.format_rich(keys::OWN_TRANSITION_REVIEW, &[("displayName", display_name)])
            } else {
                catalog.format_rich(keys::TRANSITION_REVIEW, &[("displayName", display_name)])
            }
        }
        other => {
            return Err(FeedError::UnknownTransition {
                transition: other.to_string(),
            })
        }
    };
    Ok(segments)
}

fn review_for(
    transition: &Transition,
    participants: &Participants<'_>,
    transaction: &Transaction,
) -> Result<Option<ReviewView>, FeedError> {
    let Some(author) = transition.transition.review_author() else {
        return Ok(None);
    };
    if !participants.last_transition.is_some_and(|last| are_reviews_completed(last)) {
        return Ok(None);
    }
    let review = transaction
        .review_by(&participants.party(author).id)
        .ok_or(FeedError::MissingReview { author })?;
    Ok(Some(ReviewView {
        content: review.content.clone(),
        rating: review.rating,
    }))
}
