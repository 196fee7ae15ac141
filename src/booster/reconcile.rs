//! Reconcile a drawn hand against the user's game collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::{Card, Membership, Namespace, OwnedCard, UserId};
use crate::store::CollectionStore;

/// Grant every card of `hand` the user does not own yet and annotate each
/// card with its ownership after the grant.
///
/// A failed membership lookup is treated as an empty collection, so every
/// card is granted. A failed insert is logged and that card comes back with
/// `owned = false`; the rest of the hand is still processed. Repeated cards
/// within the hand are inserted at most once and share the first outcome.
/// Nothing is ever removed from the game collection.
pub fn reconcile<S: CollectionStore + ?Sized>(
    store: &S,
    user: &UserId,
    hand: Vec<Card>,
    now: DateTime<Utc>,
) -> Vec<OwnedCard> {
    let owned = match store.fetch_membership(user, Namespace::Game) {
        Ok(ids) => ids,
        Err(e) => {
            warn!(user_id = %user, error = %e, "game collection lookup failed, granting whole hand");
            Default::default()
        }
    };

    let mut outcomes: HashMap<String, bool> = HashMap::new();
    let mut annotated = Vec::with_capacity(hand.len());

    for card in hand {
        if owned.contains(&card.id) {
            annotated.push(OwnedCard {
                card,
                owned: true,
                newly_granted: false,
            });
            continue;
        }

        let granted = match outcomes.get(&card.id) {
            Some(&granted) => granted,
            None => {
                let membership = Membership::new(user, card.id.clone(), Namespace::Game, now);
                let granted = match store.insert_membership(&membership) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(user_id = %user, card_id = %card.id, error = %e, "failed to grant drawn card");
                        false
                    }
                };
                outcomes.insert(card.id.clone(), granted);
                granted
            }
        };

        annotated.push(OwnedCard {
            card,
            owned: granted,
            newly_granted: granted,
        });
    }

    annotated
}
