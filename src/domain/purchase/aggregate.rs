//! Purchase aggregate entity.
//!
//! # Design Decisions
//!
//! - **Money in cents**: the price paid is captured at checkout as `Price`
//! - **Soft discard**: refunds flip `is_active`, the record itself stays
//! - **Discard once**: a discarded purchase cannot be discarded again

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CompositionId, Price, PurchaseId, Timestamp, UserId};

use super::PurchaseError;

/// Purchase aggregate - a buyer's acquisition of one composition.
///
/// # Invariants
///
/// - An inactive purchase is excluded from ownership and popularity
/// - `discarded_at` is set iff `is_active` is false
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub buyer_id: UserId,
    pub composition_id: CompositionId,
    pub price_paid: Price,
    /// Opaque reference returned by the payment collaborator.
    pub payment_ref: String,
    pub purchased_at: Timestamp,
    pub is_active: bool,
    pub discarded_at: Option<Timestamp>,
}

impl Purchase {
    /// Create a new active purchase.
    pub fn create(
        id: PurchaseId,
        buyer_id: UserId,
        composition_id: CompositionId,
        price_paid: Price,
        payment_ref: impl Into<String>,
        purchased_at: Timestamp,
    ) -> Self {
        Self {
            id,
            buyer_id,
            composition_id,
            price_paid,
            payment_ref: payment_ref.into(),
            purchased_at,
            is_active: true,
            discarded_at: None,
        }
    }

    /// Deactivate this purchase (refund or discard).
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDiscarded` if the purchase is no longer active.
    pub fn discard(&mut self, at: Timestamp) -> Result<(), PurchaseError> {
        if !self.is_active {
            return Err(PurchaseError::already_discarded(self.id));
        }
        self.is_active = false;
        self.discarded_at = Some(at);
        Ok(())
    }

    /// Whether this purchase counts as ownership of `composition_id`.
    pub fn owns(&self, composition_id: &CompositionId) -> bool {
        self.is_active && &self.composition_id == composition_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Purchase {
        Purchase::create(
            PurchaseId::new(),
            UserId::new("buyer-1").unwrap(),
            CompositionId::new(),
            Price::from_cents(999).unwrap(),
            "pay_123",
            Timestamp::now(),
        )
    }

    #[test]
    fn new_purchase_is_active() {
        let purchase = sample();
        assert!(purchase.is_active);
        assert!(purchase.discarded_at.is_none());
        assert!(purchase.owns(&purchase.composition_id.clone()));
    }

    #[test]
    fn discard_deactivates_and_stamps() {
        let mut purchase = sample();
        let at = Timestamp::now();
        purchase.discard(at).unwrap();

        assert!(!purchase.is_active);
        assert_eq!(purchase.discarded_at, Some(at));
        assert!(!purchase.owns(&purchase.composition_id.clone()));
    }

    #[test]
    fn discard_twice_fails() {
        let mut purchase = sample();
        purchase.discard(Timestamp::now()).unwrap();

        let err = purchase.discard(Timestamp::now()).unwrap_err();
        assert!(matches!(err, PurchaseError::AlreadyDiscarded(id) if id == purchase.id));
    }

    #[test]
    fn owns_is_specific_to_composition() {
        let purchase = sample();
        assert!(!purchase.owns(&CompositionId::new()));
    }
}
