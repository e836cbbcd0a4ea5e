//! # Checkout
//!
//! Turns the current cart into an invoice record.
//!
//! ```text
//! Cart [A×2 @10.000, B×1 @5.000]
//!      │
//!      ▼
//! checkout(&cart, now)
//!      │  empty?    → CoreError::EmptyCart
//!      │  overflow? → CoreError::AmountOverflow
//!      ▼
//! Invoice { id: "invoice_2024-05-01T08:30:00.123Z", total: 25.000, items: copy }
//! ```
//!
//! The invoice holds its own copy of the lines, so clearing or editing the
//! cart afterwards does not change it. Persisting the invoice and clearing
//! the cart are the caller's job.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Invoice;
use crate::INVOICE_KEY_PREFIX;

/// Identifier (and storage key) of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceId(String);

impl InvoiceId {
    /// `invoice_` + the instant as ISO-8601 UTC with millisecond precision.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use scanpos_core::checkout::InvoiceId;
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    /// assert_eq!(InvoiceId::for_instant(at).as_str(), "invoice_2024-05-01T08:30:00.000Z");
    /// ```
    pub fn for_instant(at: DateTime<Utc>) -> Self {
        InvoiceId(format!(
            "{}{}",
            INVOICE_KEY_PREFIX,
            at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ))
    }

    /// Same id with `-<suffix>` appended.
    ///
    /// Used when another invoice already occupies the key generated for the
    /// same millisecond. The prefix is kept so the record still lists as an
    /// invoice, and the timestamp part still sorts in creation order.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        InvoiceId(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for InvoiceId {
    fn from(id: String) -> Self {
        InvoiceId(id)
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `Σ standard_price × quantity` over the cart.
pub fn cart_total(cart: &Cart) -> CoreResult<Money> {
    cart.total().ok_or_else(|| CoreError::AmountOverflow {
        context: "cart total".to_string(),
    })
}

/// Builds the invoice for the current cart.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] if there is nothing to sell
/// - [`CoreError::AmountOverflow`] if the total does not fit in `Money`
pub fn checkout(cart: &Cart, now: DateTime<Utc>) -> CoreResult<Invoice> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let total = cart_total(cart)?;

    Ok(Invoice {
        id: InvoiceId::for_instant(now).into_string(),
        created_at: now,
        items: cart.items().to_vec(),
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
