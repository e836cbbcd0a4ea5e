//! # Validation Module
//!
//! Input checks for the add and edit forms.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form input (CLI flags, session prompt)                       │
//! │  └── parse_amount: "25,000" → Money(25000)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── required fields, lengths                                          │
//! │  ├── non-negative amounts                                              │
//! │  └── reserved `invoice_` prefix                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository                                                   │
//! │  └── duplicate id check (needs a store read)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before any storage call, except
//! [`StoredRecord`], which re-checks records as they are read back.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartItem, Invoice, NewProduct, Product};
use crate::{is_invoice_key, INVOICE_KEY_PREFIX};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product id (scanned code).
pub const MAX_PRODUCT_ID_LEN: usize = 128;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest accepted search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be blank
/// - At most 128 characters
/// - Must not start with `invoice_`, which would hide the product among
///   the invoices
///
/// ## Example
/// ```rust
/// use scanpos_core::validation::validate_product_id;
///
/// assert!(validate_product_id("8934588012345").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("invoice_123").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::required("id"));
    }

    if id.chars().count() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if id.starts_with(INVOICE_KEY_PREFIX) {
        return Err(ValidationError::invalid_format(
            "id",
            format!("must not start with '{INVOICE_KEY_PREFIX}'"),
        ));
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// An empty query is valid and matches everything.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates that a price or cost is not negative.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Parses an amount typed by the cashier.
///
/// `,` thousands separators are ignored and fractional input is rounded
/// to the nearest unit.
///
/// ## Example
/// ```rust
/// use scanpos_core::money::Money;
/// use scanpos_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("price", "25,000").unwrap(), Money::from_units(25_000));
/// assert!(parse_amount("price", "").is_err());
/// assert!(parse_amount("price", "abc").is_err());
/// assert!(parse_amount("price", "-1").is_err());
/// ```
pub fn parse_amount(field: &str, text: &str) -> ValidationResult<Money> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return Err(ValidationError::required(field));
    }

    let amount = match cleaned.parse::<i64>() {
        Ok(units) => Money::from_units(units),
        Err(_) => cleaned
            .parse::<f64>()
            .ok()
            .and_then(Money::from_f64)
            .ok_or_else(|| ValidationError::invalid_format(field, "must be a number"))?,
    };

    validate_amount(field, amount)?;
    Ok(amount)
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates everything on the add-product form that can be checked
/// without the store.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_product_name(&product.name)?;
    validate_amount("standard_price", product.standard_price)?;
    validate_amount("standard_cost", product.standard_cost)?;
    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates a quantity typed for a cart line.
///
/// Zero and negative values are accepted: they remove the line.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Stored Records
// =============================================================================

/// Invariants checked on every record read back from storage.
///
/// A stored value that parses as JSON but breaks one of these is treated
/// like an unreadable record.
pub trait StoredRecord {
    fn validate_stored(&self) -> ValidationResult<()>;
}

impl StoredRecord for Product {
    fn validate_stored(&self) -> ValidationResult<()> {
        validate_product_id(&self.id)?;
        validate_product_name(&self.name)?;
        validate_amount("standard_price", self.standard_price)?;
        validate_amount("standard_cost", self.standard_cost)?;
        Ok(())
    }
}

impl StoredRecord for CartItem {
    fn validate_stored(&self) -> ValidationResult<()> {
        self.product.validate_stored()?;
        if self.quantity < 1 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: i64::MAX,
            });
        }
        Ok(())
    }
}

impl StoredRecord for Invoice {
    fn validate_stored(&self) -> ValidationResult<()> {
        if !is_invoice_key(&self.id) {
            return Err(ValidationError::invalid_format(
                "id",
                format!("must start with '{INVOICE_KEY_PREFIX}'"),
            ));
        }
        for item in &self.items {
            item.validate_stored()?;
        }
        validate_amount("total", self.total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn new_product() -> NewProduct {
        NewProduct {
            id: "8934588012345".to_string(),
            name: "Bia Hà Nội".to_string(),
            category: Category::FastMovingConsumerGoods,
            description: None,
            image: None,
            is_active: true,
            standard_price: Money::from_units(10_000),
            standard_cost: Money::from_units(8_000),
        }
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("ABC-123").is_ok());
        assert_eq!(validate_product_id("   "), Err(ValidationError::required("id")));
        assert!(matches!(
            validate_product_id(&"9".repeat(129)),
            Err(ValidationError::TooLong { max: 128, .. })
        ));
        assert!(matches!(
            validate_product_id("invoice_2024-05-01T08:30:00.000Z"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        // Only the exact prefix is reserved
        assert!(validate_product_id("invoice-42").is_ok());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Bánh mì").is_ok());
        assert!(validate_product_name("").is_err());
        // Length counts characters, not bytes
        assert!(validate_product_name(&"ệ".repeat(200)).is_ok());
        assert!(validate_product_name(&"ệ".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  bia ").unwrap(), "bia");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("price", "10000").unwrap(), Money::from_units(10_000));
        assert_eq!(parse_amount("price", " 1,250,000 ").unwrap(), Money::from_units(1_250_000));
        assert_eq!(parse_amount("price", "12.5").unwrap(), Money::from_units(13));
        assert_eq!(parse_amount("price", "0").unwrap(), Money::zero());
    }

    #[test]
    fn test_parse_amount_errors() {
        assert_eq!(parse_amount("cost", " "), Err(ValidationError::required("cost")));
        assert!(matches!(
            parse_amount("cost", "12abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("cost", "-5"),
            Err(ValidationError::OutOfRange { min: 0, .. })
        ));
        assert!(matches!(
            parse_amount("cost", "NaN"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&new_product()).is_ok());

        let mut missing_name = new_product();
        missing_name.name = " ".to_string();
        assert_eq!(
            validate_new_product(&missing_name),
            Err(ValidationError::required("name"))
        );

        let mut negative_cost = new_product();
        negative_cost.standard_cost = Money::from_units(-1);
        assert!(matches!(
            validate_new_product(&negative_cost),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(-3).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(MAX_LINE_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(validate_quantity(i64::MAX).is_err());
    }

    fn stored_product() -> Product {
        new_product().into_product(chrono::Utc::now())
    }

    #[test]
    fn test_stored_product_invariants() {
        assert!(stored_product().validate_stored().is_ok());

        let mut blank = stored_product();
        blank.id = String::new();
        assert_eq!(blank.validate_stored(), Err(ValidationError::required("id")));

        let mut unnamed = stored_product();
        unnamed.name = String::new();
        assert!(unnamed.validate_stored().is_err());

        let mut negative = stored_product();
        negative.standard_price = Money::from_units(-5);
        assert!(negative.validate_stored().is_err());
    }

    #[test]
    fn test_stored_invoice_invariants() {
        let line = CartItem::new(stored_product());
        let invoice = Invoice {
            id: "invoice_2024-05-01T08:30:00.000Z".to_string(),
            created_at: chrono::Utc::now(),
            items: vec![line.clone()],
            total: Money::from_units(10_000),
        };
        assert!(invoice.validate_stored().is_ok());

        let mut zero_line = invoice.clone();
        zero_line.items[0].quantity = 0;
        assert!(zero_line.validate_stored().is_err());

        let mut unprefixed = invoice.clone();
        unprefixed.id = "8934588012345".to_string();
        assert!(unprefixed.validate_stored().is_err());

        let mut negative = invoice;
        negative.total = Money::from_units(-1);
        assert!(negative.validate_stored().is_err());
    }
}
