//! # Invoice Commands
//!
//! Invoice history: list with search/filter/sort, and clear.

use tracing::{info, warn};

use crate::error::ApiError;
use scanpos_core::listing::InvoiceQuery;
use scanpos_core::validation::validate_search_query;
use scanpos_core::Invoice;
use scanpos_db::KeyValueStore;

/// Lists invoices through the search, date filter and sort of `query`.
pub async fn list_invoices<S>(store: &S, query: &InvoiceQuery) -> Result<Vec<Invoice>, ApiError>
where
    S: KeyValueStore + Clone,
{
    let query = InvoiceQuery {
        search: validate_search_query(&query.search)?,
        ..query.clone()
    };

    let invoices = store.invoices().list_all().await?;
    let shown = query.apply(&invoices);

    info!(
        total = invoices.len(),
        shown = shown.len(),
        sort = %query.sort,
        "Invoices listed"
    );
    Ok(shown)
}

/// Deletes every invoice. Products are kept.
///
/// Returns the number of invoices removed.
pub async fn clear_history<S>(store: &S) -> Result<usize, ApiError>
where
    S: KeyValueStore + Clone,
{
    let removed = store.invoices().clear_all().await?;
    warn!(removed, "Invoice history cleared");
    Ok(removed)
}

// =============================================================================
// Unit Tests
// =============================================================================
