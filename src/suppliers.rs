use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::session::Session;

const SUPPLIER_FILTER: &str = "CardType eq 'cSupplier'";
const SUPPLIER_FIELDS: &str = "CardCode,FederalTaxID,CardName";

/// One supplier row from `/BusinessPartners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    #[serde(rename = "CardCode")]
    pub card_code: String,
    /// Tax registration number (RUC).
    #[serde(rename = "FederalTaxID")]
    pub federal_tax_id: String,
    #[serde(rename = "CardName")]
    pub card_name: String,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    value: Vec<SupplierRecord>,
}

/// Fetch the supplier business partners, selecting the three reporting
/// fields. `limit` caps the row count via `$top`.
pub fn fetch_suppliers(session: &Session, limit: Option<u32>) -> Result<Vec<SupplierRecord>> {
    let mut query = vec![
        ("$filter", SUPPLIER_FILTER.to_string()),
        ("$select", SUPPLIER_FIELDS.to_string()),
    ];
    if let Some(limit) = limit {
        query.push(("$top", limit.to_string()));
    }

    debug!(?limit, "querying business partners");
    let response = session.get("/BusinessPartners").query(&query).send()?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        error!(status = status.as_u16(), %body, "supplier query failed");
        return Err(Error::Query {
            status: status.as_u16(),
            body,
        });
    }

    let page: Page = response.json()?;
    Ok(page.value)
}
