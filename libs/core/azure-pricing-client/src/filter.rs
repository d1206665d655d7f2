//! OData filter construction for the Retail Prices API.

use std::fmt;

/// Filter parameters for a price query. Every field is optional; an empty
/// query matches everything the API exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuery {
    /// Azure region, e.g. `eastus`
    pub arm_region_name: String,
    /// ARM SKU, e.g. `Standard_B1s`
    pub arm_sku_name: String,
    /// Service, e.g. `Virtual Machines`
    pub service_name: String,
    pub product_name: String,
    /// ISO currency, e.g. `USD`
    pub currency_code: String,
}

impl PriceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.arm_region_name = region.into();
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.arm_sku_name = sku.into();
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service_name = service.into();
        self
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product_name = product.into();
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency_code = currency.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, _, value)| value.is_empty())
    }

    /// `(odata field, short label, value)` in a fixed order shared by the
    /// filter builder and diagnostics.
    pub(crate) fn fields(&self) -> impl Iterator<Item = (&'static str, &'static str, &str)> {
        [
            ("armRegionName", "region", self.arm_region_name.as_str()),
            ("armSkuName", "sku", self.arm_sku_name.as_str()),
            ("serviceName", "service", self.service_name.as_str()),
            ("productName", "product", self.product_name.as_str()),
            ("currencyCode", "currency", self.currency_code.as_str()),
        ]
        .into_iter()
    }

    /// Non-empty fields as `(label, value)` pairs.
    pub fn non_empty_fields(&self) -> Vec<(&'static str, &str)> {
        self.fields()
            .filter(|(_, _, value)| !value.is_empty())
            .map(|(_, label, value)| (label, value))
            .collect()
    }

    pub fn context(&self) -> QueryContext {
        QueryContext::from(self)
    }
}

/// Escape a value for use inside an OData string literal by doubling quotes.
pub fn escape_odata_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Build `field eq 'value' and ...` from the non-empty fields of `query`.
///
/// Returns an empty string for an empty query, meaning "no filter".
pub fn build_filter(query: &PriceQuery) -> String {
    query
        .fields()
        .filter(|(_, _, value)| !value.is_empty())
        .map(|(field, _, value)| format!("{} eq '{}'", field, escape_odata_string(value)))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Request URL for the first page: `base_url` plus `$filter` when the query has one.
pub fn build_request_url(base_url: &str, query: &PriceQuery) -> String {
    let filter = build_filter(query);
    if filter.is_empty() {
        return base_url.to_string();
    }
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}$filter={}",
        base_url,
        separator,
        urlencoding::encode(&filter)
    )
}

/// Deterministic rendering of a query for error messages,
/// e.g. `query [region=eastus sku=Standard_B1s]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    pairs: Vec<(&'static str, String)>,
}

impl QueryContext {
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

impl From<&PriceQuery> for QueryContext {
    fn from(query: &PriceQuery) -> Self {
        Self {
            pairs: query
                .non_empty_fields()
                .into_iter()
                .map(|(label, value)| (label, value.to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for QueryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("query [")?;
        for (i, (label, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", label, value)?;
        }
        f.write_str("]")
    }
}
