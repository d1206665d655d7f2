//! Wire types for the Azure Retail Prices API.
//!
//! Field names follow the upstream JSON exactly. Absent and `null` values
//! deserialize to the type's zero value.

use serde::{Deserialize, Deserializer, Serialize};

/// Pricing type discriminators reported in [`PriceItem::price_type`].
pub const PRICE_TYPE_CONSUMPTION: &str = "Consumption";
pub const PRICE_TYPE_RESERVATION: &str = "Reservation";

/// A single retail price record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceItem {
    #[serde(deserialize_with = "null_as_default")]
    pub currency_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tier_minimum_units: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub retail_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub arm_region_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    /// ISO 8601 timestamp, kept verbatim
    #[serde(deserialize_with = "null_as_default")]
    pub effective_start_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meter_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meter_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub availability_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service_family: String,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_of_measure: String,
    /// `Consumption`, `Reservation`, `DevTestConsumption`, ...
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub price_type: String,
    /// Only present for reservation pricing, e.g. `1 Year`
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub reservation_term: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_primary_meter_region: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub arm_sku_name: String,
}

impl PriceItem {
    pub fn is_reservation(&self) -> bool {
        self.price_type == PRICE_TYPE_RESERVATION
    }

    pub fn is_consumption(&self) -> bool {
        self.price_type == PRICE_TYPE_CONSUMPTION
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceResponse {
    #[serde(rename = "BillingCurrency", deserialize_with = "null_as_default")]
    pub billing_currency: String,
    #[serde(rename = "CustomerEntityId", deserialize_with = "null_as_default")]
    pub customer_entity_id: String,
    #[serde(rename = "CustomerEntityType", deserialize_with = "null_as_default")]
    pub customer_entity_type: String,
    #[serde(rename = "Items", deserialize_with = "null_as_default")]
    pub items: Vec<PriceItem>,
    /// Absolute URL of the next page; `None` on the last page
    #[serde(rename = "NextPageLink", skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<String>,
    #[serde(rename = "Count", deserialize_with = "null_as_default")]
    pub count: u64,
}

impl PriceResponse {
    /// Next page locator, treating an empty link the same as a missing one.
    pub fn next_link(&self) -> Option<&str> {
        self.next_page_link.as_deref().filter(|link| !link.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
