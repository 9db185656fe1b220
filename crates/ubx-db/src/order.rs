use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

pub const PAYMENT_CASH: &str = "cash";
/// Deferred fee on delivery: the receiver pays the shipping cost.
pub const PAYMENT_DFOD: &str = "dfod";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(anyhow!("invalid order status: {}", other)),
        }
    }
}

/// Inbound order payload.
///
/// Anything the server owns (`id`, `receipt_number`, `status`, `created_at`)
/// is not part of this type, so values a client sends for them are dropped
/// during decoding. Omitted or `null` text fields decode as `""`, numbers as
/// `0`, flags as `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOrder {
    #[serde(deserialize_with = "null_as_default")]
    pub admin_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub sender_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_district: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_village: String,

    #[serde(deserialize_with = "null_as_default")]
    pub receiver_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_district: String,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_village: String,

    #[serde(deserialize_with = "null_as_default")]
    pub package_content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub package_weight: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub package_length: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub package_width: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub package_height: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub calculated_volume_weight: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub item_value: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub insurance_chosen: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_electronic: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub insurance_cost: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_shipping_cost: f64,
}

/// `null` decodes as the field's default, same as an omitted key.
fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

impl NewOrder {
    /// Names of required fields that are empty or whitespace-only.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("admin_name", &self.admin_name),
            ("sender_name", &self.sender_name),
            ("receiver_name", &self.receiver_name),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A persisted order, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub receipt_number: String,
    #[serde(flatten)]
    pub details: NewOrder,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Column list shared by every `select` over `orders`.
pub(crate) const ORDER_COLUMNS: &str = r#"
    id, receipt_number, admin_name,
    sender_name, sender_phone, sender_address, sender_city, sender_district, sender_village,
    receiver_name, receiver_phone, receiver_address, receiver_city, receiver_district, receiver_village,
    package_content, package_weight, package_length, package_width, package_height,
    calculated_volume_weight, item_value,
    service_type, insurance_chosen, is_electronic, insurance_cost, payment_method, discount,
    total_shipping_cost, created_at, status
"#;

pub(crate) fn order_from_row(row: &PgRow) -> Result<Order, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = OrderStatus::parse(&status).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: e.into(),
    })?;

    Ok(Order {
        id: row.try_get("id")?,
        receipt_number: row.try_get("receipt_number")?,
        details: NewOrder {
            admin_name: row.try_get("admin_name")?,
            sender_name: row.try_get("sender_name")?,
            sender_phone: row.try_get("sender_phone")?,
            sender_address: row.try_get("sender_address")?,
            sender_city: row.try_get("sender_city")?,
            sender_district: row.try_get("sender_district")?,
            sender_village: row.try_get("sender_village")?,
            receiver_name: row.try_get("receiver_name")?,
            receiver_phone: row.try_get("receiver_phone")?,
            receiver_address: row.try_get("receiver_address")?,
            receiver_city: row.try_get("receiver_city")?,
            receiver_district: row.try_get("receiver_district")?,
            receiver_village: row.try_get("receiver_village")?,
            package_content: row.try_get("package_content")?,
            package_weight: row.try_get("package_weight")?,
            package_length: row.try_get("package_length")?,
            package_width: row.try_get("package_width")?,
            package_height: row.try_get("package_height")?,
            calculated_volume_weight: row.try_get("calculated_volume_weight")?,
            item_value: row.try_get("item_value")?,
            service_type: row.try_get("service_type")?,
            insurance_chosen: row.try_get("insurance_chosen")?,
            is_electronic: row.try_get("is_electronic")?,
            insurance_cost: row.try_get("insurance_cost")?,
            payment_method: row.try_get("payment_method")?,
            discount: row.try_get("discount")?,
            total_shipping_cost: row.try_get("total_shipping_cost")?,
        },
        created_at: row.try_get("created_at")?,
        status,
    })
}
