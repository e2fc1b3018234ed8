use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lenient decoders for fields the backend sends either as JSON numbers or as
/// decimal strings (`"12.50"`), or as empty strings where a value is absent.
pub mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    /// Decodes a number or numeric string. Empty or unparsable strings become `0.0`.
    pub fn f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(match value {
            Some(NumberOrString::Number(n)) => n,
            Some(NumberOrString::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        })
    }

    /// Decodes an optional free-text field that may also arrive as a number.
    /// Empty strings become `None`.
    pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrString>::deserialize(deserializer)?;
        Ok(match value {
            Some(NumberOrString::Number(n)) => Some(n.to_string()),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => None,
            Some(NumberOrString::Text(s)) => Some(s),
            None => None,
        })
    }
}

pub mod envelope {
    use std::collections::BTreeMap;

    use super::*;

    /// Envelope code the backend uses for a successful create/update.
    pub const CODE_CREATED: u16 = 201;
    /// Envelope code the backend uses for a successful profile update.
    pub const CODE_OK: u16 = 200;

    /// Mutation response: `{ code, message, data }`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ApiResponse<T> {
        #[serde(default)]
        pub code: Option<u16>,
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub data: Option<T>,
    }

    impl<T> ApiResponse<T> {
        pub fn is_code(&self, code: u16) -> bool {
            self.code == Some(code)
        }
    }

    /// Read response: `{ data }`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DataResponse<T> {
        pub data: T,
    }

    /// Validation failure: `{ errors: { field: [messages] } }`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ValidationErrorBody {
        #[serde(default)]
        pub message: Option<String>,
        pub errors: BTreeMap<String, Vec<String>>,
    }

    /// Any other failure body. Only the message is of interest.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MessageBody {
        #[serde(default)]
        pub message: Option<String>,
    }
}

pub mod pagination {
    use super::*;

    /// One page of a server-paginated list.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Page<T> {
        pub data: Vec<T>,
        #[serde(default = "first_page")]
        pub current_page: u32,
        #[serde(default = "first_page")]
        pub last_page: u32,
        #[serde(default)]
        pub per_page: u32,
        #[serde(default)]
        pub total: u64,
    }

    fn first_page() -> u32 {
        1
    }

    impl<T> Page<T> {
        /// Number of pages, never less than 1.
        pub fn page_count(&self) -> u32 {
            self.last_page.max(1)
        }
    }
}

pub mod item {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ItemStatus {
        #[default]
        Active,
        Inactive,
    }

    impl ItemStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Active => "Active",
                Self::Inactive => "Inactive",
            }
        }

        /// The status a toggle moves to.
        #[must_use]
        pub fn toggled(self) -> Self {
            match self {
                Self::Active => Self::Inactive,
                Self::Inactive => Self::Active,
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value {
                "Active" => Some(Self::Active),
                "Inactive" => Some(Self::Inactive),
                _ => None,
            }
        }
    }

    /// Catalog item as returned by `GET /api/item` and `GET /api/item/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ItemView {
        pub id: u64,
        pub item_name: String,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub item_type: Option<String>,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub item_description: Option<String>,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub item_price: f64,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub item_tax: f64,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub item_size: Option<String>,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub item_unit: Option<String>,
        #[serde(default)]
        pub item_status: ItemStatus,
    }

    /// Body of `POST /api/item`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ItemNew {
        pub item_name: String,
        pub item_type: Option<String>,
        pub item_description: Option<String>,
        pub item_price: f64,
        pub item_tax: f64,
        pub item_size: Option<String>,
        pub item_unit: Option<String>,
    }

    /// Body of `PUT /api/item/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ItemUpdate {
        pub item_name: String,
        pub item_type: Option<String>,
        pub item_description: Option<String>,
        pub item_price: f64,
        pub item_tax: f64,
        pub item_size: Option<String>,
        pub item_unit: Option<String>,
        pub item_status: ItemStatus,
    }

    /// Body of `PATCH /api/items/{id}/status`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ItemStatusUpdate {
        pub item_status: ItemStatus,
    }
}

pub mod buyer {
    use super::*;

    /// Entry of `GET /api/activeBuyers`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BuyerView {
        pub id: u64,
        pub buyer_name: String,
    }
}

pub mod quotation {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum QuotationStatus {
        #[default]
        Pending,
        #[serde(alias = "Approved")]
        Accepted,
        Rejected,
        Expired,
    }

    impl QuotationStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "Pending",
                Self::Accepted => "Accepted",
                Self::Rejected => "Rejected",
                Self::Expired => "Expired",
            }
        }

        /// Cycles through the statuses in declaration order.
        #[must_use]
        pub fn next(self) -> Self {
            match self {
                Self::Pending => Self::Accepted,
                Self::Accepted => Self::Rejected,
                Self::Rejected => Self::Expired,
                Self::Expired => Self::Pending,
            }
        }
    }

    /// Row of the quotation list and of the dashboard's recent quotations.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationRow {
        pub id: u64,
        pub quotation_ref: String,
        #[serde(default)]
        pub quotation_date: Option<NaiveDate>,
        #[serde(default)]
        pub buyer_name: Option<String>,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub total_amount: f64,
        #[serde(default)]
        pub quotation_status: QuotationStatus,
    }

    /// Full quotation of `GET /api/quotation/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationView {
        pub id: u64,
        pub quotation_ref: String,
        #[serde(default)]
        pub quotation_date: Option<NaiveDate>,
        pub quotation_buyer_id: u64,
        #[serde(default)]
        pub quotation_valid_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub quotation_remarks: Option<String>,
        #[serde(default)]
        pub quotation_status: QuotationStatus,
        #[serde(default)]
        pub subs: Vec<QuotationSubView>,
    }

    /// Persisted line of a quotation.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationSubView {
        pub id: u64,
        pub quotation_sub_item_id: u64,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub quotation_sub_size: Option<String>,
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub quotation_sub_unit: Option<String>,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub quotation_sub_qnty: f64,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub quotation_sub_rate: f64,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub quotation_sub_discount: f64,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub quotation_sub_tax: f64,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub quotation_sub_amount: f64,
    }

    /// Line as submitted in create/update bodies. `id` is present only for
    /// lines that already exist on the server.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationSubPayload {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<u64>,
        pub quotation_sub_item_id: u64,
        pub quotation_sub_size: String,
        pub quotation_sub_unit: String,
        pub quotation_sub_qnty: f64,
        pub quotation_sub_rate: f64,
        pub quotation_sub_discount: f64,
        pub quotation_sub_tax: f64,
        pub quotation_sub_amount: f64,
    }

    /// Body of `POST /api/quotation`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationNew {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub quotation_ref: Option<String>,
        pub quotation_date: NaiveDate,
        pub quotation_buyer_id: u64,
        pub quotation_valid_date: NaiveDate,
        pub quotation_remarks: String,
        pub subs: Vec<QuotationSubPayload>,
    }

    /// Body of `PUT /api/quotation/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationUpdate {
        pub quotation_date: NaiveDate,
        pub quotation_buyer_id: u64,
        pub quotation_valid_date: NaiveDate,
        pub quotation_remarks: String,
        pub quotation_status: QuotationStatus,
        pub subs: Vec<QuotationSubPayload>,
    }

    /// Body of `GET /api/quotation-ref`: the reference the next quotation gets.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct QuotationRefResponse {
        #[serde(default, deserialize_with = "crate::de::opt_text")]
        pub data: Option<String>,
    }
}

pub mod dashboard {
    use super::*;
    use crate::quotation::QuotationRow;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ChartPoint {
        pub label: String,
        #[serde(default, deserialize_with = "crate::de::f64_lenient")]
        pub value: f64,
    }

    /// Payload of `GET /api/dashboard`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Dashboard {
        #[serde(default)]
        pub total_quotations: u64,
        #[serde(default)]
        pub pending_quotations: u64,
        #[serde(default)]
        pub approved_quotations: u64,
        #[serde(
            default,
            rename = "monthlyAmount",
            deserialize_with = "crate::de::f64_lenient"
        )]
        pub monthly_amount: f64,
        #[serde(default)]
        pub monthly_chart: Vec<ChartPoint>,
        #[serde(default)]
        pub status_chart: Vec<ChartPoint>,
        #[serde(default)]
        pub last_quotations: Vec<QuotationRow>,
    }
}

pub mod profile {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Profile {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub mobile: String,
        #[serde(default)]
        pub email: String,
    }

    /// Body of `GET /api/panel-fetch-profile`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileResponse {
        pub profile: Profile,
    }

    /// Body of `PUT /api/panel-update-profile`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub mobile: String,
        pub email: String,
    }
}
