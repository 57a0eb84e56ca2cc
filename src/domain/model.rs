use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Access and refresh token as issued by `/login` and `/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Body of both the login and the refresh response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub basis_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntryDto {
    pub id: String,
    pub date_utc: String,
    pub sum: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountEntryRequest {
    pub sum: f64,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl CreateAccountEntryRequest {
    /// Forces the sign of `sum` to match the entry's category: negative for an
    /// expense category, positive for an income one. Entries without a
    /// category, or with one in neither list, keep their sign.
    pub fn with_category_sign(mut self, expenses: &[CategoryDto], incomes: &[CategoryDto]) -> Self {
        let Some(category_id) = self.category_id.as_deref() else {
            return self;
        };

        if expenses.iter().any(|c| c.id == category_id) {
            self.sum = -self.sum.abs();
        } else if incomes.iter().any(|c| c.id == category_id) {
            self.sum = self.sum.abs();
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
}

impl Period {
    pub fn days(self) -> u32 {
        match self {
            Period::Daily => 1,
            Period::Monthly => 30,
            Period::Yearly => 365,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            1 => Some(Period::Daily),
            30 => Some(Period::Monthly),
            365 => Some(Period::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Daily => "Daily",
            Period::Monthly => "Monthly",
            Period::Yearly => "Yearly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFlowDto {
    pub id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    pub starting_date_utc: String,
    pub period_days: u32,
    pub sum: f64,
}

impl MoneyFlowDto {
    /// Human-readable period: a named period, or the raw day count.
    pub fn period_label(&self) -> String {
        match Period::from_days(self.period_days) {
            Some(period) => period.to_string(),
            None => format!("{} days", self.period_days),
        }
    }
}

/// Body for creating or updating a money flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFlowRequest {
    pub sum: f64,
    /// Serialized as `YYYY-MM-DD`.
    pub starting_date: NaiveDate,
    pub period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryType {
    Expense,
    Income,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub user_id: String,
}

/// The create endpoint takes the category type as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTypeCode(pub CategoryType);

impl Serialize for CategoryTypeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code: u8 = match self.0 {
            CategoryType::Expense => 0,
            CategoryType::Income => 1,
        };
        serializer.serialize_u8(code)
    }
}

impl<'de> Deserialize<'de> for CategoryTypeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(CategoryTypeCode(CategoryType::Expense)),
            1 => Ok(CategoryTypeCode(CategoryType::Income)),
            other => Err(serde::de::Error::custom(format!(
                "unknown category type code: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryTypeCode,
}

impl CreateCategoryRequest {
    pub fn new(name: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            name: name.into(),
            kind: CategoryTypeCode(kind),
        }
    }
}
