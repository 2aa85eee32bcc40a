use serde::{Deserialize, Serialize};
use std::fmt;

/// A user row. Created at sign-up, outside of this workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// ISO currency code, `INR` when absent
    #[serde(default)]
    pub currency: Option<String>,
    /// Set once the preset taxonomy has been seeded for this user
    #[serde(default)]
    pub has_presets: bool,
}

impl User {
    pub const DEFAULT_CURRENCY: &'static str = "INR";

    /// Preferred currency code, falling back to INR for missing or blank values
    pub fn currency_code(&self) -> &str {
        match self.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => Self::DEFAULT_CURRENCY,
        }
    }
}

/// Category ID in format: "category::<uuid>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub category_id: String,
    pub user_id: String,
    pub name: String,
}

/// Category row to insert; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub user_id: String,
    pub name: String,
}

/// Subcategory row to insert; the store assigns the ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubcategory {
    pub name: String,
    pub category_id: String,
    pub user_id: String,
}

/// How often an expense repeats. Persisted as `""`, `weekly`, `monthly` or `yearly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecurringType {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl RecurringType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringType::None => "",
            RecurringType::Weekly => "weekly",
            RecurringType::Monthly => "monthly",
            RecurringType::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" => Some(RecurringType::None),
            "weekly" => Some(RecurringType::Weekly),
            "monthly" => Some(RecurringType::Monthly),
            "yearly" => Some(RecurringType::Yearly),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != RecurringType::None
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    CreditCard,
    DebitCard,
    Upi,
    NetBanking,
    Wallet,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::CreditCard => "credit_card",
            PaymentMode::DebitCard => "debit_card",
            PaymentMode::Upi => "upi",
            PaymentMode::NetBanking => "net_banking",
            PaymentMode::Wallet => "wallet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "cash" => Some(PaymentMode::Cash),
            "credit_card" => Some(PaymentMode::CreditCard),
            "debit_card" => Some(PaymentMode::DebitCard),
            "upi" => Some(PaymentMode::Upi),
            "net_banking" => Some(PaymentMode::NetBanking),
            "wallet" => Some(PaymentMode::Wallet),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expense ID in format: "expense::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// Positive amount in the user's currency. Corrupted rows load as NaN.
    pub amount: f64,
    /// Category name, not a reference to the category row
    pub category: String,
    /// Subcategory name, not a reference to the subcategory row
    pub subcategory: String,
    pub description: Option<String>,
    /// Transaction date as entered (`YYYY-MM-DD`), or a full timestamp
    pub created_at: String,
    pub recurring_type: RecurringType,
    pub is_recurring: bool,
    pub mode_of_payment: Option<PaymentMode>,
}

/// Field values of a create or update, before validation.
/// `amount` is kept as the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Blank means today
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub recurring_type: RecurringType,
    #[serde(default)]
    pub mode_of_payment: Option<PaymentMode>,
}

/// Spending totals over the dashboard's time windows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub daily: f64,
    pub monthly: f64,
    pub calendar_year: f64,
}

/// Which modal the edit form currently shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "expense_id", rename_all = "snake_case")]
pub enum FormMode {
    Closed,
    CreateOpen,
    EditOpen(String),
}

/// Edit form as presented to the front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormView {
    pub mode: FormMode,
    pub title: String,
    pub amount: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub created_at: String,
    pub recurring_type: RecurringType,
    pub mode_of_payment: Option<PaymentMode>,
    /// Subcategories offered for the chosen category, including a preserved stale choice
    pub subcategory_choices: Vec<String>,
    pub error: Option<String>,
}

/// Partial update of form fields; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormPatch {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub recurring_type: Option<RecurringType>,
    pub mode_of_payment: Option<PaymentMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub totals: AggregateTotals,
    pub currency_code: String,
    pub currency_sign: String,
    pub recent_expenses: Vec<Expense>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryListResponse {
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurring_type_wire_names() {
        assert_eq!(serde_json::to_string(&RecurringType::None).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&RecurringType::Monthly).unwrap(), "\"monthly\"");
        let parsed: RecurringType = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(parsed, RecurringType::Yearly);
        assert_eq!(RecurringType::parse("fortnightly"), None);
        assert!(!RecurringType::None.is_recurring());
        assert!(RecurringType::Weekly.is_recurring());
    }

    #[test]
    fn test_payment_mode_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMode::NetBanking).unwrap(), "\"net_banking\"");
        assert_eq!(PaymentMode::parse("upi"), Some(PaymentMode::Upi));
        assert_eq!(PaymentMode::parse(""), None);
    }

    #[test]
    fn test_user_currency_defaults_to_inr() {
        let mut user = User {
            id: "user-1".to_string(),
            currency: None,
            has_presets: false,
        };
        assert_eq!(user.currency_code(), "INR");

        user.currency = Some("  ".to_string());
        assert_eq!(user.currency_code(), "INR");

        user.currency = Some("USD".to_string());
        assert_eq!(user.currency_code(), "USD");
    }

    #[test]
    fn test_draft_defaults_when_fields_missing() {
        let draft: ExpenseDraft =
            serde_json::from_str(r#"{"title":"Coffee","amount":"3.5","created_at":"2026-10-18"}"#)
                .unwrap();
        assert_eq!(draft.recurring_type, RecurringType::None);
        assert_eq!(draft.mode_of_payment, None);
        assert!(draft.category.is_empty());
    }

    #[test]
    fn test_draft_without_date_deserializes_blank() {
        let draft: ExpenseDraft = serde_json::from_str(r#"{"title":"Coffee","amount":"3.5"}"#).unwrap();
        assert!(draft.created_at.is_empty());
    }

    #[test]
    fn test_form_mode_serialization() {
        let json = serde_json::to_value(FormMode::EditOpen("expense::1".to_string())).unwrap();
        assert_eq!(json["state"], "edit_open");
        assert_eq!(json["expense_id"], "expense::1");
    }
}
