//! History periods offered by the period picker and their fetch cutoffs.

use chrono::{DateTime, Duration, Months, Utc};

/// Period selected by the user in the picker.
///
/// Keywords the picker never offers are kept as `Unrecognized` rather than
/// rejected; they fetch the full history of the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryPeriod {
    Weekly,
    Monthly,
    Yearly,
    Unrecognized(String),
}

impl HistoryPeriod {
    /// Picker options in display order.
    pub const PICKER_OPTIONS: [HistoryPeriod; 3] = [
        HistoryPeriod::Weekly,
        HistoryPeriod::Monthly,
        HistoryPeriod::Yearly,
    ];

    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "yearly" => Self::Yearly,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Unrecognized(keyword) => keyword.as_str(),
        }
    }

    /// Keyword with its first character upper-cased, as shown in prompts.
    pub fn title(&self) -> String {
        let keyword = self.keyword();
        let mut chars = keyword.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Oldest update time to include, or `None` for the whole history.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Weekly => Some(now - Duration::days(7)),
            Self::Monthly => Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
            Self::Yearly => Some(now.checked_sub_months(Months::new(12)).unwrap_or(now)),
            Self::Unrecognized(_) => None,
        }
    }
}
