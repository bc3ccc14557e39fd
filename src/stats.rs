//! Dashboard figures computed over the transactions.

use crate::model::{Amount, Transaction};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Summary figures for a set of transactions.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: Amount,
    /// Spending dated within the seven days before `today`, inclusive of both ends.
    pub last_seven_days: Amount,
    /// The category with the highest total. Ties go to the category seen first.
    pub top_category: Option<String>,
    pub top_category_total: Option<Amount>,
    pub count: usize,
}

impl Summary {
    pub fn of(records: &[Transaction], today: NaiveDate) -> Self {
        let since = today - Duration::days(7);
        let mut by_category: Vec<(&str, Amount)> = Vec::new();
        let mut last_seven_days = Amount::default();
        for record in records {
            match by_category.iter_mut().find(|(c, _)| *c == record.category()) {
                Some((_, sum)) => *sum = sum.saturating_add(record.amount()),
                None => by_category.push((record.category(), record.amount())),
            }
            let recent = NaiveDate::parse_from_str(record.date(), "%Y-%m-%d")
                .map(|date| date >= since)
                .unwrap_or(false);
            if recent {
                last_seven_days = last_seven_days.saturating_add(record.amount());
            }
        }

        // Strictly greater keeps the first category on ties.
        let mut top: Option<(&str, Amount)> = None;
        for (category, sum) in by_category {
            if top.map_or(true, |(_, best)| sum > best) {
                top = Some((category, sum));
            }
        }

        Self {
            total: records.iter().map(Transaction::amount).sum(),
            last_seven_days,
            top_category: top.map(|(c, _)| c.to_string()),
            top_category_total: top.map(|(_, sum)| sum),
            count: records.len(),
        }
    }

    /// True if a cap is set and the total is above it.
    pub fn exceeds_cap(&self, cap: Option<Amount>) -> bool {
        cap.is_some_and(|cap| self.total > cap)
    }
}
