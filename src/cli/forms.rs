//! Interactive data entry for commands invoked without arguments.

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use mtrack_core::parse_date;
use mtrack_domain::{TransactionType, DEFAULT_CATEGORY};

use crate::cli::output;

/// Transaction fields collected from the user, not yet recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: Option<String>,
}

/// Resolves user-entered date text. Empty input and `today` mean `today`;
/// anything unparsable also falls back to `today`, with a warning.
pub fn date_or_today(input: &str, today: NaiveDate) -> NaiveDate {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("today") {
        return today;
    }
    match parse_date(trimmed) {
        Ok(date) => date,
        Err(_) => {
            output::warning(format!(
                "Invalid date `{trimmed}`, using today ({today})."
            ));
            today
        }
    }
}

/// Parses a strictly positive amount. A leading `$` and thousands separators are accepted.
pub fn parse_amount(input: &str) -> Result<f64, String> {
    let cleaned = input.trim().trim_start_matches('$').replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(format!(
            "Amount must be a positive number, got `{}`.",
            input.trim()
        )),
    }
}

/// Step-by-step wizard for `add`.
pub struct TransactionForm<'a> {
    theme: &'a ColorfulTheme,
    today: NaiveDate,
    categories: &'a [String],
}

impl<'a> TransactionForm<'a> {
    pub fn new(theme: &'a ColorfulTheme, today: NaiveDate, categories: &'a [String]) -> Self {
        Self {
            theme,
            today,
            categories,
        }
    }

    /// Returns `None` when the user declines the final confirmation.
    pub fn run(&self) -> Result<Option<TransactionDraft>, dialoguer::Error> {
        let raw_date: String = Input::with_theme(self.theme)
            .with_prompt("Date (YYYY-MM-DD, Enter for today)")
            .allow_empty(true)
            .interact_text()?;
        let date = date_or_today(&raw_date, self.today);

        let description: String = Input::with_theme(self.theme)
            .with_prompt("Description")
            .validate_with(|value: &String| -> Result<(), &str> {
                if value.trim().is_empty() {
                    Err("Description cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let raw_amount: String = Input::with_theme(self.theme)
            .with_prompt("Amount")
            .validate_with(|value: &String| parse_amount(value).map(|_| ()))
            .interact_text()?;
        let amount = parse_amount(&raw_amount).unwrap_or_default();

        let kinds = [TransactionType::Income, TransactionType::Expense];
        let labels: Vec<&str> = kinds.iter().map(|kind| kind.as_str()).collect();
        let kind_index = Select::with_theme(self.theme)
            .with_prompt("Type")
            .items(&labels)
            .default(1)
            .interact()?;
        let transaction_type = kinds[kind_index];

        let category = match transaction_type {
            TransactionType::Income => None,
            TransactionType::Expense => self.pick_category()?,
        };

        let draft = TransactionDraft {
            date,
            description: description.trim().to_string(),
            amount,
            transaction_type,
            category,
        };

        let confirmed = Confirm::with_theme(self.theme)
            .with_prompt(format!(
                "Save {} `{}` of {} on {}?",
                transaction_type.as_str().to_lowercase(),
                draft.description,
                output::format_amount(amount),
                date
            ))
            .default(true)
            .interact()?;
        Ok(confirmed.then_some(draft))
    }

    fn pick_category(&self) -> Result<Option<String>, dialoguer::Error> {
        if self.categories.is_empty() {
            return Ok(None);
        }
        let default = self
            .categories
            .iter()
            .position(|name| name == DEFAULT_CATEGORY)
            .unwrap_or(0);
        let index = Select::with_theme(self.theme)
            .with_prompt("Category")
            .items(self.categories)
            .default(default)
            .interact()?;
        Ok(self.categories.get(index).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()
    }

    #[test]
    fn invalid_or_empty_dates_fall_back_to_today() {
        assert_eq!(date_or_today("", today()), today());
        assert_eq!(date_or_today("TODAY", today()), today());
        assert_eq!(date_or_today("2024-02-30", today()), today());
        assert_eq!(
            date_or_today(" 2023-12-31 ", today()),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(parse_amount("50"), Ok(50.0));
        assert_eq!(parse_amount("$1,200.50"), Ok(1200.5));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("abc").is_err());
    }
}
