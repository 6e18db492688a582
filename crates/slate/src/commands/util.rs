//! Shared helpers for command handlers.

use std::any::Any;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use uuid::Uuid;

use slate_core::{Cents, InvoiceLineItem, Query, Slate};

use crate::error::CliError;

// ── Argument parsers ─────────────────────────────────────────────────

/// Parse a snake_case wire enum from a CLI value (`partially-paid` or
/// `partially_paid`).
pub fn parse_enum<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unrecognized value '{raw}'"))
}

/// Parse a decimal amount (`1250`, `1250.5`, `-12.34`) into cents
/// without going through floating point.
pub fn parse_money(raw: &str) -> Result<Cents, String> {
    let invalid = || format!("invalid amount '{raw}' (expected e.g. 1250.00)");
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
        return Err(invalid());
    }
    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(invalid)?;
    Ok(Cents(if negative { -cents } else { cents }))
}

/// `DESCRIPTION:QUANTITY:UNIT_PRICE`; the description may itself contain
/// colons.
pub fn parse_line_item(raw: &str) -> Result<InvoiceLineItem, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "item".into(),
        reason,
    };

    let mut parts = raw.rsplitn(3, ':');
    let (Some(price), Some(quantity), Some(description)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid(format!(
            "'{raw}' is not DESCRIPTION:QUANTITY:UNIT_PRICE"
        )));
    };

    let quantity = quantity
        .trim()
        .parse()
        .map_err(|_| invalid(format!("quantity '{quantity}' is not a whole number")))?;
    let unit_price_cents = parse_money(price).map_err(invalid)?;

    Ok(InvoiceLineItem {
        description: description.trim().to_owned(),
        quantity,
        unit_price_cents,
    })
}

// ── Data access ──────────────────────────────────────────────────────

/// Fetch a scoped query. A disabled query means no organization was
/// configured.
pub async fn fetch<T: Any + Send + Sync>(query: &Query<T>) -> Result<Arc<T>, CliError> {
    query.fetch().await?.ok_or(CliError::NoOrganization)
}

/// The organization writes are scoped to.
pub fn require_org(slate: &Slate) -> Result<Uuid, CliError> {
    slate.organization_id().ok_or(CliError::NoOrganization)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slate_core::{InvoiceStatus, TransactionKind};

    use super::*;

    #[test]
    fn money_parses_without_floats() {
        assert_eq!(parse_money("1250").unwrap(), Cents(125_000));
        assert_eq!(parse_money("1250.5").unwrap(), Cents(125_050));
        assert_eq!(parse_money("0.07").unwrap(), Cents(7));
        assert_eq!(parse_money("-12.34").unwrap(), Cents(-1_234));
        assert!(parse_money("12.345").is_err());
        assert!(parse_money("abc").is_err());
        assert!(parse_money(".5").is_err());
        assert!(parse_money("--5").is_err());
        assert!(parse_money("+5").is_err());
        assert!(parse_money("-+5").is_err());
    }

    #[test]
    fn enums_accept_dashes() {
        assert_eq!(
            parse_enum::<InvoiceStatus>("partially-paid").unwrap(),
            InvoiceStatus::PartiallyPaid
        );
        assert_eq!(
            parse_enum::<TransactionKind>("Expense").unwrap(),
            TransactionKind::Expense
        );
        assert!(parse_enum::<InvoiceStatus>("settled").is_err());
    }

    #[test]
    fn line_item_keeps_colons_in_description() {
        let item = parse_line_item("Grip truck: day rate:2:450.00").unwrap();
        assert_eq!(item.description, "Grip truck: day rate");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price_cents, Cents(45_000));

        assert!(parse_line_item("no price").is_err());
    }
}
