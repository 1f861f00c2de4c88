use std::str::FromStr;

use chrono::NaiveDate;
use finance_repo::kind::Kind;
use finance_repo::user_repo::UserId;
use rust_decimal::Decimal;

use crate::error::HandlerError;

/// Largest accepted transaction amount, in whole units.
const MAX_AMOUNT: i64 = 1_000_000_000_000_000_000;

/// Values a filter field may take to mean "no filter".
const ALL_VALUES: [&str; 3] = ["All", "Todos", "Todas"];

/// Trims `value`; blank strings count as absent.
pub fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Builds the error listing every field whose flag is set.
pub fn missing<const N: usize>(fields: [(&'static str, bool); N]) -> HandlerError {
    HandlerError::MissingFields(
        fields
            .into_iter()
            .filter(|(_, is_missing)| *is_missing)
            .map(|(name, _)| name)
            .collect(),
    )
}

pub fn check_owner(owner: UserId, claimed: Option<UserId>) -> Result<(), HandlerError> {
    match claimed {
        Some(claimed) if claimed != owner => Err(HandlerError::OwnerMismatch),
        _ => Ok(()),
    }
}

pub fn parse_kind(field: &'static str, value: String) -> Result<Kind, HandlerError> {
    Kind::from_str(&value).map_err(|e| HandlerError::invalid(field, e.to_string()))
}

pub fn parse_date(field: &'static str, value: String) -> Result<NaiveDate, HandlerError> {
    NaiveDate::from_str(&value)
        .map_err(|_| HandlerError::invalid(field, format!("{} is not a YYYY-MM-DD date", value)))
}

pub fn positive_amount(amount: Decimal) -> Result<Decimal, HandlerError> {
    if amount <= Decimal::ZERO {
        Err(HandlerError::invalid("amount", "must be greater than zero"))
    } else if amount > Decimal::from(MAX_AMOUNT) {
        Err(HandlerError::invalid(
            "amount",
            format!("must not exceed {}", MAX_AMOUNT),
        ))
    } else {
        Ok(amount)
    }
}

/// Kind filter from a query string. `All` and blank mean no filter.
pub fn kind_filter(value: Option<String>) -> Result<Option<Kind>, HandlerError> {
    match text(value) {
        Some(v) if ALL_VALUES.contains(&v.as_str()) => Ok(None),
        Some(v) => parse_kind("kind", v).map(Some),
        None => Ok(None),
    }
}

pub fn category_filter(value: Option<String>) -> Option<String> {
    text(value).filter(|v| !ALL_VALUES.contains(&v.as_str()))
}

pub fn date_filter(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, HandlerError> {
    text(value).map(|v| parse_date(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn blank_text_is_missing() {
        assert_eq!(text(Some("  Food ".to_owned())), Some("Food".to_owned()));
        assert_eq!(text(Some("   ".to_owned())), None);
        assert_eq!(text(None), None);
    }

    #[actix_rt::test]
    async fn missing_lists_flagged_fields() {
        let error = missing([("name", true), ("kind", false), ("owner_id", true)]);
        assert!(matches!(
            error,
            HandlerError::MissingFields(fields) if fields == vec!["name", "owner_id"]
        ));
    }

    #[actix_rt::test]
    async fn owner_must_match() {
        assert!(check_owner(1, None).is_ok());
        assert!(check_owner(1, Some(1)).is_ok());
        assert!(matches!(
            check_owner(1, Some(2)),
            Err(HandlerError::OwnerMismatch)
        ));
    }

    #[actix_rt::test]
    async fn amount_must_be_positive() {
        assert!(positive_amount(Decimal::new(1, 2)).is_ok());
        assert!(positive_amount(Decimal::ZERO).is_err());
        assert!(positive_amount(Decimal::from(-5)).is_err());
    }

    #[actix_rt::test]
    async fn amount_is_bounded() {
        assert!(positive_amount(Decimal::from(MAX_AMOUNT)).is_ok());
        assert!(positive_amount(Decimal::from(MAX_AMOUNT) + Decimal::new(1, 2)).is_err());
        assert!(matches!(
            positive_amount(Decimal::from_str("50000000000000000000000000000").unwrap()),
            Err(HandlerError::InvalidField { field: "amount", .. })
        ));
    }

    #[actix_rt::test]
    async fn all_means_no_filter() {
        assert_eq!(kind_filter(Some("All".to_owned())).unwrap(), None);
        assert_eq!(kind_filter(Some("Todos".to_owned())).unwrap(), None);
        assert_eq!(kind_filter(Some("".to_owned())).unwrap(), None);
        assert_eq!(
            kind_filter(Some("Gasto".to_owned())).unwrap(),
            Some(Kind::Expense)
        );
        assert!(kind_filter(Some("Sideways".to_owned())).is_err());

        assert_eq!(category_filter(Some("Todas".to_owned())), None);
        assert_eq!(
            category_filter(Some("Food".to_owned())),
            Some("Food".to_owned())
        );
    }

    #[actix_rt::test]
    async fn dates() {
        assert_eq!(
            date_filter("from", Some("2024-01-05".to_owned())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(date_filter("from", Some(" ".to_owned())).unwrap(), None);
        assert!(date_filter("from", Some("05/01/2024".to_owned())).is_err());
    }
}
