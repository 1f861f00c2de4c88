//! Derived views over a transaction list: the filtered subset and its totals.
//!
//! Everything here is a pure function of its inputs so both the server and the client can
//! recompute it whenever the list or the filter changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category_repo::Category;
use crate::kind::Kind;
use crate::transaction_repo::{Filter, Transaction};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub count: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Totals exceed the largest representable amount")]
pub struct TotalsOverflow;

#[derive(Debug)]
pub struct Selection<'a> {
    pub transactions: Vec<&'a Transaction>,
    pub totals: Totals,
}

pub fn select<'a>(
    transactions: &'a [Transaction],
    filter: &Filter,
) -> Result<Selection<'a>, TotalsOverflow> {
    let transactions: Vec<&Transaction> =
        transactions.iter().filter(|t| filter.matches(t)).collect();
    let totals = totals(transactions.iter().copied())?;
    Ok(Selection {
        transactions,
        totals,
    })
}

pub fn totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<Totals, TotalsOverflow> {
    let mut totals = Totals::default();
    for t in transactions {
        let sum = match t.kind {
            Kind::Income => &mut totals.total_income,
            Kind::Expense => &mut totals.total_expense,
        };
        *sum = sum.checked_add(t.amount).ok_or(TotalsOverflow)?;
        totals.count += 1;
    }
    totals.balance = totals
        .total_income
        .checked_sub(totals.total_expense)
        .ok_or(TotalsOverflow)?;
    Ok(totals)
}

/// Categories a transaction of `kind` may be filed under.
pub fn category_options(categories: &[Category], kind: Kind) -> Vec<&Category> {
    categories.iter().filter(|c| c.kind == kind).collect()
}
