use chrono::NaiveDate;
use fake::faker::chrono::en::Date;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use finance_repo::category_repo::Category;
use finance_repo::transaction_repo::NewTransaction;
use rand::Rng;
use rust_decimal::Decimal;

/// A positive amount with two decimal places.
pub fn generate_amount() -> Decimal {
    let cents: i64 = rand::thread_rng().gen_range(1..1_000_000);
    Decimal::new(cents, 2)
}

pub fn generate_new_transaction(category: &Category) -> NewTransaction {
    let date: NaiveDate = Date().fake();
    generate_new_transaction_with_date(category, date)
}

pub fn generate_new_transaction_with_date(category: &Category, date: NaiveDate) -> NewTransaction {
    NewTransaction::new(
        Sentence(1..4).fake(),
        generate_amount(),
        date,
        category.kind,
        category.id,
    )
}
