use actix_web::{web, Scope};

mod handlers;

pub fn transaction_service() -> Scope {
    web::scope("/transactions")
        .service(handlers::get_all_transactions)
        .service(handlers::get_summary)
        .service(handlers::get_transaction)
        .service(handlers::create_new_transaction)
        .service(handlers::update_transaction)
        .service(handlers::delete_transaction)
}
