use actix_web::{web, Scope};

mod handlers;

pub fn category_service() -> Scope {
    web::scope("/categories")
        .service(handlers::get_all_categories)
        .service(handlers::get_category)
        .service(handlers::create_category)
        .service(handlers::update_category)
        .service(handlers::delete_category)
}
