use actix_web::{web, Scope};

mod handlers;

pub fn summary_service() -> Scope {
    web::scope("/summary").service(handlers::get_summary)
}

pub fn report_service() -> Scope {
    web::scope("/reports").service(handlers::get_monthly_spending)
}
