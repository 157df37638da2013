use crate::error::HandlerError;
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use tracker_repo::transaction_repo::TransactionRepo;
use tracker_repo::user_repo::UserId;

#[get("")]
pub async fn get_summary(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let summary = transaction_repo.get_summary(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[derive(Deserialize)]
pub struct MonthlySpendingQuery {
    year: Option<i32>,
    month: Option<u32>,
}

#[get("/monthly-spending")]
pub async fn get_monthly_spending(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<MonthlySpendingQuery>,
) -> Result<impl Responder, HandlerError> {
    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Err(HandlerError::Validation(
            "Year and month are required".to_owned(),
        ));
    };
    if !(1..=12).contains(&month) {
        return Err(HandlerError::Validation("Invalid month".to_owned()));
    }

    let spending = transaction_repo
        .get_monthly_spending(user_id.into_inner(), year, month)
        .await?;
    Ok(HttpResponse::Ok().json(spending))
}
