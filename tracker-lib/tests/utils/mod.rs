use std::sync::Arc;

use rstest::*;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

use tracker_repo::transaction_repo::TransactionRepo;
use tracker_repo::user_repo::{NewUser, UserId, UserRepo};

pub mod mock;

macro_rules! build_app {
    ($transaction_repo:expr, $user_id:expr) => {{
        let app = App::new()
            .app_data(Data::new($transaction_repo))
            .wrap(tracker_lib::tracing::create_middleware())
            .service(
                tracker_lib::transaction::transaction_service()
                    .wrap(MockAuthentication { user_id: $user_id }),
            )
            .service(
                tracker_lib::report::summary_service()
                    .wrap(MockAuthentication { user_id: $user_id }),
            )
            .service(
                tracker_lib::report::report_service()
                    .wrap(MockAuthentication { user_id: $user_id }),
            );
        tracing::info!("Built app");
        app
    }};
}

macro_rules! create_transaction {
    (&$service:ident, $new_transaction:ident) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json(&$new_transaction)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::CREATED,
            "Got {} response when creating transaction",
            response.status()
        );
        test::read_body_json(response).await
    }};
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub username: String,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let username = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        let user = user_repo
            .create_user(NewUser {
                username: username.clone(),
                password_hash: tracker_lib::auth::password::encode_password("pass").unwrap(),
            })
            .await
            .unwrap();
        info!(%username, user_id = user.id, "Created user");
        TestUser {
            id: user.id,
            username,
        }
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> (Arc<dyn TransactionRepo>, Arc<dyn UserRepo>) {
    tracker_repo::mem_repo::create_repos()
}
