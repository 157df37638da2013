use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use tracker_repo::transaction_repo::TransactionRepo;
use tracker_repo::user_repo::{NewUser, UserId, UserRepo};

pub mod generator;

pub fn build_repos() -> (Arc<dyn TransactionRepo>, Arc<dyn UserRepo>) {
    tracker_repo::mem_repo::create_repos()
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
                password_hash: "not a real hash".to_owned(),
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
