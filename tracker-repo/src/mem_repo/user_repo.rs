use crate::user_repo::UserRepoError::{UserAlreadyExists, UserNotFound};
use crate::user_repo::{NewUser, User, UserRepo, UserRepoError};
use anyhow::anyhow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    users: HashMap<String, User>,
    next_id: i32,
}

pub struct MemUserRepo {
    state: RwLock<State>,
}

impl MemUserRepo {
    pub fn new() -> MemUserRepo {
        let state = State {
            users: HashMap::new(),
            next_id: 1,
        };
        MemUserRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait::async_trait]
impl UserRepo for MemUserRepo {
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| UserNotFound(username.to_owned()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;
        let state = &mut *write_guard;

        let id = state.next_id;
        match state.users.entry(new_user.username) {
            Entry::Occupied(e) => Err(UserAlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                let user = User {
                    id,
                    username: e.key().clone(),
                    password_hash: new_user.password_hash,
                };
                e.insert(user.clone());
                state.next_id += 1;
                Ok(user)
            }
        }
    }
}
