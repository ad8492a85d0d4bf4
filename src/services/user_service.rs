use crate::db::repositories::user_repository::UserRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::user::{UserCreateInput, UserRecord};

#[derive(Clone)]
pub struct UserService {
    db: DbPool,
}

impl UserService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn get_by_id(&self, id: i64) -> AppResult<Option<UserRecord>> {
        self.db
            .with_connection(|conn| UserRepository::get_by_id(conn, id))
    }

    pub fn get_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.db
            .with_connection(|conn| UserRepository::get_by_username(conn, username))
    }

    pub fn create(&self, input: UserCreateInput) -> AppResult<UserRecord> {
        self.db
            .with_connection(|conn| UserRepository::insert(conn, &input))
    }
}
