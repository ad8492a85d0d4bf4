use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::user::{UserCreateInput, UserRecord};

impl TryFrom<&Row<'_>> for UserRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password: row.get("password")?,
            name: row.get("name")?,
            email: row.get("email")?,
            avatar: row.get("avatar")?,
        })
    }
}

pub struct UserRepository;

impl UserRepository {
    pub fn get_by_id(conn: &Connection, id: i64) -> AppResult<Option<UserRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, username, password, name, email, avatar FROM users WHERE id = ?1",
        )?;

        let row = stmt
            .query_row([id], |row| UserRecord::try_from(row))
            .optional()?;

        Ok(row)
    }

    pub fn get_by_username(conn: &Connection, username: &str) -> AppResult<Option<UserRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, username, password, name, email, avatar FROM users WHERE username = ?1",
        )?;

        let row = stmt
            .query_row([username], |row| UserRecord::try_from(row))
            .optional()?;

        Ok(row)
    }

    pub fn insert(conn: &Connection, input: &UserCreateInput) -> AppResult<UserRecord> {
        conn.execute(
            r#"
                INSERT INTO users (username, password, name, email, avatar)
                VALUES (:username, :password, :name, :email, :avatar)
            "#,
            named_params! {
                ":username": input.username,
                ":password": input.password,
                ":name": input.name,
                ":email": input.email,
                ":avatar": input.avatar,
            },
        )?;

        Ok(UserRecord {
            id: conn.last_insert_rowid(),
            username: input.username.clone(),
            password: input.password.clone(),
            name: input.name.clone(),
            email: input.email.clone(),
            avatar: input.avatar.clone(),
        })
    }
}
