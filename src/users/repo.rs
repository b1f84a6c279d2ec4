use async_trait::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{User, UserUpdate};

/// Storage collaborator for user records. Lookup absence is an empty
/// result or `None`, never an error; errors are infrastructure failures.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users whose email matches exactly.
    async fn find(&self, email: &str) -> anyhow::Result<Vec<User>>;
    /// Persist a new user; the store assigns the id.
    async fn create(&self, email: &str, password: &str) -> anyhow::Result<User>;
    async fn find_one(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn update(&self, id: i64, changes: UserUpdate) -> anyhow::Result<Option<User>>;
    async fn remove(&self, id: i64) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, email: &str) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn create(&self, email: &str, password: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password)
            VALUES ($1, $2)
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(email)
        .bind(password)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_one(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password = COALESCE($3, password)
            WHERE id = $1
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn remove(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, email, password, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
