use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub points: f64,
    pub wallet_address: String,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, points, wallet_address,
                   reset_token, reset_token_expires, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password and a zero points balance.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, points, wallet_address,
                      reset_token, reset_token_expires, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Store a pending reset token and its expiry on the account.
    pub async fn set_reset_token(
        db: &PgPool,
        email: &str,
        token: &str,
        expires: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expires = $3 WHERE email = $1",
        )
        .bind(email)
        .bind(token)
        .bind(expires)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Consume a reset token: one conditional UPDATE matches the token while
    /// it is still valid, installs the new hash, and clears both token
    /// columns so the token cannot be used twice. Returns `false` when the
    /// token is unknown, expired, or already consumed.
    pub async fn consume_reset_token(
        db: &PgPool,
        token: &str,
        new_password_hash: &str,
    ) -> anyhow::Result<bool> {
        let row = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL, reset_token_expires = NULL
            WHERE reset_token = $1 AND reset_token_expires > now()
            RETURNING id
            "#,
        )
        .bind(token)
        .bind(new_password_hash)
        .fetch_optional(db)
        .await?;
        Ok(row.is_some())
    }

    pub async fn points(db: &PgPool, email: &str) -> anyhow::Result<Option<f64>> {
        let points = sqlx::query_scalar::<_, f64>("SELECT points FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(points)
    }

    /// Single atomic increment; returns the new balance, or `None` when no
    /// account matches.
    pub async fn add_points(db: &PgPool, email: &str, amount: f64) -> anyhow::Result<Option<f64>> {
        let points = sqlx::query_scalar::<_, f64>(
            "UPDATE users SET points = points + $2 WHERE email = $1 RETURNING points",
        )
        .bind(email)
        .bind(amount)
        .fetch_optional(db)
        .await?;
        Ok(points)
    }

    pub async fn wallet(db: &PgPool, email: &str) -> anyhow::Result<Option<String>> {
        let wallet =
            sqlx::query_scalar::<_, String>("SELECT wallet_address FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(db)
                .await?;
        Ok(wallet)
    }

    /// Returns `false` when no account matched the email.
    pub async fn save_wallet(db: &PgPool, email: &str, address: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE users SET wallet_address = $2 WHERE email = $1")
            .bind(email)
            .bind(address)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[sqlx::test]
    async fn duplicate_email_is_a_unique_violation(pool: PgPool) {
        User::create(&pool, "dup@example.com", "hash-one")
            .await
            .expect("first signup");

        let err = User::create(&pool, "dup@example.com", "hash-two")
            .await
            .expect_err("second signup with same email");
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("expected a database error, got {other}"),
        }
    }

    #[sqlx::test]
    async fn reset_token_is_consumed_exactly_once(pool: PgPool) {
        User::create(&pool, "carol@example.com", "old-hash")
            .await
            .expect("signup");
        let expires = OffsetDateTime::now_utc() + Duration::hours(1);
        User::set_reset_token(&pool, "carol@example.com", "tok-valid", expires)
            .await
            .expect("set token");

        assert!(User::consume_reset_token(&pool, "tok-valid", "new-hash")
            .await
            .expect("first consume"));
        // the same token a second time finds no matching row
        assert!(!User::consume_reset_token(&pool, "tok-valid", "later-hash")
            .await
            .expect("second consume"));

        let user = User::find_by_email(&pool, "carol@example.com")
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(user.password_hash, "new-hash");
        assert!(user.reset_token.is_none());
        assert!(user.reset_token_expires.is_none());
    }

    #[sqlx::test]
    async fn expired_reset_token_is_rejected(pool: PgPool) {
        User::create(&pool, "dave@example.com", "old-hash")
            .await
            .expect("signup");
        let expired = OffsetDateTime::now_utc() - Duration::minutes(5);
        User::set_reset_token(&pool, "dave@example.com", "tok-stale", expired)
            .await
            .expect("set token");

        assert!(!User::consume_reset_token(&pool, "tok-stale", "new-hash")
            .await
            .expect("consume"));

        let user = User::find_by_email(&pool, "dave@example.com")
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(user.password_hash, "old-hash");
    }

    #[sqlx::test]
    async fn add_points_increments_balance(pool: PgPool) {
        let user = User::create(&pool, "erin@example.com", "hash")
            .await
            .expect("signup");
        assert_eq!(user.points, 0.0);

        let balance = User::add_points(&pool, "erin@example.com", 10.0)
            .await
            .expect("add")
            .expect("user exists");
        assert_eq!(balance, 10.0);

        let balance = User::add_points(&pool, "erin@example.com", 2.5)
            .await
            .expect("add")
            .expect("user exists");
        assert_eq!(balance, 12.5);

        assert_eq!(
            User::points(&pool, "erin@example.com").await.expect("read"),
            Some(12.5)
        );
        assert_eq!(
            User::add_points(&pool, "nobody@example.com", 1.0)
                .await
                .expect("add"),
            None
        );
    }
}
