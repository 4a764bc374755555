//! Throwaway Postgres databases for service tests.
//!
//! One container is started per test binary. Every [`TestDb`] gets its own
//! freshly migrated database inside it, dropped again in the background when
//! the handle goes away.

use std::{
    env,
    sync::atomic::{AtomicUsize, Ordering},
};

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const USER: &str = "patisserie_test";
const PASSWORD: &str = "patisserie_test_password";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);
static DROPPER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);
static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Generated names only ever contain `[a-z0-9_]`; anything else is refused
/// before it is interpolated into DDL.
fn is_safe_name(name: &str) -> bool {
    (1..=63).contains(&name.len())
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

async fn start_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name("patisserie_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("failed to start postgres container")
}

async fn server_url(database: &str) -> String {
    let container = CONTAINER.get_or_init(start_container).await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to read container port");

    let host = env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".into());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn spawn_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("failed to drop test database {name}: {error}");
            }
        }
    });

    sender
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if !is_safe_name(name) {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A migrated database private to one test.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        DROPPER.get_or_init(spawn_dropper).await;

        let name = format!(
            "patisserie_{}_{}",
            std::process::id(),
            SEQUENCE.fetch_add(1, Ordering::SeqCst)
        );

        assert!(is_safe_name(&name), "generated unsafe database name {name}");

        let mut admin = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("failed to connect to maintenance database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("failed to create test database");

        admin.close().await.expect("failed to close admin connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("failed to connect to test database");

        crate::database::migrate(&pool)
            .await
            .expect("failed to migrate test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPPER.get()
            && sender.send(self.name.clone()).is_err()
        {
            eprintln!("test database {} left behind", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_names() {
        assert!(is_safe_name("patisserie_12_0"), "generated form");
        assert!(!is_safe_name(""), "empty");
        assert!(!is_safe_name("1abc"), "leading digit");
        assert!(!is_safe_name("a\"; drop"), "quotes");
        assert!(!is_safe_name(&"a".repeat(64)), "too long");
    }

    #[tokio::test]
    #[ignore = "requires Docker"]
    async fn test_database_is_migrated() {
        let db = TestDb::new().await;

        let drafts: i64 = sqlx::query_scalar("SELECT count(*) FROM drafts")
            .fetch_one(db.pool())
            .await
            .expect("drafts table should exist");

        assert_eq!(drafts, 0, "fresh database");
    }
}
