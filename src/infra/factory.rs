use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::payments::http_payment_service::HttpPaymentService;
use crate::infra::repositories::{
    postgres_customer_repo::PostgresCustomerRepo, postgres_dependent_repo::PostgresDependentRepo,
    postgres_lesson_repo::PostgresLessonRepo, postgres_card_repo::PostgresCardRepo,
    postgres_attendance_repo::PostgresAttendanceRepo, postgres_transaction_repo::PostgresTransactionRepo,
    postgres_api_key_repo::PostgresApiKeyRepo,
    sqlite_customer_repo::SqliteCustomerRepo, sqlite_dependent_repo::SqliteDependentRepo,
    sqlite_lesson_repo::SqliteLessonRepo, sqlite_card_repo::SqliteCardRepo,
    sqlite_attendance_repo::SqliteAttendanceRepo, sqlite_transaction_repo::SqliteTransactionRepo,
    sqlite_api_key_repo::SqliteApiKeyRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let payment_service = Arc::new(HttpPaymentService::new(
        config.payment_service_url.clone(),
        config.payment_service_key.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template("payment_link.html", include_str!("../templates/payment_link.html"))
        .expect("Failed to load payment link template");
    let templates = Arc::new(tera);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            customer_repo: Arc::new(PostgresCustomerRepo::new(pool.clone())),
            dependent_repo: Arc::new(PostgresDependentRepo::new(pool.clone())),
            lesson_repo: Arc::new(PostgresLessonRepo::new(pool.clone())),
            card_repo: Arc::new(PostgresCardRepo::new(pool.clone())),
            attendance_repo: Arc::new(PostgresAttendanceRepo::new(pool.clone())),
            transaction_repo: Arc::new(PostgresTransactionRepo::new(pool.clone())),
            api_key_repo: Arc::new(PostgresApiKeyRepo::new(pool.clone())),
            email_service,
            payment_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            customer_repo: Arc::new(SqliteCustomerRepo::new(pool.clone())),
            dependent_repo: Arc::new(SqliteDependentRepo::new(pool.clone())),
            lesson_repo: Arc::new(SqliteLessonRepo::new(pool.clone())),
            card_repo: Arc::new(SqliteCardRepo::new(pool.clone())),
            attendance_repo: Arc::new(SqliteAttendanceRepo::new(pool.clone())),
            transaction_repo: Arc::new(SqliteTransactionRepo::new(pool.clone())),
            api_key_repo: Arc::new(SqliteApiKeyRepo::new(pool.clone())),
            email_service,
            payment_service,
            templates,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
