use manege_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{
        card::CreditCard,
        customer::Customer,
        dependent::Dependent,
        lesson::{NewLessonParams, RecurringLesson, RosterEntry},
        transaction::CustomerTransaction,
    },
    domain::ports::{EmailService, PaymentLink, PaymentService},
    error::AppError,
    infra::repositories::{
        sqlite_api_key_repo::SqliteApiKeyRepo,
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_card_repo::SqliteCardRepo,
        sqlite_customer_repo::SqliteCustomerRepo,
        sqlite_dependent_repo::SqliteDependentRepo,
        sqlite_lesson_repo::SqliteLessonRepo,
        sqlite_transaction_repo::SqliteTransactionRepo,
    },
    state::AppState,
};
use axum::Router;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tera::Tera;
use uuid::Uuid;

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str, _text_body: &str) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MockPaymentService;

#[async_trait]
impl PaymentService for MockPaymentService {
    async fn create_payment_link(
        &self,
        _amount_cents: i64,
        _description: &str,
        _customer_email: &str,
        _customer_name: &str,
    ) -> Result<PaymentLink, AppError> {
        Ok(PaymentLink {
            payment_id: "pay_test_1".to_string(),
            payment_url: "https://pay.example/pay_test_1".to_string(),
        })
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(StdDuration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "payment_link.html",
            "<html>Betaalverzoek voor {{ customer_name }}: {{ payment_url }}</html>",
        )
        .unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            payment_service_url: "http://localhost".to_string(),
            payment_service_key: "key".to_string(),
        };

        let state = Arc::new(AppState {
            config,
            customer_repo: Arc::new(SqliteCustomerRepo::new(pool.clone())),
            dependent_repo: Arc::new(SqliteDependentRepo::new(pool.clone())),
            lesson_repo: Arc::new(SqliteLessonRepo::new(pool.clone())),
            card_repo: Arc::new(SqliteCardRepo::new(pool.clone())),
            attendance_repo: Arc::new(SqliteAttendanceRepo::new(pool.clone())),
            transaction_repo: Arc::new(SqliteTransactionRepo::new(pool.clone())),
            api_key_repo: Arc::new(SqliteApiKeyRepo::new(pool.clone())),
            email_service: Arc::new(MockEmailService),
            payment_service: Arc::new(MockPaymentService),
            templates,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_customer(&self, name: &str) -> Customer {
        let customer = Customer::new(
            name.to_string(),
            format!("{}@example.com", name),
            "RIDING_SCHOOL".to_string(),
        );
        self.state.customer_repo.create(&customer).await.unwrap()
    }

    pub async fn seed_dependent(&self, customer: &Customer, name: &str) -> Dependent {
        let dependent = Dependent::new(customer.id.clone(), name.to_string());
        self.state.dependent_repo.create(&dependent).await.unwrap()
    }

    pub async fn seed_lesson(&self, day_of_week: i32, max_participants: i32) -> RecurringLesson {
        let lesson = RecurringLesson::new(NewLessonParams {
            day_of_week,
            start_time: "10:00".to_string(),
            duration_min: 60,
            lesson_type: "group".to_string(),
            instructor: "Eva".to_string(),
            max_participants,
        });
        self.state.lesson_repo.create(&lesson).await.unwrap()
    }

    pub async fn seed_roster_entry(
        &self,
        lesson: &RecurringLesson,
        customer: &Customer,
        dependent_id: Option<String>,
    ) -> RosterEntry {
        let entry = RosterEntry::new(lesson.id.clone(), customer.id.clone(), dependent_id);
        self.state.lesson_repo.add_roster_entry(&entry).await.unwrap()
    }

    pub async fn seed_card(&self, customer: &Customer, total_credits: i32, days_valid: i64) -> CreditCard {
        let today = Utc::now().date_naive();
        let card = CreditCard::new(
            customer.id.clone(),
            total_credits,
            today - Duration::days(1),
            today + Duration::days(days_valid),
        );
        self.state.card_repo.create(&card).await.unwrap()
    }

    pub async fn seed_open_transaction(&self, customer: &Customer, description: &str, amount_cents: i64) -> CustomerTransaction {
        let transaction = CustomerTransaction::new(
            customer.id.clone(),
            description.to_string(),
            amount_cents,
        );
        self.state.transaction_repo.create(&transaction).await.unwrap()
    }
}

/// Next calendar date (today or later) falling on the given 0=Monday weekday.
#[allow(dead_code)]
pub fn next_date_for_weekday(day_of_week: i32) -> NaiveDate {
    let mut date = Utc::now().date_naive();
    while date.format("%u").to_string() != format!("{}", day_of_week + 1) {
        date += Duration::days(1);
    }
    date
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
