use crate::domain::models::{
    customer::Customer, dependent::Dependent, lesson::{RecurringLesson, RosterEntry},
    card::CreditCard, attendance::AttendanceRecord, transaction::CustomerTransaction,
    api_key::ApiKey,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Customer>, AppError>;
}

#[async_trait]
pub trait DependentRepository: Send + Sync {
    async fn create(&self, dependent: &Dependent) -> Result<Dependent, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Dependent>, AppError>;
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Dependent>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Dependent>, AppError>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    async fn create(&self, lesson: &RecurringLesson) -> Result<RecurringLesson, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<RecurringLesson>, AppError>;
    async fn add_roster_entry(&self, entry: &RosterEntry) -> Result<RosterEntry, AppError>;
    async fn list_roster_entries(&self, lesson_id: &str) -> Result<Vec<RosterEntry>, AppError>;
    async fn delete_roster_entry(&self, lesson_id: &str, entry_id: &str) -> Result<(), AppError>;
    /// Lessons the customer is rostered into, directly or through one of
    /// their dependents, paired with the entry that puts them there.
    async fn list_rostered_for_customer(&self, customer_id: &str) -> Result<Vec<(RecurringLesson, RosterEntry)>, AppError>;
}

#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn create(&self, card: &CreditCard) -> Result<CreditCard, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CreditCard>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<CreditCard>, AppError>;
    /// ACTIVE cards still valid on `as_of`. Expiry is derived at read time,
    /// so a stored ACTIVE row past its valid_until does not count.
    async fn find_active_by_customer(&self, customer_id: &str, as_of: NaiveDate) -> Result<Vec<CreditCard>, AppError>;
    /// ACTIVE card still valid on `on_date`, soonest expiry first, so cards
    /// closest to their end date are consumed before fresher ones.
    async fn find_deduction_card(&self, customer_id: &str, on_date: NaiveDate) -> Result<Option<CreditCard>, AppError>;
    /// Atomic conditional decrement. Never read-then-write.
    async fn deduct(&self, card_id: &str, count: i32) -> Result<CreditCard, AppError>;
    /// Atomic conditional increment, inverse of deduct.
    async fn restore(&self, card_id: &str, count: i32) -> Result<CreditCard, AppError>;
    async fn remaining_for_customer(&self, customer_id: &str, as_of: NaiveDate) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn create(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError>;
    async fn list_by_occurrence(&self, occurrence_id: &str) -> Result<Vec<AttendanceRecord>, AppError>;
    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, AppError>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, transaction: &CustomerTransaction) -> Result<CustomerTransaction, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CustomerTransaction>, AppError>;
    async fn list_open_by_customer(&self, customer_id: &str) -> Result<Vec<CustomerTransaction>, AppError>;
    async fn set_payment_id(&self, id: &str, payment_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create(&self, key: &ApiKey) -> Result<ApiKey, AppError>;
    async fn find_by_key(&self, api_key: &str) -> Result<Option<ApiKey>, AppError>;
    async fn touch_last_used(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct PaymentLink {
    pub payment_id: String,
    pub payment_url: String,
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_payment_link(
        &self,
        amount_cents: i64,
        description: &str,
        customer_email: &str,
        customer_name: &str,
    ) -> Result<PaymentLink, AppError>;
}
