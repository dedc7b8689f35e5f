pub mod sqlite_customer_repo;
pub mod sqlite_dependent_repo;
pub mod sqlite_lesson_repo;
pub mod sqlite_card_repo;
pub mod sqlite_attendance_repo;
pub mod sqlite_transaction_repo;
pub mod sqlite_api_key_repo;

pub mod postgres_customer_repo;
pub mod postgres_dependent_repo;
pub mod postgres_lesson_repo;
pub mod postgres_card_repo;
pub mod postgres_attendance_repo;
pub mod postgres_transaction_repo;
pub mod postgres_api_key_repo;
