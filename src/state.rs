use std::sync::Arc;
use crate::domain::ports::{
    CustomerRepository, DependentRepository, LessonRepository, CardRepository,
    AttendanceRepository, TransactionRepository, ApiKeyRepository,
    EmailService, PaymentService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub dependent_repo: Arc<dyn DependentRepository>,
    pub lesson_repo: Arc<dyn LessonRepository>,
    pub card_repo: Arc<dyn CardRepository>,
    pub attendance_repo: Arc<dyn AttendanceRepository>,
    pub transaction_repo: Arc<dyn TransactionRepository>,
    pub api_key_repo: Arc<dyn ApiKeyRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub templates: Arc<Tera>,
}
