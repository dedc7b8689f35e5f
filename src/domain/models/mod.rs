pub mod customer;
pub mod dependent;
pub mod lesson;
pub mod card;
pub mod attendance;
pub mod transaction;
pub mod api_key;
