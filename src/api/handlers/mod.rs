pub mod health;
pub mod card;
pub mod roster;
pub mod attendance;
pub mod customer;
pub mod transaction;
pub mod portal;
