pub mod email;
pub mod payments;
pub mod factory;
pub mod repositories;
