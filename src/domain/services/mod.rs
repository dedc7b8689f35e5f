pub mod calendar;
pub mod roster;
pub mod ledger;
pub mod snapshot;
