pub mod constants;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod signals;
