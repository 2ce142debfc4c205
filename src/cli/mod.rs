pub mod auth;
pub mod convert;
pub mod country;
pub mod listings;
pub mod predict;
pub mod rates;
pub mod setup;
pub mod ui;
