pub mod auth;
pub mod checkin;
pub mod db;
pub mod errors;
pub mod grant;
pub mod handlers;
pub mod ledger;
pub mod models;
