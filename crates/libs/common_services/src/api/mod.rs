pub mod auth;
pub mod error;
pub mod interactions;
pub mod interfaces;
pub mod photos;
pub mod policy;
pub mod storage;
pub mod users;
pub mod validation;
