pub mod claims;
pub mod context;
pub mod user;
