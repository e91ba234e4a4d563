//! Infrastructure Layer
//!
//! `UserStore` backends.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;
