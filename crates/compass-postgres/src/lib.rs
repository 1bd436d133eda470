pub mod backend;
pub mod error;
pub mod schema;

pub use backend::PgBackend;
