pub mod config;
pub mod error;
pub mod event;
pub mod ident;
pub mod params;
pub mod store;
pub mod ua;
