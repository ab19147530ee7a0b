pub mod db;
pub mod models;
pub mod schema;
pub mod seed;
pub mod store;

mod error;
mod labels;
mod notes;

pub use error::Error;
pub use store::{BoxFuture, Store};

pub type Result<T, E = Error> = std::result::Result<T, E>;
