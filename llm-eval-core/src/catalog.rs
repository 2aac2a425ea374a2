pub mod models;
pub mod tasks;

pub use models::*;
pub use tasks::*;
