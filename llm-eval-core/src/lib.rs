pub mod catalog;
pub mod domain;
pub mod error;
pub mod prompts;

pub use catalog::*;
pub use domain::*;
pub use error::*;
pub use prompts::*;
