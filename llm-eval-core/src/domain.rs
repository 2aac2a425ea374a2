pub mod model;
pub mod result;
pub mod task;

pub use model::*;
pub use result::*;
pub use task::*;
