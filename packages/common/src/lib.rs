pub mod error;
pub mod result;
pub mod tokens;
pub mod variables;
pub mod visitor;

pub use error::*;
pub use result::*;
pub use tokens::*;
pub use variables::*;
pub use visitor::*;
