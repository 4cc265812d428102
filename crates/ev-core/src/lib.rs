pub mod diagnostic;
pub mod error;
pub mod schema;
pub mod types;

pub use diagnostic::*;
pub use error::EvScriptError;
pub use schema::*;
pub use types::*;
