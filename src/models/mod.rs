pub mod analyst;
pub mod document;
pub mod period;

pub use analyst::*;
pub use document::*;
pub use period::*;
