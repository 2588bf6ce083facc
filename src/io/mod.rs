pub mod extract;
pub mod input;
pub mod output;

pub use extract::*;
pub use input::*;
pub use output::*;
