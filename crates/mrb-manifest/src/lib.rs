pub mod model;
pub mod parse;
pub mod write;

pub use model::*;
pub use parse::*;
pub use write::*;
