pub mod bisect;
pub mod entry;
pub mod error;
pub mod render;

pub use bisect::*;
pub use entry::*;
pub use error::*;
pub use render::*;
