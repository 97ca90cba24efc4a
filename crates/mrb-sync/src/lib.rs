pub mod resolve;
pub mod sync;
pub mod timeline;
pub mod util;
pub mod workspace;

pub use timeline::*;
pub use util::*;
pub use workspace::*;
