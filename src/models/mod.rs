pub mod target;
pub mod signals;
pub mod verdict;

pub use target::*;
pub use signals::*;
pub use verdict::*;
