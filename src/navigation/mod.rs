//! Platform-free navigation pieces: addresses, paths, chapter order,
//! heading sections and reading progress.

pub mod address;
pub mod paths;
pub mod chapters;
pub mod sections;
pub mod progress;

pub use address::*;
pub use paths::*;
pub use chapters::*;
pub use sections::*;
pub use progress::*;
