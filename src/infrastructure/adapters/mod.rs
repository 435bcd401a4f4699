//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod generation;
pub mod outline;
pub mod storage;

pub use generation::*;
pub use outline::*;
pub use storage::*;
