//! # Forecast Store
//!
//! 記憶體內的單據儲存層實作（測試與示範用）

pub mod memory;

// Re-export 主要類型
pub use memory::MemoryStore;
