//! # Forecast Planning
//!
//! 業務員銷售預測彙總、BOM 展開與請購單建立
//!
//! - `forecast_core`：資料模型、錯誤類型、儲存層介面
//! - `forecast_calc`：驗證、彙總、展開、淨需求、請購、狀態機
//! - `forecast_store`：記憶體儲存層

pub mod logging;

pub use forecast_calc::*;
pub use forecast_core::*;
pub use forecast_store::MemoryStore;
