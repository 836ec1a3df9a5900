//! # Forecast Core
//!
//! 預測彙總、BOM 展開與請購的核心資料模型與類型定義

pub mod bom;
pub mod club;
pub mod config;
pub mod forecast;
pub mod inventory;
pub mod purchase;
pub mod store;

// Re-export 主要類型
pub use bom::{Bom, BomLine};
pub use club::{ClubForecastItem, ClubStatus, ForecastClub, MaterialRequirement};
pub use config::{PlannerConfig, RequestType};
pub use forecast::{DocStatus, ForecastKey, ForecastLine, SalespersonForecast};
pub use inventory::{StockBin, Warehouse};
pub use purchase::{
    NewPurchaseRequest, PurchaseRequest, PurchaseRequestCancelled, PurchaseRequestLine,
};
pub use store::DocumentStore;

use chrono::NaiveDate;

/// 計劃錯誤類型
///
/// 阻斷性錯誤：回傳時操作中止，且不會留下部分修改。
/// 建議性狀況（缺 BOM、無匹配預測等）不屬於此類型，見 `forecast_calc::Outcome`。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    #[error("{0}")]
    MissingField(String),

    #[error("Forecast End Date ({end}) cannot be before Forecast Start Date ({start})")]
    DateOrderViolation { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    EmptyCollection(String),

    #[error("{}", duplicate_message(.row, .first_row, .item_code, .customer))]
    DuplicateKey {
        row: usize,
        first_row: usize,
        item_code: String,
        customer: Option<String>,
    },

    #[error("{0}")]
    StateViolation(String),

    #[error("{0}")]
    DuplicateOperation(String),

    #[error("找不到單據: {0}")]
    NotFound(String),

    #[error("單據儲存錯誤: {0}")]
    Store(String),

    #[error("無效的設定: {0}")]
    InvalidConfig(String),
}

impl PlanningError {
    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn state_violation(msg: impl Into<String>) -> Self {
        Self::StateViolation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// 是否為使用者可修正的阻斷性錯誤（相對於儲存層故障）
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::InvalidConfig(_))
    }
}

pub type Result<T> = std::result::Result<T, PlanningError>;

/// 有客戶與無客戶的重複行各用各自的訊息
fn duplicate_message(
    row: &usize,
    first_row: &usize,
    item_code: &str,
    customer: &Option<String>,
) -> String {
    match customer {
        Some(customer) => format!(
            "Row #{row}: Duplicate entry found for Item Code '{item_code}' and Customer '{customer}'. Same combination exists in Row #{first_row}"
        ),
        None => format!(
            "Row #{row}: Duplicate Item Code '{item_code}' found. Same item exists in Row #{first_row}"
        ),
    }
}
