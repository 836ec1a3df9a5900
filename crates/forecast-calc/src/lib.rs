//! # Forecast Planning Engine
//!
//! 預測彙總 → BOM 展開 → 庫存淨需求 → 請購單建立

pub mod aggregation;
pub mod explosion;
pub mod lifecycle;
pub mod netting;
pub mod planner;
pub mod procurement;
pub mod validation;

// Re-export 主要類型
pub use aggregation::ForecastAggregator;
pub use explosion::BomExplosionEngine;
pub use lifecycle::{LifecycleEvent, StatusLifecycle};
pub use netting::{InventoryNetter, NetRequirement};
pub use planner::ClubPlanner;
pub use procurement::ProcurementRequestBuilder;
pub use validation::ValidationEngine;

use serde::Serialize;

/// 操作結果
///
/// 建議性狀況（無匹配預測、缺 BOM、無需請購）不視為錯誤：
/// 操作要嘛完整完成並附帶提示，要嘛在修改任何狀態前中止。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// 完成
    Completed { summary: T, notices: Vec<Notice> },
    /// 未修改任何狀態即中止
    Aborted(Notice),
}

impl<T> Outcome<T> {
    pub fn completed(summary: T, notices: Vec<Notice>) -> Self {
        Outcome::Completed { summary, notices }
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Outcome::Aborted(Notice::info(None, message))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    pub fn summary(&self) -> Option<&T> {
        match self {
            Outcome::Completed { summary, .. } => Some(summary),
            Outcome::Aborted(_) => None,
        }
    }

    /// 所有提示（中止時為中止原因）
    pub fn notices(&self) -> &[Notice] {
        match self {
            Outcome::Completed { notices, .. } => notices,
            Outcome::Aborted(notice) => std::slice::from_ref(notice),
        }
    }
}

impl<T: std::fmt::Display> Outcome<T> {
    /// 顯示給使用者的訊息
    pub fn message(&self) -> String {
        match self {
            Outcome::Completed { summary, .. } => summary.to_string(),
            Outcome::Aborted(notice) => notice.message.clone(),
        }
    }
}

/// 提示訊息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub item_code: Option<String>,
    pub message: String,
    pub severity: NoticeSeverity,
}

impl Notice {
    pub fn new(item_code: Option<String>, message: impl Into<String>, severity: NoticeSeverity) -> Self {
        Self {
            item_code,
            message: message.into(),
            severity,
        }
    }

    pub fn info(item_code: Option<String>, message: impl Into<String>) -> Self {
        Self::new(item_code, message, NoticeSeverity::Info)
    }

    pub fn warning(item_code: Option<String>, message: impl Into<String>) -> Self {
        Self::new(item_code, message, NoticeSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeSeverity {
    Info,
    Warning,
}

/// 預測彙總結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationSummary {
    /// 彙總後的物料數
    pub item_count: usize,
    /// 來源預測單數
    pub source_count: usize,
}

impl std::fmt::Display for AggregationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fetched {} items from {} sales forecasts",
            self.item_count, self.source_count
        )
    }
}

/// BOM 展開結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplosionSummary {
    /// 原物料種類數
    pub material_count: usize,
}

impl std::fmt::Display for ExplosionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fetched {} raw materials from BOMs", self.material_count)
    }
}

/// 請購單建立結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    /// 請購單名稱
    pub request_name: String,
    /// 明細數
    pub line_count: usize,
}

impl std::fmt::Display for RequestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Created Material Request: {}", self.request_name)
    }
}
