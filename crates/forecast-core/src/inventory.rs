//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 倉庫
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// 倉庫ID
    pub name: String,

    /// 所屬公司
    pub company: String,
}

impl Warehouse {
    pub fn new(name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
        }
    }
}

/// 庫存紀錄（物料 × 倉庫）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBin {
    /// 物料ID
    pub item_code: String,

    /// 倉庫ID
    pub warehouse: String,

    /// 現有庫存
    pub actual_qty: Decimal,
}

impl StockBin {
    /// 創建新的庫存紀錄
    pub fn new(item_code: impl Into<String>, warehouse: impl Into<String>, actual_qty: Decimal) -> Self {
        Self {
            item_code: item_code.into(),
            warehouse: warehouse.into(),
            actual_qty,
        }
    }

    /// 是否為指定物料與倉庫
    pub fn is_for(&self, item_code: &str, warehouse: &str) -> bool {
        self.item_code == item_code && self.warehouse == warehouse
    }
}
