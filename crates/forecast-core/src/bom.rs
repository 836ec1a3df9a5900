//! BOM 模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// BOM 明細（單位成品所需的原物料）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    /// 原物料ID
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 單位用量
    pub qty: Decimal,

    /// 交易單位
    pub uom: Option<String>,

    /// 庫存單位
    pub stock_uom: Option<String>,
}

impl BomLine {
    /// 創建新的 BOM 明細
    pub fn new(item_code: impl Into<String>, item_name: impl Into<String>, qty: Decimal) -> Self {
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            qty,
            uom: None,
            stock_uom: None,
        }
    }

    /// 建構器模式：設置交易單位
    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    /// 建構器模式：設置庫存單位
    pub fn with_stock_uom(mut self, stock_uom: impl Into<String>) -> Self {
        self.stock_uom = Some(stock_uom.into());
        self
    }

    /// 實際採用的單位：交易單位優先，缺則用庫存單位
    pub fn effective_uom(&self) -> Option<&str> {
        self.uom
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.stock_uom.as_deref())
    }
}

/// BOM 表頭
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bom {
    /// BOM 名稱
    pub name: String,

    /// 成品物料ID
    pub item: String,

    pub is_default: bool,
    pub is_active: bool,

    /// 明細（同一原物料可出現多次）
    pub lines: Vec<BomLine>,
}

impl Bom {
    /// 創建新的 BOM（預設為啟用中的預設 BOM）
    pub fn new(name: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item: item.into(),
            is_default: true,
            is_active: true,
            lines: Vec::new(),
        }
    }

    /// 建構器模式：設置明細
    pub fn with_lines(mut self, lines: Vec<BomLine>) -> Self {
        self.lines = lines;
        self
    }

    /// 建構器模式：設置預設/啟用旗標
    pub fn with_flags(mut self, is_default: bool, is_active: bool) -> Self {
        self.is_default = is_default;
        self.is_active = is_active;
        self
    }

    /// 是否可作為物料的預設 BOM
    pub fn is_default_active(&self) -> bool {
        self.is_default && self.is_active
    }
}
