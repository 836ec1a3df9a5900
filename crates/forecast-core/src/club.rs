//! 預測彙總單（Forecast Club）模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::forecast::{DocStatus, ForecastKey};

/// 彙總單計劃狀態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已提交，預測已計劃
    ForecastPlanned,
    /// 已建立請購單
    MaterialRequested,
}

impl ClubStatus {
    pub fn label(self) -> &'static str {
        match self {
            ClubStatus::Draft => "Draft",
            ClubStatus::ForecastPlanned => "Forecast Planned",
            ClubStatus::MaterialRequested => "Material Requested",
        }
    }
}

impl std::fmt::Display for ClubStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 彙總單物料行（成品）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubForecastItem {
    /// 物料ID
    pub item_code: String,

    /// 物料名稱
    pub item_name: String,

    /// 預設 BOM
    pub bom: Option<String>,

    pub week_1: Option<Decimal>,
    pub week_2: Option<Decimal>,
    pub week_3: Option<Decimal>,
    pub week_4: Option<Decimal>,

    pub w1_batch: Option<Decimal>,
    pub w2_batch: Option<Decimal>,
    pub w3_batch: Option<Decimal>,
    pub w4_batch: Option<Decimal>,

    /// 每批數量
    pub batch_size: Option<Decimal>,

    /// 總批數（衍生欄位，儲存前重算）
    pub total_batch_qty: Decimal,

    /// 總數量（衍生欄位，儲存前重算）
    pub total_qty: Option<Decimal>,
}

impl ClubForecastItem {
    /// 創建新的物料行
    pub fn new(item_code: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            ..Default::default()
        }
    }

    /// 建構器模式：設置 BOM
    pub fn with_bom(mut self, bom: impl Into<String>) -> Self {
        self.bom = Some(bom.into());
        self
    }

    /// 建構器模式：設置四週預測數量
    pub fn with_weeks(mut self, weeks: [Decimal; 4]) -> Self {
        self.week_1 = Some(weeks[0]);
        self.week_2 = Some(weeks[1]);
        self.week_3 = Some(weeks[2]);
        self.week_4 = Some(weeks[3]);
        self
    }

    /// 建構器模式：設置四週批數
    pub fn with_batches(mut self, batches: [Decimal; 4]) -> Self {
        self.w1_batch = Some(batches[0]);
        self.w2_batch = Some(batches[1]);
        self.w3_batch = Some(batches[2]);
        self.w4_batch = Some(batches[3]);
        self
    }

    /// 建構器模式：設置每批數量
    pub fn with_batch_size(mut self, batch_size: Decimal) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// 建構器模式：直接設置總數量（手動輸入）
    pub fn with_total_qty(mut self, total_qty: Decimal) -> Self {
        self.total_qty = Some(total_qty);
        self
    }

    /// 四週預測數量，未填視為 0
    pub fn weeks(&self) -> [Decimal; 4] {
        [self.week_1, self.week_2, self.week_3, self.week_4].map(|w| w.unwrap_or_default())
    }

    /// 四週批數，未填視為 0
    pub fn batches(&self) -> [Decimal; 4] {
        [self.w1_batch, self.w2_batch, self.w3_batch, self.w4_batch]
            .map(|b| b.unwrap_or_default())
    }

    /// 批數合計
    pub fn batch_sum(&self) -> Decimal {
        self.batches().iter().copied().sum()
    }

    /// 是否有可展開的數量
    pub fn has_quantity(&self) -> bool {
        self.total_qty.is_some_and(|q| !q.is_zero())
    }
}

/// 原物料需求行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    /// 原物料ID
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// BOM 展開後的總需求
    pub bom_qty: Decimal,

    /// 單位
    pub uom: Option<String>,

    /// 目標倉庫現有庫存
    pub actual_qty: Decimal,

    /// 公司所有倉庫庫存合計
    pub company_total_stock: Decimal,
}

impl MaterialRequirement {
    /// 淨需求（可能為負，表示庫存充足）
    pub fn qty_needed(&self) -> Decimal {
        self.bom_qty - self.actual_qty
    }
}

/// 預測彙總單（聚合根）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastClub {
    /// 單據名稱（請購單反向引用此值）
    pub name: String,

    pub forecast_start_date: Option<NaiveDate>,
    pub forecast_end_date: Option<NaiveDate>,

    /// 單據日期
    pub transaction_date: Option<NaiveDate>,

    /// 公司
    pub company: Option<String>,

    /// 目標倉庫
    pub set_warehouse: Option<String>,

    /// 單據狀態
    pub docstatus: DocStatus,

    /// 計劃狀態
    pub status: ClubStatus,

    /// 成品物料行
    pub items: Vec<ClubForecastItem>,

    /// 原物料需求行
    pub material_request_items: Vec<MaterialRequirement>,
}

impl ForecastClub {
    /// 創建新的彙總單（草稿）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forecast_start_date: None,
            forecast_end_date: None,
            transaction_date: None,
            company: None,
            set_warehouse: None,
            docstatus: DocStatus::Draft,
            status: ClubStatus::Draft,
            items: Vec::new(),
            material_request_items: Vec::new(),
        }
    }

    /// 建構器模式：設置預測期間
    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.forecast_start_date = Some(start);
        self.forecast_end_date = Some(end);
        self
    }

    /// 建構器模式：設置公司
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// 建構器模式：設置目標倉庫
    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.set_warehouse = Some(warehouse.into());
        self
    }

    /// 建構器模式：設置單據日期
    pub fn with_transaction_date(mut self, date: NaiveDate) -> Self {
        self.transaction_date = Some(date);
        self
    }

    /// 建構器模式：設置物料行
    pub fn with_items(mut self, items: Vec<ClubForecastItem>) -> Self {
        self.items = items;
        self
    }

    /// 查詢鍵；起訖日期或公司任一未填則為 None
    pub fn forecast_key(&self) -> Option<ForecastKey> {
        Some(ForecastKey {
            start: self.forecast_start_date?,
            end: self.forecast_end_date?,
            company: self.company.clone().filter(|c| !c.is_empty())?,
        })
    }

    pub fn is_submitted(&self) -> bool {
        self.docstatus.is_submitted()
    }
}
