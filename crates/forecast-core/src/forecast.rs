//! 業務員銷售預測模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單據狀態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocStatus {
    /// 草稿
    #[default]
    Draft,
    /// 已提交
    Submitted,
    /// 已取消
    Cancelled,
}

impl DocStatus {
    pub fn is_submitted(self) -> bool {
        self == DocStatus::Submitted
    }

    pub fn is_cancelled(self) -> bool {
        self == DocStatus::Cancelled
    }
}

/// 預測明細行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastLine {
    /// 物料ID
    pub item_code: String,

    /// 物料名稱
    pub item_name: String,

    /// 客戶（可空）
    pub customer: Option<String>,

    pub week_1: Option<Decimal>,
    pub week_2: Option<Decimal>,
    pub week_3: Option<Decimal>,
    pub week_4: Option<Decimal>,
}

impl ForecastLine {
    /// 創建新的預測明細
    pub fn new(item_code: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            customer: None,
            week_1: None,
            week_2: None,
            week_3: None,
            week_4: None,
        }
    }

    /// 建構器模式：設置客戶
    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// 建構器模式：設置四週數量
    pub fn with_weeks(mut self, weeks: [Decimal; 4]) -> Self {
        self.week_1 = Some(weeks[0]);
        self.week_2 = Some(weeks[1]);
        self.week_3 = Some(weeks[2]);
        self.week_4 = Some(weeks[3]);
        self
    }

    /// 客戶（空字串視同未填）
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// 四週數量，未填視為 0
    pub fn weeks(&self) -> [Decimal; 4] {
        [self.week_1, self.week_2, self.week_3, self.week_4].map(|w| w.unwrap_or_default())
    }
}

/// 預測查詢鍵（起訖日期 + 公司，需完全相符）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastKey {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub company: String,
}

/// 業務員銷售預測單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalespersonForecast {
    /// 單據名稱
    pub name: String,

    pub forecast_start_date: Option<NaiveDate>,
    pub forecast_end_date: Option<NaiveDate>,

    /// 公司
    pub company: Option<String>,

    /// 單據狀態
    pub docstatus: DocStatus,

    /// 預測明細
    pub lines: Vec<ForecastLine>,
}

impl SalespersonForecast {
    /// 創建新的預測單（草稿）
    pub fn new(
        name: impl Into<String>,
        forecast_start_date: NaiveDate,
        forecast_end_date: NaiveDate,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            forecast_start_date: Some(forecast_start_date),
            forecast_end_date: Some(forecast_end_date),
            company: Some(company.into()),
            docstatus: DocStatus::Draft,
            lines: Vec::new(),
        }
    }

    /// 建構器模式：設置明細
    pub fn with_lines(mut self, lines: Vec<ForecastLine>) -> Self {
        self.lines = lines;
        self
    }

    /// 建構器模式：設置為已提交
    pub fn as_submitted(mut self) -> Self {
        self.docstatus = DocStatus::Submitted;
        self
    }

    /// 檢查是否符合查詢鍵
    pub fn matches(&self, key: &ForecastKey) -> bool {
        self.forecast_start_date == Some(key.start)
            && self.forecast_end_date == Some(key.end)
            && self.company.as_deref() == Some(key.company.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_customer_is_absent() {
        let line = ForecastLine::new("CAKE-01", "Cake").with_customer("  ");
        assert_eq!(line.customer(), None);

        let line = ForecastLine::new("CAKE-01", "Cake").with_customer("CUST-A");
        assert_eq!(line.customer(), Some("CUST-A"));
    }

    #[test]
    fn test_weeks_default_to_zero() {
        let mut line = ForecastLine::new("CAKE-01", "Cake");
        line.week_2 = Some(Decimal::from(7));

        assert_eq!(
            line.weeks(),
            [Decimal::ZERO, Decimal::from(7), Decimal::ZERO, Decimal::ZERO]
        );
    }

    #[test]
    fn test_forecast_matches_key() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 29).unwrap();
        let forecast = SalespersonForecast::new("FSP-0001", start, end, "Acme");

        let key = ForecastKey {
            start,
            end,
            company: "Acme".to_string(),
        };
        assert!(forecast.matches(&key));

        let other = ForecastKey {
            company: "Other".to_string(),
            ..key
        };
        assert!(!forecast.matches(&other));
    }
}
