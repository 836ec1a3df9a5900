//! 請購單模型（外部單據，僅引用）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::config::RequestType;
use crate::forecast::DocStatus;

/// 請購單明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequestLine {
    /// 明細ID
    pub id: Uuid,

    /// 原物料ID
    pub item_code: String,

    /// 請購數量
    pub qty: Decimal,

    /// 需求日期
    pub schedule_date: Option<NaiveDate>,

    /// 目標倉庫
    pub warehouse: Option<String>,

    /// 來源彙總單（反向引用）
    pub forecast_club: Option<String>,
}

impl PurchaseRequestLine {
    /// 創建新的請購明細
    pub fn new(item_code: impl Into<String>, qty: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_code: item_code.into(),
            qty,
            schedule_date: None,
            warehouse: None,
            forecast_club: None,
        }
    }

    /// 建構器模式：設置需求日期
    pub fn with_schedule_date(mut self, date: Option<NaiveDate>) -> Self {
        self.schedule_date = date;
        self
    }

    /// 建構器模式：設置目標倉庫
    pub fn with_warehouse(mut self, warehouse: Option<String>) -> Self {
        self.warehouse = warehouse;
        self
    }

    /// 建構器模式：設置來源彙總單
    pub fn with_forecast_club(mut self, club: impl Into<String>) -> Self {
        self.forecast_club = Some(club.into());
        self
    }
}

/// 待建立的請購單（尚未取得單據名稱）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPurchaseRequest {
    pub request_type: RequestType,
    pub company: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub schedule_date: Option<NaiveDate>,
    pub lines: Vec<PurchaseRequestLine>,
}

/// 已建立的請購單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// 單據名稱
    pub name: String,

    pub request_type: RequestType,
    pub company: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub schedule_date: Option<NaiveDate>,

    /// 單據狀態
    pub docstatus: DocStatus,

    pub lines: Vec<PurchaseRequestLine>,
}

impl PurchaseRequest {
    /// 由待建立單據產生已建立單據
    pub fn from_new(name: impl Into<String>, request: NewPurchaseRequest) -> Self {
        Self {
            name: name.into(),
            request_type: request.request_type,
            company: request.company,
            transaction_date: request.transaction_date,
            schedule_date: request.schedule_date,
            docstatus: DocStatus::Submitted,
            lines: request.lines,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.docstatus.is_cancelled()
    }

    /// 取消並產生取消事件
    pub fn cancel(&mut self) -> PurchaseRequestCancelled {
        self.docstatus = DocStatus::Cancelled;
        PurchaseRequestCancelled {
            request_name: self.name.clone(),
            lines: self.lines.clone(),
        }
    }
}

/// 請購單取消事件（由單據儲存層送達狀態機）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequestCancelled {
    /// 被取消的請購單
    pub request_name: String,

    /// 被取消請購單的明細
    pub lines: Vec<PurchaseRequestLine>,
}

impl PurchaseRequestCancelled {
    /// 明細引用到的彙總單（去重、排序）
    pub fn referenced_clubs(&self) -> BTreeSet<&str> {
        self.lines
            .iter()
            .filter_map(|line| line.forecast_club.as_deref())
            .filter(|club| !club.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_clubs_are_distinct() {
        let event = PurchaseRequestCancelled {
            request_name: "MR-00001".to_string(),
            lines: vec![
                PurchaseRequestLine::new("FLOUR", Decimal::from(10)).with_forecast_club("FC-0002"),
                PurchaseRequestLine::new("SUGAR", Decimal::from(5)).with_forecast_club("FC-0001"),
                PurchaseRequestLine::new("EGG", Decimal::from(5)).with_forecast_club("FC-0002"),
                PurchaseRequestLine::new("SALT", Decimal::from(1)),
            ],
        };

        let clubs: Vec<_> = event.referenced_clubs().into_iter().collect();
        assert_eq!(clubs, vec!["FC-0001", "FC-0002"]);
    }

    #[test]
    fn test_cancel_marks_request() {
        let mut request = PurchaseRequest::from_new(
            "MR-00001",
            NewPurchaseRequest {
                request_type: RequestType::Purchase,
                company: Some("Acme".to_string()),
                transaction_date: None,
                schedule_date: None,
                lines: vec![PurchaseRequestLine::new("FLOUR", Decimal::from(10))],
            },
        );
        assert!(!request.is_cancelled());

        let event = request.cancel();
        assert!(request.is_cancelled());
        assert_eq!(event.request_name, "MR-00001");
        assert_eq!(event.lines.len(), 1);
    }
}
