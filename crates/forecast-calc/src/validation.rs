//! 儲存前驗證

use chrono::NaiveDate;
use forecast_core::{
    ClubForecastItem, ForecastLine, PlanningError, Result, SalespersonForecast,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 驗證引擎（純函式，不存取儲存層）
pub struct ValidationEngine;

impl ValidationEngine {
    /// 驗證業務員預測單
    pub fn validate_forecast(forecast: &SalespersonForecast) -> Result<()> {
        Self::validate_forecast_dates(forecast.forecast_start_date, forecast.forecast_end_date)?;
        Self::validate_forecast_lines(&forecast.lines)
    }

    /// 驗證預測起訖日期
    pub fn validate_forecast_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        let start = start
            .ok_or_else(|| PlanningError::missing_field("Forecast Start Date is mandatory"))?;
        let end =
            end.ok_or_else(|| PlanningError::missing_field("Forecast End Date is mandatory"))?;

        if end < start {
            return Err(PlanningError::DateOrderViolation { start, end });
        }

        Ok(())
    }

    /// 驗證預測明細：不可為空、物料不可空白、(物料, 客戶) 不可重複
    ///
    /// 有客戶的明細以 (物料, 客戶) 判斷重複，無客戶的明細只以物料判斷，兩者互不干擾。
    pub fn validate_forecast_lines(lines: &[ForecastLine]) -> Result<()> {
        if lines.is_empty() {
            return Err(PlanningError::EmptyCollection(
                "Please add at least one item in the forecast items table".to_string(),
            ));
        }

        let mut seen_combinations: HashMap<(&str, &str), usize> = HashMap::new();
        let mut seen_items: HashMap<&str, usize> = HashMap::new();

        for (idx, line) in lines.iter().enumerate() {
            let row = idx + 1;
            let item_code = line.item_code.trim();

            if item_code.is_empty() {
                return Err(PlanningError::missing_field(format!(
                    "Row #{row}: Item Code cannot be blank"
                )));
            }

            match line.customer() {
                Some(customer) => {
                    if let Some(&first_row) = seen_combinations.get(&(item_code, customer)) {
                        return Err(PlanningError::DuplicateKey {
                            row,
                            first_row,
                            item_code: item_code.to_string(),
                            customer: Some(customer.to_string()),
                        });
                    }
                    seen_combinations.insert((item_code, customer), row);
                }
                None => {
                    if let Some(&first_row) = seen_items.get(item_code) {
                        return Err(PlanningError::DuplicateKey {
                            row,
                            first_row,
                            item_code: item_code.to_string(),
                            customer: None,
                        });
                    }
                    seen_items.insert(item_code, row);
                }
            }
        }

        Ok(())
    }

    /// 驗證彙總單物料行：有批數時必須有每批數量
    pub fn validate_club_items(items: &[ClubForecastItem]) -> Result<()> {
        for (idx, item) in items.iter().enumerate() {
            if item.batch_sum() <= Decimal::ZERO {
                continue;
            }

            let has_batch_size = item.batch_size.is_some_and(|size| !size.is_zero());
            if !has_batch_size {
                return Err(PlanningError::missing_field(format!(
                    "Row #{}: Batch Size is required when weekly batches are set for item {}",
                    idx + 1,
                    item.item_code
                )));
            }
        }

        Ok(())
    }

    /// 驗證週數量與週批數的對應：某週數量 > 0 時該週批數也必須 > 0
    ///
    /// 收集所有違規後一次回報。
    pub fn validate_week_batch_pairing(items: &[ClubForecastItem]) -> Result<()> {
        let mut errors = Vec::new();

        for (idx, item) in items.iter().enumerate() {
            for (week, (qty, batch)) in item.weeks().into_iter().zip(item.batches()).enumerate() {
                if qty > Decimal::ZERO && batch <= Decimal::ZERO {
                    errors.push(format!(
                        "Row {}: Week {} has value {}, but Week {} Batch is 0 or empty",
                        idx + 1,
                        week + 1,
                        qty,
                        week + 1
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::MissingField(errors.join("\n")))
        }
    }

    /// 重算衍生欄位：總批數 = 四週批數合計，總數量 = 總批數 × 每批數量
    pub fn recompute_derived_totals(items: &mut [ClubForecastItem]) {
        for item in items.iter_mut() {
            item.total_batch_qty = item.batch_sum();
            item.total_qty = Some(item.total_batch_qty * item.batch_size.unwrap_or_default());
        }
    }
}
