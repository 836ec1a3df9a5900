//! 業務員預測彙總

use forecast_core::{ClubForecastItem, DocumentStore, ForecastClub, Result, SalespersonForecast};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::{AggregationSummary, Outcome};

/// 彙總後的單一物料（客戶維度已捨棄）
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub item_code: String,
    pub item_name: String,
    pub weeks: [Decimal; 4],
}

/// 預測彙總器
pub struct ForecastAggregator;

impl ForecastAggregator {
    /// 從儲存層抓取符合的預測單並整批替換彙總單的物料行
    ///
    /// 起訖日期或公司未填、或查無預測單時，回傳中止結果且不修改彙總單。
    pub fn fetch_sales_forecasts<S: DocumentStore + ?Sized>(
        store: &S,
        club: &mut ForecastClub,
    ) -> Result<Outcome<AggregationSummary>> {
        if club.forecast_start_date.is_none() || club.forecast_end_date.is_none() {
            return Ok(Outcome::aborted(
                "Please set Forecast Start Date and Forecast End Date",
            ));
        }
        let Some(key) = club.forecast_key() else {
            return Ok(Outcome::aborted("Please set Company"));
        };

        tracing::info!(
            "開始彙總預測：{} ~ {}，公司 {}",
            key.start,
            key.end,
            key.company
        );

        let forecasts = store.submitted_forecasts(&key)?;
        if forecasts.is_empty() {
            tracing::info!("查無符合的業務員預測單");
            return Ok(Outcome::aborted(
                "No matching Forecast Sales Person records found for the selected date range and company",
            ));
        }

        let aggregated = Self::accumulate(&forecasts);

        // 先完成所有儲存層查詢，成功後才替換物料行
        let mut items = Vec::with_capacity(aggregated.len());
        for entry in aggregated {
            let bom = store.default_bom(&entry.item_code)?;
            tracing::debug!("物料 {} 預設 BOM: {:?}", entry.item_code, bom);

            let mut item = ClubForecastItem::new(entry.item_code, entry.item_name)
                .with_weeks(entry.weeks);
            item.bom = bom;
            items.push(item);
        }

        let summary = AggregationSummary {
            item_count: items.len(),
            source_count: forecasts.len(),
        };
        club.items = items;

        tracing::info!(
            "預測彙總完成：{} 個物料，來源 {} 張預測單",
            summary.item_count,
            summary.source_count
        );

        Ok(Outcome::completed(summary, Vec::new()))
    }

    /// 依物料累加四週數量，保留物料首次出現的順序
    pub fn accumulate(forecasts: &[SalespersonForecast]) -> Vec<AggregatedItem> {
        let mut aggregated: Vec<AggregatedItem> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for line in forecasts.iter().flat_map(|f| f.lines.iter()) {
            let slot = *index.entry(line.item_code.as_str()).or_insert_with(|| {
                aggregated.push(AggregatedItem {
                    item_code: line.item_code.clone(),
                    item_name: line.item_name.clone(),
                    weeks: [Decimal::ZERO; 4],
                });
                aggregated.len() - 1
            });

            let entry = &mut aggregated[slot];
            for (total, qty) in entry.weeks.iter_mut().zip(line.weeks()) {
                *total += qty;
            }
        }

        aggregated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::{Bom, ForecastLine};
    use forecast_store::MemoryStore;

    fn period() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 29).unwrap(),
        )
    }

    fn weeks(values: [i64; 4]) -> [Decimal; 4] {
        values.map(Decimal::from)
    }

    fn forecast(name: &str, lines: Vec<ForecastLine>) -> SalespersonForecast {
        let (start, end) = period();
        SalespersonForecast::new(name, start, end, "Acme")
            .with_lines(lines)
            .as_submitted()
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert_forecast(forecast(
            "FSP-0001",
            vec![
                ForecastLine::new("CAKE-01", "Cake")
                    .with_customer("CUST-A")
                    .with_weeks(weeks([3, 1, 0, 2])),
                ForecastLine::new("BREAD", "Bread").with_weeks(weeks([10, 10, 10, 10])),
            ],
        ));
        store.insert_forecast(forecast(
            "FSP-0002",
            vec![ForecastLine::new("CAKE-01", "Cake")
                .with_customer("CUST-B")
                .with_weeks(weeks([5, 0, 4, 0]))],
        ));
        store.insert_bom(Bom::new("BOM-CAKE-001", "CAKE-01"));
        store
    }

    fn club() -> ForecastClub {
        let (start, end) = period();
        ForecastClub::new("FC-0001")
            .with_period(start, end)
            .with_company("Acme")
    }

    #[test]
    fn test_accumulate_sums_across_documents_and_customers() {
        let store = seeded_store();
        let (start, end) = period();
        let key = forecast_core::ForecastKey {
            start,
            end,
            company: "Acme".to_string(),
        };
        let forecasts = forecast_core::DocumentStore::submitted_forecasts(&store, &key).unwrap();

        let aggregated = ForecastAggregator::accumulate(&forecasts);

        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated[0].item_code, "CAKE-01");
        assert_eq!(aggregated[0].weeks, weeks([8, 1, 4, 2]));
        assert_eq!(aggregated[1].item_code, "BREAD");
        assert_eq!(aggregated[1].weeks, weeks([10, 10, 10, 10]));
    }

    #[test]
    fn test_fetch_replaces_items_and_resolves_bom() {
        let store = seeded_store();
        let mut club = club().with_items(vec![ClubForecastItem::new("STALE", "Stale")]);

        let outcome = ForecastAggregator::fetch_sales_forecasts(&store, &mut club).unwrap();

        assert_eq!(outcome.message(), "Fetched 2 items from 2 sales forecasts");
        assert_eq!(club.items.len(), 2);
        assert_eq!(club.items[0].item_code, "CAKE-01");
        assert_eq!(club.items[0].bom.as_deref(), Some("BOM-CAKE-001"));
        assert_eq!(club.items[0].week_1, Some(Decimal::from(8)));
        assert_eq!(club.items[1].item_code, "BREAD");
        assert_eq!(club.items[1].bom, None);
    }

    #[test]
    fn test_fetch_is_idempotent() {
        let store = seeded_store();
        let mut once = club();
        ForecastAggregator::fetch_sales_forecasts(&store, &mut once).unwrap();

        let mut twice = club();
        ForecastAggregator::fetch_sales_forecasts(&store, &mut twice).unwrap();
        ForecastAggregator::fetch_sales_forecasts(&store, &mut twice).unwrap();

        assert_eq!(once.items, twice.items);
    }

    #[test]
    fn test_fetch_ignores_drafts_and_other_periods() {
        let mut store = seeded_store();
        let (start, end) = period();
        store.insert_forecast(
            SalespersonForecast::new("FSP-0003", start, end, "Acme").with_lines(vec![
                ForecastLine::new("CAKE-01", "Cake").with_weeks(weeks([100, 0, 0, 0])),
            ]),
        );
        store.insert_forecast(
            SalespersonForecast::new("FSP-0004", start, end.succ_opt().unwrap(), "Acme")
                .with_lines(vec![ForecastLine::new("CAKE-01", "Cake").with_weeks(weeks([100, 0, 0, 0]))])
                .as_submitted(),
        );
        let mut club = club();

        ForecastAggregator::fetch_sales_forecasts(&store, &mut club).unwrap();

        assert_eq!(club.items[0].week_1, Some(Decimal::from(8)));
    }

    #[test]
    fn test_missing_preconditions_abort_without_mutation() {
        let store = seeded_store();
        let existing = vec![ClubForecastItem::new("KEEP", "Keep")];

        let mut no_company = ForecastClub::new("FC-0002").with_items(existing.clone());
        let (start, end) = period();
        no_company.forecast_start_date = Some(start);
        no_company.forecast_end_date = Some(end);
        let outcome = ForecastAggregator::fetch_sales_forecasts(&store, &mut no_company).unwrap();
        assert_eq!(outcome.message(), "Please set Company");
        assert_eq!(no_company.items, existing);

        let mut no_dates = ForecastClub::new("FC-0003")
            .with_company("Acme")
            .with_items(existing.clone());
        let outcome = ForecastAggregator::fetch_sales_forecasts(&store, &mut no_dates).unwrap();
        assert_eq!(
            outcome.message(),
            "Please set Forecast Start Date and Forecast End Date"
        );
        assert_eq!(no_dates.items, existing);
    }

    #[test]
    fn test_no_matches_leaves_items_unchanged() {
        let store = seeded_store();
        let existing = vec![ClubForecastItem::new("KEEP", "Keep")];
        let mut club = club().with_company("Nobody").with_items(existing.clone());

        let outcome = ForecastAggregator::fetch_sales_forecasts(&store, &mut club).unwrap();

        assert!(!outcome.is_completed());
        assert_eq!(club.items, existing);
    }
}
