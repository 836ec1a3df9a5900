//! 彙總單計劃主入口

use forecast_core::{
    ClubStatus, DocStatus, DocumentStore, ForecastClub, PlannerConfig, PlanningError,
    PurchaseRequestCancelled, Result, SalespersonForecast,
};

use crate::aggregation::ForecastAggregator;
use crate::explosion::BomExplosionEngine;
use crate::lifecycle::{LifecycleEvent, StatusLifecycle};
use crate::procurement::ProcurementRequestBuilder;
use crate::validation::ValidationEngine;
use crate::{AggregationSummary, ExplosionSummary, Outcome, RequestSummary};

/// 彙總單計劃器
///
/// 每個操作獨佔地取得彙總單（`&mut ForecastClub`），同步執行到完成。
pub struct ClubPlanner<S: DocumentStore> {
    /// 外部單據儲存層
    store: S,

    /// 計劃配置
    config: PlannerConfig,
}

impl<S: DocumentStore> ClubPlanner<S> {
    /// 創建新的計劃器
    pub fn new(store: S, config: PlannerConfig) -> Self {
        Self { store, config }
    }

    /// 儲存業務員預測單（驗證失敗則整張不儲存）
    pub fn save_forecast(&mut self, forecast: &SalespersonForecast) -> Result<()> {
        Self::ensure_editable(forecast.docstatus, &forecast.name)?;
        ValidationEngine::validate_forecast(forecast)?;
        self.store.save_forecast(forecast)
    }

    /// 提交業務員預測單，提交後成為彙總的來源
    pub fn submit_forecast(&mut self, forecast: &mut SalespersonForecast) -> Result<()> {
        Self::ensure_editable(forecast.docstatus, &forecast.name)?;
        ValidationEngine::validate_forecast(forecast)?;

        let mut submitted = forecast.clone();
        submitted.docstatus = DocStatus::Submitted;
        self.store.save_forecast(&submitted)?;
        *forecast = submitted;

        tracing::info!("業務員預測單 {} 已提交", forecast.name);
        Ok(())
    }

    /// 儲存彙總單：驗證 → 重算衍生欄位 → 持久化
    pub fn save_club(&mut self, club: &mut ForecastClub) -> Result<()> {
        Self::ensure_editable(club.docstatus, &club.name)?;
        self.validate_club(club)?;
        ValidationEngine::recompute_derived_totals(&mut club.items);
        self.store.save_club(club)
    }

    /// 提交彙總單，狀態進入 Forecast Planned
    pub fn submit_club(&mut self, club: &mut ForecastClub) -> Result<()> {
        Self::ensure_editable(club.docstatus, &club.name)?;
        self.validate_club(club)?;
        // 先確認狀態可轉換，再寫入儲存層
        StatusLifecycle::next(club.status, LifecycleEvent::Submitted)?;

        let mut submitted = club.clone();
        ValidationEngine::recompute_derived_totals(&mut submitted.items);
        submitted.docstatus = DocStatus::Submitted;
        self.store.save_club(&submitted)?;

        submitted.status = StatusLifecycle::on_submit(&mut self.store, &submitted.name, club.status)?;
        *club = submitted;

        tracing::info!("彙總單 {} 已提交，狀態 {}", club.name, club.status);
        Ok(())
    }

    /// 抓取並彙總業務員預測（已提交的彙總單不可重抓）
    pub fn fetch_sales_forecasts(
        &self,
        club: &mut ForecastClub,
    ) -> Result<Outcome<AggregationSummary>> {
        Self::ensure_editable(club.docstatus, &club.name)?;
        ForecastAggregator::fetch_sales_forecasts(&self.store, club)
    }

    /// 依 BOM 展開原物料需求並補上庫存
    pub fn fetch_material_request_items(
        &self,
        club: &mut ForecastClub,
    ) -> Result<Outcome<ExplosionSummary>> {
        Self::ensure_editable(club.docstatus, &club.name)?;
        BomExplosionEngine::fetch_material_request_items(&self.store, club)
    }

    /// 建立請購單
    ///
    /// 狀態由儲存層維護（取消事件可能已變更），建立前先同步。
    pub fn create_material_requests(
        &mut self,
        club: &mut ForecastClub,
    ) -> Result<Outcome<RequestSummary>> {
        if let Some(stored) = self.store.load_club(&club.name)? {
            club.status = stored.status;
        }
        ProcurementRequestBuilder::create_material_requests(&mut self.store, club, &self.config)
    }

    /// 請購單取消事件
    pub fn on_purchase_request_cancelled(
        &mut self,
        event: &PurchaseRequestCancelled,
    ) -> Result<Vec<String>> {
        StatusLifecycle::on_purchase_request_cancelled(&mut self.store, event)
    }

    /// 目前儲存層中的彙總單狀態
    pub fn club_status(&self, club: &str) -> Result<ClubStatus> {
        self.store
            .load_club(club)?
            .map(|c| c.status)
            .ok_or_else(|| PlanningError::NotFound(club.to_string()))
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 獲取儲存層引用
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 獲取儲存層可變引用
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn validate_club(&self, club: &ForecastClub) -> Result<()> {
        ValidationEngine::validate_club_items(&club.items)?;
        if self.config.enforce_week_batch_pairing {
            ValidationEngine::validate_week_batch_pairing(&club.items)?;
        }
        Ok(())
    }

    fn ensure_editable(docstatus: DocStatus, name: &str) -> Result<()> {
        match docstatus {
            DocStatus::Draft => Ok(()),
            DocStatus::Submitted => Err(PlanningError::state_violation(format!(
                "{name} is submitted and cannot be modified"
            ))),
            DocStatus::Cancelled => Err(PlanningError::state_violation(format!(
                "{name} is cancelled and cannot be modified"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use forecast_core::{ClubForecastItem, ForecastLine};
    use forecast_store::MemoryStore;
    use rust_decimal::Decimal;

    fn planner() -> ClubPlanner<MemoryStore> {
        ClubPlanner::new(MemoryStore::new(), PlannerConfig::default())
    }

    fn forecast() -> SalespersonForecast {
        SalespersonForecast::new(
            "FSP-0001",
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 29).unwrap(),
            "Acme",
        )
        .with_lines(vec![ForecastLine::new("CAKE-01", "Cake")])
    }

    #[test]
    fn test_invalid_forecast_is_not_saved() {
        let mut planner = planner();
        let mut bad = forecast();
        bad.lines.push(ForecastLine::new("CAKE-01", "Cake"));

        let err = planner.save_forecast(&bad).unwrap_err();

        assert!(matches!(err, PlanningError::DuplicateKey { row: 2, first_row: 1, .. }));
        assert_eq!(planner.store().forecast_count(), 0);
    }

    #[test]
    fn test_submitted_forecast_is_frozen() {
        let mut planner = planner();
        let mut doc = forecast();

        planner.submit_forecast(&mut doc).unwrap();
        assert_eq!(doc.docstatus, DocStatus::Submitted);

        let err = planner.save_forecast(&doc).unwrap_err();
        assert!(matches!(err, PlanningError::StateViolation(_)));
    }

    #[test]
    fn test_save_club_recomputes_totals() {
        let mut planner = planner();
        let mut club = ForecastClub::new("FC-0001").with_items(vec![ClubForecastItem::new(
            "CAKE-01", "Cake",
        )
        .with_weeks([Decimal::from(40), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO])
        .with_batches([Decimal::from(4), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO])
        .with_batch_size(Decimal::from(10))]);

        planner.save_club(&mut club).unwrap();

        assert_eq!(club.items[0].total_qty, Some(Decimal::from(40)));
        let stored = planner.store().load_club("FC-0001").unwrap().unwrap();
        assert_eq!(stored.items[0].total_batch_qty, Decimal::from(4));
    }

    #[test]
    fn test_week_batch_pairing_follows_config() {
        let item = ClubForecastItem::new("CAKE-01", "Cake")
            .with_weeks([Decimal::from(40), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO]);

        let mut strict = planner();
        let mut club = ForecastClub::new("FC-0001").with_items(vec![item.clone()]);
        let err = strict.save_club(&mut club).unwrap_err();
        assert!(matches!(err, PlanningError::MissingField(_)));

        let mut lenient = ClubPlanner::new(
            MemoryStore::new(),
            PlannerConfig::default().with_week_batch_pairing(false),
        );
        let mut club = ForecastClub::new("FC-0001").with_items(vec![item]);
        assert!(lenient.save_club(&mut club).is_ok());
    }

    #[test]
    fn test_submit_club_enters_forecast_planned() {
        let mut planner = planner();
        let mut club = ForecastClub::new("FC-0001");

        planner.submit_club(&mut club).unwrap();

        assert_eq!(club.docstatus, DocStatus::Submitted);
        assert_eq!(club.status, ClubStatus::ForecastPlanned);
        assert_eq!(planner.club_status("FC-0001").unwrap(), ClubStatus::ForecastPlanned);

        let err = planner.save_club(&mut club).unwrap_err();
        assert!(matches!(err, PlanningError::StateViolation(_)));
    }

    #[test]
    fn test_unknown_club_status() {
        let planner = planner();
        let err = planner.club_status("FC-9999").unwrap_err();
        assert_eq!(err, PlanningError::NotFound("FC-9999".to_string()));
    }

    #[test]
    fn test_submitted_club_cannot_refetch() {
        let mut planner = planner();
        let mut club = ForecastClub::new("FC-0001").with_items(vec![ClubForecastItem::new(
            "CAKE-01", "Cake",
        )]);
        planner.submit_club(&mut club).unwrap();

        let err = planner.fetch_sales_forecasts(&mut club).unwrap_err();
        assert!(matches!(err, PlanningError::StateViolation(_)));

        let err = planner.fetch_material_request_items(&mut club).unwrap_err();
        assert!(matches!(err, PlanningError::StateViolation(_)));
        assert_eq!(club.items.len(), 1);
        assert!(club.material_request_items.is_empty());
    }
}
