//! 記憶體單據儲存層

use forecast_core::{
    Bom, BomLine, ClubStatus, DocumentStore, ForecastClub, ForecastKey, NewPurchaseRequest,
    PlanningError, PurchaseRequest, PurchaseRequestCancelled, Result, SalespersonForecast,
    StockBin, Warehouse,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 記憶體單據儲存層
///
/// 單據依寫入順序保存；查詢結果順序與寫入順序一致。
#[derive(Debug, Default)]
pub struct MemoryStore {
    forecasts: Vec<SalespersonForecast>,
    clubs: HashMap<String, ForecastClub>,
    boms: Vec<Bom>,
    warehouses: Vec<Warehouse>,
    bins: Vec<StockBin>,
    requests: Vec<PurchaseRequest>,
    request_seq: u32,
}

impl MemoryStore {
    /// 創建空的儲存層
    pub fn new() -> Self {
        Self::default()
    }

    /// 寫入業務員預測單（不驗證，同名覆蓋）
    pub fn insert_forecast(&mut self, forecast: SalespersonForecast) {
        match self.forecasts.iter_mut().find(|f| f.name == forecast.name) {
            Some(existing) => *existing = forecast,
            None => self.forecasts.push(forecast),
        }
    }

    /// 寫入 BOM
    pub fn insert_bom(&mut self, bom: Bom) {
        self.boms.push(bom);
    }

    /// 寫入倉庫
    pub fn insert_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouses.push(warehouse);
    }

    /// 寫入庫存紀錄（同物料同倉庫覆蓋）
    pub fn insert_bin(&mut self, bin: StockBin) {
        match self
            .bins
            .iter_mut()
            .find(|b| b.is_for(&bin.item_code, &bin.warehouse))
        {
            Some(existing) => existing.actual_qty = bin.actual_qty,
            None => self.bins.push(bin),
        }
    }

    /// 取消請購單，回傳要送達狀態機的取消事件
    pub fn cancel_purchase_request(&mut self, name: &str) -> Result<PurchaseRequestCancelled> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| PlanningError::NotFound(name.to_string()))?;

        if request.is_cancelled() {
            return Err(PlanningError::state_violation(format!(
                "{name} is already cancelled"
            )));
        }

        tracing::debug!("取消請購單 {}", name);
        Ok(request.cancel())
    }

    /// 業務員預測單數量
    pub fn forecast_count(&self) -> usize {
        self.forecasts.len()
    }

    /// 請購單數量（含已取消）
    pub fn purchase_request_count(&self) -> usize {
        self.requests.len()
    }

    fn validate_request(request: &NewPurchaseRequest) -> Result<()> {
        if request.lines.is_empty() {
            return Err(PlanningError::store("Material Request must have at least one item"));
        }

        for (idx, line) in request.lines.iter().enumerate() {
            if line.item_code.trim().is_empty() {
                return Err(PlanningError::store(format!(
                    "Row #{}: Item Code is mandatory",
                    idx + 1
                )));
            }
            if line.qty <= Decimal::ZERO {
                return Err(PlanningError::store(format!(
                    "Row #{}: Quantity must be greater than zero for item {}",
                    idx + 1,
                    line.item_code
                )));
            }
        }

        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn submitted_forecasts(&self, key: &ForecastKey) -> Result<Vec<SalespersonForecast>> {
        Ok(self
            .forecasts
            .iter()
            .filter(|f| f.docstatus.is_submitted() && f.matches(key))
            .cloned()
            .collect())
    }

    fn default_bom(&self, item_code: &str) -> Result<Option<String>> {
        Ok(self
            .boms
            .iter()
            .find(|b| b.item == item_code && b.is_default_active())
            .map(|b| b.name.clone()))
    }

    fn bom_lines(&self, bom: &str) -> Result<Vec<BomLine>> {
        self.boms
            .iter()
            .find(|b| b.name == bom)
            .map(|b| b.lines.clone())
            .ok_or_else(|| PlanningError::NotFound(bom.to_string()))
    }

    fn stock_at(&self, item_code: &str, warehouse: &str) -> Result<Option<Decimal>> {
        Ok(self
            .bins
            .iter()
            .find(|b| b.is_for(item_code, warehouse))
            .map(|b| b.actual_qty))
    }

    fn company_stock(&self, item_code: &str, company: &str) -> Result<Option<Decimal>> {
        let mut matched = self
            .bins
            .iter()
            .filter(|b| b.item_code == item_code)
            .filter(|b| {
                self.warehouses
                    .iter()
                    .any(|w| w.name == b.warehouse && w.company == company)
            })
            .map(|b| b.actual_qty)
            .peekable();

        // SUM 查無資料列時為 NULL
        if matched.peek().is_none() {
            return Ok(None);
        }
        Ok(Some(matched.sum()))
    }

    fn count_live_request_lines(&self, club: &str, excluding: Option<&str>) -> Result<usize> {
        Ok(self
            .requests
            .iter()
            .filter(|r| !r.is_cancelled())
            .filter(|r| excluding != Some(r.name.as_str()))
            .flat_map(|r| r.lines.iter())
            .filter(|line| line.forecast_club.as_deref() == Some(club))
            .count())
    }

    fn create_purchase_request(&mut self, request: NewPurchaseRequest) -> Result<String> {
        Self::validate_request(&request)?;

        self.request_seq += 1;
        let name = format!("MR-{:05}", self.request_seq);
        self.requests.push(PurchaseRequest::from_new(name.clone(), request));

        tracing::debug!("建立請購單 {}", name);
        Ok(name)
    }

    fn set_club_status(&mut self, club: &str, status: ClubStatus) -> Result<()> {
        let stored = self
            .clubs
            .get_mut(club)
            .ok_or_else(|| PlanningError::NotFound(club.to_string()))?;
        stored.status = status;
        Ok(())
    }

    fn save_forecast(&mut self, forecast: &SalespersonForecast) -> Result<()> {
        self.insert_forecast(forecast.clone());
        Ok(())
    }

    fn save_club(&mut self, club: &ForecastClub) -> Result<()> {
        self.clubs.insert(club.name.clone(), club.clone());
        Ok(())
    }

    fn load_club(&self, name: &str) -> Result<Option<ForecastClub>> {
        Ok(self.clubs.get(name).cloned())
    }

    fn purchase_request(&self, name: &str) -> Result<Option<PurchaseRequest>> {
        Ok(self.requests.iter().find(|r| r.name == name).cloned())
    }
}
