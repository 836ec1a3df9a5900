//! 單據儲存層介面
//!
//! 計劃引擎不負責持久化，所有讀寫都透過此 trait 委派給外部單據儲存層。

use rust_decimal::Decimal;

use crate::club::{ClubStatus, ForecastClub};
use crate::forecast::{ForecastKey, SalespersonForecast};
use crate::purchase::{NewPurchaseRequest, PurchaseRequest};
use crate::{BomLine, Result};

/// 外部單據儲存層
pub trait DocumentStore {
    /// 查詢符合鍵值且已提交的業務員預測單
    fn submitted_forecasts(&self, key: &ForecastKey) -> Result<Vec<SalespersonForecast>>;

    /// 物料的預設且啟用中的 BOM 名稱
    fn default_bom(&self, item_code: &str) -> Result<Option<String>>;

    /// BOM 明細
    fn bom_lines(&self, bom: &str) -> Result<Vec<BomLine>>;

    /// 指定倉庫的現有庫存；無紀錄為 None
    fn stock_at(&self, item_code: &str, warehouse: &str) -> Result<Option<Decimal>>;

    /// 公司所有倉庫的庫存合計；無紀錄為 None
    fn company_stock(&self, item_code: &str, company: &str) -> Result<Option<Decimal>>;

    /// 引用該彙總單且未取消的請購明細數量，可排除指定請購單
    fn count_live_request_lines(&self, club: &str, excluding: Option<&str>) -> Result<usize>;

    /// 建立請購單（全部明細成功或全部失敗），回傳單據名稱
    fn create_purchase_request(&mut self, request: NewPurchaseRequest) -> Result<String>;

    /// 只更新彙總單狀態，不重新驗證整張單據
    fn set_club_status(&mut self, club: &str, status: ClubStatus) -> Result<()>;

    /// 儲存業務員預測單
    fn save_forecast(&mut self, forecast: &SalespersonForecast) -> Result<()>;

    /// 儲存彙總單
    fn save_club(&mut self, club: &ForecastClub) -> Result<()>;

    /// 讀取彙總單
    fn load_club(&self, name: &str) -> Result<Option<ForecastClub>>;

    /// 讀取請購單
    fn purchase_request(&self, name: &str) -> Result<Option<PurchaseRequest>>;
}
