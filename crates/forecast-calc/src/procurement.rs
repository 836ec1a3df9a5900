//! 請購單建立

use forecast_core::{
    DocumentStore, ForecastClub, NewPurchaseRequest, PlannerConfig, PlanningError,
    PurchaseRequestLine, Result,
};

use crate::lifecycle::{LifecycleEvent, StatusLifecycle};
use crate::netting::InventoryNetter;
use crate::{Notice, Outcome, RequestSummary};

/// 請購單建立器
pub struct ProcurementRequestBuilder;

impl ProcurementRequestBuilder {
    /// 依原物料淨需求建立一張請購單，成功後彙總單狀態推進為 Material Requested
    ///
    /// 前置條件依序檢查：需求行非空（否則中止）、單據已提交、尚無未取消的請購單。
    /// 彙總單目前的狀態不是前置條件。
    /// 同一彙總單的唯一性為「先查後建」，並行呼叫時僅為建議性保護。
    pub fn create_material_requests<S: DocumentStore + ?Sized>(
        store: &mut S,
        club: &mut ForecastClub,
        config: &PlannerConfig,
    ) -> Result<Outcome<RequestSummary>> {
        if club.material_request_items.is_empty() {
            return Ok(Outcome::aborted(
                "No material request items found. Please fetch material request items first.",
            ));
        }

        if !club.is_submitted() {
            return Err(PlanningError::state_violation(
                "Please submit the Forecast Club document before creating Material Requests",
            ));
        }

        if store.count_live_request_lines(&club.name, None)? > 0 {
            return Err(PlanningError::DuplicateOperation(
                "Material Request already exists for this Forecast Club. Please check existing Material Requests."
                    .to_string(),
            ));
        }

        let request = Self::build(club, config);
        if request.lines.is_empty() {
            tracing::info!("彙總單 {} 所有原物料庫存充足，不建立請購單", club.name);
            return Ok(Outcome::aborted(
                "No items need to be ordered. All items have sufficient stock.",
            ));
        }

        let next_status = StatusLifecycle::next(club.status, LifecycleEvent::RequestCreated)?;
        let line_count = request.lines.len();
        let request_name = store.create_purchase_request(request)?;

        tracing::info!(
            "彙總單 {} 已建立請購單 {}（{} 筆明細）",
            club.name,
            request_name,
            line_count
        );

        // 請購單已建立，狀態更新失敗不回報為錯誤
        let notices = match store.set_club_status(&club.name, next_status) {
            Ok(()) => {
                club.status = next_status;
                Vec::new()
            }
            Err(err) => {
                tracing::error!(
                    "請購單 {} 已建立，但彙總單 {} 狀態更新失敗: {}",
                    request_name,
                    club.name,
                    err
                );
                vec![Notice::warning(
                    None,
                    format!(
                        "Material Request {request_name} was created, but the Forecast Club status could not be updated: {err}"
                    ),
                )]
            }
        };

        Ok(Outcome::completed(
            RequestSummary {
                request_name,
                line_count,
            },
            notices,
        ))
    }

    /// 組出請購單：每個淨需求 > 0 的原物料一筆明細
    pub fn build(club: &ForecastClub, config: &PlannerConfig) -> NewPurchaseRequest {
        let lines = InventoryNetter::shortfalls(&club.material_request_items)
            .into_iter()
            .map(|net| {
                PurchaseRequestLine::new(net.item_code, net.net_requirement)
                    .with_schedule_date(club.forecast_end_date)
                    .with_warehouse(club.set_warehouse.clone())
                    .with_forecast_club(club.name.clone())
            })
            .collect();

        NewPurchaseRequest {
            request_type: config.request_type,
            company: club.company.clone(),
            transaction_date: club.transaction_date,
            schedule_date: club.forecast_end_date,
            lines,
        }
    }

    /// 彙總單是否可建立請購單（供介面決定是否顯示按鈕）
    pub fn can_create(club: &ForecastClub) -> bool {
        club.is_submitted() && !club.material_request_items.is_empty()
    }
}
