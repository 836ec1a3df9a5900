//! 彙總單狀態機
//!
//! Draft → Forecast Planned（提交）→ Material Requested（建立請購單），
//! 請購單全數取消時退回 Forecast Planned，不會退回 Draft。

use forecast_core::{
    ClubStatus, DocumentStore, PlanningError, PurchaseRequestCancelled, Result,
};

/// 狀態轉換事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// 彙總單提交
    Submitted,
    /// 請購單建立成功
    RequestCreated,
    /// 引用此彙總單的請購單已全數取消
    RequestsCancelled,
}

/// 狀態機
pub struct StatusLifecycle;

impl StatusLifecycle {
    /// 狀態轉換表
    pub fn next(status: ClubStatus, event: LifecycleEvent) -> Result<ClubStatus> {
        use ClubStatus::*;
        use LifecycleEvent::*;

        match (status, event) {
            (Draft, Submitted) => Ok(ForecastPlanned),
            // 建立前置條件由請購單建立器檢查，建立成功即進入 Material Requested
            (_, RequestCreated) => Ok(MaterialRequested),
            (MaterialRequested | ForecastPlanned, RequestsCancelled) => Ok(ForecastPlanned),
            (Draft, RequestsCancelled) => Ok(Draft),
            (status, event) => Err(PlanningError::state_violation(format!(
                "Cannot apply {event:?} to a Forecast Club in status {status}"
            ))),
        }
    }

    /// 提交後進入 Forecast Planned
    pub fn on_submit<S: DocumentStore + ?Sized>(
        store: &mut S,
        club: &str,
        status: ClubStatus,
    ) -> Result<ClubStatus> {
        let next = Self::next(status, LifecycleEvent::Submitted)?;
        store.set_club_status(club, next)?;
        Ok(next)
    }

    /// 請購單取消事件：對每個被引用的彙總單，若已無其他未取消的請購明細則退回 Forecast Planned
    ///
    /// 回傳狀態有變更的彙總單名稱。重複送達同一事件不會產生額外變更。
    pub fn on_purchase_request_cancelled<S: DocumentStore + ?Sized>(
        store: &mut S,
        event: &PurchaseRequestCancelled,
    ) -> Result<Vec<String>> {
        let mut reverted = Vec::new();

        for club in event.referenced_clubs() {
            let remaining = store.count_live_request_lines(club, Some(&event.request_name))?;
            if remaining > 0 {
                tracing::debug!("彙總單 {} 仍有 {} 筆有效請購明細", club, remaining);
                continue;
            }

            let Some(current) = store.load_club(club)?.map(|c| c.status) else {
                tracing::warn!("請購單 {} 引用的彙總單 {} 不存在", event.request_name, club);
                continue;
            };

            let next = Self::next(current, LifecycleEvent::RequestsCancelled)?;
            if next != current {
                store.set_club_status(club, next)?;
                tracing::info!("彙總單 {} 狀態 {} → {}", club, current, next);
                reverted.push(club.to_string());
            }
        }

        Ok(reverted)
    }
}
