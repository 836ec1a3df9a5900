//! BOM 展開

use forecast_core::{
    ClubForecastItem, DocumentStore, ForecastClub, MaterialRequirement, PlanningError, Result,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::netting::InventoryNetter;
use crate::{ExplosionSummary, Notice, Outcome};

/// BOM 展開引擎
pub struct BomExplosionEngine;

impl BomExplosionEngine {
    /// 依彙總單物料行展開原物料需求，補上庫存後整批替換需求行
    pub fn fetch_material_request_items<S: DocumentStore + ?Sized>(
        store: &S,
        club: &mut ForecastClub,
    ) -> Result<Outcome<ExplosionSummary>> {
        if club.items.is_empty() {
            return Ok(Outcome::aborted(
                "No items found. Please fetch forecasts first.",
            ));
        }

        tracing::info!("開始 BOM 展開：{} 個成品物料", club.items.len());

        let (mut materials, notices) = Self::explode(store, &club.items)?;

        let warehouse = club.set_warehouse.as_deref().filter(|w| !w.is_empty());
        let company = club.company.as_deref().filter(|c| !c.is_empty());
        InventoryNetter::annotate(store, &mut materials, warehouse, company)?;

        let summary = ExplosionSummary {
            material_count: materials.len(),
        };
        club.material_request_items = materials;

        tracing::info!("BOM 展開完成：{} 種原物料", summary.material_count);

        Ok(Outcome::completed(summary, notices))
    }

    /// 展開並依原物料累加需求（庫存欄位為 0，由 `InventoryNetter` 補上）
    ///
    /// 缺 BOM 或 BOM 已不存在的物料回報警告後略過；總數量為 0 或未填的物料直接略過。
    pub fn explode<S: DocumentStore + ?Sized>(
        store: &S,
        items: &[ClubForecastItem],
    ) -> Result<(Vec<MaterialRequirement>, Vec<Notice>)> {
        let mut materials: Vec<MaterialRequirement> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut notices = Vec::new();

        for item in items {
            let Some(bom) = item.bom.as_deref().filter(|b| !b.is_empty()) else {
                tracing::warn!("物料 {} 沒有 BOM，略過", item.item_code);
                notices.push(Self::missing_bom(item));
                continue;
            };

            let total_qty = match item.total_qty {
                Some(qty) if !qty.is_zero() => qty,
                _ => continue,
            };

            let bom_lines = match store.bom_lines(bom) {
                Ok(lines) => lines,
                Err(PlanningError::NotFound(_)) => {
                    tracing::warn!("物料 {} 的 BOM {} 不存在，略過", item.item_code, bom);
                    notices.push(Self::missing_bom(item));
                    continue;
                }
                Err(err) => return Err(err),
            };

            for line in bom_lines {
                // 需求數量 = BOM 單位用量 × 成品總數量
                let required_qty = line.qty * total_qty;

                let slot = match index.get(&line.item_code) {
                    Some(&slot) => slot,
                    None => {
                        materials.push(MaterialRequirement {
                            item_code: line.item_code.clone(),
                            item_name: line.item_name.clone(),
                            bom_qty: Decimal::ZERO,
                            uom: line.effective_uom().map(str::to_string),
                            actual_qty: Decimal::ZERO,
                            company_total_stock: Decimal::ZERO,
                        });
                        index.insert(line.item_code.clone(), materials.len() - 1);
                        materials.len() - 1
                    }
                };
                materials[slot].bom_qty += required_qty;

                tracing::debug!(
                    "BOM 展開: {} → {} (數量: {})",
                    item.item_code,
                    line.item_code,
                    required_qty
                );
            }
        }

        Ok((materials, notices))
    }

    fn missing_bom(item: &ClubForecastItem) -> Notice {
        Notice::warning(
            Some(item.item_code.clone()),
            format!("No BOM found for item {}", item.item_code),
        )
    }
}
