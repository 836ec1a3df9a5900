//! 庫存淨需求計算

use forecast_core::{DocumentStore, MaterialRequirement, Result};
use rust_decimal::Decimal;

/// 淨需求計算結果
#[derive(Debug, Clone, PartialEq)]
pub struct NetRequirement {
    /// 原物料ID
    pub item_code: String,
    /// 總需求
    pub gross_requirement: Decimal,
    /// 目標倉庫可用庫存
    pub available: Decimal,
    /// 淨需求
    pub net_requirement: Decimal,
}

/// 庫存淨需求計算器
pub struct InventoryNetter;

impl InventoryNetter {
    /// 補上目標倉庫庫存與公司總庫存
    ///
    /// 未設定倉庫或查無紀錄時 `actual_qty` 為 0；未設定公司時 `company_total_stock` 為 0。
    pub fn annotate<S: DocumentStore + ?Sized>(
        store: &S,
        requirements: &mut [MaterialRequirement],
        warehouse: Option<&str>,
        company: Option<&str>,
    ) -> Result<()> {
        for requirement in requirements.iter_mut() {
            requirement.actual_qty = match warehouse {
                Some(warehouse) => store
                    .stock_at(&requirement.item_code, warehouse)?
                    .unwrap_or_default(),
                None => Decimal::ZERO,
            };

            requirement.company_total_stock = match company {
                Some(company) => store
                    .company_stock(&requirement.item_code, company)?
                    .unwrap_or_default(),
                None => Decimal::ZERO,
            };

            tracing::debug!(
                "庫存: {} 目標倉庫 {} / 公司合計 {}",
                requirement.item_code,
                requirement.actual_qty,
                requirement.company_total_stock
            );
        }

        Ok(())
    }

    /// 計算淨需求 = 總需求 - 目標倉庫庫存
    pub fn calculate(requirement: &MaterialRequirement) -> NetRequirement {
        NetRequirement {
            item_code: requirement.item_code.clone(),
            gross_requirement: requirement.bom_qty,
            available: requirement.actual_qty,
            net_requirement: requirement.qty_needed(),
        }
    }

    /// 只保留淨需求 > 0 的原物料（庫存足夠者不請購）
    pub fn shortfalls(requirements: &[MaterialRequirement]) -> Vec<NetRequirement> {
        requirements
            .iter()
            .map(Self::calculate)
            .filter(|net| net.net_requirement > Decimal::ZERO)
            .collect()
    }
}
