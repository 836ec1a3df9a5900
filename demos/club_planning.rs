//! 預測彙總單完整流程示例
//!
//! 執行：`RUST_LOG=debug cargo run --example club_planning`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use forecast_planning::*;
use rust_decimal::Decimal;

fn main() -> Result<()> {
    logging::init();

    println!("=== 預測彙總單示例 ===\n");

    // 使用者可修正的錯誤只顯示訊息，其餘錯誤往上回報
    match run() {
        Err(err) => match err.downcast_ref::<PlanningError>() {
            Some(planning) if planning.is_user_correctable() => {
                println!("⚠ {planning}");
                Ok(())
            }
            _ => Err(err),
        },
        ok => ok,
    }
}

fn run() -> Result<()> {
    let start = NaiveDate::from_ymd_opt(2026, 3, 2).context("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2026, 3, 29).context("invalid end date")?;

    // 1. 主檔：BOM、倉庫、庫存
    let mut store = MemoryStore::new();
    store.insert_bom(Bom::new("BOM-CAKE-001", "CAKE-01").with_lines(vec![
        BomLine::new("FLOUR", "Flour", Decimal::new(5, 1)).with_uom("Kg"),
        BomLine::new("SUGAR", "Sugar", Decimal::new(2, 1)).with_uom("Kg"),
    ]));
    store.insert_bom(Bom::new("BOM-BREAD-001", "BREAD").with_lines(vec![
        BomLine::new("FLOUR", "Flour", Decimal::new(8, 1)).with_uom("Kg"),
    ]));
    store.insert_warehouse(Warehouse::new("Stores - AC", "Acme"));
    store.insert_bin(StockBin::new("FLOUR", "Stores - AC", Decimal::from(40)));
    store.insert_bin(StockBin::new("SUGAR", "Stores - AC", Decimal::from(100)));

    let mut planner = ClubPlanner::new(store, PlannerConfig::default());

    // 2. 業務員預測
    let mut north = SalespersonForecast::new("FSP-0001", start, end, "Acme").with_lines(vec![
        ForecastLine::new("CAKE-01", "Cake")
            .with_customer("CUST-A")
            .with_weeks([20, 20, 10, 10].map(Decimal::from)),
        ForecastLine::new("BREAD", "Bread").with_weeks([30, 30, 30, 30].map(Decimal::from)),
    ]);
    let mut south = SalespersonForecast::new("FSP-0002", start, end, "Acme").with_lines(vec![
        ForecastLine::new("CAKE-01", "Cake")
            .with_customer("CUST-B")
            .with_weeks([10, 10, 10, 10].map(Decimal::from)),
    ]);
    planner.submit_forecast(&mut north)?;
    planner.submit_forecast(&mut south)?;

    // 3. 彙總
    let mut club = ForecastClub::new("FC-0001")
        .with_period(start, end)
        .with_company("Acme")
        .with_warehouse("Stores - AC")
        .with_transaction_date(start);

    let outcome = planner.fetch_sales_forecasts(&mut club)?;
    println!("{}", outcome.message());
    for item in &club.items {
        println!("  - {} 週數量 {:?}，BOM {:?}", item.item_code, item.weeks(), item.bom);
    }

    // 4. 排批：每批 10
    for item in club.items.iter_mut() {
        let batches = item.weeks().map(|qty| (qty / Decimal::from(10)).ceil());
        *item = item.clone().with_batches(batches).with_batch_size(Decimal::from(10));
    }
    planner.save_club(&mut club)?;

    // 5. BOM 展開
    let outcome = planner.fetch_material_request_items(&mut club)?;
    println!("\n{}", outcome.message());
    for notice in outcome.notices() {
        println!("  ⚠ {}", notice.message);
    }
    for raw in &club.material_request_items {
        println!(
            "  - {} 需求 {}，倉庫庫存 {}，待購 {}",
            raw.item_code,
            raw.bom_qty,
            raw.actual_qty,
            raw.qty_needed()
        );
    }

    // 6. 提交並建立請購單
    planner.submit_club(&mut club)?;
    let outcome = planner.create_material_requests(&mut club)?;
    println!("\n{}", outcome.message());
    for notice in outcome.notices() {
        println!("  ⚠ {}", notice.message);
    }
    println!("彙總單狀態: {}", club.status);

    // 7. 取消請購單，狀態退回
    if let Some(summary) = outcome.summary() {
        let event = planner.store_mut().cancel_purchase_request(&summary.request_name)?;
        planner.on_purchase_request_cancelled(&event)?;
        println!("取消 {} 後狀態: {}", summary.request_name, planner.club_status(&club.name)?);
    }

    Ok(())
}
