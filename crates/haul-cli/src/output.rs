//! Output formatting module

use serde::Serialize;

use haul_app::{AppState, Notice, SyncReport};
use haul_domain::model::dates::display_date;
use haul_domain::model::{MasterData, MasterList, Release, TransportRecord};
use haul_domain::service::{
    BalanceTotals, FactoryBalanceRow, OrderOption, RecordStats, ReleaseBalance, SiteBalance,
};
use haul_store::SlotInfo;
use haul_types::{OutputFormat, Result};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Notices go to stderr so JSON on stdout stays parseable
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

pub fn output_sync(output_format: OutputFormat, report: &SyncReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }
    println!(
        "[{}] {}: {} trips, {} releases",
        report.at.format("%H:%M:%S"),
        report.status,
        report.records,
        report.releases
    );
    Ok(())
}

#[derive(Serialize)]
struct WhoAmI<'a> {
    user: Option<&'a str>,
    role: Option<String>,
    allowed_materials: Option<&'a str>,
    commodity: Option<String>,
    connection: String,
    last_sync: Option<String>,
}

pub fn output_session(output_format: OutputFormat, state: &AppState) -> Result<()> {
    let who = WhoAmI {
        user: state.user.as_ref().map(|u| u.name.as_str()),
        role: state.user.as_ref().map(|u| u.role.to_string()),
        allowed_materials: state.user.as_ref().map(|u| u.allowed_materials.as_str()),
        commodity: state.commodity.map(|c| c.to_string()),
        connection: state.connection.to_string(),
        last_sync: state.last_sync.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
    };
    if output_format == OutputFormat::Json {
        return print_json(&who);
    }
    match &state.user {
        Some(user) => {
            println!("User:       {}", user.name);
            println!("Role:       {}", user.role);
            println!("Materials:  {}", user.allowed_materials);
        }
        None => println!("Not signed in"),
    }
    println!(
        "Section:    {}",
        state.commodity.map(|c| c.to_string()).unwrap_or_else(|| "(none)".to_string())
    );
    match &who.last_sync {
        Some(at) => println!("Connection: {} (synced {})", who.connection, at),
        None => println!("Connection: {} (not synced this run)", who.connection),
    }
    Ok(())
}

#[derive(Serialize)]
struct BalanceOutput<'a, T: Serialize> {
    totals: BalanceTotals,
    rows: &'a [T],
}

pub fn output_release_balances(
    output_format: OutputFormat,
    balances: &[ReleaseBalance],
    totals: BalanceTotals,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&BalanceOutput { totals, rows: balances });
    }

    println!(
        "{:<18} {:<10} {:<11} {:>10} {:>10} {:>10} {:>10} {:>10} {:>7}",
        "Site", "Order", "Date", "Released", "Executed", "Transit", "Stopped", "Remaining", "Done%"
    );
    println!("{}", "-".repeat(105));
    for b in balances {
        println!(
            "{:<18} {:<10} {:<11} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>6.1}%",
            truncate_str(&b.key.site, 17),
            truncate_str(&b.key.order_no, 9),
            display_date(&b.date),
            b.total_released,
            b.executed,
            b.in_transit,
            b.stopped,
            b.remaining(),
            b.completion_percent()
        );
    }
    print_totals(&totals);
    Ok(())
}

pub fn output_site_balances(
    output_format: OutputFormat,
    sites: &[SiteBalance],
    totals: BalanceTotals,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&BalanceOutput { totals, rows: sites });
    }

    println!(
        "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>7}",
        "Site", "Orders", "Released", "Executed", "Transit", "Stopped", "Remaining", "Done%"
    );
    println!("{}", "-".repeat(92));
    for s in sites {
        println!(
            "{:<20} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>6.1}%",
            truncate_str(&s.site, 19),
            s.order_count,
            s.total_released,
            s.executed,
            s.in_transit,
            s.stopped,
            s.remaining,
            s.completion_percent()
        );
    }
    print_totals(&totals);
    Ok(())
}

fn print_totals(totals: &BalanceTotals) {
    println!();
    println!("Released:   {:.2} t", totals.total_released);
    println!("Executed:   {:.2} t", totals.executed);
    println!("In transit: {:.2} t", totals.in_transit);
    println!("Stopped:    {:.2} t", totals.stopped);
    println!("Remaining:  {:.2} t", totals.remaining);
}

pub fn output_factory(output_format: OutputFormat, rows: &[FactoryBalanceRow]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }
    if rows.is_empty() {
        println!("No factory activity for this section");
        return Ok(());
    }

    println!(
        "{:<20} {:>9} {:>10} {:>10} {:>10} {:>10} {:>9} {:>10}",
        "Site", "Opening", "Released", "Executed", "Transit", "PortRem", "Consumed", "Stock"
    );
    println!("{}", "-".repeat(96));
    for r in rows {
        println!(
            "{:<20} {:>9.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>9.2} {:>10.2}",
            truncate_str(&r.site, 19),
            r.opening,
            r.total_released,
            r.executed,
            r.in_transit,
            r.release_remaining,
            r.manual_consumption,
            r.factory_stock
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct RecordsOutput<'a> {
    stats: RecordStats,
    sites: &'a [String],
    records: &'a [&'a TransportRecord],
}

pub fn output_records(
    output_format: OutputFormat,
    records: &[&TransportRecord],
    stats: RecordStats,
    sites: &[String],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&RecordsOutput { stats, sites, records });
    }

    println!(
        "{:<16} {:<11} {:<14} {:<14} {:<16} {:<8} {:>8} {:<12}",
        "ID", "Date", "Car", "Driver", "Site", "Order", "Tons", "Status"
    );
    println!("{}", "-".repeat(106));
    for r in records {
        println!(
            "{:<16} {:<11} {:<14} {:<14} {:<16} {:<8} {:>8.2} {:<12}",
            truncate_str(&r.auto_id, 15),
            display_date(&r.date),
            truncate_str(&r.car_number, 13),
            truncate_str(&r.driver_name, 13),
            truncate_str(r.unloading_site.trim(), 15),
            truncate_str(&r.order_no, 7),
            r.weight,
            r.status.label_en()
        );
    }
    println!();
    println!(
        "{} trips, {:.2} t executed, {} in progress, {} stopped",
        stats.trips, stats.executed_weight, stats.in_progress, stats.stopped
    );
    if !sites.is_empty() {
        println!("Sites: {}", sites.join(", "));
    }
    Ok(())
}

pub fn output_record(output_format: OutputFormat, record: &TransportRecord) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(record);
    }
    println!("ID:       {}", record.auto_id);
    println!("Date:     {}", display_date(&record.date));
    println!("Site:     {} / order {}", record.unloading_site, record.order_no);
    println!("Goods:    {}", record.goods_type);
    println!("Weight:   {:.2} t", record.weight);
    println!("Status:   {}", record.status.label_en());
    if !record.car_number.is_empty() {
        println!("Car:      {}", record.car_number);
    }
    Ok(())
}

pub fn output_releases(output_format: OutputFormat, releases: &[Release]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(releases);
    }

    println!(
        "{:<12} {:<12} {:<11} {:<18} {:<14} {:>10}",
        "Handle", "Release", "Date", "Site", "Order", "Tons"
    );
    println!("{}", "-".repeat(82));
    for r in releases {
        println!(
            "{:<12} {:<12} {:<11} {:<18} {:<14} {:>10.2}",
            truncate_str(r.handle(), 11),
            truncate_str(&r.release_no, 11),
            display_date(&r.date),
            truncate_str(r.site_name.trim(), 17),
            truncate_str(&r.order_no, 13),
            r.total_quantity
        );
    }
    println!();
    println!("{} releases", releases.len());
    Ok(())
}

pub fn output_orders(output_format: OutputFormat, site: &str, options: &[OrderOption]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(options);
    }
    if options.is_empty() {
        println!("No releases for site '{}'", site.trim());
        return Ok(());
    }
    println!("{:<14} {:>10} {:<11}", "Order", "Tons", "Latest");
    println!("{}", "-".repeat(37));
    for o in options {
        println!(
            "{:<14} {:>10.2} {:<11}",
            truncate_str(&o.order_no, 13),
            o.total_quantity,
            display_date(&o.latest_date)
        );
    }
    Ok(())
}

pub fn output_available(output_format: OutputFormat, available: Option<f64>) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "available": available }));
    }
    match available {
        Some(tons) => println!("Available: {:.2} t", tons),
        None => println!("Select both a site and an order"),
    }
    Ok(())
}

const LISTS: [(&str, MasterList); 8] = [
    ("Drivers", MasterList::Drivers),
    ("Cars", MasterList::Cars),
    ("Loading sites", MasterList::LoadingSites),
    ("Unloading sites", MasterList::UnloadingSites),
    ("Goods types", MasterList::GoodsTypes),
    ("Order numbers", MasterList::OrderNumbers),
    ("Contractors", MasterList::Contractors),
    ("Items", MasterList::Items),
];

/// Reference lists; PINs are never printed
pub fn output_master_data(output_format: OutputFormat, data: &MasterData) -> Result<()> {
    if output_format == OutputFormat::Json {
        let mut lists = serde_json::Map::new();
        for (name, list) in LISTS {
            lists.insert(name.to_lowercase().replace(' ', "_"), serde_json::json!(data.list(list)));
        }
        let users: Vec<_> = data
            .users
            .iter()
            .map(|u| serde_json::json!({"name": u.name, "role": u.role, "allowedMaterials": u.allowed_materials}))
            .collect();
        lists.insert("users".to_string(), serde_json::Value::Array(users));
        return print_json(&lists);
    }

    for (name, list) in LISTS {
        let values = data.list(list);
        println!("{} ({}): {}", name, values.len(), values.join(", "));
    }
    println!("Users ({}):", data.users.len());
    for u in &data.users {
        println!("  {:<20} {:<8} {}", truncate_str(&u.name, 19), u.role, u.allowed_materials);
    }
    Ok(())
}

pub fn output_cache_slots(slots: &[SlotInfo]) {
    println!("{:<24} {:>10}", "Slot", "Bytes");
    println!("{}", "-".repeat(35));
    for slot in slots {
        let size = slot
            .bytes
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<24} {:>10}", slot.name, size);
    }
}
