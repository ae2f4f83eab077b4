//! Command handlers

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use haul_app::{spawn_polling, App, Config};
use haul_domain::model::{
    AppUser, Distribution, ReleaseDraft, ReleaseHeader, SiteOrderKey, TransportRecord,
};
use haul_domain::service::{
    available_balance, balance_totals, factory_balances, order_options, period_report,
    query_records, record_stats, release_balances, render_period_report, site_summaries,
    unique_sites, RecordQuery, ReleaseBalance,
};
use haul_store::LocalCache;
use haul_types::{ConfigError, Error, OutputFormat, Result};

use crate::cli::{Cli, Commands, RecordArgs, RecordChanges};
use crate::output::{self, print_json, print_notices};

pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Config {
            show,
            set_endpoint,
            set_timeout,
            set_retries,
            set_interval,
            set_cache_dir,
            set_output,
            reset,
        } => cmd_config(
            &mut config,
            show,
            set_endpoint,
            set_timeout,
            set_retries,
            set_interval,
            set_cache_dir,
            set_output,
            reset,
        ),
        Commands::Cache { clear, stats } => cmd_cache(&config, clear, stats),
        command => {
            let app = App::open(&config, cli.endpoint, cli.offline)?;
            if !cli.offline && refreshes_first(&command) {
                app.refresh().await;
            }
            run(app, command, format, &config, cli.offline).await
        }
    }
}

/// Commands that only touch the session skip the initial pull
fn refreshes_first(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Sync
            | Commands::Watch { .. }
            | Commands::Logout
            | Commands::Whoami
            | Commands::Use { .. }
    )
}

async fn run(app: App, command: Commands, format: OutputFormat, config: &Config, offline: bool) -> Result<()> {
    let app = Arc::new(app);
    let result = dispatch(&app, command, format, config, offline).await;
    print_notices(&app.take_notices().await);
    result
}

async fn dispatch(
    app: &Arc<App>,
    command: Commands,
    format: OutputFormat,
    config: &Config,
    offline: bool,
) -> Result<()> {
    match command {
        Commands::Sync => {
            if offline {
                println!("Offline: nothing to sync");
                return Ok(());
            }
            app.refresh().await;
            let report = app.subscribe().borrow().clone();
            match report {
                Some(report) => output::output_sync(format, &report),
                None => Ok(()),
            }
        }
        Commands::Watch { interval } => cmd_watch(app, interval.unwrap_or(config.sync_interval_secs), format, offline).await,
        Commands::Login { pin } => {
            app.login(&pin).await?;
            output::output_session(format, &*app.state().await)
        }
        Commands::Logout => {
            app.logout().await?;
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => output::output_session(format, &*app.state().await),
        Commands::Use { commodity } => {
            app.select_commodity(commodity).await?;
            output::output_session(format, &*app.state().await)
        }
        Commands::Balances { by_site, open_only } => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            let mut balances = release_balances(&state.releases(), &state.records());
            if open_only {
                balances.retain(ReleaseBalance::is_open);
            }
            let totals = balance_totals(&balances);
            if by_site {
                output::output_site_balances(format, &site_summaries(&balances), totals)
            } else {
                output::output_release_balances(format, &balances, totals)
            }
        }
        Commands::Factory => show_factory(app, format).await,
        Commands::FactorySet {
            site,
            opening,
            consumption,
        } => {
            app.set_factory_balance(&site, opening, consumption).await?;
            show_factory(app, format).await
        }
        Commands::Records {
            search,
            status,
            site,
            limit,
        } => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            let records = state.records();
            let query = RecordQuery { search, status, site };
            let mut matched = query_records(&records, &query);
            let stats = record_stats(&matched);
            if let Some(limit) = limit {
                matched.truncate(limit);
            }
            output::output_records(format, &matched, stats, &unique_sites(&records))
        }
        Commands::AddRecord(args) => {
            let record = app.add_record(record_from_args(args)).await?;
            output::output_record(format, &record)
        }
        Commands::EditRecord { id, changes } => {
            let existing = {
                let state = app.state().await;
                state
                    .find_record(&id)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(format!("trip {}", id)))?
            };
            let record = app.edit_record(apply_changes(existing, changes)).await?;
            output::output_record(format, &record)
        }
        Commands::SetStatus { id, status } => {
            let record = app.set_record_status(&id, status).await?;
            output::output_record(format, &record)
        }
        Commands::DeleteRecord { id } => {
            let record = app.delete_record(&id).await?;
            println!("Deleted trip {}", record.auto_id);
            Ok(())
        }
        Commands::Available { site, order, editing } => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            let available = available_balance(
                &SiteOrderKey::new(&site, &order),
                &state.releases(),
                &state.records(),
                editing.as_deref(),
            );
            output::output_available(format, available)
        }
        Commands::Releases => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            output::output_releases(format, &state.releases())
        }
        Commands::AddRelease {
            release_no,
            order,
            date,
            goods_type,
            notes,
            distributions,
        } => {
            let draft = ReleaseDraft {
                header: ReleaseHeader {
                    release_no,
                    order_no: order,
                    date: date.map(format_date).unwrap_or_default(),
                    goods_type: goods_type.unwrap_or_default(),
                    notes,
                },
                distributions,
            };
            let rows = app.add_release(draft).await?;
            output::output_releases(format, &rows)
        }
        Commands::EditRelease {
            handle,
            site,
            quantity,
            order,
            date,
            notes,
        } => {
            let mut draft = {
                let state = app.state().await;
                let release = state
                    .find_release(&handle)
                    .ok_or_else(|| Error::NotFound(format!("release {}", handle)))?;
                ReleaseDraft::from_release(release)
            };
            if let Some(order) = order {
                draft.header.order_no = order;
            }
            if let Some(date) = date {
                draft.header.date = format_date(date);
            }
            if let Some(notes) = notes {
                draft.header.notes = notes;
            }
            if let Some(Distribution { site_name, quantity: tons }) = draft.distributions.first_mut() {
                if let Some(site) = site {
                    *site_name = site;
                }
                if let Some(quantity) = quantity {
                    *tons = quantity;
                }
            }
            let release = app.edit_release(&handle, draft).await?;
            output::output_releases(format, std::slice::from_ref(&release))
        }
        Commands::DeleteRelease { handle } => {
            let release = app.delete_release(&handle).await?;
            println!("Deleted release {} ({})", release.release_no, release.site_name.trim());
            Ok(())
        }
        Commands::Orders { site } => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            output::output_orders(format, &site, &order_options(&site, &state.releases()))
        }
        Commands::Report { from, to } => {
            let state = app.state().await;
            state.require_user()?;
            state.require_commodity()?;
            let report = period_report(&state.releases(), &state.records(), from, to)?;
            if format == OutputFormat::Json {
                print_json(&report)
            } else {
                print!("{}", render_period_report(&report));
                Ok(())
            }
        }
        Commands::Master => {
            let state = app.state().await;
            state.require_user()?;
            output::output_master_data(format, &state.dataset.master_data)
        }
        Commands::MasterAdd { list, value } => {
            if !app.add_master_value(list, &value).await? {
                println!("'{}' is blank or already listed", value.trim());
            }
            Ok(())
        }
        Commands::UserAdd {
            name,
            pin,
            role,
            materials,
        } => {
            app.add_user(AppUser {
                name,
                pin,
                role,
                allowed_materials: materials,
            })
            .await
        }
        Commands::Config { .. } | Commands::Cache { .. } => Ok(()),
    }
}

async fn show_factory(app: &App, format: OutputFormat) -> Result<()> {
    let state = app.state().await;
    state.require_user()?;
    let commodity = state.require_commodity()?;
    let rows = factory_balances(
        &state.dataset.releases,
        &state.dataset.records,
        &state.dataset.factory_balances,
        commodity,
    );
    output::output_factory(format, &rows)
}

/// Refresh in the foreground until Ctrl-C or the session ends
async fn cmd_watch(app: &Arc<App>, interval: u32, format: OutputFormat, offline: bool) -> Result<()> {
    if offline {
        return Err(ConfigError::InvalidValue("watch needs the endpoint; drop --offline".to_string()).into());
    }
    if !app.has_session().await {
        return Err(Error::NoSession);
    }

    let mut events = app.subscribe();
    let cancel = CancellationToken::new();
    let mut poller = spawn_polling(Arc::clone(app), interval, cancel.clone());
    eprintln!("Refreshing every {}s, Ctrl-C to stop", interval.max(1));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                cancel.cancel();
                break;
            }
            _ = &mut poller => {
                eprintln!("Session ended");
                return Ok(());
            }
            changed = events.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = events.borrow_and_update().clone();
                if let Some(report) = report {
                    output::output_sync(format, &report)?;
                }
                print_notices(&app.take_notices().await);
            }
        }
    }

    let _ = poller.await;
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn record_from_args(args: RecordArgs) -> TransportRecord {
    TransportRecord {
        date: args.date.map(format_date).unwrap_or_default(),
        departure_time: args.time.unwrap_or_default(),
        car_number: args.car.unwrap_or_default(),
        driver_name: args.driver.unwrap_or_default(),
        driver_phone: args.phone.unwrap_or_default(),
        goods_type: args.goods_type.unwrap_or_default(),
        weight: args.weight,
        status: args.status,
        order_no: args.order,
        unloading_site: args.site,
        loading_site: args.loading_site.unwrap_or_default(),
        contractor_name: args.contractor.unwrap_or_default(),
        waybill_no: args.waybill.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
        ..Default::default()
    }
}

fn apply_changes(mut record: TransportRecord, changes: RecordChanges) -> TransportRecord {
    fn set(field: &mut String, value: Option<String>) {
        if let Some(value) = value {
            *field = value;
        }
    }

    set(&mut record.unloading_site, changes.site);
    set(&mut record.order_no, changes.order);
    set(&mut record.car_number, changes.car);
    set(&mut record.driver_name, changes.driver);
    set(&mut record.driver_phone, changes.phone);
    set(&mut record.date, changes.date.map(format_date));
    set(&mut record.departure_time, changes.time);
    set(&mut record.loading_site, changes.loading_site);
    set(&mut record.contractor_name, changes.contractor);
    set(&mut record.waybill_no, changes.waybill);
    set(&mut record.notes, changes.notes);
    if let Some(weight) = changes.weight {
        record.weight = weight;
    }
    if let Some(status) = changes.status {
        record.status = status;
    }
    record
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    config: &mut Config,
    show: bool,
    set_endpoint: Option<String>,
    set_timeout: Option<u64>,
    set_retries: Option<u32>,
    set_interval: Option<u32>,
    set_cache_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        *config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut modified = false;

    if let Some(endpoint) = set_endpoint {
        let endpoint = endpoint.trim();
        config.endpoint_url = (!endpoint.is_empty()).then(|| endpoint.to_string());
        modified = true;
    }

    if let Some(timeout) = set_timeout {
        config.timeout_secs = timeout;
        modified = true;
    }

    if let Some(retries) = set_retries {
        config.max_retries = retries;
        modified = true;
    }

    if let Some(interval) = set_interval {
        config.sync_interval_secs = interval;
        modified = true;
    }

    if let Some(dir) = set_cache_dir {
        config.cache_dir = Some(dir);
        modified = true;
    }

    if let Some(format) = set_output {
        config.output_format = format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    let cache = LocalCache::open(config.cache_dir()?)?;

    if clear {
        cache.clear_snapshot()?;
        println!("Cached snapshot cleared");
    }

    if stats || !clear {
        println!("Cache directory: {}", cache.dir().display());
        println!();
        output::output_cache_slots(&cache.slots());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use haul_domain::model::OperationStatus;

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["grain-haul"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_session_commands_skip_initial_refresh() {
        assert!(!refreshes_first(&parse(&["whoami"])));
        assert!(!refreshes_first(&parse(&["use", "soy"])));
        assert!(refreshes_first(&parse(&["login", "1234"])));
        assert!(refreshes_first(&parse(&["balances"])));
    }

    #[test]
    fn test_record_from_args_leaves_defaults_blank() {
        let Commands::AddRecord(args) = parse(&["add-record", "--site", " SiteA ", "--order", "77", "-w", "30"]) else {
            panic!("wrong command");
        };
        let record = record_from_args(args);
        assert_eq!(record.unloading_site, " SiteA ");
        assert_eq!(record.weight, 30.0);
        assert_eq!(record.status, OperationStatus::InProgress);
        assert!(record.date.is_empty());
        assert!(record.auto_id.is_empty());
    }

    #[test]
    fn test_apply_changes_keeps_untouched_fields() {
        let record = TransportRecord {
            auto_id: "TR-1".to_string(),
            driver_name: "Samir".to_string(),
            weight: 25.0,
            ..Default::default()
        };
        let changes = RecordChanges {
            weight: Some(31.5),
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            ..Default::default()
        };
        let updated = apply_changes(record, changes);
        assert_eq!(updated.weight, 31.5);
        assert_eq!(updated.date, "2024-03-09");
        assert_eq!(updated.driver_name, "Samir");
        assert_eq!(updated.auto_id, "TR-1");
    }
}
