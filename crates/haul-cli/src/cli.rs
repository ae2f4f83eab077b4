//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use haul_domain::model::{Commodity, Distribution, MasterList, OperationStatus, UserRole};
use haul_types::OutputFormat;

#[derive(Parser)]
#[command(name = "grain-haul")]
#[command(version)]
#[command(about = "Track soy and maize truck transport against release quotas")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Endpoint URL override. Uses config value if not specified.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Work from the cached snapshot without contacting the endpoint
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull the latest snapshot from the endpoint
    Sync,

    /// Keep refreshing in the foreground until Ctrl-C or logout
    Watch {
        /// Seconds between refreshes. Uses config value if not specified.
        #[arg(long, short = 'i')]
        interval: Option<u32>,
    },

    /// Sign in with a PIN
    Login {
        pin: String,
    },

    /// Sign out and forget the selected section
    Logout,

    /// Show the signed-in user and section
    Whoami,

    /// Open the soy or maize section
    Use {
        commodity: Commodity,
    },

    /// Release balances per site and order
    Balances {
        /// Roll up per site instead of per order
        #[arg(long)]
        by_site: bool,

        /// Hide fully consumed releases
        #[arg(long)]
        open_only: bool,
    },

    /// Factory stock per site
    Factory,

    /// Set a site's opening balance and manual consumption
    FactorySet {
        site: String,

        /// Opening balance in tons
        #[arg(long)]
        opening: f64,

        /// Manually recorded consumption in tons
        #[arg(long, default_value_t = 0.0)]
        consumption: f64,
    },

    /// List trips, newest first
    Records {
        /// Match car number, driver, order number or waybill
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long)]
        status: Option<OperationStatus>,

        #[arg(long)]
        site: Option<String>,

        /// Show at most this many rows
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Log a new trip
    AddRecord(RecordArgs),

    /// Change fields of an existing trip
    EditRecord {
        id: String,

        #[command(flatten)]
        changes: RecordChanges,
    },

    /// Change the status of a trip
    SetStatus {
        id: String,
        status: OperationStatus,
    },

    DeleteRecord {
        id: String,
    },

    /// Tons still available for a site and order
    Available {
        #[arg(long)]
        site: String,

        #[arg(long)]
        order: String,

        /// Leave this trip out of the consumed total
        #[arg(long)]
        editing: Option<String>,
    },

    /// List releases
    Releases,

    /// Register a release split over one or more sites
    AddRelease {
        #[arg(long)]
        release_no: String,

        #[arg(long)]
        order: String,

        /// Release date (YYYY-MM-DD), today if omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Goods type, the section default if omitted
        #[arg(long)]
        goods_type: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,

        /// Site share as SITE=TONS; repeat for more sites
        #[arg(long = "dist", required = true, value_parser = parse_distribution)]
        distributions: Vec<Distribution>,
    },

    /// Change one release row
    EditRelease {
        /// Release id, or release number when rows have no id
        handle: String,

        #[arg(long)]
        site: Option<String>,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        order: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    DeleteRelease {
        handle: String,
    },

    /// Orders released to a site
    Orders {
        #[arg(long)]
        site: String,
    },

    /// Movement totals for a date range
    Report {
        #[arg(long)]
        from: NaiveDate,

        #[arg(long)]
        to: NaiveDate,
    },

    /// Show the reference lists
    Master,

    /// Add a value to a reference list
    MasterAdd {
        /// drivers, cars, loading-sites, unloading-sites, goods-types, order-numbers, contractors, items
        list: MasterList,

        value: String,
    },

    /// Add or replace a user in the directory
    UserAdd {
        name: String,

        #[arg(long)]
        pin: String,

        #[arg(long, default_value = "viewer")]
        role: UserRole,

        /// الكل, صويا or ذرة
        #[arg(long, default_value = "الكل")]
        materials: String,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set endpoint URL
        #[arg(long)]
        set_endpoint: Option<String>,

        /// Set request timeout in seconds
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set snapshot fetch retries
        #[arg(long)]
        set_retries: Option<u32>,

        /// Set seconds between background refreshes
        #[arg(long)]
        set_interval: Option<u32>,

        /// Set cache directory
        #[arg(long)]
        set_cache_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },

    /// Manage the local snapshot cache
    Cache {
        /// Drop the cached snapshot
        #[arg(long)]
        clear: bool,

        /// Show slot sizes
        #[arg(long)]
        stats: bool,
    },
}

/// Fields of the trip form
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Unloading site
    #[arg(long)]
    pub site: String,

    #[arg(long)]
    pub order: String,

    /// Net weight in tons
    #[arg(long, short = 'w')]
    pub weight: f64,

    #[arg(long)]
    pub car: Option<String>,

    #[arg(long)]
    pub driver: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Trip date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Departure time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long, default_value = "in-progress")]
    pub status: OperationStatus,

    #[arg(long)]
    pub goods_type: Option<String>,

    #[arg(long)]
    pub loading_site: Option<String>,

    #[arg(long)]
    pub contractor: Option<String>,

    #[arg(long)]
    pub waybill: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

/// Trip fields to overwrite; omitted ones keep their value
#[derive(Args, Debug, Clone, Default)]
pub struct RecordChanges {
    #[arg(long)]
    pub site: Option<String>,

    #[arg(long)]
    pub order: Option<String>,

    #[arg(long, short = 'w')]
    pub weight: Option<f64>,

    #[arg(long)]
    pub car: Option<String>,

    #[arg(long)]
    pub driver: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub time: Option<String>,

    #[arg(long)]
    pub status: Option<OperationStatus>,

    #[arg(long)]
    pub loading_site: Option<String>,

    #[arg(long)]
    pub contractor: Option<String>,

    #[arg(long)]
    pub waybill: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

/// `SITE=TONS`; the last `=` splits, so site names may contain one
fn parse_distribution(raw: &str) -> Result<Distribution, String> {
    let (site, quantity) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SITE=TONS, got '{}'", raw))?;
    let quantity: f64 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", quantity.trim()))?;
    Ok(Distribution {
        site_name: site.trim().to_string(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distribution() {
        let d = parse_distribution(" Silo=North = 120.5").unwrap();
        assert_eq!(d.site_name, "Silo=North");
        assert_eq!(d.quantity, 120.5);
        assert!(parse_distribution("SiteA").is_err());
        assert!(parse_distribution("SiteA=lots").is_err());
    }

    #[test]
    fn test_add_release_collects_distributions() {
        let cli = Cli::try_parse_from([
            "grain-haul",
            "add-release",
            "--release-no",
            "R-9",
            "--order",
            "77",
            "--dist",
            "SiteA=300",
            "--dist",
            "SiteB=200",
        ])
        .unwrap();
        match cli.command {
            Commands::AddRelease { distributions, date, .. } => {
                assert_eq!(distributions.len(), 2);
                assert!(date.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["grain-haul", "balances", "--by-site", "-f", "json", "--offline"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.offline);
        assert!(matches!(cli.command, Commands::Balances { by_site: true, open_only: false }));
    }

    #[test]
    fn test_status_and_commodity_values() {
        let cli = Cli::try_parse_from(["grain-haul", "set-status", "TR-1-2", "stopped"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::SetStatus { status: OperationStatus::Stopped, .. }
        ));
        assert!(Cli::try_parse_from(["grain-haul", "use", "maize"]).is_ok());
        assert!(Cli::try_parse_from(["grain-haul", "use", "rice"]).is_err());
    }
}
