use crate::config::toml_config::TomlConfig;
use crate::config::ClientSettings;
use crate::domain::model::{CategoryType, Period};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "bablo")]
#[command(about = "Command-line client for the BabloBudget personal finance backend")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Backend base URL [default: http://localhost:8018]")]
    pub base_url: Option<String>,

    #[arg(long, global = true, help = "Where the login session is kept")]
    pub session_file: Option<String>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Defaults, overlaid by `--config`, overlaid by the individual flags.
    pub fn settings(&self) -> Result<ClientSettings> {
        let mut settings = ClientSettings::default();

        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings = settings.merge_toml(&file);
        }

        let settings = settings.with_overrides(
            self.base_url.as_deref(),
            self.session_file.as_deref(),
            self.timeout,
        );
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a user account
    Register(Credentials),
    /// Log in and keep the session
    Login(Credentials),
    /// Forget the stored session
    Logout,
    #[command(subcommand)]
    Account(AccountCommand),
    #[command(subcommand)]
    Entry(EntryCommand),
    #[command(subcommand)]
    Flow(FlowCommand),
    #[command(subcommand)]
    Category(CategoryCommand),
}

#[derive(Debug, Clone, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AccountCommand {
    /// Create the account with an initial balance
    Create {
        #[arg(allow_negative_numbers = true)]
        basis_sum: f64,
    },
    /// Show the current balance
    Balance,
    /// Set a new balance
    Update {
        #[arg(allow_negative_numbers = true)]
        new_basis_sum: f64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct EntryArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub sum: f64,
    #[arg(long, help = "Date as YYYY-MM-DD")]
    pub date: NaiveDate,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum EntryCommand {
    List,
    Get { id: String },
    Create(EntryArgs),
    Update {
        id: String,
        #[command(flatten)]
        entry: EntryArgs,
    },
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Daily,
    Monthly,
    Yearly,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => Period::Daily,
            PeriodArg::Monthly => Period::Monthly,
            PeriodArg::Yearly => Period::Yearly,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FlowArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub sum: f64,
    #[arg(long, help = "Starting date as YYYY-MM-DD")]
    pub start: NaiveDate,
    #[arg(long, value_enum)]
    pub period: PeriodArg,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum FlowCommand {
    List,
    Get { id: String },
    Create(FlowArgs),
    Update {
        id: String,
        #[command(flatten)]
        flow: FlowArgs,
    },
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryKindArg {
    Income,
    Expense,
}

impl From<CategoryKindArg> for CategoryType {
    fn from(arg: CategoryKindArg) -> Self {
        match arg {
            CategoryKindArg::Income => CategoryType::Income,
            CategoryKindArg::Expense => CategoryType::Expense,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoryCommand {
    /// List income categories
    Income,
    /// List expense categories
    Expense,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        kind: CategoryKindArg,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_create() {
        let cli = CliConfig::try_parse_from([
            "bablo", "entry", "create", "--sum", "-42.5", "--date", "2024-05-01", "--category", "c1",
        ])
        .unwrap();

        match cli.command {
            Command::Entry(EntryCommand::Create(args)) => {
                assert_eq!(args.sum, -42.5);
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
                assert_eq!(args.category.as_deref(), Some("c1"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from([
            "bablo",
            "account",
            "balance",
            "--base-url",
            "http://budget.example.com",
            "--timeout",
            "5",
        ])
        .unwrap();

        let settings = cli.settings().unwrap();
        assert_eq!(settings.base_url, "http://budget.example.com");
        assert_eq!(settings.timeout_seconds, Some(5));
    }

    #[test]
    fn test_negative_balance_is_a_value() {
        let cli = CliConfig::try_parse_from(["bablo", "account", "update", "-100"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Account(AccountCommand::Update { new_basis_sum }) if new_basis_sum == -100.0
        ));

        let cli = CliConfig::try_parse_from(["bablo", "account", "create", "-0.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Account(AccountCommand::Create { basis_sum }) if basis_sum == -0.5
        ));
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = CliConfig::try_parse_from([
            "bablo", "flow", "create", "--sum", "10", "--start", "01.05.2024", "--period", "monthly",
        ]);
        assert!(result.is_err());
    }
}
