//! These structs provide the CLI interface for spendlog.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendlog: A command-line tool for recording personal expenses.
///
/// Expenses (a name, an amount, a category and a date) are kept in a local
/// SQLite database under the spendlog home directory. Use `init` once to
/// create the directory, then `add`, `list`, `edit` and `delete` to manage
/// your records.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and an empty
    /// database.
    ///
    /// This is the first command you should run. By default everything goes
    /// under $HOME/spendlog; pass --spendlog-home or set SPENDLOG_HOME to put
    /// it somewhere else.
    Init,

    /// Record a new expense.
    Add(AddArgs),

    /// List all recorded expenses.
    List,

    /// Edit a recorded expense in place.
    ///
    /// Only the fields you pass change; everything else keeps its current
    /// value. The merged record is validated the same way as a new one, so a
    /// bad amount or date rejects the whole edit.
    Edit(EditArgs),

    /// Delete a recorded expense.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendlog data and configuration is held.
    /// Defaults to ~/spendlog
    #[arg(long, env = "SPENDLOG_HOME", default_value_t = default_spendlog_home())]
    spendlog_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, spendlog_home: PathBuf) -> Self {
        Self {
            log_level,
            spendlog_home: spendlog_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn spendlog_home(&self) -> &DisplayPath {
        &self.spendlog_home
    }
}

/// Args for the `spendlog add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the expense was, e.g. "Coffee"
    #[arg(long)]
    pub name: String,

    /// How much it cost, e.g. "4.50"
    #[arg(long)]
    pub amount: String,

    /// One of: food, apartment, transport, fees, health, social, shopping,
    /// travel, others
    #[arg(long)]
    pub category: String,

    /// The date of the expense as yyyy-mm-dd. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
}

/// Args for the `spendlog edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the expense to edit, as shown by `spendlog list`
    pub id: i64,

    /// A new name for the expense
    #[arg(long)]
    pub name: Option<String>,

    /// A new amount for the expense
    #[arg(long)]
    pub amount: Option<String>,

    /// A new category for the expense
    #[arg(long)]
    pub category: Option<String>,

    /// A new date for the expense as yyyy-mm-dd
    #[arg(long)]
    pub date: Option<String>,
}

/// Args for the `spendlog delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the expense to delete, as shown by `spendlog list`
    pub id: i64,
}

fn default_spendlog_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendlog"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --spendlog-home or SPENDLOG_HOME instead of relying on the \
                default spendlog home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("spendlog")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
