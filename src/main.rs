// Entrypoint for the CLI application.
// - Parses flags, loads the env file and resolves configuration once.
// - Dispatches to listing or detail mode; any error is printed in red and
//   the process exits with status 1.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use meistertask_cli::api::ApiClient;
use meistertask_cli::config::{self, Config};
use meistertask_cli::snapshot::default_snapshot_path;
use meistertask_cli::tasks::TaskService;
use meistertask_cli::ui;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Index value that means "no task selected".
const NO_TASK: i64 = -1;

#[derive(Debug, Parser)]
#[command(version, about = "List your open MeisterTask tasks and read their comments")]
struct Args {
    /// 1-based position of a task in the listing to show in detail
    #[arg(short, long, visible_alias = "get", short_alias = 'g', allow_negative_numbers = true)]
    task: Option<i64>,

    /// Show the comments of a task by its API id
    #[arg(long)]
    id: Option<i64>,

    /// Env file to load before reading configuration
    #[arg(long, default_value = config::DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Log requests and responses to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// What a single invocation does.
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Listing,
    Detail(i64),
    Comments(i64),
}

/// Single-dash long flags accepted for compatibility with `-task 3` and
/// `-get 3` invocations.
const SINGLE_DASH_FLAGS: [&str; 2] = ["task", "get"];

/// Rewrite `-task`, `-get`, `-task=N` and `-get=N` to their `--` spelling.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            double_dashed(&arg).unwrap_or(arg)
        })
        .collect()
}

fn double_dashed(arg: &OsString) -> Option<OsString> {
    let text = arg.to_str()?;
    let rest = text.strip_prefix('-').filter(|r| !r.starts_with('-'))?;
    let name = rest.split('=').next().unwrap_or(rest);
    SINGLE_DASH_FLAGS
        .contains(&name)
        .then(|| OsString::from(format!("-{text}")))
}

impl Args {
    fn mode(&self) -> Result<Mode, clap::Error> {
        match (self.task.filter(|&i| i != NO_TASK), self.id) {
            (Some(_), Some(_)) => Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                "--task and --id cannot be used together",
            )),
            (Some(index), None) => Ok(Mode::Detail(index)),
            (None, Some(task_id)) => Ok(Mode::Comments(task_id)),
            (None, None) => Ok(Mode::Listing),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_args(std::env::args_os()));
    let mode = args.mode().unwrap_or_else(|e| e.exit());
    init_tracing(args.verbose);

    match run(args, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {e:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, mode: Mode) -> anyhow::Result<()> {
    config::load_env_file(&args.env_file)?;
    let config = Config::from_env()?;

    let client = ApiClient::new(&config)?;
    let service = TaskService::new(&config, client);
    let mut stdout = std::io::stdout().lock();

    match mode {
        Mode::Detail(index) => {
            info!(index, "detail mode");
            ui::show_task_detail(&service, index, &mut stdout)?;
        }
        Mode::Comments(task_id) => {
            info!(task_id, "comments mode");
            ui::show_comments(&service, task_id, &mut stdout)?;
        }
        Mode::Listing => {
            info!("listing mode");
            let path = default_snapshot_path()?;
            ui::show_tasks(&service, &path, &mut stdout)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,meistertask_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
