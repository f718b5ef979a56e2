use chase_core::game::serialization::PursuitSnapshot;
use chase_core::network::DataFormatError;
use std::fs;
use std::path::PathBuf;

pub enum CliOutcome {
    Handled,
    Session(SessionOptions),
}

/// Where the interactive session finds its inputs and drops its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub data_dir: PathBuf,
    pub map_path: Option<PathBuf>,
    pub out_path: PathBuf,
    pub resume: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            data_dir: PathBuf::from("data"),
            map_path: None,
            out_path: PathBuf::from("out.png"),
            resume: None,
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Board(DataFormatError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::UnknownCommand(cmd) => write!(f, "Unknown command: {cmd}"),
            CliError::MissingArgument(arg) => write!(f, "Missing argument: {arg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Board(err) => write!(f, "Board data error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        CliError::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        CliError::Json(value)
    }
}

impl From<DataFormatError> for CliError {
    fn from(value: DataFormatError) -> Self {
        CliError::Board(value)
    }
}

pub fn run_cli() -> Result<CliOutcome, CliError> {
    parse_args(std::env::args().skip(1))
}

pub(crate) fn parse_args<I>(args: I) -> Result<CliOutcome, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut options = SessionOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--inspect-snapshot" => {
                let path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or(CliError::MissingArgument("--inspect-snapshot <path>"))?;
                inspect_snapshot(path)?;
                return Ok(CliOutcome::Handled);
            }
            "--data" => {
                let dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or(CliError::MissingArgument("--data <dir>"))?;
                options.data_dir = dir;
            }
            "--map" => {
                let path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or(CliError::MissingArgument("--map <image>"))?;
                options.map_path = Some(path);
            }
            "--out" => {
                let path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or(CliError::MissingArgument("--out <png>"))?;
                options.out_path = path;
            }
            "--resume" => {
                let path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or(CliError::MissingArgument("--resume <snapshot>"))?;
                options.resume = Some(path);
            }
            "--help" | "-h" => {
                println!("{}", usage());
                return Ok(CliOutcome::Handled);
            }
            other => return Err(CliError::UnknownCommand(other.to_string())),
        }
    }

    Ok(CliOutcome::Session(options))
}

fn usage() -> &'static str {
    concat!(
        "Usage: nychase [options]\n",
        "\n",
        "Starts the interactive pursuit console.\n",
        "\n",
        "Commands:\n",
        "  --inspect-snapshot <path>\n",
        "    Print the sets stored in a saved session\n",
        "  --help\n",
        "    Show this help message\n",
        "\n",
        "Options:\n",
        "  --data <dir>      Board data directory (default: data)\n",
        "  --map <image>     Base board artwork (default: <data>/board.jpg)\n",
        "  --out <png>       Rendered overlay path (default: out.png)\n",
        "  --resume <path>   Resume a saved session snapshot"
    )
}

fn inspect_snapshot(path: PathBuf) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Snapshot not found: {}", path.display()),
        )));
    }

    let json = fs::read_to_string(&path)?;
    let snapshot = PursuitSnapshot::from_json(&json)?;
    let belief = snapshot.restore();

    println!("Snapshot loaded from {}", path.display());
    println!("Detectives: {}", join_stations(belief.detectives().iter()));
    println!("Barrages: {}", join_stations(belief.barrages().iter()));
    println!(
        "Mister X candidates ({}): {}",
        belief.candidates().len(),
        join_stations(belief.candidates().iter())
    );
    Ok(())
}

pub(crate) fn join_stations<'a, I>(stations: I) -> String
where
    I: Iterator<Item = &'a chase_core::model::station::Station>,
{
    let labels: Vec<String> = stations.map(|station| station.to_string()).collect();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}
