use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use biotrack::config::SettingsLoader;
use biotrack::datasets::{Dataset, Datasets, HttpRetriever};
use biotrack::domain::Table;
use biotrack::error::TrackError;
use biotrack::insert::Origin;
use biotrack::knowledge::Entity;
use biotrack::output::{FetchResult, InsertResult, JsonOutput, ValidationResult};
use biotrack::provenance::NotebookFile;
use biotrack::store::Database;

#[derive(Parser)]
#[command(name = "biotrack")]
#[command(about = "Track data files, users and notebook provenance")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create the database and register the configured user")]
    Setup,
    #[command(about = "Manage users")]
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    #[command(about = "Track data files")]
    File {
        #[command(subcommand)]
        command: FileCommand,
    },
    #[command(about = "Print a table as JSON")]
    List {
        #[arg(value_enum)]
        table: Table,
    },
    #[command(about = "Download example datasets")]
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },
    #[command(about = "Ontology table defaults and identifier checks")]
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommand,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    Add {
        name: String,
        #[arg(long)]
        if_not_exists: bool,
    },
}

#[derive(Subcommand)]
enum FileCommand {
    Add(FileAddArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("origin").required(true).args(["interface", "notebook"])))]
struct FileAddArgs {
    path: PathBuf,

    #[arg(long)]
    interface: Option<String>,

    #[arg(long, requires = "interface")]
    interface_name: Option<String>,

    #[arg(long)]
    notebook: Option<PathBuf>,
}

#[derive(Subcommand)]
enum DatasetCommand {
    Fetch {
        name: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    List,
}

#[derive(Subcommand)]
enum KnowledgeCommand {
    Defaults {
        #[arg(value_enum)]
        entity: Entity,
    },
    Validate {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<TrackError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &TrackError) -> u8 {
    match error {
        TrackError::MissingConfig | TrackError::Configuration(_) => 2,
        TrackError::TransferHttp(_) | TrackError::TransferStatus { .. } => 3,
        TrackError::Storage(_) => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Setup => {
            let settings = SettingsLoader::resolve(cli.config.as_deref())?;
            let (db, context) = Database::setup(&settings)?;
            tracing::info!("database ready at {}", db.path());
            JsonOutput::print_json(&context).into_diagnostic()
        }
        Commands::User { command } => run_user(command, cli.config.as_deref()),
        Commands::File { command } => run_file(command, cli.config.as_deref()),
        Commands::List { table } => run_list(table, cli.config.as_deref()),
        Commands::Dataset { command } => run_dataset(command),
        Commands::Knowledge { command } => run_knowledge(command),
    }
}

fn open_database(config: Option<&str>) -> Result<Database, TrackError> {
    let settings = SettingsLoader::resolve(config)?;
    Database::open(settings.database)
}

fn run_user(command: UserCommand, config: Option<&str>) -> miette::Result<()> {
    let db = open_database(config)?;
    match command {
        UserCommand::Add {
            name,
            if_not_exists,
        } => {
            let id = if if_not_exists {
                db.insert_if_not_exists_user(&name)?
            } else {
                db.insert_user(&name)?
            };
            JsonOutput::print_insert(&InsertResult {
                table: "user",
                id: id.into(),
            })
            .into_diagnostic()
        }
    }
}

fn run_file(command: FileCommand, config: Option<&str>) -> miette::Result<()> {
    let settings = SettingsLoader::resolve(config)?;
    let (db, context) = Database::setup(&settings)?;
    match command {
        FileCommand::Add(args) => {
            let notebook = args.notebook.map(NotebookFile::new);
            let origin = match (&notebook, args.interface) {
                (Some(notebook), _) => Origin::Notebook(notebook),
                (None, Some(id)) => Origin::explicit(id, args.interface_name),
                (None, None) => {
                    return Err(miette::Report::msg(
                        "either --interface or --notebook is required",
                    ));
                }
            };
            let id = db.ingest_file(&context, &args.path, origin)?;
            JsonOutput::print_insert(&InsertResult {
                table: "file",
                id: id.into(),
            })
            .into_diagnostic()
        }
    }
}

fn run_list(table: Table, config: Option<&str>) -> miette::Result<()> {
    let db = open_database(config)?;
    match table {
        Table::Users => JsonOutput::print_rows(&db.load_users()?),
        Table::Interfaces => JsonOutput::print_rows(&db.load_interfaces()?),
        Table::Files => JsonOutput::print_rows(&db.load_files()?),
    }
    .into_diagnostic()
}

fn run_dataset(command: DatasetCommand) -> miette::Result<()> {
    match command {
        DatasetCommand::Fetch { name, dir } => {
            let dataset: Dataset = name.parse()?;
            let datasets = match dir {
                Some(dir) => Datasets::new(HttpRetriever::new()?, dir),
                None => Datasets::in_current_dir()?,
            };
            let path = datasets.fetch(dataset)?;
            JsonOutput::print_fetch(&FetchResult {
                dataset: dataset.name().to_string(),
                url: dataset.url().to_string(),
                path: path.display().to_string(),
            })
            .into_diagnostic()
        }
        DatasetCommand::List => JsonOutput::print_rows(&Dataset::ALL).into_diagnostic(),
    }
}

fn run_knowledge(command: KnowledgeCommand) -> miette::Result<()> {
    match command {
        KnowledgeCommand::Defaults { entity } => {
            JsonOutput::print_json(&entity.table().defaults()).into_diagnostic()
        }
        KnowledgeCommand::Validate { entity, ids } => {
            let table = entity.table();
            let (valid, invalid): (Vec<_>, Vec<_>) =
                ids.into_iter().partition(|id| table.validate_id(id).is_ok());
            JsonOutput::print_validation(&ValidationResult {
                defaults: table.defaults(),
                valid,
                invalid,
            })
            .into_diagnostic()
        }
    }
}
