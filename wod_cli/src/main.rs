use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use wod_core::*;

#[derive(Parser)]
#[command(name = "wod")]
#[command(about = "Workout description parser and normalizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Movement dictionary to resolve names against (.json, .toml or .csv)
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show parser diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse freeform workout text (reads stdin when no file is given)
    Parse {
        /// Text file to parse, or "-" for stdin
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Import a stored JSON workout template
    Import {
        /// Template file, or "-" for stdin
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Render a parsed workout (JSON) as plain text
    Render {
        /// Parsed workout file, or "-" for stdin
        file: Option<PathBuf>,
    },

    /// List the movement dictionary
    Movements {
        /// Check the dictionary for conflicts instead of listing it
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    wod_core::logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let catalog = match &cli.dictionary {
        Some(path) => MovementCatalog::load_from(path)?,
        None => config.load_dictionary()?,
    };

    match cli.command {
        Commands::Parse { file, format } => cmd_parse(file.as_deref(), format, &catalog, &config),
        Commands::Import { file, format } => {
            cmd_import(file.as_deref(), format, &catalog, &config)
        }
        Commands::Render { file } => cmd_render(file.as_deref(), &config),
        Commands::Movements { validate } => cmd_movements(&catalog, validate),
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn print_workout(workout: &ParsedWorkout, format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(workout)?),
        OutputFormat::Text => {
            let text = render_text(workout, &config.render);
            if text.is_empty() {
                println!("(no movements recognized)");
            } else {
                println!("{}", text);
            }
        }
    }
    Ok(())
}

fn cmd_parse(
    file: Option<&Path>,
    format: OutputFormat,
    catalog: &MovementCatalog,
    config: &Config,
) -> Result<()> {
    let text = read_input(file)?;
    let parser = WorkoutParser::new(catalog.entries()).with_options(config.parser.clone());
    let workout = parser.parse(&FreeformText(&text));

    tracing::info!(
        "Parsed {} movements in {} blocks",
        workout.movements().count(),
        workout.workout_blocks.len()
    );

    print_workout(&workout, format, config)
}

fn cmd_import(
    file: Option<&Path>,
    format: OutputFormat,
    catalog: &MovementCatalog,
    config: &Config,
) -> Result<()> {
    let template = WorkoutTemplate::from_json(&read_input(file)?)?;
    let parser = WorkoutParser::new(catalog.entries()).with_options(config.parser.clone());
    let workout = parser.import(&template);

    print_workout(&workout, format, config)
}

fn cmd_render(file: Option<&Path>, config: &Config) -> Result<()> {
    let workout: ParsedWorkout = serde_json::from_str(&read_input(file)?)?;
    print_workout(&workout, OutputFormat::Text, config)
}

fn cmd_movements(catalog: &MovementCatalog, validate: bool) -> Result<()> {
    if validate {
        let errors = catalog.validate();
        if !errors.is_empty() {
            eprintln!("Dictionary validation errors:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            return Err(Error::CatalogValidation(format!(
                "{} problem(s) found",
                errors.len()
            )));
        }
        println!("✓ Dictionary OK ({} movements)", catalog.len());
        return Ok(());
    }

    for movement in catalog.entries() {
        if movement.aliases.is_empty() {
            println!("{}", movement.name);
        } else {
            println!("{}  ({})", movement.name, movement.aliases.join(", "));
        }
    }
    Ok(())
}
