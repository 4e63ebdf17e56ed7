//! Menagerie CLI
//!
//! Loads the animal and feeding text files into a catalog and runs one
//! query or maintenance command against it.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use menagerie::catalog::IndexKind;
use menagerie::{Animal, Catalog, Config, Feeding, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Menagerie CLI
#[derive(Parser, Debug)]
#[command(name = "menagerie")]
#[command(about = "Zoo catalog with hash and AVL indexes")]
#[command(version)]
struct Args {
    /// Animals file (`nickname species cage` per line)
    #[arg(short, long, default_value = "animals.txt")]
    animals: PathBuf,

    /// Feedings file (`nickname feed_type quantity DD.MM.YYYY` per line)
    #[arg(short, long, default_value = "feedings.txt")]
    feedings: PathBuf,

    /// Initial slot count of the nickname hash index
    #[arg(long, default_value = "16")]
    hash_capacity: usize,

    /// Read at most this many records from each file
    #[arg(long)]
    max_lines: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up an animal by nickname
    Find {
        nickname: String,
    },

    /// List feedings of one animal
    Feedings {
        nickname: String,
    },

    /// List animals of one species
    Species {
        species: String,
    },

    /// List feedings on a date (DD.MM.YYYY)
    On {
        date: String,
    },

    /// List feedings between two dates, inclusive
    Between {
        from: String,
        to: String,
    },

    /// Feeding report for a date
    Report {
        date: String,

        /// Only animals of this species
        #[arg(short, long)]
        species: Option<String>,

        /// Only feedings with exactly this quantity
        #[arg(short, long)]
        quantity: Option<i64>,
    },

    /// Add an animal and write the animals file back
    AddAnimal {
        nickname: String,
        species: String,
        cage: String,
    },

    /// Remove an animal with its feedings and write both files back
    RemoveAnimal {
        nickname: String,
        species: String,
        cage: String,
    },

    /// Add a feeding and write the feedings file back
    AddFeeding {
        nickname: String,
        feed_type: String,
        quantity: i64,
        date: String,
    },

    /// Print the internal layout of one index
    Dump {
        #[arg(value_enum)]
        index: DumpTarget,
    },

    /// Save both record arrays to a binary snapshot
    Snapshot {
        path: PathBuf,
    },

    /// Load a binary snapshot and write its records to the text files
    Restore {
        path: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DumpTarget {
    Hash,
    Species,
    Feedings,
    Quantity,
    Dates,
}

impl From<DumpTarget> for IndexKind {
    fn from(target: DumpTarget) -> Self {
        match target {
            DumpTarget::Hash => IndexKind::Hash,
            DumpTarget::Species => IndexKind::Species,
            DumpTarget::Feedings => IndexKind::Feedings,
            DumpTarget::Quantity => IndexKind::Quantity,
            DumpTarget::Dates => IndexKind::Dates,
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,menagerie=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut builder = Config::builder().hash_initial_capacity(args.hash_capacity);
    if let Some(lines) = args.max_lines {
        builder = builder.max_import_lines(lines);
    }
    let mut catalog = Catalog::new(builder.build())?;

    // Restore writes the files instead of reading them
    if let Commands::Restore { path } = &args.command {
        catalog.load_snapshot(path)?;
        catalog.export_animals(&args.animals)?;
        catalog.export_feedings(&args.feedings)?;
        println!(
            "Restored {} animals and {} feedings",
            catalog.animals().len(),
            catalog.feedings().len()
        );
        return Ok(());
    }

    if args.animals.exists() {
        catalog.import_animals(&args.animals)?;
    }
    if args.feedings.exists() {
        catalog.import_feedings(&args.feedings)?;
    }

    match args.command {
        Commands::Find { nickname } => {
            let lookup = catalog.find_animal(&nickname);
            match lookup.animal {
                Some(animal) => println!("{} [{} probe(s)]", animal, lookup.steps),
                None => println!("{} not found [{} probe(s)]", nickname, lookup.steps),
            }
        }
        Commands::Feedings { nickname } => {
            print_rows(catalog.feedings_for(&nickname));
        }
        Commands::Species { species } => {
            print_rows(catalog.animals_of_species(&species));
        }
        Commands::On { date } => {
            print_rows(catalog.feedings_on(&date)?);
        }
        Commands::Between { from, to } => {
            print_rows(catalog.feedings_between(&from, &to)?);
        }
        Commands::Report {
            date,
            species,
            quantity,
        } => {
            let report = catalog.feeding_report(&date, species.as_deref(), quantity)?;
            println!("{}", report);
        }
        Commands::AddAnimal {
            nickname,
            species,
            cage,
        } => {
            let row = catalog.add_animal(Animal::new(nickname, species, cage))?;
            catalog.export_animals(&args.animals)?;
            println!("Added animal at row {}", row);
        }
        Commands::RemoveAnimal {
            nickname,
            species,
            cage,
        } => {
            let dropped = catalog.remove_animal(&nickname, &species, &cage)?;
            catalog.export_animals(&args.animals)?;
            catalog.export_feedings(&args.feedings)?;
            println!("Removed {} and {} feeding(s)", nickname, dropped);
        }
        Commands::AddFeeding {
            nickname,
            feed_type,
            quantity,
            date,
        } => {
            let row = catalog.add_feeding(Feeding::new(nickname, feed_type, quantity, date))?;
            catalog.export_feedings(&args.feedings)?;
            println!("Added feeding at row {}", row);
        }
        Commands::Dump { index } => {
            let stdout = io::stdout();
            catalog.dump(index.into(), &mut stdout.lock())?;
        }
        Commands::Snapshot { path } => {
            let bytes = catalog.save_snapshot(&path)?;
            println!("Wrote {} bytes to {}", bytes, path.display());
        }
        Commands::Restore { .. } => {}
    }

    Ok(())
}

fn print_rows<R: std::fmt::Display>(rows: Vec<(usize, &R)>) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }
    for (row, record) in rows {
        println!("{:>5}  {}", row, record);
    }
}
