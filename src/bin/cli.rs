use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use sqlkit::ddl::{catalog_tables, replay_ddls};
use sqlkit::dml::{explain_named_sql, parse_sql, Value};
use sqlkit::schema::{parse_enums, Enums, Tables};
use sqlkit::{parse_ddl, Catalog, DbName, TableRegistry};

const HISTORY_FILE: &str = ".sqlkit_history";

#[derive(Parser)]
#[command(author, version, about = "SqlKit CLI - MySQL schema and DML template tool")]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DDL file and print its tables as JSON
    Ddl {
        /// File holding CREATE/ALTER statements
        file: PathBuf,
    },

    /// Print the enum constants declared in column comments of a DDL file
    Enums {
        file: PathBuf,
    },

    /// Print the template of a DML statement as JSON
    Tpl {
        sql: String,
    },

    /// Bind named parameters into SQL
    Bind {
        /// SQL with :name placeholders
        sql: String,

        /// JSON object of bindings
        #[arg(short, long, default_value = "{}")]
        data: String,
    },

    /// Start an interactive shell
    Shell,
}

fn read_tables(file: &Path) -> Result<Tables> {
    let ddl = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    parse_ddl(&ddl).with_context(|| format!("Failed to parse DDL in {}", file.display()))
}

fn collect_enums(tables: &Tables) -> Result<Enums> {
    let mut enums = Enums::new();
    for column in tables.iter().flat_map(|t| t.columns.iter()) {
        enums.extend(parse_enums(column)?);
    }
    Ok(enums.unique_items())
}

fn bind(sql: &str, data: &str) -> Result<String> {
    let json: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(data).context("--data must be a JSON object")?;
    let values: BTreeMap<String, Value> = json
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect();
    Ok(explain_named_sql(sql, &values)?)
}

/// Shell session: DDL lines replay into the session catalog, whose tables
/// back the registry; DML lines print templates
struct Session {
    catalog: Catalog,
    registry: TableRegistry,
}

impl Session {
    fn new() -> Self {
        Session {
            catalog: Catalog::new(),
            registry: TableRegistry::new(),
        }
    }

    fn handle(&mut self, line: &str) -> Result<()> {
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or_default();
        if ["CREATE", "ALTER", "DROP", "USE"].iter().any(|k| first.eq_ignore_ascii_case(k)) {
            let replayed = replay_ddls(&mut self.catalog, line);
            // earlier statements of a failed batch stay applied
            self.registry.replace_all(catalog_tables(&self.catalog)?);
            replayed?;
            println!("{} tables registered", self.registry.len());
        } else if first.eq_ignore_ascii_case("tables") {
            let db = words.next().unwrap_or_default();
            display_tables(&self.registry, &DbName::from(db));
        } else {
            println!("{}", parse_sql(line)?);
        }
        Ok(())
    }
}

fn display_tables(registry: &TableRegistry, db: &DbName) {
    let tables = registry.tables(db);
    let width = tables
        .iter()
        .map(|t| t.table_name.as_str().len())
        .max()
        .unwrap_or(0)
        .max(5);

    println!("| {:<width$} | columns |", "table", width = width);
    println!("+{:-<w$}+---------+", "", w = width + 2);
    for table in &tables {
        println!("| {:<width$} | {:>7} |", table.table_name, table.columns.len(), width = width);
    }
    println!("({} rows)", tables.len());
}

fn run_shell() -> Result<()> {
    println!("Welcome to SqlKit. Type 'help' for assistance or 'exit' to quit.");

    let mut session = Session::new();
    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        match rl.readline("sqlkit> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" => print_help(),
                    _ => {
                        if let Err(err) = session.handle(line) {
                            println!("Error: {:#}", err);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

fn print_help() {
    println!("Available commands:");
    println!("  CREATE / ALTER / DROP / USE ...  - Replay DDL into the session schema");
    println!("  TABLES <db>                      - List registered tables of a database");
    println!("  SELECT / INSERT / UPDATE / DELETE - Print the statement template");
    println!();
    println!("Other commands:");
    println!("  help                             - Display this help message");
    println!("  exit                             - Exit the shell");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Ddl { file }) => {
            println!("{}", read_tables(file)?);
        }
        Some(Commands::Enums { file }) => {
            let enums = collect_enums(&read_tables(file)?)?;
            println!("{}", serde_json::to_string(&enums)?);
        }
        Some(Commands::Tpl { sql }) => {
            let tpl = parse_sql(sql).context("Failed to template statement")?;
            println!("{}", tpl);
        }
        Some(Commands::Bind { sql, data }) => {
            println!("{}", bind(sql, data)?);
        }
        Some(Commands::Shell) | None => run_shell()?,
    }

    Ok(())
}
