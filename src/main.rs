mod cmd;
mod config;
mod dump;
mod error;
mod logging;
mod pipeline;
mod schema;

use clap::Parser;
use cmd::migrate::CommandMigrator;
use cmd::seed::CommandSeeder;
use dump::DumpRequest;
use logging::{Level, Logger};
use pipeline::{Options, Pipeline, DEFAULT_DUMP_PATH, DEFAULT_SEED_CLASS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dbdump",
    version,
    about = "Migrate, seed and create an SQL dump of a test database"
)]
#[command(
    long_about = "dbdump prepares a disposable test database for automated test suites.\nIt optionally drops every table, runs the configured migration command,\nruns the configured seed command, then captures a dump of the database\nwith the engine's native tool (mysqldump, sqlite3 or pg_dump)."
)]
struct Cli {
    #[arg(
        env = "DBDUMP_CONNECTION",
        help = "Connection from the config file to prepare and dump"
    )]
    connection: String,

    #[arg(
        long,
        default_value = DEFAULT_DUMP_PATH,
        env = "DBDUMP_DUMP",
        help = "Path of the dump file to write"
    )]
    dump: String,

    #[arg(
        long,
        env = "DBDUMP_EMPTY_DATABASE",
        help = "Drop all database tables before any other action"
    )]
    empty_database: bool,

    #[arg(long, env = "DBDUMP_NO_SEED", help = "Skip seeding")]
    no_seed: bool,

    #[arg(
        long,
        default_value = DEFAULT_SEED_CLASS,
        env = "DBDUMP_SEED_CLASS",
        help = "Seed class handed to the seed command"
    )]
    seed_class: String,

    #[arg(
        long,
        env = "DBDUMP_BINARY_DUMP",
        help = "Path to the dump binary (mysqldump, sqlite3 or pg_dump)"
    )]
    binary_dump: Option<String>,

    #[arg(
        long,
        default_value = "dbdump.yaml",
        env = "DBDUMP_CONFIG",
        help = "Connection config file (YAML or JSON)"
    )]
    config: String,

    #[arg(long, env = "DBDUMP_JSON", help = "Enable JSON log output")]
    json: bool,

    #[arg(short, long, env = "DBDUMP_VERBOSE", help = "Enable debug logging")]
    verbose: bool,
}

fn run(log: &Logger, cli: &Cli) -> error::Result<()> {
    let cfg = config::Config::load(&cli.config, &cli.connection, &cli.seed_class)?;
    let profile = cfg.profile(&cli.connection)?;
    log.debug(
        "loaded connection",
        &[
            ("connection", &cli.connection),
            ("driver", &profile.driver),
            ("database", &profile.database),
            ("host", profile.host.as_deref().unwrap_or("")),
        ],
    );

    let migrator = CommandMigrator::new(log, cfg.migrate.clone());
    let seeder = CommandSeeder::new(log, cfg.seed.clone());
    let opts = Options {
        empty_database: cli.empty_database,
        no_seed: cli.no_seed,
        seed_class: cli.seed_class.clone(),
        request: DumpRequest {
            path: PathBuf::from(&cli.dump),
            binary: cli.binary_dump.clone(),
        },
    };
    Pipeline::new(log, &schema::DriverConnector, &migrator, &seeder).run(
        &cli.connection,
        profile,
        &opts,
    )
}

fn main() {
    let cli = Cli::parse();
    let log = Logger::default_logger();
    if cli.json {
        log.set_json(true);
    }
    if cli.verbose {
        log.set_level(Level::Debug);
    }

    if let Err(e) = run(&log, &cli) {
        log.error(&e.to_string(), &[]);
        std::process::exit(1);
    }
}
