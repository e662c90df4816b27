use crate::cmd::{MigrationRunner, Seeder};
use crate::config::ConnectionProfile;
use crate::dump::{DumpRequest, DumpStrategy};
use crate::error::Result;
use crate::logging::Logger;
use crate::schema::SchemaConnector;

pub const DEFAULT_DUMP_PATH: &str = "tests/_data/dump.sql";
pub const DEFAULT_SEED_CLASS: &str = "DatabaseSeeder";

#[derive(Debug, Clone)]
pub struct Options {
    pub empty_database: bool,
    pub no_seed: bool,
    pub seed_class: String,
    pub request: DumpRequest,
}

/// Empties, migrates, seeds and dumps one connection, in that order.
///
/// Each step runs only after the previous one succeeded; nothing already done
/// is rolled back when a later step fails.
pub struct Pipeline<'a> {
    log: &'a Logger,
    schema: &'a dyn SchemaConnector,
    migrator: &'a dyn MigrationRunner,
    seeder: &'a dyn Seeder,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        log: &'a Logger,
        schema: &'a dyn SchemaConnector,
        migrator: &'a dyn MigrationRunner,
        seeder: &'a dyn Seeder,
    ) -> Self {
        Self {
            log,
            schema,
            migrator,
            seeder,
        }
    }

    pub fn run(&self, connection: &str, profile: &ConnectionProfile, opts: &Options) -> Result<()> {
        if opts.empty_database {
            self.empty_database(connection, profile)?;
        }

        self.log
            .info("migrating database", &[("connection", connection)]);
        self.migrator.migrate(connection)?;

        if !opts.no_seed {
            self.log.info(
                "seeding database",
                &[("connection", connection), ("seed_class", &opts.seed_class)],
            );
            self.seeder.seed(connection, &opts.seed_class)?;
        }

        self.dump(connection, profile, &opts.request)
    }

    fn empty_database(&self, connection: &str, profile: &ConnectionProfile) -> Result<()> {
        self.log
            .info("truncating database", &[("connection", connection)]);
        let mut db = self.schema.open(profile)?;
        let tables = db.list_tables()?;
        self.log.info(
            "dropping tables",
            &[("count", &tables.len().to_string())],
        );
        db.drop_tables(&tables)?;
        self.log
            .debug("dropped tables", &[("tables", &tables.join(","))]);
        Ok(())
    }

    fn dump(&self, connection: &str, profile: &ConnectionProfile, request: &DumpRequest) -> Result<()> {
        let strategy = DumpStrategy::for_driver(&profile.driver)?;
        self.log.info(
            "dumping database",
            &[("connection", connection), ("driver", strategy.name())],
        );
        strategy.execute(self.log, request, profile)?;
        self.log.info(
            "database dump created successfully",
            &[("path", &request.path.display().to_string())],
        );
        Ok(())
    }
}
