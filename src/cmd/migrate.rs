use super::MigrationRunner;
use crate::error::{Error, Result};
use crate::logging::Logger;

/// Migrates by running the configured external command, e.g.
/// `php artisan migrate --database=testing`.
pub struct CommandMigrator<'a> {
    log: &'a Logger,
    args: Vec<String>,
}

impl<'a> CommandMigrator<'a> {
    pub fn new(log: &'a Logger, args: Vec<String>) -> Self {
        Self { log, args }
    }
}

impl MigrationRunner for CommandMigrator<'_> {
    fn migrate(&self, connection: &str) -> Result<()> {
        if self.args.is_empty() {
            return Err(Error::Command("no migrate command configured".into()));
        }
        self.log.info(
            "starting migration",
            &[("connection", connection), ("command", &self.args[0])],
        );
        let code = super::run_command(self.log, &self.args)?;
        super::check_exit("migration", code)?;
        self.log.info("migration completed successfully", &[]);
        Ok(())
    }
}
