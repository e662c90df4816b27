use super::Seeder;
use crate::error::{Error, Result};
use crate::logging::Logger;

/// Seeds by running the configured external command. The seed class is already
/// interpolated into the argv by the config template.
pub struct CommandSeeder<'a> {
    log: &'a Logger,
    args: Vec<String>,
}

impl<'a> CommandSeeder<'a> {
    pub fn new(log: &'a Logger, args: Vec<String>) -> Self {
        Self { log, args }
    }
}

impl Seeder for CommandSeeder<'_> {
    fn seed(&self, connection: &str, seed_class: &str) -> Result<()> {
        if self.args.is_empty() {
            return Err(Error::Command(
                "no seed command configured: set `seed` in the config or pass --no-seed".into(),
            ));
        }
        self.log.info(
            "starting seed",
            &[
                ("connection", connection),
                ("seed_class", seed_class),
                ("command", &self.args[0]),
            ],
        );
        let code = super::run_command(self.log, &self.args)?;
        super::check_exit("seed", code)?;
        self.log.info("seed completed successfully", &[]);
        Ok(())
    }
}
