pub mod mysql;
pub mod postgres;
pub mod sqlite;

use crate::config::ConnectionProfile;
use crate::error::{Error, Result};
use crate::logging::{Level, Logger};
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// One variant per database engine whose native dump utility we know how to
/// drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpStrategy {
    Mysql,
    Sqlite,
    Postgres,
}

/// Driver tag to strategy. Tags are matched lower-cased.
const STRATEGIES: &[(&str, DumpStrategy)] = &[
    ("mysql", DumpStrategy::Mysql),
    ("sqlite", DumpStrategy::Sqlite),
    ("postgres", DumpStrategy::Postgres),
    ("postgresql", DumpStrategy::Postgres),
    ("pgsql", DumpStrategy::Postgres),
];

pub fn supported_drivers() -> Vec<&'static str> {
    STRATEGIES.iter().map(|(name, _)| *name).collect()
}

/// Where the dump goes and, optionally, which binary produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRequest {
    pub path: PathBuf,
    pub binary: Option<String>,
}

/// A fully resolved dump subprocess: program, argv and extra environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env_keys: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &env_keys)
            .finish()
    }
}

impl DumpStrategy {
    pub fn for_driver(driver: &str) -> Result<Self> {
        let tag = driver.to_lowercase();
        STRATEGIES
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, strategy)| *strategy)
            .ok_or_else(|| Error::UnsupportedDriver(driver.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            DumpStrategy::Mysql => "mysql",
            DumpStrategy::Sqlite => "sqlite",
            DumpStrategy::Postgres => "postgres",
        }
    }

    pub fn default_binary(self) -> &'static str {
        match self {
            DumpStrategy::Mysql => mysql::DEFAULT_BINARY,
            DumpStrategy::Sqlite => sqlite::DEFAULT_BINARY,
            DumpStrategy::Postgres => postgres::DEFAULT_BINARY,
        }
    }

    /// Builds the subprocess for `profile`. An empty override falls back to
    /// the default binary name.
    pub fn invocation(self, profile: &ConnectionProfile, binary: Option<&str>) -> Invocation {
        let program = binary
            .filter(|b| !b.is_empty())
            .unwrap_or(self.default_binary())
            .to_string();
        match self {
            DumpStrategy::Mysql => mysql::invocation(program, profile),
            DumpStrategy::Sqlite => sqlite::invocation(program, profile),
            DumpStrategy::Postgres => postgres::invocation(program, profile),
        }
    }

    /// Runs the dump binary with its stdout redirected into `request.path`.
    ///
    /// The file is created (with any missing parent directories) or truncated
    /// before the binary starts. A zero exit is success; a non-zero exit, a
    /// signal, or a binary that cannot be started is `SubprocessFailure`.
    pub fn execute(
        self,
        log: &Logger,
        request: &DumpRequest,
        profile: &ConnectionProfile,
    ) -> Result<()> {
        let inv = self.invocation(profile, request.binary.as_deref());
        let path_str = request.path.display().to_string();

        if let Some(parent) = request.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::io(format!("creating dump directory {}", parent.display()), e)
                })?;
            }
        }
        let file = File::create(&request.path)
            .map_err(|e| Error::io(format!("creating dump file {}", path_str), e))?;

        log.info(
            "running dump binary",
            &[
                ("driver", self.name()),
                ("binary", &inv.program),
                ("path", &path_str),
            ],
        );
        log.debug("dump arguments", &[("args", &inv.args.join(" "))]);

        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args);
        for (k, v) in &inv.env {
            cmd.env(k, v);
        }
        cmd.stdout(Stdio::from(file));

        match crate::cmd::wait_streaming(log, cmd, Level::Warn) {
            Ok(Some(0)) => Ok(()),
            Ok(code) => Err(Error::SubprocessFailure {
                binary: inv.program,
                code,
            }),
            Err(e) => {
                log.warn(
                    "could not start dump binary",
                    &[("binary", &inv.program), ("error", &e.to_string())],
                );
                Err(Error::SubprocessFailure {
                    binary: inv.program,
                    code: None,
                })
            }
        }
    }
}
