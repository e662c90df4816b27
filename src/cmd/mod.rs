pub mod migrate;
pub mod seed;

use crate::error::{Error, Result};
use crate::logging::{Level, Logger};
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

/// Applies pending schema migrations to a named connection.
pub trait MigrationRunner {
    fn migrate(&self, connection: &str) -> Result<()>;
}

/// Loads fixture data into a named connection.
pub trait Seeder {
    fn seed(&self, connection: &str, seed_class: &str) -> Result<()>;
}

/// Runs `args` with both output streams forwarded to the log line by line.
/// Returns the exit code, or `None` when the child was killed by a signal.
pub fn run_command(log: &Logger, args: &[String]) -> Result<Option<i32>> {
    let (program, rest) = args
        .split_first()
        .ok_or_else(|| Error::Command("empty command".into()))?;
    let mut cmd = Command::new(program);
    cmd.args(rest);
    cmd.stdout(Stdio::piped());
    wait_streaming(log, cmd, Level::Info)
        .map_err(|e| Error::Command(format!("running command {:?}: {}", program, e)))
}

/// Turns a finished command's status into the error reported for `what`.
pub(crate) fn check_exit(what: &str, code: Option<i32>) -> Result<()> {
    match code {
        Some(0) => Ok(()),
        Some(c) => Err(Error::Command(format!("{} exited with code {}", what, c))),
        None => Err(Error::Command(format!("{} was terminated by a signal", what))),
    }
}

/// Spawns `cmd` with a null stdin and a piped stderr, drains whatever pipes the
/// caller left in place into the log, and waits. Stdout is logged at INFO when
/// piped; stderr at `stderr_level`. Returns `None` when killed by a signal.
pub fn wait_streaming(
    log: &Logger,
    mut cmd: Command,
    stderr_level: Level,
) -> std::io::Result<Option<i32>> {
    cmd.stdin(Stdio::null());
    cmd.stderr(Stdio::piped());
    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    std::thread::scope(|s| {
        let h1 = s.spawn(|| {
            if let Some(r) = stdout {
                stream_lines(log, r, "stdout", Level::Info);
            }
        });
        let h2 = s.spawn(|| {
            if let Some(r) = stderr {
                stream_lines(log, r, "stderr", stderr_level);
            }
        });
        h1.join().ok();
        h2.join().ok();
    });
    let status = child.wait()?;
    Ok(status.code())
}

fn stream_lines<R: Read>(log: &Logger, reader: R, stream: &str, level: Level) {
    let buf = BufReader::new(reader);
    for l in buf.lines().map_while(std::result::Result::ok) {
        log.log(level, &l, &[("stream", stream)]);
    }
}
