use super::Invocation;
use crate::config::ConnectionProfile;

pub const DEFAULT_BINARY: &str = "sqlite3";

/// `sqlite3 <database file> .dump`. Host and credentials do not apply.
pub fn invocation(program: String, profile: &ConnectionProfile) -> Invocation {
    Invocation {
        program,
        args: vec![profile.database.clone(), ".dump".into()],
        env: Vec::new(),
    }
}
