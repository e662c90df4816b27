use super::Invocation;
use crate::config::ConnectionProfile;

pub const DEFAULT_BINARY: &str = "pg_dump";

/// `pg_dump [--host H] [--port P] [--username U] --no-password <database>`.
/// `--no-password` keeps pg_dump from prompting; the password, if any, comes
/// from `PGPASSWORD`.
pub fn invocation(program: String, profile: &ConnectionProfile) -> Invocation {
    let mut args = Vec::new();
    if let Some(host) = &profile.host {
        args.push("--host".to_string());
        args.push(host.clone());
    }
    if let Some(port) = profile.port {
        args.push("--port".to_string());
        args.push(port.to_string());
    }
    if let Some(user) = &profile.username {
        args.push("--username".to_string());
        args.push(user.clone());
    }
    args.push("--no-password".to_string());
    args.push(profile.database.clone());

    let env = profile
        .password
        .iter()
        .map(|p| ("PGPASSWORD".to_string(), p.clone()))
        .collect();

    Invocation { program, args, env }
}
