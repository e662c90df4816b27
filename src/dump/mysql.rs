use super::Invocation;
use crate::config::ConnectionProfile;

pub const DEFAULT_BINARY: &str = "mysqldump";

/// `mysqldump [--host=H] [--port=P] [--user=U] <database>`, with the password
/// handed over in `MYSQL_PWD` so it stays off the command line.
pub fn invocation(program: String, profile: &ConnectionProfile) -> Invocation {
    let mut args = Vec::new();
    if let Some(host) = &profile.host {
        args.push(format!("--host={}", host));
    }
    if let Some(port) = profile.port {
        args.push(format!("--port={}", port));
    }
    if let Some(user) = &profile.username {
        args.push(format!("--user={}", user));
    }
    args.push(profile.database.clone());

    let env = profile
        .password
        .iter()
        .map(|p| ("MYSQL_PWD".to_string(), p.clone()))
        .collect();

    Invocation { program, args, env }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile() {
        let profile = ConnectionProfile {
            driver: "mysql".into(),
            database: "app_test".into(),
            host: Some("127.0.0.1".into()),
            port: Some(3306),
            username: Some("root".into()),
            password: Some("secret".into()),
        };
        let inv = invocation(DEFAULT_BINARY.into(), &profile);
        assert_eq!(inv.program, "mysqldump");
        assert_eq!(
            inv.args,
            vec!["--host=127.0.0.1", "--port=3306", "--user=root", "app_test"]
        );
        assert_eq!(inv.env, vec![("MYSQL_PWD".to_string(), "secret".to_string())]);
        assert!(!inv.args.iter().any(|a| a.contains("secret")));
    }

    #[test]
    fn test_minimal_profile() {
        let profile = ConnectionProfile {
            driver: "mysql".into(),
            database: "app".into(),
            ..Default::default()
        };
        let inv = invocation("/usr/local/bin/mysqldump".into(), &profile);
        assert_eq!(inv.program, "/usr/local/bin/mysqldump");
        assert_eq!(inv.args, vec!["app"]);
        assert!(inv.env.is_empty());
    }
}
