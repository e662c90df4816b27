use crate::config::ConnectionProfile;
use crate::dump::DumpStrategy;
use crate::error::{Error, Result};

/// Enumerates and drops tables on a live connection.
pub trait SchemaManager {
    fn list_tables(&mut self) -> Result<Vec<String>>;
    /// Drops `tables` with foreign-key enforcement suspended, restoring it
    /// afterwards even when a drop fails.
    fn drop_tables(&mut self, tables: &[String]) -> Result<()>;
}

/// Opens a `SchemaManager` for a connection profile.
pub trait SchemaConnector {
    fn open(&self, profile: &ConnectionProfile) -> Result<Box<dyn SchemaManager>>;
}

/// Connects with the database client matching the profile's driver.
pub struct DriverConnector;

impl SchemaConnector for DriverConnector {
    fn open(&self, profile: &ConnectionProfile) -> Result<Box<dyn SchemaManager>> {
        connect(profile)
    }
}

/// Resolves the driver through the dump strategy table, so driver tags and
/// aliases are known in one place.
pub fn connect(profile: &ConnectionProfile) -> Result<Box<dyn SchemaManager>> {
    match DumpStrategy::for_driver(&profile.driver)? {
        #[cfg(feature = "sqlite")]
        DumpStrategy::Sqlite => Ok(Box::new(SqliteSchema::connect(&profile.database)?)),
        #[cfg(feature = "postgres")]
        DumpStrategy::Postgres => Ok(Box::new(PostgresSchema::connect(profile)?)),
        #[cfg(feature = "mysql")]
        DumpStrategy::Mysql => Ok(Box::new(MysqlSchema::connect(profile)?)),
        #[allow(unreachable_patterns)]
        other => Err(Error::Schema(format!(
            "built without {} support",
            other.name()
        ))),
    }
}

#[cfg(feature = "sqlite")]
pub struct SqliteSchema {
    pub(crate) conn: rusqlite::Connection,
}

#[cfg(feature = "sqlite")]
impl SqliteSchema {
    pub fn connect(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(path)
        }
        .map_err(|e| Error::Schema(format!("opening sqlite database '{}': {}", path, e)))?;
        Ok(Self { conn })
    }
}

#[cfg(feature = "sqlite")]
impl SchemaManager for SqliteSchema {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .map_err(|e| Error::Schema(format!("listing tables: {}", e)))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>())
            .map_err(|e| Error::Schema(format!("listing tables: {}", e)))?;
        Ok(names)
    }

    fn drop_tables(&mut self, tables: &[String]) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = OFF")
            .map_err(|e| Error::Schema(format!("disabling foreign keys: {}", e)))?;
        let result = tables.iter().try_for_each(|t| {
            let sql = format!("DROP TABLE IF EXISTS {}", quote_identifier(t, '"'));
            self.conn
                .execute_batch(&sql)
                .map_err(|e| Error::Schema(format!("dropping table '{}': {}", t, e)))
        });
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| Error::Schema(format!("enabling foreign keys: {}", e)))?;
        result
    }
}

#[cfg(feature = "postgres")]
pub struct PostgresSchema {
    client: postgres::Client,
}

#[cfg(feature = "postgres")]
impl PostgresSchema {
    pub fn connect(profile: &ConnectionProfile) -> Result<Self> {
        let mut config = postgres::Config::new();
        config
            .host(profile.host.as_deref().unwrap_or("localhost"))
            .dbname(&profile.database);
        if let Some(port) = profile.port {
            config.port(port);
        }
        if let Some(user) = &profile.username {
            config.user(user);
        }
        if let Some(password) = &profile.password {
            config.password(password);
        }
        let client = config
            .connect(postgres::NoTls)
            .map_err(|e| Error::Schema(format!("connecting to postgres: {}", e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "postgres")]
impl SchemaManager for PostgresSchema {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(
                "SELECT tablename FROM pg_tables
                 WHERE schemaname = current_schema()
                 ORDER BY tablename",
                &[],
            )
            .map_err(|e| Error::Schema(format!("listing tables: {}", e)))?;
        Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect())
    }

    // Postgres cannot switch foreign-key checks off; CASCADE removes the
    // dependent constraints instead.
    fn drop_tables(&mut self, tables: &[String]) -> Result<()> {
        for t in tables {
            let sql = format!("DROP TABLE IF EXISTS {} CASCADE", quote_identifier(t, '"'));
            self.client
                .batch_execute(&sql)
                .map_err(|e| Error::Schema(format!("dropping table '{}': {}", t, e)))?;
        }
        Ok(())
    }
}

#[cfg(feature = "mysql")]
pub struct MysqlSchema {
    conn: mysql::Conn,
}

#[cfg(feature = "mysql")]
impl MysqlSchema {
    pub fn connect(profile: &ConnectionProfile) -> Result<Self> {
        let mut builder = mysql::OptsBuilder::new()
            .ip_or_hostname(profile.host.clone())
            .user(profile.username.clone())
            .pass(profile.password.clone())
            .db_name(Some(profile.database.clone()));
        if let Some(port) = profile.port {
            builder = builder.tcp_port(port);
        }
        let conn = mysql::Conn::new(builder)
            .map_err(|e| Error::Schema(format!("connecting to mysql: {}", e)))?;
        Ok(Self { conn })
    }
}

#[cfg(feature = "mysql")]
impl SchemaManager for MysqlSchema {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        use mysql::prelude::Queryable;
        self.conn
            .query(
                "SELECT table_name FROM information_schema.tables
                 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
                 ORDER BY table_name",
            )
            .map_err(|e| Error::Schema(format!("listing tables: {}", e)))
    }

    fn drop_tables(&mut self, tables: &[String]) -> Result<()> {
        use mysql::prelude::Queryable;
        self.conn
            .query_drop("SET foreign_key_checks = 0")
            .map_err(|e| Error::Schema(format!("disabling foreign key checks: {}", e)))?;
        let result = tables.iter().try_for_each(|t| {
            let sql = format!("DROP TABLE IF EXISTS {}", quote_identifier(t, '`'));
            self.conn
                .query_drop(&sql)
                .map_err(|e| Error::Schema(format!("dropping table '{}': {}", t, e)))
        });
        self.conn
            .query_drop("SET foreign_key_checks = 1")
            .map_err(|e| Error::Schema(format!("enabling foreign key checks: {}", e)))?;
        result
    }
}

/// Wraps `name` in `quote`, doubling any embedded quote characters.
fn quote_identifier(name: &str, quote: char) -> String {
    let escaped = name.replace(quote, &format!("{}{}", quote, quote));
    format!("{}{}{}", quote, escaped, quote)
}
