use chrono::Utc;
use std::io::Write;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

struct Settings {
    json: bool,
    level: Level,
}

/// Line-oriented logger writing either `time [LEVEL] msg k=v` text or one JSON
/// object per line. Values under sensitive keys are redacted on the way out.
pub struct Logger {
    out: Mutex<Box<dyn Write + Send>>,
    settings: Mutex<Settings>,
}

impl Logger {
    pub fn new(out: Box<dyn Write + Send>, json: bool, level: Level) -> Self {
        Self {
            out: Mutex::new(out),
            settings: Mutex::new(Settings { json, level }),
        }
    }

    pub fn default_logger() -> Self {
        Self::new(Box::new(std::io::stderr()), false, Level::Info)
    }

    pub fn set_json(&self, enabled: bool) {
        if let Ok(mut s) = self.settings.lock() {
            s.json = enabled;
        }
    }

    pub fn set_level(&self, level: Level) {
        if let Ok(mut s) = self.settings.lock() {
            s.level = level;
        }
    }

    pub fn log(&self, level: Level, msg: &str, kvs: &[(&str, &str)]) {
        let json = match self.settings.lock() {
            Ok(s) if level >= s.level => s.json,
            _ => return,
        };
        let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let line = if json {
            let mut map = serde_json::Map::new();
            map.insert("time".into(), serde_json::Value::String(now));
            map.insert("level".into(), serde_json::Value::String(level.to_string()));
            map.insert("msg".into(), serde_json::Value::String(msg.into()));
            for (k, v) in kvs {
                map.insert((*k).into(), serde_json::Value::String(redact_value(k, v)));
            }
            serde_json::Value::Object(map).to_string()
        } else {
            let mut line = format!("{} [{}] {}", now, level, msg);
            for (k, v) in kvs {
                line.push_str(&format!(" {}={}", k, redact_value(k, v)));
            }
            line
        };
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
        }
    }

    pub fn debug(&self, msg: &str, kvs: &[(&str, &str)]) {
        self.log(Level::Debug, msg, kvs);
    }
    pub fn info(&self, msg: &str, kvs: &[(&str, &str)]) {
        self.log(Level::Info, msg, kvs);
    }
    pub fn warn(&self, msg: &str, kvs: &[(&str, &str)]) {
        self.log(Level::Warn, msg, kvs);
    }
    pub fn error(&self, msg: &str, kvs: &[(&str, &str)]) {
        self.log(Level::Error, msg, kvs);
    }
}

const SENSITIVE_KEYS: &[&str] = &[
    "password", "passwd", "pwd", "secret", "token", "authorization", "auth",
];

pub fn redact_value(key: &str, value: &str) -> String {
    if SENSITIVE_KEYS.contains(&key.to_lowercase().as_str()) {
        if value.is_empty() {
            return String::new();
        }
        return "REDACTED".into();
    }
    value.into()
}
