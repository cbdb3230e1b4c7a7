//! INI file configuration adapter.

use configparser::ini::Ini;
use std::path::Path;

use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
[data]
csv_dir = ./data
history_file = ./data/history.json

[scan]
codes = 005930, 000660
smp_window = 10
history_days = 60
use_market_cap = yes
";

    #[test]
    fn reads_strings_and_numbers() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(config.get_string("data", "csv_dir"), Some("./data".into()));
        assert_eq!(config.get_int("scan", "smp_window", 0), 10);
        assert_eq!(config.get_usize("scan", "history_days", 0), 60);
        assert!(config.get_bool("scan", "use_market_cap", false));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(config.get_string("scan", "absent"), None);
        assert_eq!(config.get_int("scan", "absent", 7), 7);
        assert_eq!(config.get_double("scan", "absent", 2.5), 2.5);
        assert!(config.get_bool("absent_section", "absent", true));
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let config =
            FileConfigAdapter::from_string("[scan]\nsmp_window = soon\nflag = maybe\n").unwrap();
        assert_eq!(config.get_int("scan", "smp_window", 10), 10);
        assert!(!config.get_bool("scan", "flag", false));
    }

    #[test]
    fn negative_values_do_not_become_usize() {
        let config = FileConfigAdapter::from_string("[scan]\nhistory_days = -3\n").unwrap();
        assert_eq!(config.get_usize("scan", "history_days", 60), 60);
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let config = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            config.get_string("data", "history_file"),
            Some("./data/history.json".into())
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(FileConfigAdapter::from_file("/nonexistent/phasewatch.ini").is_err());
    }
}
