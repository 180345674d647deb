use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_TITLE: &str = "SpaceX Launch Records Dashboard";
const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// Dashboard configuration.
///
/// Every field can be overridden from the environment, see [`Self::from_env`].
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Launch records file, loaded once at startup.
    pub data_path: PathBuf,
    /// Page heading.
    pub title: String,
    /// Payload selector bounds and tick spacing, in kilograms.
    pub slider_min: u32,
    pub slider_max: u32,
    pub slider_step: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            title: DEFAULT_TITLE.to_string(),
            slider_min: 0,
            slider_max: 10_000,
            slider_step: 1_000,
        }
    }
}

impl DashboardConfig {
    /// Read `LAUNCH_DASHBOARD_*` variables.  Unset or unparsable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut config = Self {
            host: lookup("LAUNCH_DASHBOARD_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "LAUNCH_DASHBOARD_PORT").unwrap_or(defaults.port),
            data_path: lookup("LAUNCH_DASHBOARD_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            title: lookup("LAUNCH_DASHBOARD_TITLE").unwrap_or(defaults.title),
            slider_min: parsed(&lookup, "LAUNCH_DASHBOARD_SLIDER_MIN")
                .unwrap_or(defaults.slider_min),
            slider_max: parsed(&lookup, "LAUNCH_DASHBOARD_SLIDER_MAX")
                .unwrap_or(defaults.slider_max),
            slider_step: parsed(&lookup, "LAUNCH_DASHBOARD_SLIDER_STEP")
                .unwrap_or(defaults.slider_step),
        };

        if config.slider_step == 0 {
            config.slider_step = defaults.slider_step;
        }
        if config.slider_min > config.slider_max {
            std::mem::swap(&mut config.slider_min, &mut config.slider_max);
        }
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8050");
        assert_eq!(config.title, "SpaceX Launch Records Dashboard");
    }

    #[test]
    fn overrides_are_applied() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("LAUNCH_DASHBOARD_HOST", "0.0.0.0"),
            ("LAUNCH_DASHBOARD_PORT", "9000"),
            ("LAUNCH_DASHBOARD_DATA", "/data/launches.parquet"),
            ("LAUNCH_DASHBOARD_TITLE", "Falcon 9 Launches"),
            ("LAUNCH_DASHBOARD_SLIDER_STEP", "500"),
        ]));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.title, "Falcon 9 Launches");
        assert_eq!(config.data_path, PathBuf::from("/data/launches.parquet"));
        assert_eq!(config.slider_step, 500);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("LAUNCH_DASHBOARD_PORT", "http"),
            ("LAUNCH_DASHBOARD_SLIDER_STEP", "0"),
            ("LAUNCH_DASHBOARD_SLIDER_MIN", "8000"),
            ("LAUNCH_DASHBOARD_SLIDER_MAX", "2000"),
        ]));
        assert_eq!(config.port, 8050);
        assert_eq!(config.slider_step, 1_000);
        assert_eq!((config.slider_min, config.slider_max), (2000, 8000));
    }
}
