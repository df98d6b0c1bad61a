use compact_str::CompactString;

use avec_error::{Context, Error, Result};

use crate::scenarios::Scenario;

pub const SCENARIOS_VAR: &str = "AVEC_SCENARIOS";
pub const BENCH_VAR: &str = "AVEC_BENCH";
pub const DEFAULT_BENCH_COUNT: usize = 1_000_000;

/// Harness settings taken from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Scenario names to run, all of them when empty.
    pub scenarios: Vec<CompactString>,
    /// Element count of the push benchmark, `0` skips it.
    pub bench_count: usize,
}

impl Default for Config {

    fn default() -> Self {
        Self {
            scenarios: Vec::new(),
            bench_count: DEFAULT_BENCH_COUNT,
        }
    }
}

impl Config {

    pub fn from_env() -> Result<Self> {
        let scenarios = std::env::var(SCENARIOS_VAR).ok();
        let bench = std::env::var(BENCH_VAR).ok();
        Self::parse(scenarios.as_deref(), bench.as_deref())
    }

    pub fn parse(scenarios: Option<&str>, bench: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(scenarios) = scenarios {
            config.scenarios = scenarios
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(CompactString::new)
                .collect();
        }
        if let Some(bench) = bench.map(str::trim).filter(|bench| !bench.is_empty()) {
            config.bench_count = bench
                .parse()
                .ctx_err_with(|| format!("invalid {} value {:?}", BENCH_VAR, bench))?;
        }
        Ok(config)
    }

    /// The scenarios named in the config, in suite order.
    pub fn select<'a>(&self, suite: &'a [Scenario]) -> Result<Vec<&'a Scenario>> {
        if self.scenarios.is_empty() {
            return Ok(suite.iter().collect())
        }
        for name in &self.scenarios {
            if !suite.iter().any(|scenario| scenario.name == name.as_str()) {
                return Err(Error::just_context_tracked(format!("unknown scenario {:?}", name.as_str())))
            }
        }
        Ok(suite
            .iter()
            .filter(|scenario| self.scenarios.iter().any(|name| name.as_str() == scenario.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::scenarios;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::parse(None, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bench_count, DEFAULT_BENCH_COUNT);
        assert_eq!(config.select(scenarios::all()).unwrap().len(), scenarios::all().len());
    }

    #[test]
    fn test_scenario_list_is_trimmed() {
        let config = Config::parse(Some(" emplace, basics ,,"), Some("0")).unwrap();
        assert_eq!(config.scenarios, ["emplace", "basics"]);
        assert_eq!(config.bench_count, 0);
        let names: Vec<&str> = config
            .select(scenarios::all())
            .unwrap()
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["basics", "emplace"]);
    }

    #[test]
    fn test_malformed_bench_is_rejected() {
        let err = Config::parse(None, Some("lots")).unwrap_err();
        assert_eq!(err.to_string(), "invalid AVEC_BENCH value \"lots\"");
    }

    #[test]
    fn test_unknown_scenario_is_rejected() {
        let config = Config::parse(Some("basics,nope"), None).unwrap();
        let err = config.select(scenarios::all()).unwrap_err();
        assert_eq!(err.to_string(), "unknown scenario \"nope\"");
    }
}
