use crate::models::QuarterStats;
use crate::utils::constants::{HSINCHU_CITY, HSINCHU_CITY_DISTRICTS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use validator::Validate;

/// A city whose transactions are published without district breakdown.
///
/// Its city-wide aggregate is copied onto each listed district so the
/// map has something to colour. The first district doubles as the
/// placeholder town name used while cleaning rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CityWideRule {
    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub districts: Vec<String>,
}

impl CityWideRule {
    pub fn new(city: impl Into<String>, districts: &[&str]) -> Self {
        Self {
            city: city.into(),
            districts: districts.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Town name rows are collapsed into when the file has no districts
    pub fn placeholder_district(&self) -> Option<&str> {
        self.districts.first().map(String::as_str)
    }

    /// True when the distinct non-empty district values carry no
    /// information beyond the city itself
    pub fn lacks_districts<'a>(&self, towns: impl IntoIterator<Item = &'a str>) -> bool {
        let distinct: HashSet<&str> = towns.into_iter().filter(|t| !t.is_empty()).collect();
        distinct.is_empty() || (distinct.len() == 1 && distinct.contains(self.city.as_str()))
    }

    /// Replace the city's single aggregate with one synthetic copy per
    /// district. Anything other than exactly one key with the city prefix
    /// is left untouched.
    ///
    /// A city that genuinely reports a single district looks identical to
    /// city-wide data here and will be replicated as well.
    pub fn apply(&self, stats: &mut QuarterStats) -> bool {
        let city_keys: Vec<String> = stats
            .keys()
            .filter(|k| k.starts_with(&self.city))
            .cloned()
            .collect();

        if city_keys.len() != 1 {
            debug!(
                "{}: {} district keys present, leaving as-is",
                self.city,
                city_keys.len()
            );
            return false;
        }

        let Some(base) = stats.remove(&city_keys[0]) else {
            return false;
        };

        for district in &self.districts {
            stats.insert(format!("{}{}", self.city, district), base.as_synthetic());
        }

        debug!(
            "{}: replicated {} onto {} districts",
            self.city,
            city_keys[0],
            self.districts.len()
        );
        true
    }
}

/// The set of city-wide rules applied after aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicationTable {
    rules: Vec<CityWideRule>,
}

impl ReplicationTable {
    pub fn new(rules: Vec<CityWideRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[CityWideRule] {
        &self.rules
    }

    pub fn rule_for(&self, city: &str) -> Option<&CityWideRule> {
        self.rules.iter().find(|r| r.city == city)
    }

    /// Apply every rule; returns the number of rules that fired
    pub fn apply(&self, stats: &mut QuarterStats) -> usize {
        let mut fired = 0;
        for rule in &self.rules {
            if rule.apply(stats) {
                fired += 1;
            }
        }
        fired
    }

    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.rules.iter().try_for_each(|rule| rule.validate())
    }
}

impl Default for ReplicationTable {
    fn default() -> Self {
        Self::new(vec![CityWideRule::new(HSINCHU_CITY, &HSINCHU_CITY_DISTRICTS)])
    }
}
