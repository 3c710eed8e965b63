use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::error::NavResult;
use crate::geometry::zoom::ZoomParams;
use crate::selection::{BoundaryPolicy, SelectionOptions};

pub mod parser;


/// Environment variable naming a config file to load
pub const CONFIG_ENV: &str = "OVERVIEW_NAV_CONFIG";

/// Valid range of `zoom_factor`
pub const ZOOM_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 1.0..=4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Variables defined with 'set'
    pub variables: HashMap<String, String>,
    /// Pointer displacement that counts as a deliberate motion
    pub motion_threshold: f64,
    /// Distance a zoomed thumbnail keeps from the monitor edges
    pub padding: f64,
    /// Maximum zoom factor of the highlighted thumbnail
    pub zoom_factor: f64,
    /// Remember resolved moves so every step is reversible
    pub memory: bool,
    /// Behavior of arrow keys with nothing in their direction
    pub boundary: BoundaryPolicy,
    /// Duration of the host's reposition animation
    pub animation_time: Duration,
    /// Extra wait after the animation before geometry is read
    pub settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            motion_threshold: 5.0,
            padding: 30.0,
            zoom_factor: 1.5,
            memory: true,
            boundary: BoundaryPolicy::Stay,
            animation_time: Duration::from_millis(250),
            settle_delay: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load_from_file(path: &Path) -> NavResult<Self> {
        let content = std::fs::read_to_string(path)?;
        info!("Loading config from {}", path.display());
        parser::parse_config(&content)
    }

    /// Load the file named by [`CONFIG_ENV`], or the defaults when unset
    pub fn load() -> NavResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Get a variable value
    pub fn get_variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    /// Get a boolean variable value (yes/no, true/false, on/off, 1/0)
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get_variable(name).and_then(|v| parser::parse_bool(&v))
    }

    /// Expand variables in a string
    ///
    /// Longer names are substituted first so `$pad` never eats into
    /// `$padding`.
    pub fn expand_variables(&self, text: &str) -> String {
        let mut names: Vec<&String> = self.variables.keys().collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        let mut result = text.to_string();
        for name in names {
            result = result.replace(&format!("${name}"), &self.variables[name]);
        }
        result
    }

    /// Wait between the start of a reposition animation and the refresh
    pub fn refresh_delay(&self) -> Duration {
        self.animation_time + self.settle_delay
    }

    pub fn zoom_params(&self) -> ZoomParams {
        ZoomParams {
            factor: self.zoom_factor,
            padding: self.padding,
        }
    }

    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            memory: self.memory,
            boundary: self.boundary,
            zoom: self.zoom_params(),
        }
    }
}
