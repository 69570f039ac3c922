use crate::error::{Result, RicecastError};
use crate::models::{PlantingCategory, PlantingWindow};
use chrono::NaiveDate;
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub crop: CropConfig,
    pub reference_period: ReferencePeriodConfig,
    pub thresholds: ThresholdConfig,
    pub windows: WindowsConfig,
    pub archive: ArchiveConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    pub name: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Bulandshahr".into(),
            region: "UP".into(),
            latitude: 28.41,
            longitude: 77.85,
            timezone: "Asia/Kolkata".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CropConfig {
    pub name: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            name: "Rice".into(),
        }
    }
}

/// Rabi harvest period preceding Kharif rice planting.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferencePeriodConfig {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

impl Default for ReferencePeriodConfig {
    fn default() -> Self {
        Self {
            start_month: 2,
            start_day: 15,
            end_month: 4,
            end_day: 30,
        }
    }
}

/// Rainfall between `early_mm` and `late_mm` (inclusive) is Normal.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub early_mm: f64,
    pub late_mm: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            early_mm: 25.0,
            late_mm: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub early: PlantingWindow,
    pub normal: PlantingWindow,
    pub late: PlantingWindow,
}

impl WindowsConfig {
    pub fn for_category(&self, category: PlantingCategory) -> &PlantingWindow {
        match category {
            PlantingCategory::Early => &self.early,
            PlantingCategory::Normal => &self.normal,
            PlantingCategory::Late => &self.late,
        }
    }
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            early: PlantingWindow::new(6, 10, 6, 30),
            normal: PlantingWindow::new(6, 20, 7, 15),
            late: PlantingWindow::new(7, 5, 7, 31),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub base_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://archive-api.open-meteo.com/v1/archive".into(),
        }
    }
}

impl Config {
    /// Load config from the override path or a standard location.
    /// Falls back to built-in defaults when no file exists.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(RicecastError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!("Loading config from {:?}", config_path);
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| RicecastError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| RicecastError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds and calendar constants that could never classify.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.early_mm < 0.0 || t.late_mm < 0.0 {
            return Err(RicecastError::InvalidConfiguration(
                "rainfall thresholds must not be negative".into(),
            ));
        }
        if t.early_mm > t.late_mm {
            return Err(RicecastError::InvalidConfiguration(format!(
                "early threshold ({} mm) is above late threshold ({} mm)",
                t.early_mm, t.late_mm
            )));
        }

        let rp = &self.reference_period;
        let start = leap_year_date(rp.start_month, rp.start_day, "reference period start")?;
        let end = leap_year_date(rp.end_month, rp.end_day, "reference period end")?;
        if start > end {
            return Err(RicecastError::InvalidConfiguration(
                "reference period ends before it starts".into(),
            ));
        }

        for category in PlantingCategory::all() {
            let w = self.windows.for_category(*category);
            let label = format!("{} window", category.as_str().to_lowercase());
            leap_year_date(w.start_month, w.start_day, &label)?;
            leap_year_date(w.end_month, w.end_day, &label)?;
        }

        Ok(())
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        let xdg_config = dirs::config_dir()?.join("ricecast").join("config.yaml");
        xdg_config.exists().then_some(xdg_config)
    }

    /// Default path for writing new config files (~/.config/ricecast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RicecastError::Config("Cannot determine config directory".into()))?
            .join("ricecast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = Config::default();

        println!();
        println!("Let's set up Ricecast!");
        println!();

        println!("Location");
        let name: String = Input::new()
            .with_prompt("  Name")
            .default(defaults.location.name.clone())
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        let region: String = Input::new()
            .with_prompt("  Region")
            .default(defaults.location.region.clone())
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(defaults.location.latitude)
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(defaults.location.longitude)
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        let timezone: String = Input::new()
            .with_prompt("  Timezone")
            .default(defaults.location.timezone.clone())
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Rainfall thresholds (mm)");
        let early_mm: f64 = Input::new()
            .with_prompt("  Early below")
            .default(defaults.thresholds.early_mm)
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        let late_mm: f64 = Input::new()
            .with_prompt("  Late above")
            .default(defaults.thresholds.late_mm)
            .interact_text()
            .map_err(|e| RicecastError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            location: LocationConfig {
                name,
                region,
                latitude,
                longitude,
                timezone,
            },
            thresholds: ThresholdConfig { early_mm, late_mm },
            ..defaults
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| RicecastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Ricecast Configuration\n# Generated by `ricecast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

/// Validate a month/day pair against a leap year so Feb 29 is accepted here;
/// a non-leap year still rejects it when a prediction is made.
fn leap_year_date(month: u32, day: u32, label: &str) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2000, month, day).ok_or_else(|| {
        RicecastError::InvalidConfiguration(format!(
            "{} {}/{} is not a calendar date",
            label, month, day
        ))
    })
}
