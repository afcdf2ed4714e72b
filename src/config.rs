use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Tool configuration.
///
/// Loaded from a TOML file and validated before use; every field has a
/// default so a missing file or empty table is a valid configuration.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub threshold: ThresholdParams,
    #[serde(default)]
    pub chart: ChartParams,
}

/// Parameters of the cycle-threshold computation.
#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct ThresholdParams {
    /// Lower bound of plausible setpoint values.
    #[serde(default = "ThresholdParams::default_valid_min")]
    pub valid_min: f64,
    /// Upper bound of plausible setpoint values.
    #[serde(default = "ThresholdParams::default_valid_max")]
    pub valid_max: f64,
    /// Minimum high/low spread below which the signal counts as flat.
    #[serde(default = "ThresholdParams::default_min_spread")]
    pub min_spread: f64,
    /// Threshold used when no usable setpoint values exist.
    #[serde(default = "ThresholdParams::default_threshold")]
    pub default: f64,
}

impl ThresholdParams {
    fn default_valid_min() -> f64 {
        -100.0
    }
    fn default_valid_max() -> f64 {
        220.0
    }
    fn default_min_spread() -> f64 {
        10.0
    }
    fn default_threshold() -> f64 {
        50.0
    }
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            valid_min: Self::default_valid_min(),
            valid_max: Self::default_valid_max(),
            min_spread: Self::default_min_spread(),
            default: Self::default_threshold(),
        }
    }
}

/// Display parameters forwarded into the figure description.
#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct ChartParams {
    /// Lower bound of the y axis.
    #[serde(default = "ChartParams::default_y_min")]
    pub y_min: f64,
    /// Upper bound of the y axis.
    #[serde(default = "ChartParams::default_y_max")]
    pub y_max: f64,
    /// Selectable y-axis tick intervals.
    #[serde(default = "ChartParams::default_y_ticks")]
    pub y_ticks: Vec<f64>,
    /// Selectable cycle-annotation strides (draw every Nth cycle).
    #[serde(default = "ChartParams::default_cycle_steps")]
    pub cycle_steps: Vec<usize>,
}

impl ChartParams {
    fn default_y_min() -> f64 {
        -50.0
    }
    fn default_y_max() -> f64 {
        150.0
    }
    fn default_y_ticks() -> Vec<f64> {
        vec![5.0, 10.0, 20.0, 50.0]
    }
    fn default_cycle_steps() -> Vec<usize> {
        vec![1, 5, 10, 20, 50]
    }
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            y_min: Self::default_y_min(),
            y_max: Self::default_y_max(),
            y_ticks: Self::default_y_ticks(),
            cycle_steps: Self::default_cycle_steps(),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Missing fields fall back to their defaults. Performs validation on
    /// all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized, or if the
    /// configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thr = &self.threshold;
        if !(thr.valid_min < thr.valid_max) {
            bail!(
                "valid range lower bound ({}) must be below upper bound ({})",
                thr.valid_min,
                thr.valid_max
            );
        }
        check_num(thr.min_spread, 0.0..f64::INFINITY).context("invalid minimum spread")?;
        if !thr.default.is_finite() {
            bail!("default threshold must be finite, but is {}", thr.default);
        }

        let chart = &self.chart;
        if !(chart.y_min < chart.y_max) {
            bail!(
                "y axis lower bound ({}) must be below upper bound ({})",
                chart.y_min,
                chart.y_max
            );
        }
        if chart.y_ticks.is_empty() {
            bail!("y tick list must not be empty");
        }
        for &tick in &chart.y_ticks {
            if !(tick > 0.0 && tick.is_finite()) {
                bail!("y tick interval must be positive and finite, but is {tick}");
            }
        }
        if chart.cycle_steps.is_empty() {
            bail!("cycle step list must not be empty");
        }
        for &step in &chart.cycle_steps {
            check_num(step, 1..10_000).context("invalid cycle step")?;
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
