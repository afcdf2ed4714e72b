use crate::analysis::{self, Analysis, cycle_span};
use crate::chart;
use crate::config::Config;
use crate::data;
use crate::stats::Accumulator;
use anyhow::{Context, Result, bail};
use serde_json::json;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Orchestrates one analysis run: load a series, normalize it and write the
/// report and figure files into the output directory.
pub struct Manager {
    out_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(out_dir: P, config_file: Option<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();

        let cfg = match config_file {
            Some(file) => Config::from_file(file).context("failed to construct cfg")?,
            None => Config::default(),
        };
        log::info!("{cfg:#?}");

        fs::create_dir_all(&out_dir).with_context(|| format!("failed to create {out_dir:?}"))?;

        Ok(Self { out_dir, cfg })
    }

    /// Analyze a single CSV file.
    pub fn analyze_file<P: AsRef<Path>>(&self, input: P) -> Result<()> {
        let input = input.as_ref();

        let samples = data::load_series(input).context("failed to load series")?;
        let analysis = analysis::normalize(&samples, &self.cfg.threshold);
        log::info!(
            "{input:?}: {} samples, {} cycles, threshold {}",
            analysis.samples.len(),
            analysis.boundaries.len(),
            analysis.threshold
        );

        self.write_report(input, &analysis)
            .context("failed to write report")?;
        self.write_figure(input, &analysis)
            .context("failed to write figure")?;

        Ok(())
    }

    /// Analyze every CSV file in a directory.
    pub fn analyze_dir<P: AsRef<Path>>(&self, data_dir: P) -> Result<()> {
        let pattern = data_dir.as_ref().join("*.csv");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;

        let inputs: Vec<PathBuf> = glob::glob(pattern)
            .context("failed to glob data files")?
            .filter_map(Result::ok)
            .collect();
        if inputs.is_empty() {
            bail!("no CSV files match {pattern}");
        }

        for input in inputs {
            self.analyze_file(&input)
                .with_context(|| format!("failed to analyze {input:?}"))?;
        }

        Ok(())
    }

    fn write_report<P: AsRef<Path>>(&self, input: P, analysis: &Analysis) -> Result<()> {
        let file = self.output_file(input, "report.json")?;
        let file = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        let last_elapsed = analysis.last_elapsed().unwrap_or(0.0);
        let spans: Vec<(f64, f64)> = (0..analysis.boundaries.len())
            .filter_map(|index| cycle_span(&analysis.boundaries, last_elapsed, index))
            .collect();

        let mut durations = Accumulator::new();
        for &(start, end) in &spans {
            durations.add(end - start);
        }

        let report = json!({
            "threshold": analysis.threshold,
            "n_samples": analysis.samples.len(),
            "n_cycles": analysis.boundaries.len(),
            "cycle_starts_min": analysis.boundaries,
            "cycle_spans_min": spans,
            "cycle_duration_min": durations.report(),
            "samples": analysis.samples,
        });
        serde_json::to_writer_pretty(writer, &report)?;
        Ok(())
    }

    fn write_figure<P: AsRef<Path>>(&self, input: P, analysis: &Analysis) -> Result<()> {
        let file = self.output_file(input, "figure.json")?;
        let file = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        let figure = chart::build_figure(analysis, &self.cfg.chart);
        serde_json::to_writer_pretty(writer, &figure)?;
        Ok(())
    }

    fn output_file<P: AsRef<Path>>(&self, input: P, suffix: &str) -> Result<PathBuf> {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("invalid input file name {input:?}"))?;
        Ok(self.out_dir.join(format!("{stem}.{suffix}")))
    }
}
