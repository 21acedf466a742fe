//! Scenario runner library
//!
//! Loads a scenario, runs it, and writes the tick trace. The binary in
//! `main.rs` is a thin clap front end over these functions.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use diffdrive_core::engine::scenario::run_scenario_with_ticks;
use diffdrive_core::{ScenarioReport, ScenarioSpec, SimConfig};

/// Load and run a scenario file, optionally overriding its tick count.
/// A scenario with neither `preset` nor `config` takes the preset named by
/// `DIFFDRIVE_PRESET`.
pub fn run_scenario_file(path: &Path, ticks: Option<u64>) -> Result<ScenarioReport> {
    let mut spec = ScenarioSpec::load_from_path(path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;
    if spec.preset.is_none() && spec.config.is_none() {
        spec.config = Some(SimConfig::from_env_or_default());
    }
    let ticks = ticks.unwrap_or(spec.ticks);
    log::debug!("Running scenario {} for {} ticks", spec.id, ticks);
    let report = run_scenario_with_ticks(&spec, ticks)
        .with_context(|| format!("Scenario {} failed to run", spec.id))?;
    Ok(report)
}

pub fn write_trace(path: &Path, report: &ScenarioReport) -> Result<()> {
    let json = report.trace.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("Failed to write trace {}", path.display()))?;
    Ok(())
}

/// Preset configuration rendered as YAML (default) or pretty JSON. Without a
/// name the `DIFFDRIVE_PRESET` selection is shown.
pub fn render_preset(name: Option<&str>, json: bool) -> Result<String> {
    let cfg = match name {
        Some(name) => SimConfig::preset(name)?,
        None => SimConfig::from_env_or_default(),
    };
    if json {
        Ok(serde_json::to_string_pretty(&cfg)?)
    } else {
        Ok(cfg.to_yaml_string()?)
    }
}

/// Multi-line human summary of a finished run
pub fn summarize(report: &ScenarioReport) -> String {
    let pose = report.final_pose;
    let wheels = report.final_wheels;
    let mut out = String::new();
    out.push_str(&format!("Scenario:        {}\n", report.id));
    out.push_str(&format!("Ticks:           {}\n", report.trace.len()));
    out.push_str(&format!(
        "Final pose:      ({:.3}, {:.3}) heading {:.4} rad ({:.1} deg)\n",
        pose.x,
        pose.y,
        pose.heading,
        pose.heading_degrees()
    ));
    out.push_str(&format!(
        "Final wheels:    L {:.4}  R {:.4}  stable {:.4}\n",
        wheels.left, wheels.right, wheels.last_stable_forward
    ));
    out.push_str(&format!("Front blocked:   {} tick(s)\n", report.trace.blocked_front_ticks()));
    out.push_str(&format!("Deadband ticks:  {}\n", report.trace.deadband_ticks()));
    out.push_str(&format!("Max |L - R|:     {:.4}\n", report.trace.max_abs_diff()));
    out
}
