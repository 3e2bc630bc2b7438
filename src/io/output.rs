use crate::cli::OutputFormat;
use crate::config::ContextProfile;
use crate::core::{Axis, Candidate};
use crate::gate::{GateDecision, GateResult};
use crate::selection::SelectionResult;
use colored::*;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub trait OutputWriter {
    fn write_gate_results(&mut self, results: &[(Candidate, GateResult)]) -> anyhow::Result<()>;
    fn write_selection(&mut self, result: &SelectionResult) -> anyhow::Result<()>;
    fn write_profiles(&mut self, profiles: &[ContextProfile]) -> anyhow::Result<()>;
}

pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    })
}

#[derive(Serialize)]
struct GateReport<'a> {
    id: &'a str,
    #[serde(flatten)]
    result: &'a GateResult,
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_gate_results(&mut self, results: &[(Candidate, GateResult)]) -> anyhow::Result<()> {
        let reports: Vec<GateReport<'_>> = results
            .iter()
            .map(|(c, r)| GateReport { id: &c.id, result: r })
            .collect();
        self.write_json(&reports)
    }

    fn write_selection(&mut self, result: &SelectionResult) -> anyhow::Result<()> {
        self.write_json(result)
    }

    fn write_profiles(&mut self, profiles: &[ContextProfile]) -> anyhow::Result<()> {
        self.write_json(profiles)
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn colored_decision(decision: GateDecision) -> ColoredString {
    let label = decision.as_str().to_uppercase();
    match decision {
        GateDecision::Allow => label.green().bold(),
        GateDecision::AllowWithRepair => label.cyan().bold(),
        GateDecision::Escalate => label.yellow().bold(),
        GateDecision::Reject => label.red().bold(),
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_gate_results(&mut self, results: &[(Candidate, GateResult)]) -> anyhow::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{}", "POLICY GATE".bold().cyan())?;
        writeln!(w, "{}", "═".repeat(60))?;
        for (candidate, result) in results {
            writeln!(
                w,
                "{} {}  {}",
                colored_decision(result.decision),
                candidate.id.bold(),
                result.explanation.dimmed()
            )?;
            for violation in &result.violations {
                writeln!(
                    w,
                    "  {} {:<28} impact {:.2} (severity {}, confidence {})",
                    violation.code.to_string().yellow(),
                    violation.code.label(),
                    violation.impact_score(),
                    violation.severity,
                    violation.confidence
                )?;
            }
            for action in &result.repair_log {
                writeln!(
                    w,
                    "  ↳ pass {} {}: {} (drift {})",
                    action.iteration, action.stage, action.description, action.semantic_drift
                )?;
            }
            if let Some(text) = &result.repaired_text {
                writeln!(w, "  {} {}", "repaired:".green(), text)?;
            }
        }

        let passed = results.iter().filter(|(_, r)| r.decision.passes()).count();
        writeln!(w, "{}", "─".repeat(60))?;
        writeln!(w, "{passed}/{} candidate(s) passed", results.len())?;
        Ok(())
    }

    fn write_selection(&mut self, result: &SelectionResult) -> anyhow::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{}", "SELECTION".bold().cyan())?;
        writeln!(w, "{}", "═".repeat(60))?;
        match &result.selected_id {
            Some(id) => writeln!(w, "{} {}", "selected:".green().bold(), id.bold())?,
            None => writeln!(w, "{}", "no selection; human review needed".yellow().bold())?,
        }
        writeln!(w, "{}", result.explanation)?;
        if let Some(method) = result.mcda_method {
            writeln!(
                w,
                "method {method}, profile {}, pareto set [{}]",
                result.weights_profile,
                result.pareto_set_ids.join(", ")
            )?;
        }

        if !result.ranking.is_empty() {
            writeln!(w, "\n{}", "Ranking".bold())?;
            for (rank, entry) in result.ranking.iter().enumerate() {
                writeln!(w, "  #{} {:<20} {:.3}", rank + 1, entry.id, entry.score)?;
            }
        }

        if !result.metrics.is_empty() {
            writeln!(w, "\n{}", "Axis values".bold())?;
            let header: Vec<String> = Axis::ALL.iter().map(|a| format!("{:>8.8}", a.as_str())).collect();
            writeln!(w, "  {:<20}{}     D2", "", header.join(" "))?;
            for (id, metrics) in &result.metrics {
                let cells: Vec<String> = metrics.values().iter().map(|v| format!("{v:>8.2}")).collect();
                writeln!(w, "  {:<20}{}  {:.3}", id, cells.join(" "), metrics.d2)?;
            }
        }

        if !result.rejected.is_empty() {
            writeln!(w, "\n{}", "Rejected".bold())?;
            for r in &result.rejected {
                writeln!(w, "  {} {} {}", r.id.red(), r.reason, r.detail.dimmed())?;
            }
        }
        Ok(())
    }

    fn write_profiles(&mut self, profiles: &[ContextProfile]) -> anyhow::Result<()> {
        let w = &mut self.writer;
        for profile in profiles {
            writeln!(w, "{}", profile.name.bold().cyan())?;
            for axis in Axis::ALL {
                let p = profile.axis(axis);
                writeln!(
                    w,
                    "  {:<16} e_min {:.2}  e_target {:.2}  weight {:.2}..{:.2}",
                    axis.as_str(),
                    p.e_min,
                    p.e_target,
                    p.weight_range.0,
                    p.weight_range.1
                )?;
            }
        }
        Ok(())
    }
}
