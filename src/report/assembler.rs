//! Packaging of reports for the messaging layer, and the reasoning dump.

use crate::report::record::AnalysisReport;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

pub const DEFAULT_AGENT_NAME: &str = "technical_analyst_agent";

/// Message envelope content: the report as JSON text, tagged with the agent name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystMessage {
    pub name: String,
    pub content: String,
}

/// Everything one strategy invocation hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyOutput {
    pub strategy: String,
    pub report: AnalysisReport,
    pub message: AnalystMessage,
}

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    agent_name: String,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_NAME)
    }
}

impl ReportAssembler {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn message(&self, report: &AnalysisReport) -> Result<AnalystMessage, serde_json::Error> {
        Ok(AnalystMessage {
            name: self.agent_name.clone(),
            content: serde_json::to_string(report)?,
        })
    }

    pub fn assemble(
        &self,
        strategy: &str,
        report: AnalysisReport,
    ) -> Result<StrategyOutput, serde_json::Error> {
        let message = self.message(&report)?;
        Ok(StrategyOutput {
            strategy: strategy.to_string(),
            report,
            message,
        })
    }

    /// Human-readable dump: a banner with `title`, then the pretty-printed report.
    pub fn show_reasoning<W: Write>(
        &self,
        report: &AnalysisReport,
        title: &str,
        sink: &mut W,
    ) -> io::Result<()> {
        let body = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
        writeln!(sink, "{:=^50}", format!(" {} ", title))?;
        writeln!(sink, "{}", body)?;
        writeln!(sink, "{}", "=".repeat(50))?;
        Ok(())
    }
}
