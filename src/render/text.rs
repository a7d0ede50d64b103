//! Markdown reports for the terminal commands.

use crate::fetch::AnalysisReceipt;
use crate::health::{Readiness, SystemStatus};
use crate::layout::NetworkLayout;
use crate::model::NetworkGroup;
use crate::widgets::format::currency;
use crate::widgets::{
    BUCKET_WIDTH, DashboardWidgets, EntityBadge, NO_ENTITIES, NO_RINGS, NO_SUSPECTS, SuspectRow,
};
use std::io::Write;

pub trait Markdown {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;

    fn to_markdown(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_markdown(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Markdown for DashboardWidgets {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Cluster Overview: `{}`\n", self.selection.as_str())?;
        writeln!(
            writer,
            "Fan-out window: **{}** | Commission retention: **{}**\n",
            self.fan_window_label,
            if self.filters.commission_retention { "on" } else { "off" }
        )?;

        writeln!(writer, "## Risk Distribution\n")?;
        writeln!(writer, "{} entities in scope.\n", self.histogram.entity_count)?;
        writeln!(writer, "| Score | Count |")?;
        writeln!(writer, "|-------|-------|")?;
        for (i, bar) in self.histogram.bars.iter().enumerate() {
            let low = i as f64 * BUCKET_WIDTH;
            writeln!(writer, "| {}-{} | {} |", low, low + BUCKET_WIDTH, bar.count)?;
        }

        let pattern = &self.pattern;
        writeln!(writer, "\n## Pattern: {}\n", pattern.pattern_name)?;
        if pattern.entity_count == 0 {
            writeln!(writer, "{}", NO_ENTITIES)?;
        } else {
            writeln!(writer, "- Entities: {}", pattern.entity_count)?;
            writeln!(writer, "- Average transaction: {}", currency(pattern.average_transaction))?;
            writeln!(writer, "- Max fan-out: {}", pattern.max_fan_out)?;
            if !pattern.key_entities.is_empty() {
                writeln!(writer, "\n### Key Entities\n")?;
                for key in &pattern.key_entities {
                    let badge = match key.badge {
                        EntityBadge::Safe => "SAFE",
                        EntityBadge::Mule => "MULE",
                    };
                    writeln!(writer, "- `{}` {}", key.short_id, badge)?;
                }
            }
        }

        writeln!(writer, "\n## Detected Rings\n")?;
        if self.rings.is_empty() {
            writeln!(writer, "{}", NO_RINGS)?;
            return Ok(());
        }
        writeln!(writer, "| Ring | Pattern | Volume | Nodes | Risk |")?;
        writeln!(writer, "|------|---------|--------|-------|------|")?;
        for row in &self.rings {
            writeln!(
                writer,
                "| {} | {} | {} | {} | {} ({}) |",
                row.id,
                row.pattern,
                row.volume,
                row.nodes,
                row.risk,
                row.band.as_str()
            )?;
        }
        Ok(())
    }
}

/// Suspect list as shown in the investigation sidebar.
pub struct SuspectTable<'a>(pub &'a [SuspectRow]);

impl Markdown for SuspectTable<'_> {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Suspects ({})\n", self.0.len())?;
        if self.0.is_empty() {
            writeln!(writer, "{}", NO_SUSPECTS)?;
            return Ok(());
        }
        writeln!(writer, "| | Account | Score | Cluster | Nodes | Patterns |")?;
        writeln!(writer, "|-|---------|-------|---------|-------|----------|")?;
        for row in self.0 {
            let patterns = if row.patterns.is_empty() {
                "-".to_string()
            } else {
                row.patterns.join(", ")
            };
            writeln!(
                writer,
                "| {} | `{}` | {} ({}) | {} | {} | {} |",
                if row.selected { ">" } else { "" },
                row.id,
                row.score,
                row.band.as_str(),
                row.cluster,
                row.nodes,
                patterns
            )?;
        }
        Ok(())
    }
}

impl Markdown for NetworkLayout {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Network: `{}`\n", self.focus())?;
        writeln!(
            writer,
            "{} nodes, {} links\n",
            self.nodes().len(),
            self.links().len()
        )?;

        writeln!(writer, "## Nodes\n")?;
        for (i, node) in self.nodes().iter().enumerate() {
            let group = match node.group {
                NetworkGroup::Suspected => "suspected",
                NetworkGroup::Related => "related",
                NetworkGroup::Neutral => "neutral",
            };
            let marker = if node.id == self.focus() { " (focus)" } else { "" };
            match self.position(i) {
                Some((x, y)) => writeln!(
                    writer,
                    "- `{}` {}{} at ({:.1}, {:.1})",
                    node.id, group, marker, x, y
                )?,
                None => writeln!(writer, "- `{}` {}{}", node.id, group, marker)?,
            }
        }

        if !self.links().is_empty() {
            writeln!(writer, "\n## Links\n")?;
            for link in self.links() {
                let nodes = self.nodes();
                writeln!(
                    writer,
                    "- `{}` → `{}`{}",
                    nodes[link.source].id,
                    nodes[link.target].id,
                    if link.dashed { " (indirect)" } else { "" }
                )?;
            }
        }
        Ok(())
    }
}

impl Markdown for SystemStatus {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let flag = |up: bool| if up { "online" } else { "down" };
        let readiness = match self.readiness {
            Readiness::Pending => "pending",
            Readiness::Online => "online",
            Readiness::Warning => "warning",
        };
        writeln!(writer, "# System Status: {}\n", readiness)?;
        writeln!(writer, "- Engine: {}", flag(self.engine))?;
        writeln!(writer, "- Models loaded: {}", flag(self.models_loaded))?;
        writeln!(writer, "- Database: {}", flag(self.database_connected))?;
        writeln!(writer, "- Encryption: {}", flag(self.encryption_active))?;
        match self.latency_ms {
            Some(ms) => writeln!(writer, "- Latency: {:.0} ms", ms)?,
            None => writeln!(writer, "- Latency: n/a")?,
        }
        Ok(())
    }
}

impl Markdown for AnalysisReceipt {
    fn write_markdown<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "# Analysis Complete\n")?;
        if let Some(batch) = &self.batch_id {
            writeln!(writer, "- Batch: `{}`", batch)?;
        }
        writeln!(writer, "- Transactions: {}", self.total_transactions)?;
        writeln!(writer, "- Suspicious nodes: {}", self.suspicious_nodes)?;
        writeln!(writer, "- Rings: {}", self.rings)?;
        Ok(())
    }
}
