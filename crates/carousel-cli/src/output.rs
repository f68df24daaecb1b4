use std::io::Write;

use carousel_core::{Candidate, Tier};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectOutputFormat {
    #[default]
    Table,
    Json,
}

impl SelectOutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for SelectOutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid output format '{other}', expected one of: table, json"
            )),
        }
    }
}

/// One display-order line of a finished selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRow {
    pub id: String,
    pub tier: Tier,
    pub segment: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SelectionRow {
    pub fn new(candidate: &Candidate, segment: &'static str, now_ms: i64) -> Self {
        Self {
            id: candidate.id.clone(),
            tier: Tier::classify(candidate, now_ms),
            segment,
            last_activity_at: candidate.last_activity_at(),
            score: candidate.score,
        }
    }
}

pub fn write_selection_table(rows: &[SelectionRow], out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "id\ttier\tsegment\tlast_activity_at\tscore")?;

    for row in rows {
        let last_activity = row
            .last_activity_at
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_owned());
        let score = row
            .score
            .map(|value| format!("{value:.3}"))
            .unwrap_or_else(|| "-".to_owned());
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            normalize_field(&row.id),
            row.tier.as_str(),
            row.segment,
            last_activity,
            score
        )?;
    }

    Ok(())
}

pub fn write_selection_json(rows: &[SelectionRow], out: &mut dyn Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    Ok(())
}

fn normalize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_705_287_600_000;
    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn row(id: &str, segment: &'static str) -> SelectionRow {
        let mut candidate = Candidate::new(id);
        candidate.last_login_at = Some(NOW - HOUR_MS);
        SelectionRow::new(&candidate, segment, NOW)
    }

    #[test]
    fn table_output_has_stable_header_and_columns() {
        let mut out = Vec::new();
        write_selection_table(&[row("u1", "core")], &mut out).expect("write table");

        let rendered = String::from_utf8(out).expect("utf8 output");
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "id\ttier\tsegment\tlast_activity_at\tscore");
        assert_eq!(lines.len(), 2);

        let columns = lines[1].split('\t').collect::<Vec<_>>();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0], "u1");
        assert_eq!(columns[1], "active");
        assert_eq!(columns[2], "core");
        assert_eq!(columns[4], "-");
    }

    #[test]
    fn table_output_escapes_control_characters_in_ids() {
        let mut candidate = Candidate::new("bad\tid");
        candidate.last_login_at = Some(NOW);
        let row = SelectionRow::new(&candidate, "core", NOW);

        let mut out = Vec::new();
        write_selection_table(&[row], &mut out).expect("write table");
        let rendered = String::from_utf8(out).expect("utf8 output");
        assert!(rendered.contains("bad id"));
    }

    #[test]
    fn json_output_serializes_tier_and_segment() {
        let mut out = Vec::new();
        write_selection_json(&[row("u1", "explore")], &mut out).expect("write json");

        let rendered = String::from_utf8(out).expect("utf8 output");
        assert!(rendered.contains("\"tier\": \"active\""));
        assert!(rendered.contains("\"segment\": \"explore\""));
        assert!(!rendered.contains("\"score\""));
    }
}
