use crate::layout::LayoutResult;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Compact per-result counts, logged by the CLI and embedded in dumps.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub kind: &'static str,
    pub items: usize,
    /// Groups for a strip, hidden labels for a peak stack, unresolved links.
    pub affected: usize,
}

impl LayoutSummary {
    pub fn from_result(result: &LayoutResult) -> Self {
        match result {
            LayoutResult::LabelStrip { groups } => LayoutSummary {
                kind: "labelStrip",
                items: groups.iter().map(|g| g.members.len()).sum(),
                affected: groups.len(),
            },
            LayoutResult::PeakStack { flags } => LayoutSummary {
                kind: "peakStack",
                items: flags.len(),
                affected: flags.hidden_count(),
            },
            LayoutResult::Links { links, .. } => LayoutSummary {
                kind: "links",
                items: links.len(),
                affected: links.values().filter(|link| link.is_none()).count(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub summary: LayoutSummary,
    #[serde(flatten)]
    pub result: &'a LayoutResult,
}

impl<'a> LayoutDump<'a> {
    pub fn from_result(result: &'a LayoutResult) -> Self {
        Self {
            summary: LayoutSummary::from_result(result),
            result,
        }
    }
}

/// Writes results as pretty JSON to `path`, or stdout when `path` is `None`.
/// A single result is written as an object, several as an array.
pub fn write_layout_dump(path: Option<&Path>, results: &[LayoutResult]) -> anyhow::Result<()> {
    let dumps: Vec<LayoutDump<'_>> = results.iter().map(LayoutDump::from_result).collect();
    let mut writer: BufWriter<Box<dyn Write>> = match path {
        Some(path) => BufWriter::new(Box::new(File::create(path)?)),
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };
    match dumps.as_slice() {
        [single] => serde_json::to_writer_pretty(&mut writer, single)?,
        many => serde_json::to_writer_pretty(&mut writer, many)?,
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
