//! Output formatting for CLI commands.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TridexArgs};
use crate::document::DocId;
use crate::error::Result;
use crate::index::{CollectionStats, MatchRange};

/// A command result that can be printed for humans as well as JSON.
pub trait HumanOutput: Serialize {
    /// Render the result as human-readable text.
    fn to_human(&self) -> String;
}

/// Result structure for schema creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaCreationResult {
    pub schema: String,
    pub fields: Vec<FieldSummary>,
}

/// One declared field.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldSummary {
    pub name: String,
    pub kind: String,
    pub indexed: bool,
}

/// Result structure for document addition.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentAdditionResult {
    pub schema: String,
    pub ids: Vec<DocId>,
    pub duration_ms: u64,
}

/// A stored document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentResult {
    pub schema: String,
    pub id: DocId,
    pub document: serde_json::Value,
}

/// Confirmation of a removal.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemovalResult {
    pub schema: String,
    pub id: Option<DocId>,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub schema: String,
    pub query: String,
    pub total_hits: usize,
    pub duration_ms: u64,
    pub hits: Vec<HitOutput>,
}

/// One search hit.
#[derive(Debug, Serialize, Deserialize)]
pub struct HitOutput {
    pub id: DocId,
    pub ranges: Vec<MatchRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

/// Statistics for one or more schemas.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsOutput {
    pub storage: String,
    pub schemas: Vec<CollectionStats>,
}

/// Result structure for the demo.
#[derive(Debug, Serialize, Deserialize)]
pub struct DemoResult {
    pub users: u64,
    pub profiles: u64,
    pub indexing_ms: u64,
    pub search: SearchOutput,
}

impl HumanOutput for SchemaCreationResult {
    fn to_human(&self) -> String {
        let mut out = format!("Schema '{}':\n", self.schema);
        for field in &self.fields {
            let indexed = if field.indexed { "indexed" } else { "stored" };
            let _ = writeln!(out, "  {}: {} ({})", field.name, field.kind, indexed);
        }
        out
    }
}

impl HumanOutput for DocumentAdditionResult {
    fn to_human(&self) -> String {
        match self.ids.as_slice() {
            [id] => format!("Added document {} to '{}'\n", id, self.schema),
            ids => format!(
                "Added {} documents to '{}' in {}ms\n",
                ids.len(),
                self.schema,
                self.duration_ms
            ),
        }
    }
}

impl HumanOutput for DocumentResult {
    fn to_human(&self) -> String {
        let mut out = format!("{} #{}\n", self.schema, self.id);
        if let Some(fields) = self.document.as_object() {
            for (name, value) in fields {
                let _ = writeln!(out, "  {}: {}", name, format_value(value));
            }
        }
        out
    }
}

impl HumanOutput for RemovalResult {
    fn to_human(&self) -> String {
        match self.id {
            Some(id) => format!("Deleted document {} from '{}'\n", id, self.schema),
            None => format!("Dropped schema '{}'\n", self.schema),
        }
    }
}

impl HumanOutput for SearchOutput {
    fn to_human(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Search Results for {}", self.query);
        let _ = writeln!(out, "═══════════════");

        for hit in &self.hits {
            let ranges: Vec<String> = hit.ranges.iter().map(|r| r.to_string()).collect();
            let _ = writeln!(out, "#{} [{}]", hit.id, ranges.join(", "));
            if let Some(highlight) = &hit.highlight {
                let _ = writeln!(out, "  {highlight}");
            } else if let Some(fields) = hit.document.as_ref().and_then(|d| d.as_object()) {
                for (name, value) in fields {
                    let _ = writeln!(out, "  {}: {}", name, format_value(value));
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Total hits: {}", self.total_hits);
        let _ = writeln!(out, "Search time: {}ms", self.duration_ms);
        out
    }
}

impl HumanOutput for StatsOutput {
    fn to_human(&self) -> String {
        let mut out = format!("Storage: {}\n", self.storage);
        for stats in &self.schemas {
            let _ = writeln!(out);
            let _ = writeln!(out, "Schema '{}':", stats.schema);
            let _ = writeln!(out, "  Documents: {}", stats.documents);
            let _ = writeln!(out, "  Next id: {}", stats.next_id);
            for field in &stats.fields {
                if field.indexed {
                    let _ = writeln!(
                        out,
                        "  {} ({}): {} keys, {} postings, {} ranges",
                        field.name, field.kind, field.keys, field.postings, field.ranges
                    );
                } else {
                    let _ = writeln!(out, "  {} ({}): not indexed", field.name, field.kind);
                }
            }
        }
        out
    }
}

impl HumanOutput for DemoResult {
    fn to_human(&self) -> String {
        format!(
            "Indexed {} users and {} profiles in {}ms\n\n{}",
            self.users,
            self.profiles,
            self.indexing_ms,
            self.search.to_human()
        )
    }
}

/// Output a result in the specified format.
pub fn output_result<T: HumanOutput>(result: &T, args: &TridexArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                print!("{}", result.to_human());
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &TridexArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
