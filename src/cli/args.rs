//! Command line argument parsing for the Tridex CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::query::Operator;
use crate::schema::{Field, FieldKind};

/// Tridex - a minimal trigram full-text search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "tridex")]
#[command(about = "A minimal trigram full-text search engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TridexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output and snapshots
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON snapshot file holding all schemas and documents
    #[arg(
        short,
        long,
        value_name = "STORE_FILE",
        env = "TRIDEX_STORE",
        default_value = "tridex.json",
        global = true
    )]
    pub store: PathBuf,

    /// Engine configuration file (JSON); overrides --store
    #[arg(short, long, value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TridexArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a schema
    #[command(name = "create-schema")]
    CreateSchema(CreateSchemaArgs),

    /// Drop a schema with all its documents
    #[command(name = "drop-schema")]
    DropSchema(DropSchemaArgs),

    /// Add documents to a schema
    Add(AddArgs),

    /// Print a stored document
    Get(GetArgs),

    /// Delete a document
    Delete(DeleteArgs),

    /// Search a schema
    Search(SearchArgs),

    /// Show schema statistics
    Stats(StatsArgs),

    /// Fill the store with random users and profiles and run a sample query
    Demo(DemoArgs),
}

/// A `name:kind[:indexed|:unindexed]` field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub field: Field,
}

/// Parse a `name:kind[:indexed|:unindexed]` field declaration.
pub fn parse_field_decl(s: &str) -> std::result::Result<FieldDecl, String> {
    let mut parts = s.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }

    let kind: FieldKind = parts
        .next()
        .ok_or_else(|| format!("missing kind in '{s}', expected name:kind"))?
        .parse()
        .map_err(|e| format!("{e}"))?;

    let mut field = Field::new(kind);
    match parts.next() {
        None => {}
        Some("indexed") => field = field.indexed(true),
        Some("unindexed") => field = field.indexed(false),
        Some(other) => return Err(format!("unknown field flag '{other}' in '{s}'")),
    }
    if parts.next().is_some() {
        return Err(format!("too many parts in '{s}'"));
    }

    Ok(FieldDecl {
        name: name.to_string(),
        field,
    })
}

/// A `field=value` query term as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermArg {
    pub field: String,
    pub value: String,
}

/// Parse a `field=value` term.
pub fn parse_term(s: &str) -> std::result::Result<TermArg, String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{s}'"))?;
    if field.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    Ok(TermArg {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Arguments for creating a schema
#[derive(Parser, Debug, Clone)]
pub struct CreateSchemaArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub name: String,

    /// Field declarations (name:kind[:indexed|:unindexed]), in order
    #[arg(value_name = "FIELD", required = true, value_parser = parse_field_decl)]
    pub fields: Vec<FieldDecl>,
}

/// Arguments for dropping a schema
#[derive(Parser, Debug, Clone)]
pub struct DropSchemaArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub name: String,
}

/// Arguments for adding documents
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Document as a JSON object
    #[arg(value_name = "DOCUMENT", required_unless_present = "file")]
    pub document: Option<String>,

    /// Read documents from a JSON Lines file instead
    #[arg(long, value_name = "FILE", conflicts_with_all = ["document", "id"])]
    pub file: Option<PathBuf>,

    /// Document id (assigned when omitted)
    #[arg(long)]
    pub id: Option<u64>,
}

/// Arguments for getting a document
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Document id
    #[arg(value_name = "ID")]
    pub id: u64,
}

/// Arguments for deleting a document
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Document id
    #[arg(value_name = "ID")]
    pub id: u64,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Schema name
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Query terms (field=value), combined with --op
    #[arg(short, long = "term", value_parser = parse_term)]
    pub terms: Vec<TermArg>,

    /// Operator combining the terms
    #[arg(long, default_value = "and")]
    pub op: OperatorArg,

    /// Query as a JSON expression tree
    #[arg(long, conflicts_with_all = ["terms", "query_file"])]
    pub json: Option<String>,

    /// Read the JSON query from a file
    #[arg(long, value_name = "FILE", conflicts_with = "terms")]
    pub query_file: Option<PathBuf>,

    /// Resolve hits to their stored documents
    #[arg(short, long)]
    pub documents: bool,

    /// Order hits by match frequency
    #[arg(long)]
    pub ranked: bool,

    /// Highlight matched ranges in this field (implies --documents)
    #[arg(long, value_name = "FIELD")]
    pub highlight: Option<String>,

    /// Maximum number of hits to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Boolean operator accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorArg {
    And,
    Or,
    Xor,
}

impl From<OperatorArg> for Operator {
    fn from(op: OperatorArg) -> Self {
        match op {
            OperatorArg::And => Operator::And,
            OperatorArg::Or => Operator::Or,
            OperatorArg::Xor => Operator::Xor,
        }
    }
}

/// Arguments for schema statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Schema name (all schemas when omitted)
    #[arg(value_name = "SCHEMA")]
    pub schema: Option<String>,
}

/// Arguments for the demo
#[derive(Parser, Debug, Clone)]
pub struct DemoArgs {
    /// Number of users and profiles to generate
    #[arg(short = 'n', long, default_value = "1000")]
    pub count: u64,

    /// Random seed
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_create_schema_command() {
        let args = TridexArgs::try_parse_from([
            "tridex",
            "create-schema",
            "Profile",
            "name:text",
            "age:int:indexed",
            "bio:text:unindexed",
        ])
        .unwrap();

        if let Command::CreateSchema(create_args) = args.command {
            assert_eq!(create_args.name, "Profile");
            assert_eq!(create_args.fields.len(), 3);
            assert_eq!(create_args.fields[0].field.kind(), FieldKind::Text);
            assert!(create_args.fields[0].field.is_indexed());
            assert!(create_args.fields[1].field.is_indexed());
            assert!(!create_args.fields[2].field.is_indexed());
        } else {
            panic!("Expected CreateSchema command");
        }
    }

    #[test]
    fn test_parse_field_decl_errors() {
        assert!(parse_field_decl("name").is_err());
        assert!(parse_field_decl(":text").is_err());
        assert!(parse_field_decl("name:blob").is_err());
        assert!(parse_field_decl("name:text:fast").is_err());
        assert!(parse_field_decl("name:text:indexed:x").is_err());
    }

    #[test]
    fn test_search_command() {
        let args = TridexArgs::try_parse_from([
            "tridex",
            "search",
            "Profile",
            "-t",
            "name=ohn",
            "--term",
            "name=mbe",
            "--op",
            "or",
            "--ranked",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.schema, "Profile");
            assert_eq!(
                search_args.terms,
                vec![
                    TermArg {
                        field: "name".to_string(),
                        value: "ohn".to_string()
                    },
                    TermArg {
                        field: "name".to_string(),
                        value: "mbe".to_string()
                    },
                ]
            );
            assert_eq!(Operator::from(search_args.op), Operator::Or);
            assert!(search_args.ranked);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_search_sources_conflict() {
        let result = TridexArgs::try_parse_from([
            "tridex",
            "search",
            "Profile",
            "--term",
            "name=ohn",
            "--json",
            "{}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = TridexArgs::try_parse_from(["tridex", "-vv", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = TridexArgs::try_parse_from(["tridex", "stats", "-q", "-vvv"]).unwrap();
        assert_eq!(args.verbosity(), 0);

        let args = TridexArgs::try_parse_from(["tridex", "stats"]).unwrap();
        assert_eq!(args.verbosity(), 1);
        assert_eq!(args.store, PathBuf::from("tridex.json"));
    }

    #[test]
    fn test_add_requires_document_or_file() {
        assert!(TridexArgs::try_parse_from(["tridex", "add", "User"]).is_err());
        assert!(
            TridexArgs::try_parse_from(["tridex", "add", "User", "--file", "users.jsonl"]).is_ok()
        );
    }
}
