//! Command implementations for the Tridex CLI.

use std::cmp::Reverse;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::EngineConfig;
use crate::document::{Document, FieldValue};
use crate::engine::Engine;
use crate::error::{Result, TridexError};
use crate::query::Query;
use crate::schema::{Field, FieldKind, Schema};
use crate::search::{Highlighter, SearchHit};

const FIRST_NAMES: [&str; 5] = ["Mike", "John", "David", "Rob", "Ed"];
const LAST_NAMES: [&str; 5] = ["Doe", "Timber", "Smith", "Gates", "Jobs"];

/// Execute a CLI command.
///
/// The engine is closed (and its snapshot flushed) even when the command
/// fails; the command's error wins over a close error.
pub fn execute_command(args: TridexArgs) -> Result<()> {
    let mut engine = open_engine(&args)?;

    let result = match &args.command {
        Command::CreateSchema(create_args) => create_schema(&mut engine, create_args, &args),
        Command::DropSchema(drop_args) => drop_schema(&mut engine, drop_args, &args),
        Command::Add(add_args) => add_documents(&mut engine, add_args, &args),
        Command::Get(get_args) => get_document(&engine, get_args, &args),
        Command::Delete(delete_args) => delete_document(&mut engine, delete_args, &args),
        Command::Search(search_args) => search_schema(&engine, search_args, &args),
        Command::Stats(stats_args) => show_stats(&engine, stats_args, &args),
        Command::Demo(demo_args) => run_demo(&mut engine, demo_args, &args),
    };

    let closed = engine.close();
    result.and(closed)
}

/// Open the engine described by the global arguments.
pub fn open_engine(args: &TridexArgs) -> Result<Engine> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::json(&args.store).pretty(args.pretty),
    };
    log::debug!("engine config: {config:?}");
    Engine::new(config)
}

fn create_schema(engine: &mut Engine, args: &CreateSchemaArgs, cli_args: &TridexArgs) -> Result<()> {
    let declarations = args
        .fields
        .iter()
        .map(|decl| (decl.name.clone(), decl.field.clone()));
    let schema = engine.create_schema(args.name.clone(), declarations)?;

    output_result(&schema_summary(&schema), cli_args)
}

fn drop_schema(engine: &mut Engine, args: &DropSchemaArgs, cli_args: &TridexArgs) -> Result<()> {
    engine.drop_schema(&args.name)?;
    output_result(
        &RemovalResult {
            schema: args.name.clone(),
            id: None,
        },
        cli_args,
    )
}

fn add_documents(engine: &mut Engine, args: &AddArgs, cli_args: &TridexArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut ids = Vec::new();

    if let Some(path) = &args.file {
        let reader = BufReader::new(File::open(path)?);
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let id = serde_json::from_str::<serde_json::Value>(&line)
                .map_err(TridexError::from)
                .and_then(|value| engine.add_json(&args.schema, &value, None))
                .map_err(|e| {
                    TridexError::other(format!("{}:{}: {}", path.display(), line_num + 1, e))
                })?;
            ids.push(id);
        }
        log::info!("added {} document(s) from {}", ids.len(), path.display());
    } else if let Some(document) = &args.document {
        let value: serde_json::Value = serde_json::from_str(document)?;
        ids.push(engine.add_json(&args.schema, &value, args.id)?);
    }

    output_result(
        &DocumentAdditionResult {
            schema: args.schema.clone(),
            ids,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn get_document(engine: &Engine, args: &GetArgs, cli_args: &TridexArgs) -> Result<()> {
    let document = engine.get(&args.schema, args.id)?;
    output_result(
        &DocumentResult {
            schema: args.schema.clone(),
            id: args.id,
            document: document.to_json(),
        },
        cli_args,
    )
}

fn delete_document(engine: &mut Engine, args: &DeleteArgs, cli_args: &TridexArgs) -> Result<()> {
    engine.delete(&args.schema, args.id)?;
    output_result(
        &RemovalResult {
            schema: args.schema.clone(),
            id: Some(args.id),
        },
        cli_args,
    )
}

fn search_schema(engine: &Engine, args: &SearchArgs, cli_args: &TridexArgs) -> Result<()> {
    let schema = engine.schema(&args.schema)?;
    let query = build_query(args, &schema)?;

    let output = run_search(
        engine,
        &schema,
        &query,
        &SearchOptions {
            documents: args.documents,
            ranked: args.ranked,
            highlight: args.highlight.clone(),
            limit: args.limit,
        },
    )?;
    output_result(&output, cli_args)
}

/// Build the query from whichever source the arguments name.
pub fn build_query(args: &SearchArgs, schema: &Schema) -> Result<Query> {
    if let Some(json) = &args.json {
        return Ok(serde_json::from_str(json)?);
    }
    if let Some(path) = &args.query_file {
        let content = fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }

    let mut terms = args
        .terms
        .iter()
        .map(|term| Ok(Query::term(term.field.clone(), term_value(schema, term)?)))
        .collect::<Result<Vec<Query>>>()?;

    match terms.len() {
        0 => Err(TridexError::invalid_argument(
            "a query needs --term, --json or --query-file",
        )),
        1 => Ok(terms.remove(0)),
        _ => Ok(Query::boolean(args.op.into(), terms)),
    }
}

/// Type a command line term value by its field's kind.
fn term_value(schema: &Schema, term: &TermArg) -> Result<FieldValue> {
    let (_, field) = schema.resolve(&term.field)?;
    match field.kind() {
        FieldKind::Text => Ok(FieldValue::Text(term.value.clone())),
        FieldKind::String => Ok(FieldValue::Str(term.value.clone())),
        kind => {
            let mismatch = || {
                TridexError::schema_mismatch(format!(
                    "term on field '{}' expects {}, got '{}'",
                    term.field, kind, term.value
                ))
            };
            let raw: serde_json::Value =
                serde_json::from_str(&term.value).map_err(|_| mismatch())?;
            FieldValue::from_json(kind, &raw).ok_or_else(mismatch)
        }
    }
}

struct SearchOptions {
    documents: bool,
    ranked: bool,
    highlight: Option<String>,
    limit: Option<usize>,
}

fn run_search(
    engine: &Engine,
    schema: &Schema,
    query: &Query,
    options: &SearchOptions,
) -> Result<SearchOutput> {
    let start_time = Instant::now();

    let highlight_kind = match &options.highlight {
        Some(field) => Some(schema.resolve(field)?.1.kind()),
        None => None,
    };

    let mut hits: Vec<HitOutput> = if options.documents || highlight_kind.is_some() {
        let highlighter = Highlighter::default();
        engine
            .search_documents(schema.name(), query)?
            .into_iter()
            .map(|SearchHit { id, ranges, document }| {
                let highlight = options.highlight.as_deref().zip(highlight_kind).and_then(
                    |(field, kind)| {
                        document
                            .get_field(field)
                            .map(|value| highlighter.highlight_value(kind, value, &ranges))
                    },
                );
                HitOutput {
                    id,
                    ranges,
                    document: Some(document.to_json()),
                    highlight,
                }
            })
            .collect()
    } else {
        engine
            .search(schema.name(), query)?
            .into_iter()
            .map(|(id, ranges)| HitOutput {
                id,
                ranges,
                document: None,
                highlight: None,
            })
            .collect()
    };

    let total_hits = hits.len();
    if options.ranked {
        hits.sort_by_key(|hit| (Reverse(hit.ranges.len()), hit.id));
    }
    if let Some(limit) = options.limit {
        hits.truncate(limit);
    }

    Ok(SearchOutput {
        schema: schema.name().to_string(),
        query: query.to_string(),
        total_hits,
        duration_ms: start_time.elapsed().as_millis() as u64,
        hits,
    })
}

fn show_stats(engine: &Engine, args: &StatsArgs, cli_args: &TridexArgs) -> Result<()> {
    let names = match &args.schema {
        Some(name) => vec![name.clone()],
        None => engine.schema_names(),
    };

    let schemas = names
        .iter()
        .map(|name| engine.stats(name))
        .collect::<Result<Vec<_>>>()?;

    output_result(
        &StatsOutput {
            storage: engine.storage().storage_type().to_string(),
            schemas,
        },
        cli_args,
    )
}

/// Fill `User` and `Profile` with random data and run `AND(name:ohn, name:mbe)`.
fn run_demo(engine: &mut Engine, args: &DemoArgs, cli_args: &TridexArgs) -> Result<()> {
    ensure_schema(engine, "User", vec![("username", Field::text())])?;
    let profile = ensure_schema(
        engine,
        "Profile",
        vec![
            ("user_id", Field::int()),
            ("name", Field::text()),
            ("age", Field::int()),
        ],
    )?;

    let start_time = Instant::now();
    let mut rng = StdRng::seed_from_u64(args.seed);

    for i in 0..args.count {
        let user = Document::builder()
            .add_text("username", format!("user{i}"))
            .build();
        let user_id = engine.add("User", user, Some(i))?;

        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let profile_doc = Document::builder()
            .add_integer("user_id", user_id as i64)
            .add_text("name", format!("{first} {last}"))
            .add_integer("age", rng.random_range(18..=65))
            .build();
        engine.add("Profile", profile_doc, Some(i))?;
    }
    engine.commit()?;
    let indexing_ms = start_time.elapsed().as_millis() as u64;
    log::info!("demo indexed {} users and profiles", args.count);

    let query = Query::and([Query::term("name", "ohn"), Query::term("name", "mbe")]);
    let search = run_search(
        engine,
        &profile,
        &query,
        &SearchOptions {
            documents: true,
            ranked: false,
            highlight: Some("name".to_string()),
            limit: Some(10),
        },
    )?;

    output_result(
        &DemoResult {
            users: args.count,
            profiles: args.count,
            indexing_ms,
            search,
        },
        cli_args,
    )
}

/// Get a schema, creating it when it does not exist yet.
fn ensure_schema(
    engine: &mut Engine,
    name: &str,
    declarations: Vec<(&str, Field)>,
) -> Result<std::sync::Arc<Schema>> {
    match engine.schema(name) {
        Ok(schema) => Ok(schema),
        Err(e) if e.is_not_found() => engine.create_schema(name, declarations),
        Err(e) => Err(e),
    }
}

fn schema_summary(schema: &Schema) -> SchemaCreationResult {
    SchemaCreationResult {
        schema: schema.name().to_string(),
        fields: schema
            .fields()
            .iter()
            .map(|field| FieldSummary {
                name: field.name().to_string(),
                kind: field.kind().to_string(),
                indexed: field.is_indexed(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn profile_engine() -> Engine {
        let mut engine = Engine::memory();
        engine
            .create_schema(
                "Profile",
                vec![
                    ("name", Field::text()),
                    ("age", Field::int().indexed(true)),
                    ("active", Field::bool().indexed(true)),
                ],
            )
            .unwrap();
        engine
    }

    fn search_args(argv: &[&str]) -> SearchArgs {
        let mut full = vec!["tridex", "search", "Profile"];
        full.extend_from_slice(argv);
        match TridexArgs::try_parse_from(full).unwrap().command {
            Command::Search(args) => args,
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_build_query_from_terms() {
        let engine = profile_engine();
        let schema = engine.schema("Profile").unwrap();

        let query = build_query(&search_args(&["-t", "name=ohn"]), &schema).unwrap();
        assert_eq!(query.to_string(), "name:ohn");

        let query = build_query(
            &search_args(&["-t", "name=ohn", "-t", "age=30", "-t", "active=true", "--op", "xor"]),
            &schema,
        )
        .unwrap();
        assert_eq!(query.to_string(), "XOR(name:ohn, age:30, active:true)");
    }

    #[test]
    fn test_build_query_errors() {
        let engine = profile_engine();
        let schema = engine.schema("Profile").unwrap();

        assert!(build_query(&search_args(&[]), &schema).is_err());
        assert!(matches!(
            build_query(&search_args(&["-t", "age=thirty"]), &schema),
            Err(TridexError::SchemaMismatch(_))
        ));
        assert!(matches!(
            build_query(&search_args(&["-t", "email=x"]), &schema),
            Err(TridexError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_build_query_from_json() {
        let engine = profile_engine();
        let schema = engine.schema("Profile").unwrap();
        let json = r#"{"bool": {"operator": "or", "operands": [
            {"term": {"field": "name", "value": "ohn"}},
            {"term": {"field": "age", "value": 40}}
        ]}}"#;

        let query = build_query(&search_args(&["--json", json]), &schema).unwrap();
        assert_eq!(query.to_string(), "OR(name:ohn, age:40)");
    }

    #[test]
    fn test_run_search_ranked_and_highlighted() {
        let mut engine = profile_engine();
        let johnson = serde_json::json!({"name": "John Johnson", "age": 30});
        let smith = serde_json::json!({"name": "John Smith", "age": 40});
        assert_eq!(engine.add_json("Profile", &johnson, None).unwrap(), 0);
        assert_eq!(engine.add_json("Profile", &smith, None).unwrap(), 1);

        let schema = engine.schema("Profile").unwrap();
        let output = run_search(
            &engine,
            &schema,
            &Query::term("name", "john"),
            &SearchOptions {
                documents: false,
                ranked: true,
                highlight: Some("name".to_string()),
                limit: Some(1),
            },
        )
        .unwrap();

        assert_eq!(output.total_hits, 2);
        assert_eq!(output.hits.len(), 1);
        assert_eq!(output.hits[0].id, 0);
        assert_eq!(
            output.hits[0].highlight.as_deref(),
            Some("<mark>john</mark> <mark>john</mark>son")
        );
    }

    #[test]
    fn test_demo_against_json_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("demo.json");
        let store = store.to_str().unwrap();

        let args = TridexArgs::try_parse_from([
            "tridex", "-q", "--store", store, "demo", "--count", "50", "--seed", "7",
        ])
        .unwrap();
        execute_command(args).unwrap();

        let args = TridexArgs::try_parse_from(["tridex", "--store", store, "stats"]).unwrap();
        let engine = open_engine(&args).unwrap();
        assert_eq!(engine.schema_names(), vec!["Profile", "User"]);
        assert_eq!(engine.stats("User").unwrap().documents, 50);
        assert_eq!(engine.stats("Profile").unwrap().documents, 50);

        let hits = engine
            .search_documents(
                "Profile",
                &Query::and([Query::term("name", "ohn"), Query::term("name", "mbe")]),
            )
            .unwrap();
        for hit in hits {
            assert_eq!(
                hit.document.get_field("name"),
                Some(&FieldValue::Text("John Timber".to_string()))
            );
        }
    }

    #[test]
    fn test_command_error_still_closes() {
        let temp_dir = TempDir::new().unwrap();
        let store = temp_dir.path().join("store.json");
        let store = store.to_str().unwrap();

        let create = TridexArgs::try_parse_from([
            "tridex", "-q", "--store", store, "create-schema", "User", "username:text",
        ])
        .unwrap();
        execute_command(create).unwrap();

        let get = TridexArgs::try_parse_from(["tridex", "-q", "--store", store, "get", "User", "9"])
            .unwrap();
        assert!(execute_command(get).unwrap_err().is_not_found());

        let reopened = TridexArgs::try_parse_from(["tridex", "--store", store, "stats"]).unwrap();
        assert_eq!(open_engine(&reopened).unwrap().schema_names(), vec!["User"]);
    }
}
