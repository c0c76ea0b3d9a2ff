//! Set-algebra properties of AND/OR/XOR query trees.

use std::collections::BTreeSet;

use tridex::prelude::*;

const NAMES: [&str; 8] = [
    "John Smith",
    "Bob Jobs",
    "John Jobs",
    "Mike Timber",
    "David Gates",
    "Ed Doe",
    "Rob Smith",
    "John Timber",
];

fn engine() -> Result<Engine> {
    let mut engine = Engine::memory();
    engine.create_schema("Profile", vec![("name", Field::text())])?;
    for (id, name) in NAMES.iter().enumerate() {
        let doc = Document::builder().add_text("name", *name).build();
        engine.add("Profile", doc, Some(id as DocId))?;
    }
    Ok(engine)
}

fn term(value: &str) -> Query {
    Query::term("name", value)
}

fn ids(engine: &Engine, query: &Query) -> Result<BTreeSet<DocId>> {
    Ok(engine.search("Profile", query)?.ids().into_iter().collect())
}

#[test]
fn test_operators_match_set_operations() -> Result<()> {
    let engine = engine()?;
    let terms = ["ohn", "obs", "ith", "mbe", "zzz"];

    for a in terms {
        for b in terms {
            let left = ids(&engine, &term(a))?;
            let right = ids(&engine, &term(b))?;

            let and = ids(&engine, &Query::and([term(a), term(b)]))?;
            assert_eq!(and, &left & &right, "AND({a}, {b})");

            let or = ids(&engine, &Query::or([term(a), term(b)]))?;
            assert_eq!(or, &left | &right, "OR({a}, {b})");

            let xor = ids(&engine, &Query::xor([term(a), term(b)]))?;
            assert_eq!(xor, &left ^ &right, "XOR({a}, {b})");
        }
    }
    Ok(())
}

#[test]
fn test_idempotence_and_self_cancellation() -> Result<()> {
    let engine = engine()?;
    let a = ids(&engine, &term("ohn"))?;
    assert!(!a.is_empty());

    assert_eq!(ids(&engine, &Query::and([term("ohn"), term("ohn")]))?, a);
    assert_eq!(ids(&engine, &Query::or([term("ohn"), term("ohn")]))?, a);
    assert!(ids(&engine, &Query::xor([term("ohn"), term("ohn")]))?.is_empty());
    Ok(())
}

#[test]
fn test_commutativity() -> Result<()> {
    let engine = engine()?;
    for op in [Operator::And, Operator::Or, Operator::Xor] {
        let ab = ids(&engine, &Query::boolean(op, [term("ohn"), term("ith")]))?;
        let ba = ids(&engine, &Query::boolean(op, [term("ith"), term("ohn")]))?;
        assert_eq!(ab, ba, "{op}");
    }
    Ok(())
}

#[test]
fn test_xor_folds_left_to_right() -> Result<()> {
    let engine = engine()?;
    let a = ids(&engine, &term("ohn"))?;
    let b = ids(&engine, &term("obs"))?;
    let c = ids(&engine, &term("mbe"))?;

    let folded = &(&a ^ &b) ^ &c;
    let query = Query::xor([term("ohn"), term("obs"), term("mbe")]);
    assert_eq!(ids(&engine, &query)?, folded);
    // "john jobs" is in a and b, "john timber" in a and c
    assert!(!folded.contains(&2));
    assert!(!folded.contains(&7));
    assert!(folded.contains(&0));
    Ok(())
}

#[test]
fn test_nested_trees() -> Result<()> {
    let engine = engine()?;
    let query = Query::and([
        term("ohn"),
        Query::or([term("obs"), term("mbe")]),
    ]);
    assert_eq!(ids(&engine, &query)?, BTreeSet::from([2, 7]));

    let query = Query::or([
        Query::and([term("ohn"), term("ith")]),
        Query::xor([term("rob"), term("ith")]),
    ]);
    assert_eq!(ids(&engine, &query)?, BTreeSet::from([0]));
    Ok(())
}

#[test]
fn test_ranges_concatenate_in_operand_order() -> Result<()> {
    let engine = engine()?;
    let query = Query::or([term("obs"), term("ohn"), term("job")]);
    let results = engine.search("Profile", &query)?;

    // "john jobs": obs@6, ohn@1, job@5
    assert_eq!(
        results.get(2),
        Some(&[MatchRange::new(6, 9), MatchRange::new(1, 4), MatchRange::new(5, 8)][..])
    );
    // "bob jobs" has no "ohn"
    assert_eq!(
        results.get(1),
        Some(&[MatchRange::new(5, 8), MatchRange::new(4, 7)][..])
    );
    Ok(())
}

#[test]
fn test_and_keeps_ranges_of_every_operand() -> Result<()> {
    let engine = engine()?;
    let query = Query::and([term("john"), term("jobs")]);
    let results = engine.search("Profile", &query)?;

    assert_eq!(results.ids(), vec![2]);
    // "john" -> joh@0, ohn@1; "jobs" -> job@5, obs@6
    assert_eq!(
        results.get(2),
        Some(
            &[
                MatchRange::new(0, 3),
                MatchRange::new(1, 4),
                MatchRange::new(5, 8),
                MatchRange::new(6, 9)
            ][..]
        )
    );
    Ok(())
}

#[test]
fn test_empty_combinators() -> Result<()> {
    let engine = engine()?;
    for op in [Operator::And, Operator::Or, Operator::Xor] {
        let query = Query::boolean(op, Vec::new());
        assert!(engine.search("Profile", &query)?.is_empty());
    }
    Ok(())
}

#[test]
fn test_errors_surface_behind_empty_and() -> Result<()> {
    let engine = engine()?;
    let query = Query::and([term("zzz"), Query::term("missing", "x")]);
    assert!(matches!(
        engine.search("Profile", &query),
        Err(TridexError::UnknownField { .. })
    ));
    Ok(())
}

#[test]
fn test_query_json_round_trip() -> Result<()> {
    let engine = engine()?;
    let query = Query::and([term("ohn"), Query::xor([term("ith"), term("mbe")])]);

    let json = serde_json::to_string(&query)?;
    let parsed: Query = serde_json::from_str(&json)?;
    assert_eq!(parsed.to_string(), query.to_string());
    assert_eq!(ids(&engine, &parsed)?, ids(&engine, &query)?);
    Ok(())
}
