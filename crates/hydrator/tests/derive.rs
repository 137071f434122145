use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hydrator::CastErrorKind;
use hydrator::prelude::*;

#[derive(Debug, Default, Hydratable)]
struct Registration {
    email: String,
    age: Option<i64>,
    #[hydratable(rename = "type")]
    kind: String,
    score: f64,
    newsletter: bool,
    tags: Vec<String>,
    born: Option<DateTime<Utc>>,
    rank: u8,
    r#ref: String,
    #[hydratable(skip)]
    #[allow(dead_code)]
    internal: u32,
}

fn class() -> &'static str {
    std::any::type_name::<Registration>()
}

fn annotations() -> AnnotationMap {
    AnnotationMap::new()
        .with(class(), "email", FromDirective::sources(["body"]))
        .with(class(), "age", FromDirective::sources(["query", "body"]))
        .with(class(), "age", CastDirective::int().option("min", 18))
        .with(class(), "type", FromDirective::sources(["body"]).field("account_type"))
        .with(class(), "score", FromDirective::sources(["body"]))
        .with(class(), "score", CastDirective::float().option("precision", 1))
        .with(class(), "newsletter", FromDirective::sources(["body"]))
        .with(class(), "newsletter", CastDirective::bool())
        .with(
            class(),
            "tags",
            FromDirective::sources(["query"]).array_styles(["basic", "csv"]),
        )
        .with(class(), "tags", CastDirective::array().of(CastDirective::string()))
        .with(class(), "born", FromDirective::sources(["body"]))
        .with(class(), "born", CastDirective::datetime())
        .with(class(), "rank", FromDirective::sources(["body"]))
        .with(class(), "rank", CastDirective::int())
        .with(class(), "ref", FromDirective::sources(["query"]))
}

fn sources() -> SourceRegistry {
    let mut sources = SourceRegistry::new();
    sources
        .add(
            "query",
            Source::keyed([("age", "17"), ("tags", "rust,cli"), ("ref", "newsletter")]),
        )
        .unwrap()
        .add(
            "body",
            Source::keyed([
                ("email", Value::from("a@example.com")),
                ("age", Value::from("21")),
                ("account_type", Value::from("admin")),
                ("score", Value::from("9.46")),
                ("newsletter", Value::from("on")),
                ("born", Value::Int(0)),
                ("rank", Value::Int(3)),
            ]),
        )
        .unwrap();
    sources
}

#[test]
fn derived_fields_follow_declaration_order() {
    let registration = Registration::default();
    assert_eq!(
        registration.field_names(),
        vec![
            "email",
            "age",
            "type",
            "score",
            "newsletter",
            "tags",
            "born",
            "rank",
            "ref"
        ]
    );
    assert!(registration.class_name().ends_with("Registration"));
    assert!(!registration.is_anonymous());
}

#[test]
fn derived_struct_is_hydrated() {
    let hydrator = Hydrator::new(HydratorConfig::default()).with_annotation_reader(annotations());
    let mut registration = Registration::default();

    let failures = hydrator
        .hydrate(&mut registration, &sources(), None)
        .unwrap();

    // The query's "17" is below the minimum; the body's "21" is used instead.
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert_eq!(failures[0].source(), "query");
    assert_eq!(registration.email, "a@example.com");
    assert_eq!(registration.age, Some(21));
    assert_eq!(registration.kind, "admin");
    assert!((registration.score - 9.5).abs() < f64::EPSILON);
    assert!(registration.newsletter);
    assert_eq!(registration.tags, vec!["rust", "cli"]);
    assert_eq!(registration.born, Utc.timestamp_opt(0, 0).single());
    assert_eq!(registration.rank, 3);
    assert_eq!(registration.r#ref, "newsletter");
}

#[test]
fn rejected_value_keeps_earlier_source() {
    let hydrator = Hydrator::default().with_annotation_reader(annotations());
    let mut sources = sources();
    sources.remove("body").unwrap();
    sources
        .add("body", Source::keyed([("age", "seventeen")]))
        .unwrap();

    let mut registration = Registration::default();
    let failures = hydrator
        .hydrate(&mut registration, &sources, None)
        .unwrap();

    // "17" from the query is below the minimum, "seventeen" is not a number.
    assert_eq!(registration.age, None);
    let kinds: Vec<_> = failures
        .for_field("age")
        .map(|failure| (failure.source().to_string(), failure.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("query".to_string(), Some(CastErrorKind::DecimalOutOfRange)),
            ("body".to_string(), Some(CastErrorKind::DecimalFormatRejected)),
        ]
    );
}

#[test]
fn value_that_does_not_fit_the_field_is_recorded() {
    let hydrator = Hydrator::default().with_annotation_reader(
        AnnotationMap::new()
            .with(class(), "age", FromDirective::sources(["body"]))
            .with(class(), "age", CastDirective::int())
            .with(class(), "rank", FromDirective::sources(["query", "body"]))
            .with(class(), "rank", CastDirective::int())
            .with(class(), "email", FromDirective::sources(["body"]))
            .with(class(), "ref", FromDirective::sources(["query"])),
    );
    let mut sources = SourceRegistry::new();
    sources
        .add("query", Source::keyed([("rank", "7"), ("ref", "newsletter")]))
        .unwrap()
        .add(
            "body",
            Source::keyed([("age", "abc"), ("rank", "300"), ("email", "a@example.com")]),
        )
        .unwrap();

    let mut registration = Registration::default();
    let failures = hydrator
        .hydrate(&mut registration, &sources, None)
        .unwrap();

    // Fields after the rejected one are still written.
    assert_eq!(registration.email, "a@example.com");
    assert_eq!(registration.r#ref, "newsletter");
    assert_eq!(registration.rank, 0);
    assert_eq!(registration.age, None);

    assert_eq!(failures.len(), 2, "{failures:?}");
    let rank = failures.for_field("rank").next().unwrap();
    assert_eq!(rank.source(), "body");
    assert_eq!(rank.input_value(), &Value::Int(300));
    assert_eq!(rank.kind(), None);
    assert_eq!(rank.message(), hydrator::FIELD_TYPE_MISMATCH);
    assert_eq!(rank.rendered_message(), "Value does not fit field type u8: got int");
}

#[test]
fn derived_setter_rejects_unknown_and_skipped_fields() {
    let mut registration = Registration::default();
    for name in ["internal", "kind", "nope"] {
        let err = registration
            .set_field(name, Value::Int(1))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField { field, .. } if field == name));
    }
    registration.set_field("type", Value::from("guest")).unwrap();
    assert_eq!(registration.kind, "guest");
}

#[test]
fn cached_descriptor_is_reused_across_hydrators() {
    let backend = Arc::new(MemoryCache::new());

    let first = Hydrator::default()
        .with_cache(backend.clone())
        .with_annotation_reader(annotations());
    first
        .hydrate(&mut Registration::default(), &sources(), None)
        .unwrap();
    assert_eq!(backend.len(), 1);

    // No annotation reader: everything comes from the cache.
    let second = Hydrator::default().with_cache(backend);
    let mut registration = Registration::default();
    second
        .hydrate(&mut registration, &sources(), None)
        .unwrap();
    assert_eq!(registration.email, "a@example.com");
    assert_eq!(registration.tags, vec!["rust", "cli"]);
}

#[test]
fn cache_prefix_separates_hydrators() {
    let backend = Arc::new(MemoryCache::new());
    let first = Hydrator::new(HydratorConfig::new().cache_key_prefix("a:"))
        .with_cache(backend.clone())
        .with_annotation_reader(annotations());
    first
        .hydrate(&mut Registration::default(), &sources(), None)
        .unwrap();

    let second =
        Hydrator::new(HydratorConfig::new().cache_key_prefix("b:")).with_cache(backend.clone());
    let mut registration = Registration::default();
    second
        .hydrate(&mut registration, &sources(), None)
        .unwrap();

    assert_eq!(registration.email, "");
    assert_eq!(backend.len(), 2);
}
