//! Integration tests for typed env getters over fixture environments.

use foundation_config::{EnvKind, EnvParseError, EnvReader, EnvValue};
use foundation_ports::LogLevel;
use foundation_shared::{ErrorCode, ErrorEnvelope};
use foundation_testkit::MemoryLogger;
use foundation_testkit::fixtures::env_fixture;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture_reader() -> Result<(EnvReader<BTreeMap<String, String>>, MemoryLogger), Box<dyn Error>> {
    let env = env_fixture("env/foundation-env.valid.json")?;
    let logger = MemoryLogger::new();
    Ok((EnvReader::new(env, Arc::new(logger.clone())), logger))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

#[test]
fn scalar_getters_coerce_fixture_values() -> Result<(), Box<dyn Error>> {
    let (env, logger) = fixture_reader()?;

    assert_eq!(env.get_bool("APP_DEBUG", None)?, Some(true));
    assert_eq!(env.get_bool("APP_UNSET", None)?, None);
    assert_eq!(env.get_bool("APP_UNSET", Some(false))?, Some(false));
    assert_eq!(env.get_int("APP_WORKERS", Some(1))?, Some(8));
    assert_eq!(env.get_float("APP_RATIO", None)?, Some(0.75));
    assert_eq!(
        env.get_str("APP_NAME", None).as_deref(),
        Some("  padded name  ")
    );
    assert_eq!(env.get_str("APP_UNSET", Some("fallback")).as_deref(), Some("fallback"));
    assert!(logger.events().is_empty());
    Ok(())
}

#[test]
fn blank_bool_overrides_default_and_warns() -> Result<(), Box<dyn Error>> {
    let (env, logger) = fixture_reader()?;

    assert_eq!(env.get_bool("APP_FEATURE_FLAG", Some(true))?, None);

    let warnings = logger.events_at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings.first().map(|event| event.event.as_ref()), Some("env.blank_bool"));
    Ok(())
}

#[test]
fn blank_values_are_ordinary_for_other_getters() -> Result<(), Box<dyn Error>> {
    let (env, logger) = fixture_reader()?;

    let error = env
        .get_int("APP_FEATURE_FLAG", Some(3))
        .err()
        .ok_or_else(|| std::io::Error::other("blank int should fail"))?;
    assert_eq!(error.rule(), "integer");
    assert_eq!(env.get_str("APP_FEATURE_FLAG", Some("x")).as_deref(), Some(""));
    assert!(env.get_list("APP_FEATURE_FLAG", Some(strings(&["d"]))).is_empty());
    assert!(logger.events().is_empty());
    Ok(())
}

#[test]
fn malformed_scalars_report_field_value_and_rule() -> Result<(), Box<dyn Error>> {
    let (env, _) = fixture_reader()?;

    let bool_error = env
        .get_bool("APP_NAME", None)
        .err()
        .ok_or_else(|| std::io::Error::other("expected bool error"))?;
    assert_eq!(bool_error.field(), "APP_NAME");
    assert_eq!(bool_error.value(), Some("  padded name  "));
    assert_eq!(bool_error.rule(), "boolean");

    let float_error = env
        .get_float("APP_HOSTS", None)
        .err()
        .ok_or_else(|| std::io::Error::other("expected float error"))?;
    assert_eq!(float_error.rule(), "float");

    let envelope = ErrorEnvelope::from(float_error);
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_float"));
    assert_eq!(
        envelope.metadata.get("env_var").map(String::as_str),
        Some("APP_HOSTS")
    );
    assert_eq!(envelope.metadata.get("value").map(String::as_str), Some("a, b ,c"));
    Ok(())
}

#[test]
fn paths_expand_variables_and_home() -> Result<(), Box<dyn Error>> {
    let (env, _) = fixture_reader()?;

    assert_eq!(
        env.get_path("APP_DATA", None),
        Some(PathBuf::from("/srv/app/data"))
    );
    assert_eq!(
        env.get_path("APP_CACHE", None),
        Some(PathBuf::from("/home/tester/.cache/app"))
    );
    assert_eq!(
        env.get_path("APP_UNSET", Some(Path::new("~/raw"))),
        Some(PathBuf::from("~/raw"))
    );
    assert_eq!(env.get_path("APP_UNSET", None), None);
    Ok(())
}

#[test]
fn collections_trim_and_drop_empty_pieces() -> Result<(), Box<dyn Error>> {
    let (env, _) = fixture_reader()?;

    assert_eq!(env.get_list("APP_HOSTS", None), strings(&["a", "b", "c"]));
    assert_eq!(env.get_list("APP_ITEMS", None), strings(&["x", "y", "z"]));
    assert_eq!(env.get_list("APP_TAGS", None), strings(&["a", "b", "a"]));
    assert_eq!(
        env.get_tuple("APP_HOSTS", None),
        strings(&["a", "b", "c"]).into_boxed_slice()
    );

    let tags = env.get_set("APP_TAGS", None);
    assert_eq!(tags, ["a", "b"].into_iter().map(String::from).collect::<BTreeSet<_>>());

    assert!(env.get_list("APP_UNSET", None).is_empty());
    assert_eq!(
        env.get_list("APP_UNSET", Some(strings(&["d"]))),
        strings(&["d"])
    );
    assert_eq!(
        env.get_list_with("APP_DATA", None, '/'),
        strings(&["${APP_ROOT}", "data"])
    );
    Ok(())
}

#[test]
fn dict_fallback_skips_malformed_pairs_with_warning() -> Result<(), Box<dyn Error>> {
    let (env, logger) = fixture_reader()?;

    let clean = env.get_dict("APP_LABELS", None);
    assert_eq!(clean.get("k1").map(String::as_str), Some("v1"));
    assert_eq!(clean.get("k2").map(String::as_str), Some("v2"));
    assert!(logger.events().is_empty());

    let strict = env.get_dict_strict("APP_BROKEN_LABELS", None);
    assert!(matches!(
        strict,
        Err(EnvParseError::InvalidDict { ref entry, .. }) if entry == "badpair"
    ));

    let lenient = env.get_dict("APP_BROKEN_LABELS", None);
    assert_eq!(lenient.len(), 2);
    assert_eq!(lenient.get("k2").map(String::as_str), Some("v2"));

    let warnings = logger.events_named("env.dict_fallback");
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings.first().and_then(|event| event.field("preview")),
        Some(&serde_json::Value::from("k1=v1,badpair,k2=v2"))
    );
    Ok(())
}

#[test]
fn require_dispatches_on_kind() -> Result<(), Box<dyn Error>> {
    let (env, _) = fixture_reader()?;

    assert_eq!(env.require("APP_WORKERS", Some(EnvKind::Int))?.as_int(), Some(8));
    assert_eq!(env.require("APP_DEBUG", Some(EnvKind::Bool))?.as_bool(), Some(true));
    assert_eq!(
        env.require("APP_DATA", Some(EnvKind::Path))?,
        EnvValue::Path(PathBuf::from("/srv/app/data"))
    );
    assert_eq!(
        env.require("APP_ITEMS", Some(EnvKind::ListOf))?.as_items(),
        Some(strings(&["x", "y", "z"]).as_slice())
    );
    assert_eq!(
        env.require("APP_TAGS", Some(EnvKind::SetOf))?
            .as_set()
            .map(BTreeSet::len),
        Some(2)
    );
    assert_eq!(
        env.require("APP_LABELS", Some(EnvKind::DictOf))?
            .as_dict()
            .map(BTreeMap::len),
        Some(2)
    );
    assert_eq!(env.require("APP_RATIO", None)?.as_str(), Some("0.75"));

    let missing = env
        .require("APP_UNSET", Some(EnvKind::Int))
        .err()
        .ok_or_else(|| std::io::Error::other("expected missing error"))?;
    assert_eq!(missing.rule(), "required");
    assert_eq!(missing.value(), None);
    assert_eq!(
        ErrorEnvelope::from(missing).code,
        ErrorCode::new("config", "missing_env_var")
    );
    Ok(())
}

#[test]
fn require_propagates_parse_failures() -> Result<(), Box<dyn Error>> {
    let (env, _) = fixture_reader()?;

    let error = env
        .require("APP_NAME", Some(EnvKind::Float))
        .err()
        .ok_or_else(|| std::io::Error::other("expected float error"))?;
    assert_eq!(error.rule(), "float");
    Ok(())
}
