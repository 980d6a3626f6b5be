//! Unit tests for the resolver

use super::*;

use bohr_core::error::BohrError;
use bohr_core::ConfigValue;
use camino::Utf8PathBuf;
use serde_json::json;
use tempfile::TempDir;

fn map(value: serde_json::Value) -> Mapping {
    match ConfigValue::from(value) {
        ConfigValue::Mapping(map) => map,
        other => panic!("expected a mapping, got {}", other.kind()),
    }
}

/// Write `content` to `name` inside a fresh temporary directory
fn write_config(name: &str, content: &str) -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let path = temp_path.join(name);
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_precedence_seed_file_env_cli() {
    let seed = map(json!({ "server": { "port": 8080, "staticPath": "public/" } }));
    let (_dir, file) = write_config("server.json", r#"{ "server": { "port": 9090 } }"#);

    let config = Resolver::with_seed(&seed)
        .merge_file(&file)
        .unwrap()
        .with_prefix("APP")
        .merge_environment(vars(&[("APP_SERVER_PORT", "7070")]))
        .with_prefix("")
        .merge_command_line(["--server.port=6060"])
        .build();

    assert_eq!(config.require_integer("server.port").unwrap(), 6060);
    assert_eq!(config.require_str("server.staticPath").unwrap(), "public/");
}

#[test]
fn test_each_layer_overrides_the_previous() {
    let seed = map(json!({ "server": { "port": 8080 } }));
    let (_dir, file) = write_config("server.json", r#"{ "server": { "port": 9090 } }"#);

    let after_file = Resolver::with_seed(&seed).merge_file(&file).unwrap();
    assert_eq!(after_file.clone().build().require_integer("server.port").unwrap(), 9090);

    let after_env = after_file
        .with_prefix("APP")
        .merge_environment(vars(&[("APP_SERVER_PORT", "7070")]));
    assert_eq!(after_env.clone().build().require_integer("server.port").unwrap(), 7070);
}

#[test]
fn test_seed_is_deep_copied() {
    let seed = map(json!({ "server": { "port": 8080 } }));
    let config = Resolver::with_seed(&seed)
        .merge_command_line(["--server.port=1"])
        .build();

    assert_eq!(config.require_integer("server.port").unwrap(), 1);
    assert_eq!(seed, map(json!({ "server": { "port": 8080 } })));
}

#[test]
fn test_environment_prefix_filter() {
    let config = Resolver::new()
        .with_prefix("APP")
        .merge_environment(vars(&[
            ("APP_SERVER_PORT", "7070"),
            ("OTHER_PORT", "1234"),
            ("PATH", "/usr/bin"),
        ]))
        .build();

    assert_eq!(config.as_mapping(), &map(json!({ "server": { "port": 7070 } })));
    let rendered = config.to_json_string().unwrap();
    assert!(!rendered.contains("1234"));
    assert!(!rendered.contains("other"));
}

#[test]
fn test_environment_prefix_is_case_insensitive() {
    let config = Resolver::new()
        .with_prefix("browser")
        .merge_environment(vars(&[("BROWSER_APIURL", "http://api"), ("browser_lower", "x")]))
        .build();

    assert_eq!(config.as_mapping(), &map(json!({ "apiurl": "http://api" })));
}

#[test]
fn test_environment_values_are_coerced() {
    let config = Resolver::new()
        .with_prefix("APP")
        .merge_environment(vars(&[
            ("APP_FEATURE_ENABLED", "true"),
            ("APP_RETRIES", "3"),
            ("APP_NAME", "demo"),
            ("APP_EMPTY", ""),
        ]))
        .build();

    assert_eq!(config.get_bool("feature.enabled").unwrap(), Some(true));
    assert_eq!(config.require_integer("retries").unwrap(), 3);
    assert_eq!(config.require_str("name").unwrap(), "demo");
    assert_eq!(config.get("empty"), Some(&ConfigValue::Null));
}

#[test]
fn test_environment_order_is_deterministic() {
    let forward = vars(&[("APP_A", "1"), ("APP_A_B", "2")]);
    let mut backward = forward.clone();
    backward.reverse();

    let a = Resolver::new().with_prefix("APP").merge_environment(forward).build();
    let b = Resolver::new().with_prefix("APP").merge_environment(backward).build();
    assert_eq!(a, b);
    assert_eq!(a.as_mapping(), &map(json!({ "a": { "b": 2 } })));
}

#[test]
fn test_command_line_prefix_is_case_sensitive() {
    let config = Resolver::new()
        .with_prefix("browser")
        .merge_command_line(["--browser.apiUrl=http://api", "--BROWSER.other=1"])
        .build();

    assert_eq!(config.as_mapping(), &map(json!({ "apiUrl": "http://api" })));
}

#[test]
fn test_command_line_ignores_other_arguments() {
    let config = Resolver::new()
        .with_prefix("server")
        .merge_command_line(["bohr", "serve", "-v", "--verbose", "--server.port=6060", "server.port=1"])
        .build();

    assert_eq!(config.as_mapping(), &map(json!({ "port": 6060 })));
}

#[test]
fn test_command_line_flag_without_value_is_null() {
    let resolver = Resolver::new().merge_command_line(["--server.debug"]);

    assert_eq!(
        resolver.warnings(),
        &[MalformedInput::MissingValue { flag: "--server.debug".to_string() }]
    );
    let config = resolver.build();
    assert!(config.contains("server.debug"));
    assert_eq!(config.get("server.debug"), Some(&ConfigValue::Null));
}

#[test]
fn test_command_line_splits_on_first_equals() {
    let config = Resolver::new()
        .merge_command_line(["--proxy.query=a=b&c=d"])
        .build();

    assert_eq!(config.require_str("proxy.query").unwrap(), "a=b&c=d");
}

#[test]
fn test_command_line_keeps_camel_case() {
    let config = Resolver::new()
        .merge_command_line(["--server.indexHtmlFile=app.html"])
        .build();

    assert_eq!(config.require_str("server.indexHtmlFile").unwrap(), "app.html");
}

#[test]
fn test_degenerate_names_are_skipped_with_warning() {
    let resolver = Resolver::new()
        .merge_command_line(["--=5", "--..=1", "--a..b=2"])
        .with_prefix("APP")
        .merge_environment(vars(&[("APP_", "1"), ("APP", "2")]));

    assert_eq!(resolver.warnings().len(), 5);
    assert!(matches!(
        resolver.warnings()[2],
        MalformedInput::EmptySegments { origin: InputOrigin::CommandLine, .. }
    ));
    assert_eq!(resolver.build().as_mapping(), &map(json!({ "a": { "b": 2 } })));
}

#[test]
fn test_prefix_must_end_at_a_separator() {
    let config = Resolver::new()
        .with_prefix("browser")
        .merge_environment(vars(&[("BROWSERSLIST_ENV", "production"), ("BROWSER_API", "x")]))
        .merge_command_line(["--browserify=1", "--browser.title=demo"])
        .build();

    assert_eq!(config.as_mapping(), &map(json!({ "api": "x", "title": "demo" })));
}

#[test]
fn test_blank_names_are_skipped_with_warning() {
    let resolver = Resolver::new().merge_command_line(["--  =1", "--server. .port=2"]);

    assert_eq!(
        resolver.warnings()[0],
        MalformedInput::EmptyName {
            origin: InputOrigin::CommandLine,
            input: "--  ".to_string(),
        }
    );
    assert!(matches!(resolver.warnings()[1], MalformedInput::EmptySegments { .. }));
    assert_eq!(resolver.build().as_mapping(), &map(json!({ "server": { "port": 2 } })));
}

#[test]
fn test_prefix_is_not_retroactive() {
    let config = Resolver::new()
        .merge_command_line(["--server.port=1"])
        .with_prefix("browser")
        .merge_command_line(["--server.port=2", "--browser.title=demo"])
        .build();

    assert_eq!(config.require_integer("server.port").unwrap(), 1);
    assert_eq!(config.require_str("title").unwrap(), "demo");
}

#[test]
fn test_scalar_override_replaces_subtree() {
    let seed = map(json!({ "server": { "proxies": [{ "route": "/api" }] } }));
    let config = Resolver::with_seed(&seed)
        .merge_command_line(["--server.proxies=none"])
        .build();

    assert_eq!(config.require_str("server.proxies").unwrap(), "none");
}

#[test]
fn test_strict_coercion() {
    let config = Resolver::new()
        .with_coercion(CoercionMode::Strict)
        .merge_command_line(["--start=08:00", "--port=8080"])
        .build();

    assert_eq!(config.require_str("start").unwrap(), "08:00");
    assert_eq!(config.require_integer("port").unwrap(), 8080);
}

#[test]
fn test_merge_file_errors_propagate() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let err = Resolver::new().merge_file(temp_path.join("missing.json")).unwrap_err();
    assert!(matches!(err, BohrError::ConfigRead { .. }));

    let (_dir, broken) = write_config("broken.json", "{ \"server\": ");
    let err = Resolver::new().merge_file(&broken).unwrap_err();
    assert!(matches!(err, BohrError::ConfigParse { .. }));
}

#[test]
fn test_merge_optional_file() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let config = Resolver::new()
        .merge_optional_file(temp_path.join("absent.json"))
        .unwrap()
        .build();
    assert!(config.is_empty());

    let (_dir, broken) = write_config("broken.json", "not json");
    assert!(Resolver::new().merge_optional_file(&broken).is_err());
}

#[test]
fn test_merging_same_source_twice() {
    let (_dir, file) = write_config(
        "server.json",
        r#"{ "server": { "port": 9090, "proxies": [{ "route": "/api" }] } }"#,
    );

    let once = Resolver::new().merge_file(&file).unwrap().build();
    let twice = Resolver::new()
        .merge_file(&file)
        .unwrap()
        .merge_file(&file)
        .unwrap()
        .build();
    assert_eq!(once, twice);

    let args = ["--server.port=1", "--server.cors=true"];
    let once = Resolver::new().merge_command_line(args).build();
    let twice = Resolver::new().merge_command_line(args).merge_command_line(args).build();
    assert_eq!(once, twice);
}

#[test]
fn test_resolve_pipeline() {
    let (_dir, file) = write_config("browser.json", r#"{ "apiUrl": "http://file", "title": "Bohr" }"#);

    let config = Resolver::resolve(vec![
        Source::Seed(map(json!({ "title": "default", "debug": false }))),
        Source::Environment {
            prefix: "browser".to_string(),
            vars: vars(&[("BROWSER_DEBUG", "true")]),
        },
        Source::File(file),
        Source::CommandLine {
            prefix: "browser".to_string(),
            args: vec!["--browser.apiUrl=http://cli".to_string()],
        },
    ])
    .unwrap();

    assert_eq!(
        config.as_mapping(),
        &map(json!({ "title": "Bohr", "debug": true, "apiUrl": "http://cli" }))
    );
}

#[test]
fn test_resolve_pipeline_stops_on_error() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let result = Resolver::resolve(vec![
        Source::Seed(map(json!({ "a": 1 }))),
        Source::File(temp_path.join("missing.json")),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_env_name_to_fqn() {
    assert_eq!(env_name_to_fqn("APP_SERVER_PORT", "app"), Some("server.port".to_string()));
    assert_eq!(env_name_to_fqn("APP_SERVER_PORT", ""), Some("app.server.port".to_string()));
    assert_eq!(env_name_to_fqn("OTHER_PORT", "APP"), None);
    assert_eq!(env_name_to_fqn("BROWSERSLIST_ENV", "browser"), None);
    assert_eq!(env_name_to_fqn("BROWSER", "browser"), Some(String::new()));
}

#[test]
fn test_parse_flag() {
    assert_eq!(parse_flag("--server.port=6060", ""), Some(("server.port", Some("6060"))));
    assert_eq!(parse_flag("--server.debug", ""), Some(("server.debug", None)));
    assert_eq!(parse_flag("--browser.api=x", "browser"), Some(("api", Some("x"))));
    assert_eq!(parse_flag("-v", ""), None);
    assert_eq!(parse_flag("--other.api=x", "browser"), None);
    assert_eq!(parse_flag("--browserify=1", "browser"), None);
    assert_eq!(parse_flag("--browser=1", "browser"), Some(("", Some("1"))));
}
