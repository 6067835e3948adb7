use mdpost::config::{ConfigLoader, DEFAULT_SUFFIX};
use mdpost::variable::{VariableDetector, VariableRegistry};
use mdpost::{ConvertOptions, convert};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_detector_is_deterministic() {
    let text = r#"curl -X POST "{{base_url}}/users/{{user_id}}" -H "Authorization: Bearer {{token}}" -d '{"id": "{{user_id}}", "raw": "{{{not}}}", "bad": "{{1x}}"}'"#;

    let first = VariableDetector::collect(text);
    let second = VariableDetector::collect(text);
    assert_eq!(first, second);
    assert_eq!(first, vec!["base_url", "user_id", "token"]);
}

#[test]
fn test_registry_dedupes_across_requests() {
    let mut registry = VariableRegistry::new();
    registry.scan("{{a}} {{b}}");
    registry.scan("{{b}} {{c}} {{a}}");
    assert_eq!(registry.into_names(), vec!["a", "b", "c"]);
}

#[test]
fn test_collection_variables_are_unique() {
    let document = r#"
## One
```curl
curl {{base_url}}/a -H "X-Key: {{api_key}}"
```
## Two
```curl
curl {{base_url}}/b -H "X-Key: {{api_key}}" -d '{{payload}}'
```
"#;
    let collection = convert(document, &ConvertOptions::default()).unwrap();
    let keys: Vec<_> = collection.variable.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(keys, vec!["base_url", "api_key", "payload"]);
}

#[test]
fn test_config_file_drives_options() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(
            br#"
[collection]
name = "Configured API"
description = "from mdpost.toml"

[output]
pretty = false
suffix = ".collection.json"
"#,
        )
        .unwrap();
    temp_file.flush().unwrap();

    let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
    let options = config.convert_options(None, Some("cli description"), None, None);
    assert_eq!(options.name, "Configured API");
    assert_eq!(options.description, "cli description");

    let collection = convert("## A\n```curl\ncurl https://x.io\n```\n", &options).unwrap();
    let json = collection.to_json(config.output.pretty).unwrap();
    assert!(!json.contains('\n'));
    assert_eq!(
        config.output_path(Path::new("api.md")),
        Path::new("api.collection.json")
    );
}

#[test]
fn test_default_config() {
    let config = mdpost::config::Config::default();
    assert!(config.output.pretty);
    assert_eq!(config.output.suffix, DEFAULT_SUFFIX);
    let options = config.convert_options(None, None, None, None);
    assert_eq!(options, ConvertOptions::default());
}
