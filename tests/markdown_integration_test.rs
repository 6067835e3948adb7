use mdpost::parser::{MarkdownFileParser, MetadataWarning, StructuralError, Validator};
use std::path::PathBuf;

#[test]
fn test_parse_sample_api() {
    let path = PathBuf::from("tests/fixtures/sample-api.md");
    let parsed = MarkdownFileParser::parse_file(&path).unwrap();

    assert!(parsed.is_valid());
    assert!(parsed.warnings.is_empty());

    let document = &parsed.document;
    assert_eq!(document.request_count(), 6);
    assert_eq!(document.folder_count(), 3);

    // 根目录为空，三个命名目录
    assert!(document.folders[0].is_root());
    assert!(document.folders[0].requests.is_empty());

    let auth = &document.folders[2];
    assert_eq!(auth.name.as_deref(), Some("Authentication"));
    let login = &auth.requests[0];
    assert_eq!(login.name, "Login");
    assert_eq!(
        login.metadata.save_response_variable.as_deref(),
        Some("auth_token")
    );
    assert!(login.command.as_deref().unwrap().starts_with("curl -X POST"));
}

#[test]
fn test_parse_sample_metadata() {
    let parsed = MarkdownFileParser::parse_file("tests/fixtures/sample-api.md").unwrap();
    let requests: Vec<_> = parsed.document.requests().map(|(_, r)| r).collect();

    let update = requests
        .iter()
        .find(|r| r.name == "Update User Email")
        .unwrap();
    assert_eq!(update.metadata.requires, vec!["auth_token", "user_id"]);
    assert_eq!(update.metadata.description.as_deref(), Some("Form-encoded update"));

    let delete = requests.iter().find(|r| r.name == "Delete User").unwrap();
    assert!(delete.metadata.description.is_none());
    let command = delete.command.as_deref().unwrap();
    assert!(command.starts_with("curl -X DELETE"));
    assert!(!command.contains("rm -rf"));
}

#[test]
fn test_validate_sample_api() {
    let content = std::fs::read_to_string("tests/fixtures/sample-api.md").unwrap();
    let report = Validator::validate(&content);

    assert!(report.is_valid);
    assert_eq!(report.requests.len(), 6);
    assert_eq!(
        report.folder_names(),
        vec!["Sample API", "Authentication", "User Operations"]
    );

    // 只有 Delete User 缺少描述
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "missing-description");
    assert_eq!(
        report.warnings[0].location.request.as_deref(),
        Some("Delete User")
    );
}

#[test]
fn test_parse_invalid_document() {
    let parsed = MarkdownFileParser::parse_file("tests/fixtures/invalid.md").unwrap();

    let errors: Vec<_> = parsed.errors.iter().map(|e| e.item.clone()).collect();
    assert_eq!(
        errors,
        vec![
            StructuralError::MissingName,
            StructuralError::MissingCommand,
            StructuralError::DuplicateCommand,
            StructuralError::UnterminatedCodeBlock,
        ]
    );

    assert_eq!(parsed.errors[0].location.index, Some(1));
    assert_eq!(parsed.errors[0].location.request, None);
    assert_eq!(parsed.errors[1].location.request.as_deref(), Some("No Command"));

    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(
        parsed.warnings[0].item,
        MetadataWarning::UnrecognizedField("Priority".to_string())
    );
}

#[test]
fn test_validate_invalid_document() {
    let content = std::fs::read_to_string("tests/fixtures/invalid.md").unwrap();
    let report = Validator::validate(&content);

    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 4);
    assert!(report.errors.iter().all(|e| e.location.folder.as_deref() == Some("Broken")));

    let unterminated = report
        .requests
        .iter()
        .find(|r| r.name == "Unterminated")
        .unwrap();
    assert!(!unterminated.has_command);
}

#[test]
fn test_parse_missing_file() {
    assert!(MarkdownFileParser::parse_file("tests/fixtures/does-not-exist.md").is_err());
}
