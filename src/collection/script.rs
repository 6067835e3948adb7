use serde_json::Value;

pub const PREREQUEST: &str = "prerequest";
pub const TEST: &str = "test";

/// 响应取值规则，按顺序尝试，第一个命中的生效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// 顶层对象中存在该字段（值为 null 也算存在）
    Field(&'static str),
    /// 整个响应体
    WholeBody,
}

/// 保存响应变量时使用的取值顺序
pub const EXTRACTION_RULES: [ExtractionRule; 4] = [
    ExtractionRule::Field("token"),
    ExtractionRule::Field("access_token"),
    ExtractionRule::Field("id"),
    ExtractionRule::WholeBody,
];

impl ExtractionRule {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionRule::Field(field) => *field,
            ExtractionRule::WholeBody => "<body>",
        }
    }

    pub fn apply(&self, json: &Value) -> Option<Value> {
        match self {
            ExtractionRule::Field(field) => json.as_object()?.get(*field).cloned(),
            ExtractionRule::WholeBody => Some(json.clone()),
        }
    }

    /// 对应的 JS 条件；WholeBody 总是命中
    fn js_condition(&self) -> Option<String> {
        match self {
            ExtractionRule::Field(field) => Some(format!(
                "responseJson !== null && typeof responseJson === 'object' && Object.prototype.hasOwnProperty.call(responseJson, '{}')",
                field
            )),
            ExtractionRule::WholeBody => None,
        }
    }

    fn js_value(&self) -> String {
        match self {
            ExtractionRule::Field(field) => format!("responseJson['{}']", field),
            ExtractionRule::WholeBody => "responseJson".to_string(),
        }
    }
}

/// 与生成的测试脚本行为一致的取值器
pub struct ResponseExtractor;

impl ResponseExtractor {
    /// 从响应文本得到要保存的字符串
    ///
    /// 非 JSON 响应保存原文；字符串原样保存，其它值序列化为紧凑 JSON。
    pub fn extract(body: &str) -> String {
        let json = match serde_json::from_str::<Value>(body) {
            Ok(json) => json,
            Err(_) => return body.to_string(),
        };

        EXTRACTION_RULES
            .iter()
            .find_map(|rule| rule.apply(&json))
            .map(|value| Self::stringify(&value))
            .unwrap_or_else(|| body.to_string())
    }

    fn stringify(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// 检查必需变量，返回第一个缺失变量对应的错误消息
pub fn check_requirements<F>(requires: &[String], is_set: F) -> Result<(), String>
where
    F: Fn(&str) -> bool,
{
    match requires.iter().find(|name| !is_set(name)) {
        Some(name) => Err(missing_variable_message(name)),
        None => Ok(()),
    }
}

fn missing_variable_message(name: &str) -> String {
    format!("Required variable {} is not set", name)
}

/// 生成前置脚本：按顺序检查每个必需变量
pub fn prerequest_script(requires: &[String]) -> Vec<String> {
    let mut exec = vec!["// Check required variables".to_string()];
    for name in requires {
        exec.push(format!("if (!pm.environment.get('{}')) {{", name));
        exec.push(format!(
            "    throw new Error('{}');",
            missing_variable_message(name)
        ));
        exec.push("}".to_string());
    }
    exec
}

/// 生成测试脚本：按 EXTRACTION_RULES 取值后写入环境变量
pub fn test_script(variable: &str) -> Vec<String> {
    let mut exec = vec![
        "// Save response data to variable".to_string(),
        "let saved;".to_string(),
        "try {".to_string(),
        "    const responseJson = pm.response.json();".to_string(),
    ];

    for (i, rule) in EXTRACTION_RULES.iter().enumerate() {
        let opener = match (i, rule.js_condition()) {
            (0, Some(cond)) => format!("    if ({}) {{", cond),
            (_, Some(cond)) => format!("    }} else if ({}) {{", cond),
            (0, None) => "    {".to_string(),
            (_, None) => "    } else {".to_string(),
        };
        exec.push(opener);
        exec.push(format!("        saved = {};", rule.js_value()));
    }

    exec.extend(
        [
            "    }",
            "    if (typeof saved !== 'string') {",
            "        saved = JSON.stringify(saved);",
            "    }",
            "} catch (e) {",
            "    saved = pm.response.text();",
            "}",
        ]
        .into_iter()
        .map(str::to_string),
    );
    exec.push(format!("pm.environment.set('{}', saved);", variable));
    exec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_first() {
        assert_eq!(ResponseExtractor::extract(r#"{"token":"abc123"}"#), "abc123");
        assert_eq!(
            ResponseExtractor::extract(r#"{"id": 7, "access_token": "t", "token": "x"}"#),
            "x"
        );
    }

    #[test]
    fn test_extract_order() {
        assert_eq!(
            ResponseExtractor::extract(r#"{"id": 7, "access_token": "tok"}"#),
            "tok"
        );
        assert_eq!(ResponseExtractor::extract(r#"{"id": 7, "name": "a"}"#), "7");

        let names: Vec<_> = EXTRACTION_RULES.iter().map(ExtractionRule::name).collect();
        assert_eq!(names, vec!["token", "access_token", "id", "<body>"]);
    }

    #[test]
    fn test_extract_whole_body() {
        assert_eq!(
            ResponseExtractor::extract(r#"{"name": "a", "n": 1}"#),
            r#"{"name":"a","n":1}"#
        );
        assert_eq!(ResponseExtractor::extract("[1,2]"), "[1,2]");
        assert_eq!(ResponseExtractor::extract("\"plain\""), "plain");
    }

    #[test]
    fn test_extract_non_json() {
        assert_eq!(ResponseExtractor::extract("OK"), "OK");
        assert_eq!(ResponseExtractor::extract(""), "");
    }

    #[test]
    fn test_extract_null_field_counts_as_present() {
        assert_eq!(ResponseExtractor::extract(r#"{"token": null, "id": 1}"#), "null");
    }

    #[test]
    fn test_check_requirements_names_first_missing() {
        let requires = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let result = check_requirements(&requires, |name| name == "a");
        assert_eq!(result, Err("Required variable b is not set".to_string()));
        assert!(check_requirements(&requires, |_| true).is_ok());
        assert!(check_requirements(&[], |_| false).is_ok());
    }

    #[test]
    fn test_prerequest_script_order() {
        let exec = prerequest_script(&["auth_token".to_string(), "user_id".to_string()]);
        let text = exec.join("\n");
        let first = text.find("pm.environment.get('auth_token')").unwrap();
        let second = text.find("pm.environment.get('user_id')").unwrap();
        assert!(first < second);
        assert!(text.contains("throw new Error('Required variable auth_token is not set');"));
    }

    #[test]
    fn test_test_script_shape() {
        let exec = test_script("auth_token");
        let text = exec.join("\n");
        let token = text.find("'token')").unwrap();
        let access = text.find("'access_token')").unwrap();
        let id = text.find("'id')").unwrap();
        assert!(token < access && access < id);
        assert!(text.contains("pm.response.json()"));
        assert!(text.contains("pm.response.text()"));
        assert!(text.contains("JSON.stringify(saved)"));
        assert_eq!(
            exec.last().map(String::as_str),
            Some("pm.environment.set('auth_token', saved);")
        );
        let opens = text.matches('{').count();
        let closes = text.matches('}').count();
        assert_eq!(opens, closes);
    }
}
