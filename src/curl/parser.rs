use crate::curl::tokenizer::{normalize_continuations, tokenize};
use crate::curl::types::{CommandBody, CommandParseError, HttpMethod, ParsedCommand};
use tracing::debug;

const METHOD_FLAGS: &[&str] = &["-X", "--request"];
const HEADER_FLAGS: &[&str] = &["-H", "--header"];
const DATA_FLAGS: &[&str] = &["-d", "--data", "--data-raw", "--data-binary"];
const JSON_FLAG: &str = "--json";

/// 不处理但需要跳过参数值的 cURL 选项
const FOREIGN_VALUE_FLAGS: &[&str] = &[
    "-u",
    "--user",
    "-o",
    "--output",
    "-A",
    "--user-agent",
    "-b",
    "--cookie",
    "-c",
    "--cookie-jar",
    "-e",
    "--referer",
    "-m",
    "--max-time",
    "--connect-timeout",
    "-F",
    "--form",
    "--form-string",
    "--data-urlencode",
    "--data-ascii",
    "--url-query",
    "-T",
    "--upload-file",
    "-w",
    "--write-out",
    "-x",
    "--proxy",
    "-U",
    "--proxy-user",
    "-D",
    "--dump-header",
    "-E",
    "--cert",
    "--cert-type",
    "--key",
    "--key-type",
    "--cacert",
    "--capath",
    "--pass",
    "-r",
    "--range",
    "--retry",
    "--retry-delay",
    "--retry-max-time",
    "--resolve",
    "--connect-to",
    "--max-redirs",
    "--max-filesize",
    "--limit-rate",
    "--interface",
    "--local-port",
    "--oauth2-bearer",
    "--request-target",
    "--unix-socket",
    "-K",
    "--config",
];

/// 已识别的选项
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flag {
    Method,
    Header,
    Data,
    Json,
}

impl Flag {
    fn lookup(name: &str) -> Option<Flag> {
        if METHOD_FLAGS.contains(&name) {
            Some(Flag::Method)
        } else if HEADER_FLAGS.contains(&name) {
            Some(Flag::Header)
        } else if DATA_FLAGS.contains(&name) {
            Some(Flag::Data)
        } else if name == JSON_FLAG {
            Some(Flag::Json)
        } else {
            None
        }
    }
}

/// cURL 命令解析器
pub struct CommandParser;

impl CommandParser {
    /// 解析一条 cURL 命令（可跨多行）
    pub fn parse(command: &str) -> Result<ParsedCommand, CommandParseError> {
        let normalized = normalize_continuations(command);
        let mut tokens = tokenize(&normalized)?;

        if tokens.first().map(|t| t == "curl").unwrap_or(false) {
            tokens.remove(0);
        }
        if tokens.is_empty() {
            return Err(CommandParseError::EmptyCommand);
        }

        let mut explicit_method: Option<HttpMethod> = None;
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut body: Option<String> = None;
        let mut is_json = false;
        let mut positionals: Vec<String> = Vec::new();

        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            if !Self::is_option(&token) {
                positionals.push(token);
                continue;
            }

            let (flag, value) = match Self::split_flag(&token) {
                Some((flag, inline)) => {
                    let value = match inline {
                        Some(v) => v,
                        None => match iter.peek() {
                            Some(next) if !Self::is_option(next) => iter.next().unwrap_or_default(),
                            _ => {
                                return Err(CommandParseError::MissingValue {
                                    flag: Self::flag_name(&token),
                                });
                            }
                        },
                    };
                    (flag, value)
                }
                None => {
                    // 未识别的选项：已知带值的跳过其参数，其他视为无值选项
                    let name = Self::flag_name(&token);
                    if !token.contains('=') && FOREIGN_VALUE_FLAGS.contains(&name.as_str()) {
                        iter.next();
                    }
                    debug!("ignoring unsupported flag {}", name);
                    continue;
                }
            };

            match flag {
                Flag::Method => explicit_method = Some(value.parse()?),
                Flag::Header => headers.push(Self::parse_header(&value)?),
                Flag::Data => {
                    body = Some(value);
                    is_json = false;
                }
                Flag::Json => {
                    body = Some(value);
                    is_json = true;
                }
            }
        }

        if is_json
            && !headers
                .iter()
                .any(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let raw_url = Self::select_url(&positionals)
            .ok_or(CommandParseError::MissingUrl)?
            .to_string();
        let (url, query) = split_query(&raw_url);

        let body = body.map(|payload| CommandBody::classify(&payload));
        let method = HttpMethod::resolve(explicit_method, body.is_some());

        let parsed = ParsedCommand {
            method,
            raw_url: strip_fragment(&raw_url).to_string(),
            url,
            headers,
            body,
            query,
        };
        debug!(
            "parsed command: {} {} ({} headers)",
            parsed.method,
            parsed.url,
            parsed.headers.len()
        );
        Ok(parsed)
    }

    /// 形如 `-X` / `--data` 的选项；`-1`、`-{...}` 这类以 '-' 开头的值不算
    fn is_option(token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some('-'), Some('-')) => token.len() > 2,
            (Some('-'), Some(c)) => c.is_ascii_alphabetic(),
            _ => false,
        }
    }

    /// 选项名（去掉 `=value` 部分）
    fn flag_name(token: &str) -> String {
        match token.split_once('=') {
            Some((name, _)) if token.starts_with("--") => name.to_string(),
            _ => token.to_string(),
        }
    }

    /// 识别选项，返回 (选项, 内联值)
    ///
    /// 支持 `--request=POST`、`-XPOST`、`-H'Accept: x'` 形式
    fn split_flag(token: &str) -> Option<(Flag, Option<String>)> {
        if let Some(flag) = Flag::lookup(token) {
            return Some((flag, None));
        }

        if token.starts_with("--") {
            let (name, value) = token.split_once('=')?;
            return Flag::lookup(name).map(|flag| (flag, Some(value.to_string())));
        }

        // 短选项与值相连：只对单字母的已识别选项生效
        let short = token.get(..2)?;
        let rest = token.get(2..)?;
        match Flag::lookup(short) {
            Some(flag) if !rest.is_empty() => Some((flag, Some(rest.to_string()))),
            _ => None,
        }
    }

    fn parse_header(value: &str) -> Result<(String, String), CommandParseError> {
        let (name, val) = value
            .split_once(':')
            .ok_or_else(|| CommandParseError::InvalidHeader(value.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandParseError::InvalidHeader(value.to_string()));
        }
        Ok((name.to_string(), val.trim().to_string()))
    }

    /// 选择目标 URL：最后一个带 scheme 或以占位符开头的位置参数，
    /// 其次是第一个像主机/路径的参数，最后取第一个
    fn select_url(positionals: &[String]) -> Option<&str> {
        positionals
            .iter()
            .rev()
            .find(|t| has_scheme(t) || t.starts_with("{{"))
            .or_else(|| positionals.iter().find(|t| looks_like_address(t)))
            .or_else(|| positionals.first())
            .map(String::as_str)
    }
}

fn has_scheme(token: &str) -> bool {
    match token.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// 不带 scheme 的地址：`api.example.com/x`、`localhost:8080`、`/health`
///
/// `k=v` 形式的文本和含空白的参数不算。
fn looks_like_address(token: &str) -> bool {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return false;
    }
    let host = token.split(['/', '?']).next().unwrap_or_default();
    if host.contains('=') {
        return false;
    }
    host.contains('.') || host.contains(':') || host == "localhost" || token.contains('/')
}

fn strip_fragment(url: &str) -> &str {
    // 占位符内不会出现 '#'，直接截断
    url.split_once('#').map(|(head, _)| head).unwrap_or(url)
}

/// 拆分 URL 和查询串；键值保持原样，不做百分号解码
pub fn split_query(raw_url: &str) -> (String, Vec<(String, String)>) {
    let url = strip_fragment(raw_url);
    let Some((base, query)) = url.split_once('?') else {
        return (url.to_string(), Vec::new());
    };

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();

    (base.to_string(), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_example() {
        let cmd = CommandParser::parse(
            r#"curl -X POST https://api.example.com/login -H "Content-Type: application/json" -d '{"username":"test"}'"#,
        )
        .unwrap();

        assert_eq!(cmd.method, HttpMethod::Post);
        assert_eq!(cmd.url, "https://api.example.com/login");
        assert_eq!(
            cmd.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        match cmd.body {
            Some(CommandBody::Json(ref value)) => assert_eq!(value["username"], "test"),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn test_default_get() {
        let cmd = CommandParser::parse("curl https://api.example.com/users").unwrap();
        assert_eq!(cmd.method, HttpMethod::Get);
        assert!(cmd.body.is_none());
    }

    #[test]
    fn test_data_implies_post() {
        let cmd = CommandParser::parse("curl https://x.io/form -d 'a=1'").unwrap();
        assert_eq!(cmd.method, HttpMethod::Post);
        assert_eq!(cmd.body, Some(CommandBody::Raw("a=1".to_string())));
    }

    #[test]
    fn test_explicit_method_beats_body() {
        let cmd = CommandParser::parse("curl -X put https://x.io/u/1 -d '{}'").unwrap();
        assert_eq!(cmd.method, HttpMethod::Put);
    }

    #[test]
    fn test_unsupported_method() {
        let err = CommandParser::parse("curl -X TRACE https://x.io").unwrap_err();
        assert_eq!(err, CommandParseError::UnsupportedMethod("TRACE".to_string()));
    }

    #[test]
    fn test_last_data_wins() {
        let cmd = CommandParser::parse("curl https://x.io -d first -d second").unwrap();
        assert_eq!(cmd.body, Some(CommandBody::Raw("second".to_string())));
    }

    #[test]
    fn test_duplicate_headers_preserved() {
        let cmd = CommandParser::parse(
            r#"curl https://x.io -H "Accept: a" -H "X-Tag:  one " -H "Accept: b""#,
        )
        .unwrap();
        assert_eq!(
            cmd.headers,
            vec![
                ("Accept".to_string(), "a".to_string()),
                ("X-Tag".to_string(), "one".to_string()),
                ("Accept".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_json_flag_adds_content_type() {
        let cmd = CommandParser::parse(r#"curl --json '{"a":1}' https://x.io"#).unwrap();
        assert_eq!(cmd.method, HttpMethod::Post);
        assert_eq!(cmd.header("content-type"), Some("application/json"));
        assert!(cmd.body.as_ref().unwrap().is_json());
    }

    #[test]
    fn test_json_flag_keeps_existing_content_type() {
        let cmd = CommandParser::parse(
            r#"curl --json '{"a":1}' -H "content-type: application/vnd.api+json" https://x.io"#,
        )
        .unwrap();
        assert_eq!(cmd.headers.len(), 1);
        assert_eq!(cmd.header("Content-Type"), Some("application/vnd.api+json"));
    }

    #[test]
    fn test_inline_flag_values() {
        let cmd = CommandParser::parse(
            r#"curl -XDELETE --header="Authorization: Bearer {{token}}" https://x.io/1"#,
        )
        .unwrap();
        assert_eq!(cmd.method, HttpMethod::Delete);
        assert_eq!(cmd.header("Authorization"), Some("Bearer {{token}}"));
    }

    #[test]
    fn test_missing_flag_value() {
        let err = CommandParser::parse("curl https://x.io -H").unwrap_err();
        assert_eq!(
            err,
            CommandParseError::MissingValue {
                flag: "-H".to_string()
            }
        );

        // 无值选项紧跟在已识别选项之后
        let err = CommandParser::parse("curl -X -s https://x.io").unwrap_err();
        assert_eq!(
            err,
            CommandParseError::MissingValue {
                flag: "-X".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_header() {
        let err = CommandParser::parse(r#"curl https://x.io -H "NoColon""#).unwrap_err();
        assert_eq!(err, CommandParseError::InvalidHeader("NoColon".to_string()));
    }

    #[test]
    fn test_foreign_flags_ignored() {
        let cmd = CommandParser::parse(
            "curl -s -L --compressed -u admin:secret -o out.json https://x.io/items -k",
        )
        .unwrap();
        assert_eq!(cmd.url, "https://x.io/items");
        assert!(cmd.headers.is_empty());
    }

    #[test]
    fn test_foreign_value_flags_skip_their_argument() {
        let cmd =
            CommandParser::parse("curl --data-urlencode 'q=hello world' api.example.com/search")
                .unwrap();
        assert_eq!(cmd.url, "api.example.com/search");
        assert!(cmd.body.is_none());

        let cmd = CommandParser::parse(
            "curl --cacert ca.pem --cert client.pem --key client.key -r 0-99 --retry 3 localhost:8080/files",
        )
        .unwrap();
        assert_eq!(cmd.url, "localhost:8080/files");

        let cmd = CommandParser::parse("curl -T upload.bin example.com/put").unwrap();
        assert_eq!(cmd.url, "example.com/put");
    }

    #[test]
    fn test_url_fallback_prefers_address() {
        // 未知的带值选项：参数作为位置参数出现，但不是地址
        let cmd = CommandParser::parse("curl --some-new-flag a=b api.example.com/v1?x=1").unwrap();
        assert_eq!(cmd.url, "api.example.com/v1");
        assert_eq!(cmd.query, vec![("x".to_string(), "1".to_string())]);

        let cmd = CommandParser::parse("curl --some-new-flag 'two words' /health").unwrap();
        assert_eq!(cmd.url, "/health");

        // 没有像地址的参数时退回第一个
        let cmd = CommandParser::parse("curl myhost").unwrap();
        assert_eq!(cmd.url, "myhost");
    }

    #[test]
    fn test_dash_prefixed_values() {
        let cmd = CommandParser::parse("curl https://x.io/n -d '-1'").unwrap();
        assert_eq!(cmd.method, HttpMethod::Post);
        assert!(cmd.body.as_ref().unwrap().is_json());
        assert_eq!(cmd.body.unwrap().render(), "-1");

        let cmd = CommandParser::parse("curl https://x.io -H 'X-Offset: 1' -d -").unwrap();
        assert_eq!(cmd.body, Some(CommandBody::Raw("-".to_string())));
    }

    #[test]
    fn test_placeholder_url() {
        let cmd = CommandParser::parse(r#"curl "{{base_url}}/users/{{user_id}}""#).unwrap();
        assert_eq!(cmd.url, "{{base_url}}/users/{{user_id}}");
    }

    #[test]
    fn test_missing_url() {
        let err = CommandParser::parse("curl -X GET").unwrap_err();
        assert_eq!(err, CommandParseError::MissingUrl);
    }

    #[test]
    fn test_empty_command() {
        assert_eq!(
            CommandParser::parse("curl").unwrap_err(),
            CommandParseError::EmptyCommand
        );
        assert_eq!(
            CommandParser::parse("   ").unwrap_err(),
            CommandParseError::EmptyCommand
        );
    }

    #[test]
    fn test_query_split() {
        let cmd = CommandParser::parse("curl 'https://api.example.com/users?page=1&limit=10'")
            .unwrap();
        assert_eq!(cmd.url, "https://api.example.com/users");
        assert_eq!(cmd.raw_url, "https://api.example.com/users?page=1&limit=10");
        assert_eq!(
            cmd.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_edge_cases() {
        let (base, query) = split_query("{{base}}/s?q=a%20b&&flag&x=1=2#top");
        assert_eq!(base, "{{base}}/s");
        assert_eq!(
            query,
            vec![
                ("q".to_string(), "a%20b".to_string()),
                ("flag".to_string(), String::new()),
                ("x".to_string(), "1=2".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiline_command() {
        let input = "curl -X PATCH \\\n  {{base_url}}/users/{{id}} \\\n  -H 'Authorization: Bearer {{token}}' \\\n  -d '{\"name\": \"{{name}}\"}'";
        let cmd = CommandParser::parse(input).unwrap();
        assert_eq!(cmd.method, HttpMethod::Patch);
        assert_eq!(cmd.url, "{{base_url}}/users/{{id}}");
        assert_eq!(cmd.headers.len(), 1);
        assert!(cmd.body.unwrap().is_json());
    }
}
