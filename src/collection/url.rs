use crate::collection::types::{QueryParam, Url};
use crate::curl::ParsedCommand;

/// 将命令中的 URL 拆分为 protocol / host / port / path / query
///
/// URL 可能以占位符开头（`{{base_url}}/users`），因此不做标准 URL 解析。
pub fn build_url(command: &ParsedCommand) -> Url {
    let (protocol, rest) = match command.url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme.to_string()), rest),
        None => (None, command.url.as_str()),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    // 去掉 user:pass@
    let authority = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let (host, port) = split_port(authority);

    Url {
        raw: command.raw_url.clone(),
        protocol,
        host: split_host(host),
        port,
        path: path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        query: command
            .query
            .iter()
            .map(|(key, value)| QueryParam {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

fn split_port(authority: &str) -> (&str, Option<String>) {
    if let Some((host, port)) = authority.rsplit_once(':') {
        let numeric = !port.is_empty() && port.chars().all(|c| c.is_ascii_digit());
        let templated = port.starts_with("{{") && port.ends_with("}}");
        if !host.is_empty() && (numeric || templated) {
            return (host, Some(port.to_string()));
        }
    }
    (authority, None)
}

/// 主机名按 '.' 拆分；含占位符时整体保留
fn split_host(host: &str) -> Vec<String> {
    if host.is_empty() {
        return Vec::new();
    }
    if host.contains("{{") {
        return vec![host.to_string()];
    }
    host.split('.').map(str::to_string).collect()
}
