//! 规则文件与命中记录的读取

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::default_rule_path;

/// `--rule` 未指定时使用默认路径
pub fn resolve_rule_path(rule: Option<PathBuf>) -> Result<PathBuf> {
    match rule {
        Some(path) => Ok(path),
        None => default_rule_path(),
    }
}

/// 读取规则 JSON
pub fn read_rule(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rule file {}", path.display()))
}

/// 读取命中记录
///
/// 文件内容可以是单个对象或对象数组；`-` 表示 stdin；未指定时为空列表。
pub fn read_matches(source: Option<&Path>) -> Result<Vec<Value>> {
    let Some(source) = source else {
        return Ok(Vec::new());
    };

    let content = if source == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read matches from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read match file {}", source.display()))?
    };

    parse_matches(&content)
}

/// 解析命中记录文本
pub fn parse_matches(content: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content).context("Failed to parse matches")?;
    match value {
        Value::Array(items) => {
            if let Some(pos) = items.iter().position(|v| !v.is_object()) {
                return Err(anyhow!("match #{} is not a JSON object", pos));
            }
            Ok(items)
        }
        Value::Object(_) => Ok(vec![value]),
        other => Err(anyhow!("matches must be an object or an array, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_single_object() {
        let matches = parse_matches(r#"{"status": 502}"#).unwrap();
        assert_eq!(matches, vec![json!({"status": 502})]);
    }

    #[test]
    fn test_parse_array() {
        let matches = parse_matches(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert!(parse_matches("42").is_err());
        assert!(parse_matches(r#"[{"a": 1}, 3]"#).is_err());
        assert!(parse_matches("not json").is_err());
    }

    #[test]
    fn test_read_matches_absent_is_empty() {
        assert!(read_matches(None).unwrap().is_empty());
    }

    #[test]
    fn test_read_matches_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"host": {{"name": "srv1"}}}}]"#).unwrap();
        let matches = read_matches(Some(file.path())).unwrap();
        assert_eq!(matches, vec![json!({"host": {"name": "srv1"}})]);
    }

    #[test]
    fn test_resolve_rule_path_prefers_explicit() {
        let path = resolve_rule_path(Some(PathBuf::from("/tmp/rule.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/rule.json"));
    }
}
