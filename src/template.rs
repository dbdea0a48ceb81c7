//! 安全模板渲染
//!
//! 模板只支持 `{key}` 占位符，`{{` / `}}` 表示字面量花括号。渲染分两步：
//!
//! 1. 按键整体替换；所有占位符都能在上下文中找到时直接返回
//! 2. 有占位符缺失时，逐个键做字面量替换，找不到的占位符原样保留
//!
//! 模板本身有问题（花括号不配对、`{}`、`{0}`、`{a:>4}` 之类）时返回原始模板并附带警告，
//! 保证总能发出一条消息。

use serde_json::{Map, Value};
use std::fmt;

use crate::error::RenderError;

/// 渲染过程中的非致命问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateWarning {
    /// 占位符在上下文中不存在，已走字面量替换
    MissingKeys(Vec<String>),
    /// 模板无法解析，返回了原始模板
    Malformed(String),
}

impl fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateWarning::MissingKeys(keys) => {
                write!(f, "missing template keys: {}", keys.join(", "))
            }
            TemplateWarning::Malformed(reason) => write!(f, "Format error: {}", reason),
        }
    }
}

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub warnings: Vec<TemplateWarning>,
}

impl Rendered {
    fn clean(text: String) -> Self {
        Self {
            text,
            warnings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Field(&'a str),
}

/// 渲染模板
///
/// 只有在回退阶段无法把值转成文本时才返回 `Err`。
pub fn render(template: &str, context: &Map<String, Value>) -> Result<Rendered, RenderError> {
    let segments = match parse(template) {
        Ok(segments) => segments,
        Err(reason) => {
            return Ok(Rendered {
                text: template.to_string(),
                warnings: vec![TemplateWarning::Malformed(reason)],
            })
        }
    };

    let missing: Vec<String> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Field(name) if !context.contains_key(*name) => Some(name.to_string()),
            _ => None,
        })
        .collect();

    if missing.is_empty() {
        let mut out = String::with_capacity(template.len());
        for segment in &segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(name) => {
                    let Some(value) = context.get(*name) else {
                        continue;
                    };
                    match value_text(name, value) {
                        Ok(text) => out.push_str(&text),
                        Err(e) => {
                            return Ok(Rendered {
                                text: template.to_string(),
                                warnings: vec![TemplateWarning::Malformed(e.to_string())],
                            })
                        }
                    }
                }
            }
        }
        return Ok(Rendered::clean(out));
    }

    let mut text = template.to_string();
    for (key, value) in context {
        let placeholder = format!("{{{}}}", key);
        if text.contains(&placeholder) {
            text = text.replace(&placeholder, &value_text(key, value)?);
        }
    }

    let mut unique = Vec::with_capacity(missing.len());
    for key in missing {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }

    Ok(Rendered {
        text,
        warnings: vec![TemplateWarning::MissingKeys(unique)],
    })
}

/// 上下文值转文本：字符串原样，其它用 JSON 表示
pub fn value_text(key: &str, value: &Value) -> Result<String, RenderError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string(other).map_err(|source| RenderError::Value {
            key: key.to_string(),
            source,
        }),
    }
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, String> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                push_literal(&mut segments, &template[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            b'{' => {
                push_literal(&mut segments, &template[literal_start..i]);
                let rest = &template[i + 1..];
                let close = match rest.find(&['{', '}'][..]) {
                    Some(pos) if rest.as_bytes()[pos] == b'}' => pos,
                    Some(_) => return Err("unexpected '{' in field name".to_string()),
                    None => return Err("expected '}' before end of string".to_string()),
                };
                let name = &rest[..close];
                validate_field(name)?;
                segments.push(Segment::Field(name));
                i += close + 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                push_literal(&mut segments, &template[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            b'}' => return Err("single '}' encountered in format string".to_string()),
            _ => i += 1,
        }
    }
    push_literal(&mut segments, &template[literal_start..]);

    Ok(segments)
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, s: &'a str) {
    if !s.is_empty() {
        segments.push(Segment::Literal(s));
    }
}

fn validate_field(name: &str) -> Result<(), String> {
    if name.is_empty() || name.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("positional placeholder '{{{}}}' is not supported", name));
    }
    if name.contains(':') || name.contains('!') {
        return Err(format!(
            "format spec in placeholder '{{{}}}' is not supported",
            name
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_render_all_keys_present() {
        let rendered = render("{a}", &ctx(json!({"a": "x"}))).unwrap();
        assert_eq!(rendered.text, "x");
        assert!(rendered.is_clean());
    }

    #[test]
    fn test_render_missing_key_left_literal() {
        let rendered = render("{a} {b}", &ctx(json!({"a": "x"}))).unwrap();
        assert_eq!(rendered.text, "x {b}");
        assert_eq!(
            rendered.warnings,
            vec![TemplateWarning::MissingKeys(vec!["b".to_string()])]
        );
    }

    #[test]
    fn test_render_dotted_keys_and_numbers() {
        let context = ctx(json!({"host.name": "srv1", "status": 502, "ok": false, "x": null}));
        let rendered = render("Host: {host.name} Status: {status} {ok} {x}", &context).unwrap();
        assert_eq!(rendered.text, "Host: srv1 Status: 502 false null");
    }

    #[test]
    fn test_render_sequence_as_json() {
        let rendered = render("tags={tags}", &ctx(json!({"tags": ["a", 1]}))).unwrap();
        assert_eq!(rendered.text, "tags=[\"a\",1]");
    }

    #[test]
    fn test_render_escaped_braces() {
        let rendered = render("{{literal}} {a}", &ctx(json!({"a": 1}))).unwrap();
        assert_eq!(rendered.text, "{literal} 1");
    }

    #[test]
    fn test_fallback_keeps_escaped_braces_verbatim() {
        // 回退阶段只做字面量替换，不处理转义
        let rendered = render("{{a}} {missing}", &ctx(json!({"a": "x"}))).unwrap();
        assert_eq!(rendered.text, "{x} {missing}");
    }

    #[test]
    fn test_repeated_missing_key_reported_once() {
        let rendered = render("{b}{b}{a}", &ctx(json!({"a": 1}))).unwrap();
        assert_eq!(rendered.text, "{b}{b}1");
        assert_eq!(
            rendered.warnings,
            vec![TemplateWarning::MissingKeys(vec!["b".to_string()])]
        );
    }

    #[test]
    fn test_malformed_returns_original() {
        let context = ctx(json!({"a": "x"}));
        for template in ["{a", "a}", "{}", "{0}", "{a:>4}", "{a!r}", "{a{b}}"] {
            let rendered = render(template, &context).unwrap();
            assert_eq!(rendered.text, template, "template {:?}", template);
            assert!(
                matches!(rendered.warnings.as_slice(), [TemplateWarning::Malformed(_)]),
                "template {:?} should be malformed",
                template
            );
        }
    }

    #[test]
    fn test_no_placeholders() {
        let rendered = render("plain text", &Map::new()).unwrap();
        assert_eq!(rendered.text, "plain text");
        assert!(rendered.is_clean());
    }

    #[test]
    fn test_unicode_literals() {
        let rendered = render("主机: {host.name}, 错误: {error}", &ctx(json!({"host.name": "机器01"}))).unwrap();
        assert_eq!(rendered.text, "主机: 机器01, 错误: {error}");
    }

    #[test]
    fn test_parse_segments() {
        let segments = parse("a{b}c").unwrap();
        assert_eq!(
            segments,
            vec![Segment::Literal("a"), Segment::Field("b"), Segment::Literal("c")]
        );
    }
}
