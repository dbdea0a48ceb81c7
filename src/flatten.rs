//! 嵌套字典展平
//!
//! `{"host": {"name": "server01"}, "status": 502}` 展平为
//! `{"host.name": "server01", "status": 502}`，模板里可以直接写 `{host.name}`。

use serde_json::{Map, Value};

pub const KEY_SEPARATOR: &str = ".";

/// 展平嵌套对象，键用 `.` 连接
///
/// 只递归对象；数组、数字、字符串、null 原样作为叶子。键的顺序与输入一致。
pub fn flatten(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(map, "", &mut out);
    out
}

fn flatten_into(map: &Map<String, Value>, parent: &str, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let joined = if parent.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", parent, KEY_SEPARATOR, key)
        };

        match value {
            Value::Object(child) => flatten_into(child, &joined, out),
            leaf => {
                out.insert(joined, leaf.clone());
            }
        }
    }
}

/// 常用字段兜底
///
/// - `host.name` 缺失时取 `host_name`，否则 `"N/A"`
/// - `@timestamp` 缺失时取 `timestamp`，否则用发送时间
pub fn apply_defaults(flat: &mut Map<String, Value>, alert_time: &str) {
    if !flat.contains_key("host.name") {
        let host = flat
            .get("host_name")
            .cloned()
            .unwrap_or_else(|| Value::String("N/A".to_string()));
        flat.insert("host.name".to_string(), host);
    }

    if !flat.contains_key("@timestamp") {
        let ts = flat
            .get("timestamp")
            .cloned()
            .unwrap_or_else(|| Value::String(alert_time.to_string()));
        flat.insert("@timestamp".to_string(), ts);
    }
}
