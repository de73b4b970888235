use serde::{Deserialize, Deserializer};

/// 反序列化可选字符串，将空字符串转换为None
///
/// # 参数
/// - `deserializer`: 用于反序列化的serde反序列化器
///
/// # 返回值
/// 反序列化后的可选字符串，如果原字符串为空（或只有空白）则返回None
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}
