use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// 参数候选值，只包含标量类型
#[derive(Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),     // 布尔类型参数值
    Int(i64),       // 整数类型参数值
    Float(f64),     // 浮点数类型参数值
    String(String), // 字符串类型参数值
}

impl ParameterValue {
    /// 参数值的字面文本，用于运行目录名和config.csv
    pub fn to_string_repr(&self) -> String {
        match self {
            ParameterValue::Bool(b) => b.to_string(),
            ParameterValue::Int(n) => n.to_string(),
            // Debug格式保留小数点（1.0 而不是 1）
            ParameterValue::Float(n) => format!("{:?}", n),
            ParameterValue::String(s) => s.clone(),
        }
    }
}

/// 为ParameterValue实现Display trait，支持format!("{}", value)语法
impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_repr())
    }
}

/// 为ParameterValue实现Debug trait，使用Display的格式
impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

/// 优化器config.csv认识的数据类型标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Datatype {
    UInt,
    Double,
    DateTime,
    String,
    Bool,
}

impl Datatype {
    /// 写入config.csv的规范标签
    pub fn as_tag(&self) -> &'static str {
        match self {
            Datatype::UInt => "uint",
            Datatype::Double => "double",
            Datatype::DateTime => "datetime",
            Datatype::String => "string",
            Datatype::Bool => "bool",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Datatype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uint" | "int" | "integer" => Ok(Datatype::UInt),
            "double" | "float" => Ok(Datatype::Double),
            "datetime" => Ok(Datatype::DateTime),
            "string" | "str" => Ok(Datatype::String),
            "bool" | "boolean" => Ok(Datatype::Bool),
            other => Err(format!("unknown datatype '{}'", other)),
        }
    }
}

impl TryFrom<String> for Datatype {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_value_display() {
        assert_eq!(format!("{}", ParameterValue::Int(42)), "42");
        assert_eq!(format!("{}", ParameterValue::Float(0.5)), "0.5");
        assert_eq!(format!("{}", ParameterValue::Float(1.0)), "1.0");
        assert_eq!(format!("{}", ParameterValue::Bool(true)), "true");
        assert_eq!(
            format!("{}", ParameterValue::String("2023-01-01 00:00:00".to_string())),
            "2023-01-01 00:00:00"
        );
    }

    #[test]
    fn test_debug_equals_display() {
        let values = [
            ParameterValue::Int(7),
            ParameterValue::Float(0.25),
            ParameterValue::Bool(false),
            ParameterValue::String("abc".to_string()),
        ];
        for value in values {
            assert_eq!(format!("{:?}", value), format!("{}", value));
        }
    }

    #[test]
    fn test_deserialize_scalars_from_json() {
        let values: Vec<ParameterValue> =
            serde_json::from_str(r#"[1, 0.5, 2.0, true, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ParameterValue::Int(1),
                ParameterValue::Float(0.5),
                ParameterValue::Float(2.0),
                ParameterValue::Bool(true),
                ParameterValue::String("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_datatype_parsing() {
        assert_eq!("uint".parse::<Datatype>(), Ok(Datatype::UInt));
        assert_eq!("INT".parse::<Datatype>(), Ok(Datatype::UInt));
        assert_eq!("float".parse::<Datatype>(), Ok(Datatype::Double));
        assert_eq!(" DateTime ".parse::<Datatype>(), Ok(Datatype::DateTime));
        assert_eq!("boolean".parse::<Datatype>(), Ok(Datatype::Bool));
        assert!("complex".parse::<Datatype>().is_err());
    }

    #[test]
    fn test_datatype_deserialize_rejects_unknown() {
        let ok: Datatype = serde_json::from_str(r#""double""#).unwrap();
        assert_eq!(ok, Datatype::Double);
        assert_eq!(ok.to_string(), "double");

        let err = serde_json::from_str::<Datatype>(r#""matrix""#);
        assert!(err.is_err());
    }
}
