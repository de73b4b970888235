use crate::models::parameter_value::{Datatype, ParameterValue};

/// 一个可调参数：名称、数据类型、候选值，以及是否出现在运行目录名中
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub datatype: Datatype,
    // ————————————————————————————————————————————————————————————————————————
    // 候选值列表，按声明顺序；展开后每个参数只保留一个值
    // ————————————————————————————————————————————————————————————————————————
    pub values: Vec<ParameterValue>,
    pub included_in_path: bool,
}

impl Parameter {
    /// 按声明创建参数，多于一个候选值时参与目录命名
    pub fn new(name: impl Into<String>, datatype: Datatype, values: Vec<ParameterValue>) -> Self {
        let included_in_path = values.len() > 1;
        Self {
            name: name.into(),
            datatype,
            values,
            included_in_path,
        }
    }

    /// 派生出只含一个值的参数，保留目录命名标记
    pub fn with_single_value(&self, value: ParameterValue) -> Self {
        Self {
            name: self.name.clone(),
            datatype: self.datatype,
            values: vec![value],
            included_in_path: self.included_in_path,
        }
    }

    /// 单值参数的取值
    pub fn value(&self) -> Option<&ParameterValue> {
        self.values.first()
    }
}

/// 一次运行的完整参数组合，每个参数恰好一个值
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub parameters: Vec<Parameter>,
}

impl Configuration {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    /// 按参数顺序返回取值元组
    pub fn values(&self) -> Vec<&ParameterValue> {
        self.parameters.iter().filter_map(|p| p.value()).collect()
    }

    /// 目录名后缀：每个参与命名的参数贡献 "_<值>"
    pub fn path_suffix(&self) -> String {
        self.parameters
            .iter()
            .filter(|p| p.included_in_path)
            .filter_map(|p| p.value())
            .map(|v| format!("_{}", v))
            .collect()
    }

    /// 运行目录名，例如 "config_setting__1_x"
    pub fn folder_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.path_suffix())
    }

    /// config.csv 的行：(Parameter Key, Datatype, Value)
    pub fn rows(&self) -> Vec<[String; 3]> {
        self.parameters
            .iter()
            .map(|p| {
                [
                    p.name.clone(),
                    p.datatype.as_tag().to_string(),
                    p.value().map(|v| v.to_string()).unwrap_or_default(),
                ]
            })
            .collect()
    }
}
