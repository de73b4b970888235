// src/sweep_parser.rs
use crate::models::{Datatype, Parameter, ParameterValue};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// 参数扫描描述文件中的语义错误
#[derive(Error, Debug, PartialEq)]
pub enum SweepSourceError {
    #[error("Parameter #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Parameter '{name}' has no candidate values")]
    NoValues { name: String },

    #[error("Parameter '{name}' has an unknown datatype '{datatype}'")]
    UnknownDatatype { name: String, datatype: String },

    #[error("Parameter '{name}' value '{value}' cannot be part of a folder name")]
    UnsafeFolderValue { name: String, value: String },
}

/// 参与目录命名的值不能包含路径分隔符
fn is_safe_folder_value(value: &ParameterValue) -> bool {
    let text = value.to_string();
    !text.contains(['/', '\\']) && text != "." && text != ".."
}

// ————————————————————————————————————————————————————————————————————————
// 描述文件的原始结构：{"paramsConfig": [{"name", "datatype", "values"}]}
// ————————————————————————————————————————————————————————————————————————
#[derive(Debug, Deserialize)]
struct SweepDocument {
    #[serde(rename = "paramsConfig")]
    params_config: Vec<ParameterDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ParameterDescriptor {
    name: String,
    datatype: String,
    values: Vec<ParameterValue>,
}

/// 按扩展名解析扫描描述文件（.yaml/.yml 为YAML，其余为JSON）
pub fn parse_sweep_file(file_path: &Path) -> Result<Vec<Parameter>> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read sweep file: {}", file_path.display()))?;

    let is_yaml = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let parameters = if is_yaml {
        parse_sweep_yaml(&contents)
    } else {
        parse_sweep_json(&contents)
    }
    .with_context(|| format!("Invalid sweep file: {}", file_path.display()))?;

    debug!(count = parameters.len(), file = %file_path.display(), "Loaded sweep parameters");
    Ok(parameters)
}

pub fn parse_sweep_json(contents: &str) -> Result<Vec<Parameter>> {
    let document: SweepDocument =
        serde_json::from_str(contents).context("Failed to parse sweep JSON")?;
    Ok(build_parameters(document)?)
}

pub fn parse_sweep_yaml(contents: &str) -> Result<Vec<Parameter>> {
    let document: SweepDocument =
        serde_yaml::from_str(contents).context("Failed to parse sweep YAML")?;
    Ok(build_parameters(document)?)
}

/// 校验描述并构建参数列表，保持声明顺序
fn build_parameters(document: SweepDocument) -> Result<Vec<Parameter>, SweepSourceError> {
    document
        .params_config
        .into_iter()
        .enumerate()
        .map(|(index, descriptor)| {
            if descriptor.name.trim().is_empty() {
                return Err(SweepSourceError::EmptyName { index });
            }
            if descriptor.values.is_empty() {
                return Err(SweepSourceError::NoValues {
                    name: descriptor.name,
                });
            }
            let datatype: Datatype = descriptor.datatype.parse().map_err(|_| {
                SweepSourceError::UnknownDatatype {
                    name: descriptor.name.clone(),
                    datatype: descriptor.datatype.clone(),
                }
            })?;
            let parameter = Parameter::new(descriptor.name, datatype, descriptor.values);
            let unsafe_value = parameter
                .values
                .iter()
                .find(|v| parameter.included_in_path && !is_safe_folder_value(v));
            if let Some(value) = unsafe_value {
                return Err(SweepSourceError::UnsafeFolderValue {
                    name: parameter.name.clone(),
                    value: value.to_string(),
                });
            }
            Ok(parameter)
        })
        .collect()
}
