// src/expander.rs
use crate::models::{Configuration, Parameter};

/// 展开所有参数组合（笛卡尔积）
///
/// 从一个空组合开始，依次对每个参数：对它的每个候选值（按声明顺序），
/// 把之前的每个部分组合（保持原有相对顺序）扩展上这个值。
/// 结果共 Π k_i 个组合，每个组合按输入顺序包含全部参数且每个参数只有一个值。
/// 空参数列表得到一个空组合。
pub fn expand(parameters: &[Parameter]) -> Vec<Configuration> {
    let mut result: Vec<Vec<Parameter>> = vec![Vec::new()];

    for param in parameters {
        let mut next = Vec::with_capacity(result.len() * param.values.len());

        for value in &param.values {
            for partial in &result {
                let mut extended = partial.clone();
                extended.push(param.with_single_value(value.clone()));
                next.push(extended);
            }
        }

        result = next;
    }

    result.into_iter().map(Configuration::new).collect()
}

/// 组合数量，不实际展开
pub fn combination_count(parameters: &[Parameter]) -> usize {
    parameters.iter().map(|p| p.values.len()).product()
}
