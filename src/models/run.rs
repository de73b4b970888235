use crate::models::parameter::Configuration;
use std::path::PathBuf;

/// 单次运行的结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    Succeeded,
    Failed { error: String }, // 写入errorLog.txt的错误文本
}

/// 绑定到运行目录的参数组合
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub folder: PathBuf,
    pub configuration: Configuration,
    pub status: RunStatus,
}

impl RunRecord {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, RunStatus::Failed { .. })
    }
}

/// 一次扫描会话的累计结果，替代全局计数器
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub runs: Vec<RunRecord>,
}

impl SweepReport {
    pub fn record(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    /// 合并另一个数据集的结果
    pub fn absorb(&mut self, other: SweepReport) {
        self.runs.extend(other.runs);
    }

    pub fn total_runs(&self) -> usize {
        self.runs.len()
    }

    pub fn total_errors(&self) -> usize {
        self.runs.iter().filter(|r| r.is_failed()).count()
    }

    /// 出错运行的目录，按运行顺序
    pub fn failing_folders(&self) -> Vec<&PathBuf> {
        self.runs
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| &r.folder)
            .collect()
    }

    /// 会话结束时的控制台摘要
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Finished solving {} configurations with {} errors.",
            self.total_runs(),
            self.total_errors()
        )];
        if self.total_errors() > 0 {
            lines.push("Paths to config folder with error:".to_string());
            for folder in self.failing_folders() {
                lines.push(folder.display().to_string());
            }
        }
        lines
    }
}
