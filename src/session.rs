// src/session.rs
use crate::chooser::Chooser;
use crate::file_utils::{is_executable, list_subfolders, resolve_executable};
use crate::models::{Parameter, SweepReport};
use crate::orchestrator::{Optimiser, PostProcessor, RunLayout, optimise};
use anyhow::{Context, Result, anyhow, bail};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FREQUENCY_QUESTION: &str = "Choose frequency? [y,n]";

/// 确定优化器可执行文件：显式路径必须存在且可执行，否则在搜索路径中按名称查找
pub fn locate_optimiser(
    name: &str,
    explicit_path: Option<&str>,
    search_path: Option<&OsStr>,
) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        let path = PathBuf::from(path);
        if !is_executable(&path) {
            bail!(
                "Optimiser executable '{}' does not exist or is not executable",
                path.display()
            );
        }
        return Ok(path);
    }

    resolve_executable(name, search_path)
        .ok_or_else(|| anyhow!("Optimiser executable '{}' was not found on PATH", name))
}

/// 在parent的子目录中选择一个
fn choose_folder(chooser: &mut dyn Chooser, title: &str, parent: &Path) -> Result<PathBuf> {
    let options = list_subfolders(parent)?;
    if options.is_empty() {
        bail!("No folders to choose from in '{}'", parent.display());
    }

    let idx = chooser
        .choose(title, &options)?
        .with_context(|| format!("No selection made in '{}'", parent.display()))?;
    let folder = options
        .get(idx)
        .with_context(|| format!("Selection {} is out of range", idx))?;

    Ok(parent.join(folder))
}

/// 一次交互式扫描会话：选择区域和数据集，再对一个或全部频率目录运行扫描
pub struct Session<'a> {
    pub data_dir: &'a Path,
    pub parameters: &'a [Parameter],
    pub optimiser: &'a dyn Optimiser,
    pub post_processor: &'a dyn PostProcessor,
    pub layout: &'a RunLayout,
}

impl Session<'_> {
    pub fn run(&self, chooser: &mut dyn Chooser) -> Result<SweepReport> {
        let region = choose_folder(chooser, "Choose region", self.data_dir)?;
        let dataset = choose_folder(chooser, "Choose dataset", &region)?;

        let frequencies = if chooser.confirm(FREQUENCY_QUESTION)? {
            vec![choose_folder(chooser, "Choose frequency", &dataset)?]
        } else {
            list_subfolders(&dataset)?
                .into_iter()
                .map(|name| dataset.join(name))
                .collect()
        };

        if frequencies.is_empty() {
            warn!(dataset = %dataset.display(), "No frequency folders to optimise");
        }

        let mut report = SweepReport::default();
        for frequency in &frequencies {
            info!(folder = %frequency.display(), "Optimising dataset");
            report.absorb(optimise(
                frequency,
                self.parameters,
                self.optimiser,
                self.post_processor,
                self.layout,
            )?);
        }

        Ok(report)
    }
}
