// 优化器输出的后处理：读取排班CSV，绘制图表，写出车辆统计
pub mod chart;
pub mod schedule;
pub mod stats;

use crate::models::VisualisationConfig;
use crate::orchestrator::PostProcessor;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const OUTPUTS_DIR: &str = "outputs";
pub const SCHEDULE_FILE: &str = "VS_Output.csv";
pub const UNALLOCATED_FILE: &str = "VS_UnallocatedTrips.csv";
pub const SCHEDULE_CHART_FILE: &str = "schedule.svg";
pub const CHARGING_CHART_FILE: &str = "charging.svg";
pub const STATS_FILE: &str = "statsVehicles.csv";

/// 一个运行目录的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum VisualisationOutcome {
    Skipped,                            // 缺少输入文件
    Rendered { artifacts: Vec<PathBuf> }, // 生成的文件
}

pub struct Visualiser {
    config: VisualisationConfig,
}

impl Visualiser {
    pub fn new(config: VisualisationConfig) -> Self {
        Self { config }
    }

    /// 处理 `<run_folder>/outputs/` 下的优化器输出
    pub fn visualise_run(&self, run_folder: &Path) -> Result<VisualisationOutcome> {
        let outputs = run_folder.join(OUTPUTS_DIR);
        let schedule_path = outputs.join(SCHEDULE_FILE);
        let unallocated_path = outputs.join(UNALLOCATED_FILE);

        if !schedule_path.is_file() || !unallocated_path.is_file() {
            info!(folder = %run_folder.display(), "Output files not found, skipping visualisation");
            return Ok(VisualisationOutcome::Skipped);
        }

        let schedule_rows = schedule::read_schedule(&schedule_path)?;
        let unallocated_rows = schedule::read_unallocated_trips(&unallocated_path)?;
        // 未分配行程只进甘特图，充电图和统计只看真实车辆
        let vehicles = schedule::prepare_schedule(&schedule_rows)?;
        let activities = schedule::merge(
            vehicles.clone(),
            schedule::prepare_unallocated_trips(&unallocated_rows)?,
        );
        debug!(
            rows = schedule_rows.len(),
            unallocated = unallocated_rows.len(),
            activities = activities.len(),
            "Prepared schedule"
        );

        let mut artifacts = Vec::new();

        if self.config.schedule_chart {
            let path = outputs.join(SCHEDULE_CHART_FILE);
            chart::render_schedule(&activities, &path, self.config.schedule_chart_size)?;
            artifacts.push(path);
        }

        if self.config.charging_chart {
            let path = outputs.join(CHARGING_CHART_FILE);
            chart::render_charging(&vehicles, &path, self.config.charging_panel_size)?;
            artifacts.push(path);
        }

        if self.config.vehicle_stats {
            let path = outputs.join(STATS_FILE);
            stats::write_vehicle_stats(&stats::compute_vehicle_stats(&vehicles), &path)?;
            artifacts.push(path);
        }

        info!(folder = %run_folder.display(), files = artifacts.len(), "Visualisation finished");
        Ok(VisualisationOutcome::Rendered { artifacts })
    }
}

impl PostProcessor for Visualiser {
    fn process(&self, run_folder: &Path) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        self.visualise_run(run_folder).map(|_| ())
    }
}
