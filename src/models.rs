// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
// 导出所有子模块
pub mod config;
pub mod parameter;
pub mod parameter_value;
pub mod run;
pub mod schedule;
pub mod utils;

// 重新导出常用类型
pub use config::{
    Config, GeneralConfig, KeybindingsConfig, TuiConfig, VisualisationConfig,
};
pub use parameter::{Configuration, Parameter};
pub use parameter_value::{Datatype, ParameterValue};
pub use run::{RunRecord, RunStatus, SweepReport};
pub use schedule::{Activity, ActivityType, ScheduleRow, UnallocatedTripRow, number_plate};
