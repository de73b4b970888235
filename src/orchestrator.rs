// src/orchestrator.rs
use crate::expander::expand;
use crate::file_utils::recreate_dir;
use crate::models::{Configuration, GeneralConfig, Parameter, RunRecord, RunStatus, SweepReport};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const CONFIG_FILE: &str = "config.csv";
pub const ERROR_LOG_FILE: &str = "errorLog.txt";
const CONFIG_HEADER: [&str; 3] = ["Parameter Key", "Datatype", "Value"];

/// 单次运行的错误，不会中断整个扫描
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to launch optimiser '{executable}': {source}")]
    Launch {
        executable: String,
        source: io::Error,
    },

    #[error("Optimiser '{executable}' exited with {}", .code.map_or("no exit code".to_string(), |c| format!("code {}", c)))]
    ExitStatus { executable: String, code: Option<i32> },

    #[error("Post-processing of '{folder}' failed: {message}")]
    PostProcessing { folder: String, message: String },
}

/// 对一个运行目录求解
pub trait Optimiser {
    fn optimise(&self, dataset: &Path, run_folder: &Path) -> Result<(), RunError>;
}

/// 求解成功后对运行目录的后处理
pub trait PostProcessor {
    fn process(&self, run_folder: &Path) -> Result<()>;
}

/// 优化器按字符串拼接文件名，目录参数必须以分隔符结尾
fn dir_argument(path: &Path) -> OsString {
    let mut arg = path.as_os_str().to_os_string();
    if !path.as_os_str().to_string_lossy().ends_with(MAIN_SEPARATOR) {
        arg.push(MAIN_SEPARATOR_STR);
    }
    arg
}

/// 以阻塞子进程方式调用外部优化器：`<exe> <dataset>/ <run_folder>/`
#[derive(Debug, Clone)]
pub struct ProcessOptimiser {
    executable: PathBuf,
}

impl ProcessOptimiser {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl Optimiser for ProcessOptimiser {
    fn optimise(&self, dataset: &Path, run_folder: &Path) -> Result<(), RunError> {
        let executable = self.executable.display().to_string();
        debug!(%executable, dataset = %dataset.display(), run = %run_folder.display(), "Launching optimiser");

        let status = Command::new(&self.executable)
            .arg(dir_argument(dataset))
            .arg(dir_argument(run_folder))
            .status()
            .map_err(|source| RunError::Launch {
                executable: executable.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::ExitStatus {
                executable,
                code: status.code(),
            })
        }
    }
}

/// 运行目录的布局：`<dataset>/<instances_dir>/<prefix><suffix>`
#[derive(Debug, Clone, PartialEq)]
pub struct RunLayout {
    pub instances_dir: String,
    pub run_folder_prefix: String,
}

impl Default for RunLayout {
    fn default() -> Self {
        Self {
            instances_dir: "instances".to_string(),
            run_folder_prefix: "config_setting_".to_string(),
        }
    }
}

impl From<&GeneralConfig> for RunLayout {
    fn from(general: &GeneralConfig) -> Self {
        Self {
            instances_dir: general.instances_dir.clone(),
            run_folder_prefix: general.run_folder_prefix.clone(),
        }
    }
}

/// 写出运行目录中的 config.csv
pub fn write_config_csv(run_folder: &Path, configuration: &Configuration) -> Result<PathBuf> {
    let path = run_folder.join(CONFIG_FILE);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(CONFIG_HEADER)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    for row in configuration.rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

/// 对一个数据集运行全部参数组合
///
/// 先删除并重建 `<dataset>/<instances_dir>`，然后逐个组合：
/// 重建运行目录、写 config.csv、调用优化器、成功后做后处理。
/// 单次运行的失败写入该目录的 errorLog.txt 并计入报告；
/// 只有目录或 config.csv 无法创建时才返回错误。
pub fn optimise(
    dataset: &Path,
    parameters: &[Parameter],
    optimiser: &dyn Optimiser,
    post_processor: &dyn PostProcessor,
    layout: &RunLayout,
) -> Result<SweepReport> {
    let instances = dataset.join(&layout.instances_dir);
    recreate_dir(&instances)?;

    let configurations = expand(parameters);
    let total = configurations.len();
    info!(dataset = %dataset.display(), configurations = total, "Starting sweep");

    let mut report = SweepReport::default();
    for (idx, configuration) in configurations.into_iter().enumerate() {
        let folder = instances.join(configuration.folder_name(&layout.run_folder_prefix));
        recreate_dir(&folder)?;
        write_config_csv(&folder, &configuration)?;

        info!(folder = %folder.display(), "Solving configuration {}/{}", idx + 1, total);
        let status = match run_one(dataset, &folder, optimiser, post_processor) {
            Ok(()) => RunStatus::Succeeded,
            Err(err) => {
                error!(folder = %folder.display(), "{}", err);
                let text = format!("{:?}", err);
                write_error_log(&folder, &text);
                RunStatus::Failed { error: text }
            }
        };

        report.record(RunRecord {
            folder,
            configuration,
            status,
        });
    }

    info!(
        dataset = %dataset.display(),
        runs = report.total_runs(),
        errors = report.total_errors(),
        "Sweep finished"
    );
    Ok(report)
}

fn run_one(
    dataset: &Path,
    folder: &Path,
    optimiser: &dyn Optimiser,
    post_processor: &dyn PostProcessor,
) -> Result<(), RunError> {
    optimiser.optimise(dataset, folder)?;
    post_processor
        .process(folder)
        .map_err(|err| RunError::PostProcessing {
            folder: folder.display().to_string(),
            message: format!("{:#}", err),
        })
}

fn write_error_log(folder: &Path, text: &str) {
    let path = folder.join(ERROR_LOG_FILE);
    if let Err(err) = fs::write(&path, text) {
        warn!(path = %path.display(), "Failed to write error log: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Datatype;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// 按目录名决定成败的假优化器
    struct FakeOptimiser {
        failing: Vec<String>,
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl FakeOptimiser {
        fn failing(names: &[&str]) -> Self {
            Self {
                failing: names.iter().map(|n| n.to_string()).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Optimiser for FakeOptimiser {
        fn optimise(&self, dataset: &Path, run_folder: &Path) -> Result<(), RunError> {
            self.calls
                .borrow_mut()
                .push((dataset.to_path_buf(), run_folder.to_path_buf()));
            let name = run_folder.file_name().unwrap().to_string_lossy().to_string();
            if self.failing.contains(&name) {
                Err(RunError::ExitStatus {
                    executable: "fake".to_string(),
                    code: Some(3),
                })
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingPostProcessor {
        seen: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl PostProcessor for RecordingPostProcessor {
        fn process(&self, run_folder: &Path) -> Result<()> {
            self.seen.borrow_mut().push(run_folder.to_path_buf());
            if self.fail {
                anyhow::bail!("chart failed");
            }
            Ok(())
        }
    }

    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::new("A", Datatype::UInt, vec![1.into(), 2.into()]),
            Parameter::new("fixed", Datatype::Bool, vec![true.into()]),
            Parameter::new("B", Datatype::String, vec!["x".into(), "y".into(), "z".into()]),
        ]
    }

    #[test]
    fn test_all_runs_succeed() {
        let temp_dir = tempdir().unwrap();
        let optimiser = FakeOptimiser::failing(&[]);
        let post = RecordingPostProcessor::default();

        let report = optimise(temp_dir.path(), &parameters(), &optimiser, &post, &RunLayout::default())
            .unwrap();

        assert_eq!(report.total_runs(), 6);
        assert_eq!(report.total_errors(), 0);
        assert_eq!(post.seen.borrow().len(), 6);

        let calls = optimiser.calls.borrow();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|(dataset, _)| dataset == temp_dir.path()));
        assert_eq!(
            calls[0].1,
            temp_dir.path().join("instances").join("config_setting__1_x")
        );

        let instances = temp_dir.path().join("instances");
        assert_eq!(fs::read_dir(&instances).unwrap().count(), 6);
        assert!(!instances.join("config_setting__1_x").join(ERROR_LOG_FILE).exists());
    }

    #[test]
    fn test_config_csv_contents() {
        let temp_dir = tempdir().unwrap();
        let optimiser = FakeOptimiser::failing(&[]);
        let post = RecordingPostProcessor::default();

        optimise(temp_dir.path(), &parameters(), &optimiser, &post, &RunLayout::default()).unwrap();

        let contents = fs::read_to_string(
            temp_dir
                .path()
                .join("instances")
                .join("config_setting__2_y")
                .join(CONFIG_FILE),
        )
        .unwrap();
        assert_eq!(
            contents,
            "Parameter Key,Datatype,Value\nA,uint,2\nfixed,bool,true\nB,string,y\n"
        );
    }

    #[test]
    fn test_failed_run_is_isolated() {
        let temp_dir = tempdir().unwrap();
        let optimiser = FakeOptimiser::failing(&["config_setting__2_y"]);
        let post = RecordingPostProcessor::default();

        let report = optimise(temp_dir.path(), &parameters(), &optimiser, &post, &RunLayout::default())
            .unwrap();

        assert_eq!(report.total_runs(), 6);
        assert_eq!(report.total_errors(), 1);
        let failing = temp_dir.path().join("instances").join("config_setting__2_y");
        assert_eq!(report.failing_folders(), vec![&failing]);

        // 失败的运行不做后处理
        assert_eq!(post.seen.borrow().len(), 5);
        assert!(!post.seen.borrow().contains(&failing));

        let log = fs::read_to_string(failing.join(ERROR_LOG_FILE)).unwrap();
        assert!(log.contains("ExitStatus"));
        assert!(log.contains("Some(3)"));

        let ok = temp_dir.path().join("instances").join("config_setting__1_x");
        assert!(!ok.join(ERROR_LOG_FILE).exists());
        assert!(ok.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_post_processing_failure_is_run_error() {
        let temp_dir = tempdir().unwrap();
        let optimiser = FakeOptimiser::failing(&[]);
        let post = RecordingPostProcessor {
            fail: true,
            ..Default::default()
        };

        let report = optimise(temp_dir.path(), &parameters(), &optimiser, &post, &RunLayout::default())
            .unwrap();

        assert_eq!(report.total_errors(), 6);
        match &report.runs[0].status {
            RunStatus::Failed { error } => {
                assert!(error.contains("PostProcessing"));
                assert!(error.contains("chart failed"));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_previous_instances_are_removed() {
        let temp_dir = tempdir().unwrap();
        let stale = temp_dir.path().join("instances").join("config_setting__9");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join(ERROR_LOG_FILE), "old").unwrap();

        let optimiser = FakeOptimiser::failing(&[]);
        let post = RecordingPostProcessor::default();
        optimise(temp_dir.path(), &parameters(), &optimiser, &post, &RunLayout::default()).unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn test_custom_layout_and_single_configuration() {
        let temp_dir = tempdir().unwrap();
        let layout = RunLayout {
            instances_dir: "runs".to_string(),
            run_folder_prefix: "cfg".to_string(),
        };
        let params = vec![Parameter::new("only", Datatype::UInt, vec![7.into()])];

        let optimiser = FakeOptimiser::failing(&[]);
        let post = RecordingPostProcessor::default();
        let report = optimise(temp_dir.path(), &params, &optimiser, &post, &layout).unwrap();

        assert_eq!(report.total_runs(), 1);
        assert_eq!(report.runs[0].folder, temp_dir.path().join("runs").join("cfg"));
    }

    #[test]
    fn test_dir_argument_ends_with_separator() {
        let dir = Path::new("data").join("lothian").join("30min");
        let arg = dir_argument(&dir);
        assert!(arg.to_string_lossy().ends_with(MAIN_SEPARATOR));
        assert_eq!(PathBuf::from(&arg), dir);

        // 已有分隔符时不重复添加
        assert_eq!(dir_argument(Path::new(&arg)), arg);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_optimiser_receives_directory_arguments() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let dataset = temp_dir.path().join("dataset");
        fs::create_dir(&dataset).unwrap();
        fs::write(dataset.join("locations.csv"), "").unwrap();

        // 与真实优化器一样直接拼接文件名
        let script = temp_dir.path().join("EVA_Research");
        fs::write(
            &script,
            "#!/bin/sh\n\
             [ -f \"$1locations.csv\" ] || exit 4\n\
             [ -f \"$2config.csv\" ] || exit 5\n\
             printf '%s|%s' \"$1\" \"$2\" > \"$2args.txt\"\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let params = vec![Parameter::new("A", Datatype::UInt, vec![1.into()])];
        let post = RecordingPostProcessor::default();
        let report = optimise(
            &dataset,
            &params,
            &ProcessOptimiser::new(&script),
            &post,
            &RunLayout::default(),
        )
        .unwrap();
        assert_eq!(report.total_errors(), 0);

        let run_folder = dataset.join("instances").join("config_setting_");
        let args = fs::read_to_string(run_folder.join("args.txt")).unwrap();
        assert_eq!(
            args,
            format!("{}/|{}/", dataset.display(), run_folder.display())
        );
    }

    #[test]
    fn test_launch_failure() {
        let temp_dir = tempdir().unwrap();
        let optimiser = ProcessOptimiser::new(temp_dir.path().join("no_such_optimiser"));

        let err = optimiser.optimise(temp_dir.path(), temp_dir.path()).unwrap_err();
        assert!(matches!(err, RunError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_optimiser_exit_codes() {
        let search_path = std::env::var_os("PATH");
        let (Some(true_bin), Some(false_bin)) = (
            crate::file_utils::resolve_executable("true", search_path.as_deref()),
            crate::file_utils::resolve_executable("false", search_path.as_deref()),
        ) else {
            return;
        };

        let temp_dir = tempdir().unwrap();
        let post = RecordingPostProcessor::default();

        let report = optimise(
            temp_dir.path(),
            &parameters(),
            &ProcessOptimiser::new(true_bin),
            &post,
            &RunLayout::default(),
        )
        .unwrap();
        assert_eq!(report.total_errors(), 0);

        let report = optimise(
            temp_dir.path(),
            &parameters(),
            &ProcessOptimiser::new(false_bin),
            &post,
            &RunLayout::default(),
        )
        .unwrap();
        assert_eq!(report.total_errors(), 6);
        assert!(report.runs.iter().all(|r| r.folder.join(ERROR_LOG_FILE).is_file()));
    }
}
