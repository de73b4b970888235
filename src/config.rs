use crate::models::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "eva_sweep.toml";

pub fn load_config(config_path: &Path) -> Result<Config> {
    // 检查配置文件是否存在，如果不存在则创建默认配置
    if !config_path.exists() {
        create_default_config(config_path)?;
        info!(path = %config_path.display(), "Created default config file");
    }

    // 读取配置文件内容
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    // 解析TOML配置
    let config: Config = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(config)
}

fn create_default_config(config_path: &Path) -> Result<()> {
    let default_config = r#"[general]
data_dir = "data"
sweep_file = "runConfig.json"
executable_name = "EVA_Research"
executable_path = ""
instances_dir = "instances"
run_folder_prefix = "config_setting_"

[visualisation]
enabled = true
schedule_chart = true
charging_chart = true
vehicle_stats = true
schedule_chart_size = [3200, 1800]
charging_panel_size = 500

[tui]
enabled = true
show_help_bar = true
colors = { border = "cyan", selected = "yellow", text = "white" }

[keybindings]
up = "k"
down = "j"
left = "h"
right = "l"
confirm = "enter"
quit = "q"
"#;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    fs::write(config_path, default_config)
        .with_context(|| format!("Failed to create default config file: {}", config_path.display()))?;

    Ok(())
}
