use serde::Deserialize;

/// 应用程序配置结构
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub visualisation: VisualisationConfig,
    #[serde(default)]
    pub tui: TuiConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// 通用配置
#[derive(Debug, Deserialize, Default, Clone)]
pub struct GeneralConfig {
    pub data_dir: String,
    pub sweep_file: String,
    pub executable_name: String,
    // 显式指定的可执行文件路径，为空时在PATH中查找executable_name
    #[serde(default, deserialize_with = "crate::models::utils::deserialize_optional_string")]
    pub executable_path: Option<String>,
    pub instances_dir: String,
    pub run_folder_prefix: String,
}

/// 结果可视化配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VisualisationConfig {
    pub enabled: bool,
    pub schedule_chart: bool,
    pub charging_chart: bool,
    pub vehicle_stats: bool,
    pub schedule_chart_size: (u32, u32),
    pub charging_panel_size: u32,
}

impl Default for VisualisationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule_chart: true,
            charging_chart: true,
            vehicle_stats: true,
            schedule_chart_size: (3200, 1800),
            charging_panel_size: 500,
        }
    }
}

/// TUI界面配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TuiConfig {
    pub enabled: bool,
    pub show_help_bar: bool,
    pub colors: ColorConfig,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_help_bar: true,
            colors: ColorConfig::default(),
        }
    }
}

/// 颜色配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColorConfig {
    pub border: String,
    pub selected: String,
    pub text: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            border: "cyan".to_string(),
            selected: "yellow".to_string(),
            text: "white".to_string(),
        }
    }
}

/// 键盘绑定配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub confirm: String,
    pub quit: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            up: "k".to_string(),
            down: "j".to_string(),
            left: "h".to_string(),
            right: "l".to_string(),
            confirm: "enter".to_string(),
            quit: "q".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
        [general]
        data_dir = "data"
        sweep_file = "runConfig.json"
        executable_name = "EVA_Research"
        executable_path = ""
        instances_dir = "instances"
        run_folder_prefix = "config_setting_"

        [visualisation]
        enabled = true
        charging_chart = false

        [tui]
        enabled = false

        [keybindings]
        quit = "x"
        "#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize config");

        // 验证基本字段
        assert_eq!(config.general.data_dir, "data");
        assert_eq!(config.general.executable_name, "EVA_Research");
        assert_eq!(config.general.executable_path, None);
        assert!(config.visualisation.enabled);
        assert!(!config.visualisation.charging_chart);
        assert!(config.visualisation.vehicle_stats);
        assert!(!config.tui.enabled);
        assert_eq!(config.keybindings.quit, "x");
        assert_eq!(config.keybindings.confirm, "enter");
    }

    #[test]
    fn test_optional_sections_default() {
        let toml_str = r#"
        [general]
        data_dir = "d"
        sweep_file = "s.json"
        executable_name = "opt"
        executable_path = "/opt/bin/opt"
        instances_dir = "instances"
        run_folder_prefix = "run_"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.executable_path.as_deref(), Some("/opt/bin/opt"));
        assert_eq!(config.visualisation.schedule_chart_size, (3200, 1800));
        assert_eq!(config.tui.colors.border, "cyan");
        assert_eq!(config.keybindings.up, "k");
    }
}
