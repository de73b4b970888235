use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 列出可供选择的子目录名（非隐藏目录），按名称排序
pub fn list_subfolders(path: &Path) -> Result<Vec<String>> {
    // 检查目录是否存在
    if !path.exists() {
        anyhow::bail!("Directory '{}' does not exist", path.display());
    }

    if !path.is_dir() {
        anyhow::bail!("'{}' is not a directory", path.display());
    }

    let mut folders: Vec<String> = WalkDir::new(path)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)                                   // 过滤掉错误条目
        .filter(is_eligible_folder)                               // 保留可选目录
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    folders.sort();
    Ok(folders)
}

/// 检查条目是否为目录且名称不以 "." 开头
fn is_eligible_folder(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| !name.is_empty() && !name.starts_with('.'))
            .unwrap_or(false)
}

/// 删除目录（如存在）后重新创建空目录
pub fn recreate_dir(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;

    Ok(())
}

/// 在给定的搜索路径（PATH格式）中查找可执行文件
pub fn resolve_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let search_path = search_path?;

    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| executable_candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

/// 普通文件，且在Unix下至少有一个执行位
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// 当前平台下某目录中可执行文件的候选路径
fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut candidates = vec![dir.join(name)];
    if cfg!(windows) && Path::new(name).extension().is_none() {
        candidates.push(dir.join(format!("{}.exe", name)));
    }
    candidates
}
