//! Reads a generated output tree back into a [`CodeBundle`].

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use tfgen_core::{CodeBundle, EnvironmentConfig, TerraformFile, TerraformModule};

use crate::error::{IacError, IacResult};

/// Rebuild a code bundle from `root/modules` and `root/environments`.
///
/// Module files are collected recursively and sorted by path. Environment
/// directories only contribute the five known environment files; anything
/// else there is ignored. The terraform version is taken from `run.json`
/// when present.
pub fn read_code_bundle(root: &Path) -> IacResult<CodeBundle> {
    let modules_dir = root.join("modules");
    let environments_dir = root.join("environments");
    if !modules_dir.is_dir() && !environments_dir.is_dir() {
        return Err(IacError::NotATree(root.to_path_buf()));
    }

    let mut bundle = CodeBundle {
        terraform_version: read_terraform_version(root),
        ..Default::default()
    };

    for module_dir in subdirectories(&modules_dir)? {
        let module_name = file_name(&module_dir);
        let mut files = Vec::new();

        for entry in WalkDir::new(&module_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&module_dir)
                .map_err(|_| IacError::UnsafePath(entry.path().display().to_string()))?;
            let filename = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(TerraformFile::new(filename, fs::read_to_string(entry.path())?));
        }

        debug!(module = %module_name, files = files.len(), "Read module");
        bundle.modules.push(TerraformModule {
            path: format!("modules/{}", module_name),
            module_name,
            files,
        });
    }

    for env_dir in subdirectories(&environments_dir)? {
        let env_name = file_name(&env_dir);
        let mut config = EnvironmentConfig::default();

        for entry in WalkDir::new(&env_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            let content = fs::read_to_string(entry.path())?;
            if !config.set_file(&filename, content) {
                debug!(environment = %env_name, file = %filename, "Ignoring unknown environment file");
            }
        }

        bundle.environments.insert(env_name, config);
    }

    Ok(bundle)
}

fn read_terraform_version(root: &Path) -> String {
    let path = root.join("run.json");
    let Ok(content) = fs::read_to_string(&path) else {
        return String::new();
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => value
            .get("terraform_version")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        Err(e) => {
            warn!("Ignoring unreadable {:?}: {}", path, e);
            String::new()
        }
    }
}

fn subdirectories(dir: &Path) -> IacResult<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
