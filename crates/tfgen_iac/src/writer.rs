//! Writes generated artifacts into an output directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use tfgen_core::{CodeBundle, Documentation};

use crate::error::{IacError, IacResult};

/// Write every module and environment file of a bundle under `root`.
///
/// Module files land in `modules/<module_name>/<filename>`, environment
/// files in `environments/<env_name>/<filename>` (only the fields that are
/// present). Returns the written paths in bundle order.
///
/// Every path is checked before the first file is written, so an unsafe
/// entry leaves `root` untouched.
pub fn write_code_bundle(bundle: &CodeBundle, root: &Path) -> IacResult<Vec<PathBuf>> {
    info!("Writing Terraform code to {:?}", root);

    let planned = bundle
        .file_entries()
        .into_iter()
        .map(|(relative, content)| Ok((safe_join(root, &relative)?, content)))
        .collect::<IacResult<Vec<_>>>()?;

    let mut written = Vec::with_capacity(planned.len());
    for (target, content) in planned {
        write_file(&target, &content)?;
        written.push(target);
    }

    info!(
        modules = bundle.modules.len(),
        environments = bundle.environments.len(),
        files = written.len(),
        "Terraform code written"
    );
    Ok(written)
}

/// Write documentation files under `root`.
///
/// `README.md` is always written; the auxiliary documents only when their
/// content is non-blank.
pub fn write_documentation(doc: &Documentation, root: &Path) -> IacResult<Vec<PathBuf>> {
    fs::create_dir_all(root)?;

    let mut written = Vec::new();
    for (kind, content) in doc.populated() {
        let target = root.join(kind.filename());
        write_file(&target, content)?;
        written.push(target);
    }

    info!(files = written.len(), "Documentation written to {:?}", root);
    Ok(written)
}

/// Write a value as pretty JSON to `root/<filename>`.
pub fn write_json<T: Serialize>(value: &T, root: &Path, filename: &str) -> IacResult<PathBuf> {
    let target = safe_join(root, Path::new(filename))?;
    let content = tfgen_core::to_pretty_json(value)?;
    write_file(&target, &content)?;
    Ok(target)
}

fn write_file(target: &Path, content: &str) -> IacResult<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, content)?;
    debug!("Wrote {:?} ({} bytes)", target, content.len());
    Ok(())
}

/// Join a generated relative path onto `root`, refusing anything that could
/// land outside it.
fn safe_join(root: &Path, relative: &Path) -> IacResult<PathBuf> {
    let mut components = relative.components().peekable();
    if components.peek().is_none() {
        return Err(IacError::UnsafePath(relative.display().to_string()));
    }
    for component in components {
        if !matches!(component, Component::Normal(_)) {
            return Err(IacError::UnsafePath(relative.display().to_string()));
        }
    }
    Ok(root.join(relative))
}
