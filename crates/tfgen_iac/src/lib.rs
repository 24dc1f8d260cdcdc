//! # tfgen_iac
//!
//! Writes generated Terraform and documentation to disk, and reads a
//! generated tree back.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── modules/<module_name>/<filename>
//! ├── environments/<env_name>/{main.tf,variables.tf,outputs.tf,provider.tf,terraform.tfvars.example}
//! ├── README.md
//! ├── DEPLOYMENT.md, SECURITY.md, TROUBLESHOOTING.md, architecture.mmd   (when present)
//! └── requirements.json, architecture.json, run.json                   (metadata)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tfgen_core::CodeBundle;
//! use tfgen_iac::{read_code_bundle, write_code_bundle};
//!
//! # fn demo(bundle: &CodeBundle) -> tfgen_iac::IacResult<()> {
//! let written = write_code_bundle(bundle, Path::new("./output"))?;
//! let reread = read_code_bundle(Path::new("./output"))?;
//! assert_eq!(reread.file_count(), written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IacError, IacResult};
pub use reader::read_code_bundle;
pub use writer::{write_code_bundle, write_documentation, write_json};
