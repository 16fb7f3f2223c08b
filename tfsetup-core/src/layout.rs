//! Fixed file and directory names tfsetup reads and writes.
//!
//! # Layout
//!
//! ```text
//! <ancestor>/
//!   tfsetup-config/
//!     context.json          shared context  -> `Config`
//!     setup.tmpl            shared template -> setup.tf
//!   .../<project>/          (invocation directory)
//!     tfsetup-context.json  project context -> `Project`
//!     setup.tf              generated, read-only
//!     a.txt.tfsetup.tmpl    convention template -> a.txt
//! ```

use std::path::{Path, PathBuf};

pub const PROJECT_CONTEXT_FILE: &str = "tfsetup-context.json";
pub const CONFIG_DIR: &str = "tfsetup-config";
pub const CONFIG_CONTEXT_FILE: &str = "context.json";
pub const CONFIG_TEMPLATE: &str = "setup.tmpl";
pub const SETUP_FILE: &str = "setup.tf";
pub const TEMPLATE_SUFFIX: &str = ".tfsetup.tmpl";

/// The names tfsetup uses on disk. [`Layout::default`] yields the standard
/// names; tests and embedders may override individual entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Project context file, looked up in the invocation directory.
    pub project_context_file: String,
    /// Shared configuration directory, found by upward search.
    pub config_dir: String,
    /// Shared context file inside `config_dir`.
    pub config_context_file: String,
    /// Shared template inside `config_dir`.
    pub config_template: String,
    /// Output of the shared template.
    pub setup_file: String,
    /// Suffix that marks a working-directory file as a template.
    pub template_suffix: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            project_context_file: PROJECT_CONTEXT_FILE.to_string(),
            config_dir: CONFIG_DIR.to_string(),
            config_context_file: CONFIG_CONTEXT_FILE.to_string(),
            config_template: CONFIG_TEMPLATE.to_string(),
            setup_file: SETUP_FILE.to_string(),
            template_suffix: TEMPLATE_SUFFIX.to_string(),
        }
    }
}

impl Layout {
    /// `<config_dir>/context.json`
    pub fn config_context_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.config_context_file)
    }

    /// `<config_dir>/setup.tmpl`
    pub fn config_template_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.config_template)
    }

    /// Output name for a working-directory file, or `None` when the file does
    /// not carry the template suffix. A file named exactly like the suffix has
    /// no usable output name and is skipped.
    pub fn output_name_for<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.template_suffix.as_str())
            .filter(|stem| !stem.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names() {
        let layout = Layout::default();
        assert_eq!(layout.project_context_file, "tfsetup-context.json");
        assert_eq!(layout.config_dir, "tfsetup-config");
        assert_eq!(layout.setup_file, "setup.tf");
        assert_eq!(
            layout.config_template_path(Path::new("/x/tfsetup-config")),
            PathBuf::from("/x/tfsetup-config/setup.tmpl")
        );
    }

    #[test]
    fn output_name_strips_suffix() {
        let layout = Layout::default();
        assert_eq!(layout.output_name_for("a.txt.tfsetup.tmpl"), Some("a.txt"));
        assert_eq!(layout.output_name_for("main.tf.tfsetup.tmpl"), Some("main.tf"));
    }

    #[test]
    fn output_name_rejects_non_templates() {
        let layout = Layout::default();
        assert_eq!(layout.output_name_for("setup.tf"), None);
        assert_eq!(layout.output_name_for("a.tfsetup.tmpl.bak"), None);
        assert_eq!(layout.output_name_for(".tfsetup.tmpl"), None);
    }
}
