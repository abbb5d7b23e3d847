use crate::error::{io_error_at, Result};
use crate::installer::layout::InstallLayout;
use crate::page::ReleaseChannel;
use std::fs;
use std::path::{Path, PathBuf};

/// Upstream Firefox launcher with its translations.
const TEMPLATE: &str = include_str!("../../assets/firefox.desktop");

const ICON_PATH: &str = "browser/chrome/icons/default/default128.png";

/// Characters that force an `Exec` argument to be quoted.
const EXEC_RESERVED: &[char] = &[
    ' ', '\t', '\n', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(', ')',
    '`',
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    contents: String,
}

impl DesktopEntry {
    pub fn render(channel: &ReleaseChannel, install_dir: &Path) -> Self {
        let executable = install_dir.join("firefox");
        let icon = install_dir.join(ICON_PATH);

        let contents = TEMPLATE
            .replace("@NAME_SUFFIX@", &escape_value(&channel.name_suffix()))
            .replace("@EXEC@", &exec_argument(&executable.to_string_lossy()))
            .replace("@ICON@", &escape_value(&icon.to_string_lossy()))
            .replace("@WM_CLASS@", channel.wm_class());

        Self { contents }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Writes the entry into the applications directory, replacing any
    /// earlier version.
    pub fn write(&self, layout: &InstallLayout) -> Result<PathBuf> {
        fs::create_dir_all(&layout.applications_dir)
            .map_err(|e| io_error_at(e, &layout.applications_dir))?;

        fs::write(&layout.desktop_file, self.contents.as_bytes())
            .map_err(|e| io_error_at(e, &layout.desktop_file))?;

        tracing::info!(path = %layout.desktop_file.display(), "desktop entry written");
        Ok(layout.desktop_file.clone())
    }
}

/// Escapes a value for a desktop-entry string key.
fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

/// Quotes one `Exec` argument following the desktop-entry quoting rules.
fn exec_argument(argument: &str) -> String {
    let argument = argument.replace('%', "%%");

    if !argument.contains(EXEC_RESERVED) {
        return argument;
    }

    let mut quoted = String::with_capacity(argument.len() + 2);
    quoted.push('"');
    for c in argument.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');

    // The whole value is then a string, where backslashes are escaped again.
    escape_value(&quoted)
}
