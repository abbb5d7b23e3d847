#![allow(dead_code)]

pub mod page_server;

use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::path::Path;

pub const ARCHIVE_PATH: &str = "/pub/firefox/releases/firefox.tar.gz";
pub const LAUNCHER: &str = "#!/bin/sh\necho firefox\n";

/// A download page offering release and beta builds for Linux.
///
/// `de` is listed as a release language but has no download anchor.
pub fn download_page(archive_href: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en-US">
<body>
  <select id="select-product">
    <option value="desktop_release">Firefox</option>
    <option value="desktop_beta">Firefox Beta</option>
    <option value="android_release">Firefox for Android</option>
  </select>

  <select id="select_desktop_release_platform">
    <option value="win64">Windows 64-bit</option>
    <option value="linux64">Linux 64-bit</option>
    <option value="linux">Linux 32-bit</option>
  </select>
  <select id="select_desktop_release_language">
    <option value="en-US">English (US)</option>
    <option value="fr">Français</option>
    <option value="de">Deutsch</option>
  </select>

  <select id="select_desktop_beta_platform">
    <option value="linux64">Linux 64-bit</option>
  </select>
  <select id="select_desktop_beta_language">
    <option value="en-US">English (US)</option>
  </select>

  <ol data-product="desktop_release">
    <li data-language="en-US">
      <a href="/win" data-download-version="win64" data-link-type="download">Windows</a>
      <a href="{href}" data-download-version="linux64" data-link-type="download">Linux 64-bit</a>
    </li>
    <li data-language="fr">
      <a href="{href}" data-download-version="linux64" data-link-type="download">Linux 64-bit</a>
    </li>
  </ol>
  <ol data-product="desktop_beta">
    <li data-language="en-US">
      <a href="{href}" data-download-version="linux64" data-link-type="download">Linux 64-bit</a>
    </li>
  </ol>
</body>
</html>"#,
        href = archive_href
    )
}

/// A gzip-compressed tar laid out like a Firefox release.
pub fn firefox_archive() -> Result<Vec<u8>> {
    tar_gz(&[
        ("firefox/firefox", LAUNCHER, 0o755),
        ("firefox/application.ini", "[App]\nName=Firefox\n", 0o644),
        (
            "firefox/browser/chrome/icons/default/default128.png",
            "png",
            0o644,
        ),
    ])
}

pub fn tar_gz(entries: &[(&str, &str, u32)]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, contents, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(*mode);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, path, contents.as_bytes())?;
    }

    Ok(builder.into_inner()?.finish()?)
}

pub fn read(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
