pub mod archive;
pub mod desktop_entry;
pub mod downloader;
pub mod layout;
pub mod report;

pub use archive::{stage_archive, Compression, StagedInstall};
pub use desktop_entry::DesktopEntry;
pub use downloader::{ArchiveDownloader, DownloadProgress};
pub use layout::InstallLayout;
pub use report::{InstallReport, InstallSummary};
