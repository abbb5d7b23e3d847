pub mod catalog;
pub mod channel;
pub mod fetcher;
pub mod selection;

pub use catalog::Catalog;
pub use channel::ReleaseChannel;
pub use fetcher::{build_client, fetch_download_page, DownloadPage};
pub use selection::Selection;
