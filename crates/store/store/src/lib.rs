pub mod error;
pub mod repository;
pub mod testing;

pub use error::StoreError;
pub use repository::DownloadsRepository;
