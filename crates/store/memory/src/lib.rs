mod repository;

pub use repository::MemoryDownloadsRepository;
