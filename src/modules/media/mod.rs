pub mod model;
pub mod service;
pub mod storage;
pub mod storage_disk;
pub mod storage_http;

pub use model::{PendingFile, UploadConfig};
pub use service::MediaService;
pub use storage::BlobStore;
pub use storage_disk::StorageDisk;
pub use storage_http::StorageHttp;
