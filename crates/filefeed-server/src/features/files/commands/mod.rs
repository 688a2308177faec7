pub mod delete;
pub mod upload;

pub use delete::{DeleteFileCommand, DeleteFileError};
pub use upload::{UploadFileCommand, UploadFileError};
