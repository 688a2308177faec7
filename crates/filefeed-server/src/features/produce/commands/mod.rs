pub mod produce;

pub use produce::{ProduceFileCommand, ProduceFileError, ProduceFileResponse};
