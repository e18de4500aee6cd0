pub mod tours;

pub use tours::{GenerateKmlRequest, GenerateKmlResponse, UploadResponse};
