//! Custom extractors that reject with the shared error envelope.

pub mod multipart_form;
pub mod request_origin;
pub mod uuid_path;

pub use multipart_form::MultipartForm;
pub use request_origin::RequestOrigin;
pub use uuid_path::UuidPath;
