//! Application services for document persistence.

mod store;

pub use store::{
    CreateDocumentRequest, DocumentService, DocumentServiceError, DocumentServiceResult,
    UpdateDocumentRequest,
};
