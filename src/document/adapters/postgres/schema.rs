//! Diesel schema for document persistence.

diesel::table! {
    /// Configuration documents.
    document (id) {
        /// Caller-supplied document identifier.
        #[max_length = 255]
        id -> Varchar,
        /// Owning revision, managed outside this crate.
        revision_index -> Int4,
        /// Payload schema tag.
        #[max_length = 64]
        document_schema -> Varchar,
        /// Unique logical document key.
        #[max_length = 64]
        instance_key -> Varchar,
        /// Metadata payload as JSON text.
        document_metadata -> Text,
        /// Data payload as JSON text.
        document_data -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
