//! File formats: series CSV, reference tables and XML documents.

/// XML element tree and serializer.
pub mod markup;
/// Reference table loader.
pub mod reference;
/// Series CSV export and reload.
pub mod series_csv;
