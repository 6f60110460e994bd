pub mod app;

// Re-export useful types for library users
pub use app::config::{AppConfig, SchemaFilter};
pub use app::formatter::OutputGenerator;
pub use app::inspector::Inspector;
pub use app::models::{ColumnRecord, DocumentSummary, ForeignKeyRecord, RenderedDocument};
pub use app::{generate_document, run};
