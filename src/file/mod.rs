pub mod factory;
pub mod r#trait;
pub mod types;

pub use factory::ExtractorFactory;
pub use r#trait::{DocumentSource, TextExtractor};
pub use types::{DocxExtractor, PdfExtractor};
