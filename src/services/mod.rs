pub mod document_composer;
pub mod paginator;
pub mod pdf_writer;
pub mod score_normalizer;

pub use document_composer::compose;
pub use paginator::{paginate, pagination_plan, PaginationPlan};
pub use pdf_writer::PdfWriter;
pub use score_normalizer::normalize;
