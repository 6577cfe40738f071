mod alt_text;
mod contrast;
mod font_size;

pub use self::alt_text::AltTextCheck;
pub use self::contrast::{ColorDependencyCheck, ContrastCheck};
pub use self::font_size::{FontSizeCheck, LongTextCheck};

use crate::{AnalysisError, Category, Document, Element, EngineConfig, Finding};

/// A single accessibility check.
///
/// Checks are independent: the engine calls [`Rule::inspect`] for every
/// element of a document and [`Rule::inspect_document`] once per document,
/// then merges whatever they return.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    /// Every finding the rule returns carries this category.
    fn category(&self) -> Category;

    fn inspect(
        &self,
        element: &Element,
        config: &EngineConfig,
    ) -> Result<Vec<Finding>, AnalysisError>;

    /// Findings about the document as a whole rather than one element.
    fn inspect_document(&self, _document: &Document, _config: &EngineConfig) -> Vec<Finding> {
        Vec::new()
    }
}

pub(crate) fn builtin() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(AltTextCheck),
        Box::new(FontSizeCheck),
        Box::new(LongTextCheck),
        Box::new(ContrastCheck),
        Box::new(ColorDependencyCheck),
    ]
}
