//! Source parsers, one per [`SourceFormat`](campuscal_domain::SourceFormat)

pub mod academic_html;
pub mod ics;
pub mod json_feed;

use std::sync::Arc;

use campuscal_core::ParserRegistry;

pub use academic_html::AcademicHtmlParser;
pub use ics::IcsParser;
pub use json_feed::JsonFeedParser;

/// Registry with a parser for every supported format
pub fn default_registry() -> ParserRegistry {
    ParserRegistry::new()
        .with_parser(Arc::new(AcademicHtmlParser))
        .with_parser(Arc::new(IcsParser))
        .with_parser(Arc::new(JsonFeedParser))
}

#[cfg(test)]
mod tests {
    use campuscal_domain::SourceFormat;

    use super::*;

    #[test]
    fn default_registry_covers_every_format() {
        let registry = default_registry();
        for format in [SourceFormat::AcademicHtml, SourceFormat::ICalendar, SourceFormat::JsonFeed] {
            assert_eq!(registry.get(format).map(|p| p.format()), Some(format));
        }
    }
}
