//! Parser lookup by source format

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use campuscal_domain::SourceFormat;

use super::ports::SourceParser;

/// One registered parser per [`SourceFormat`]
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<SourceFormat, Arc<dyn SourceParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `parser` under its own format, replacing any previous one
    pub fn register(&mut self, parser: Arc<dyn SourceParser>) -> Option<Arc<dyn SourceParser>> {
        self.parsers.insert(parser.format(), parser)
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_parser(mut self, parser: Arc<dyn SourceParser>) -> Self {
        self.register(parser);
        self
    }

    pub fn get(&self, format: SourceFormat) -> Option<Arc<dyn SourceParser>> {
        self.parsers.get(&format).cloned()
    }

    pub fn contains(&self, format: SourceFormat) -> bool {
        self.parsers.contains_key(&format)
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<String> = self.parsers.keys().map(ToString::to_string).collect();
        formats.sort();
        f.debug_struct("ParserRegistry").field("formats", &formats).finish()
    }
}

#[cfg(test)]
mod tests {
    use campuscal_domain::{CalendarEntry, Result};

    use super::*;

    struct FixedParser(SourceFormat, usize);

    impl SourceParser for FixedParser {
        fn format(&self) -> SourceFormat {
            self.0
        }

        fn parse(&self, _body: &[u8]) -> Result<Vec<CalendarEntry>> {
            Ok(Vec::with_capacity(self.1))
        }
    }

    #[test]
    fn registers_by_format() {
        let registry = ParserRegistry::new()
            .with_parser(Arc::new(FixedParser(SourceFormat::ICalendar, 0)))
            .with_parser(Arc::new(FixedParser(SourceFormat::JsonFeed, 0)));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains(SourceFormat::ICalendar));
        assert!(registry.get(SourceFormat::AcademicHtml).is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut registry = ParserRegistry::new();
        assert!(registry.register(Arc::new(FixedParser(SourceFormat::JsonFeed, 1))).is_none());
        assert!(registry.register(Arc::new(FixedParser(SourceFormat::JsonFeed, 2))).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn debug_lists_formats() {
        let registry = ParserRegistry::new().with_parser(Arc::new(FixedParser(SourceFormat::JsonFeed, 0)));
        assert!(format!("{registry:?}").contains("json_feed"));
    }
}
