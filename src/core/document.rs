//! The small slice of a parsed HTML tree the extractors need.

use scraper::ElementRef;

/// Attribute condition for [`Node::find`] / [`Node::find_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch<'q> {
    Any,
    /// A query containing whitespace must equal the whole `class` attribute;
    /// a single word matches any one class.
    Class(&'q str),
    /// No `class` attribute at all.
    NoClass,
    Id(&'q str),
    Attr(&'q str, &'q str),
}

pub trait Node: Sized + Copy {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn text_content(&self) -> String;
    /// Descendants in document order, excluding the node itself.
    fn descendant_elements(&self) -> Vec<Self>;

    fn matches(&self, tag: &str, condition: AttrMatch<'_>) -> bool {
        if !self.tag().eq_ignore_ascii_case(tag) {
            return false;
        }
        match condition {
            AttrMatch::Any => true,
            AttrMatch::Class(query) => match self.attr("class") {
                Some(class) if query.contains(char::is_whitespace) => class == query,
                Some(class) => class.split_whitespace().any(|token| token == query),
                None => false,
            },
            AttrMatch::NoClass => self.attr("class").is_none(),
            AttrMatch::Id(id) => self.attr("id") == Some(id),
            AttrMatch::Attr(name, value) => self.attr(name) == Some(value),
        }
    }

    fn find(&self, tag: &str, condition: AttrMatch<'_>) -> Option<Self> {
        self.descendant_elements()
            .into_iter()
            .find(|node| node.matches(tag, condition))
    }

    fn find_all(&self, tag: &str, condition: AttrMatch<'_>) -> Vec<Self> {
        self.descendant_elements()
            .into_iter()
            .filter(|node| node.matches(tag, condition))
            .collect()
    }
}

impl<'a> Node for ElementRef<'a> {
    fn tag(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn descendant_elements(&self) -> Vec<Self> {
        std::ops::Deref::deref(self)
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }
}
