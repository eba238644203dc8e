//! The page boundary the live-reload client operates on.
//!
//! [`Document`] is the minimal slice of a DOM the reload protocol needs:
//! find elements by resource attribute, read and write those attributes, and
//! reload the whole page. [`StaticDocument`] is an in-memory implementation
//! that records every mutation, used for headless clients and tests.

use std::fmt;

use url::Url;

/// Identifies one element within a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Attributes that make an element load a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAttr {
    /// Inline source (`<script src>`, `<img src>`, ...).
    Src,
    /// Hyperlink (`<link href>`, `<a href>`, ...).
    Href,
}

impl ResourceAttr {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Href => "href",
        }
    }
}

impl fmt::Display for ResourceAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded page.
pub trait Document {
    /// URL the page was loaded from.
    fn location(&self) -> &Url;

    /// Elements carrying `attr`, in document order.
    fn elements_with(&self, attr: ResourceAttr) -> Vec<ElementId>;

    /// Raw value of `attr` on `element`.
    fn attribute(&self, element: ElementId, attr: ResourceAttr) -> Option<String>;

    /// Overwrite `attr` on `element`.
    fn set_attribute(&mut self, element: ElementId, attr: ResourceAttr, value: &str);

    /// Reload the whole page.
    fn reload(&mut self);
}

/// One element of a [`StaticDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticElement {
    pub tag: String,
    pub src: Option<String>,
    pub href: Option<String>,
}

impl StaticElement {
    fn attr_mut(&mut self, attr: ResourceAttr) -> &mut Option<String> {
        match attr {
            ResourceAttr::Src => &mut self.src,
            ResourceAttr::Href => &mut self.href,
        }
    }

    fn attr(&self, attr: ResourceAttr) -> Option<&String> {
        match attr {
            ResourceAttr::Src => self.src.as_ref(),
            ResourceAttr::Href => self.href.as_ref(),
        }
    }
}

/// A recorded attribute write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeWrite {
    pub element: ElementId,
    pub attr: ResourceAttr,
    pub value: String,
}

/// In-memory document that records mutations.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    location: Url,
    elements: Vec<StaticElement>,
    writes: Vec<AttributeWrite>,
    reloads: usize,
}

impl StaticDocument {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            elements: Vec::new(),
            writes: Vec::new(),
            reloads: 0,
        }
    }

    /// Parse `location` and create an empty document there.
    pub fn at(location: &str) -> Result<Self, url::ParseError> {
        Url::parse(location).map(Self::new)
    }

    /// Append an element and return its id.
    pub fn push(
        &mut self,
        tag: impl Into<String>,
        src: Option<&str>,
        href: Option<&str>,
    ) -> ElementId {
        self.elements.push(StaticElement {
            tag: tag.into(),
            src: src.map(str::to_string),
            href: href.map(str::to_string),
        });
        ElementId(self.elements.len() - 1)
    }

    /// Append a `<link rel="stylesheet" href>`.
    pub fn push_stylesheet(&mut self, href: &str) -> ElementId {
        self.push("link", None, Some(href))
    }

    /// Append a `<script src>`.
    pub fn push_script(&mut self, src: &str) -> ElementId {
        self.push("script", Some(src), None)
    }

    pub fn element(&self, id: ElementId) -> Option<&StaticElement> {
        self.elements.get(id.0)
    }

    /// Every attribute write, in order.
    pub fn writes(&self) -> &[AttributeWrite] {
        &self.writes
    }

    /// Number of full reloads requested.
    pub fn reloads(&self) -> usize {
        self.reloads
    }
}

impl Document for StaticDocument {
    fn location(&self) -> &Url {
        &self.location
    }

    fn elements_with(&self, attr: ResourceAttr) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.attr(attr).is_some())
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn attribute(&self, element: ElementId, attr: ResourceAttr) -> Option<String> {
        self.elements.get(element.0)?.attr(attr).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, attr: ResourceAttr, value: &str) {
        if let Some(el) = self.elements.get_mut(element.0) {
            *el.attr_mut(attr) = Some(value.to_string());
            self.writes.push(AttributeWrite {
                element,
                attr,
                value: value.to_string(),
            });
        }
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_with_attr() {
        let mut doc = StaticDocument::at("http://localhost:4000/").unwrap();
        let css = doc.push_stylesheet("/style.css");
        let js = doc.push_script("/app.js");
        let both = doc.push("a", Some("/x"), Some("/y"));

        assert_eq!(doc.elements_with(ResourceAttr::Href), vec![css, both]);
        assert_eq!(doc.elements_with(ResourceAttr::Src), vec![js, both]);
    }

    #[test]
    fn test_set_attribute_records_writes() {
        let mut doc = StaticDocument::at("http://localhost:4000/").unwrap();
        let css = doc.push_stylesheet("/style.css");

        doc.set_attribute(css, ResourceAttr::Href, "");
        doc.set_attribute(css, ResourceAttr::Href, "/style.css");

        assert_eq!(doc.writes().len(), 2);
        assert_eq!(doc.writes()[0].value, "");
        assert_eq!(
            doc.attribute(css, ResourceAttr::Href).as_deref(),
            Some("/style.css")
        );
    }

    #[test]
    fn test_unknown_element_is_ignored() {
        let mut doc = StaticDocument::at("http://localhost:4000/").unwrap();
        doc.set_attribute(ElementId(7), ResourceAttr::Src, "x");
        assert!(doc.writes().is_empty());
        assert_eq!(doc.attribute(ElementId(7), ResourceAttr::Src), None);
    }

    #[test]
    fn test_reload_counter() {
        let mut doc = StaticDocument::at("http://localhost:4000/").unwrap();
        doc.reload();
        doc.reload();
        assert_eq!(doc.reloads(), 2);
    }

    #[test]
    fn test_attr_names() {
        assert_eq!(ResourceAttr::Src.to_string(), "src");
        assert_eq!(ResourceAttr::Href.as_str(), "href");
    }
}
