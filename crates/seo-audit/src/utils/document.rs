use scraper::{Html, Node, Selector};

/// Tags whose text never counts as visible page content.
const HIDDEN_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// An element snapshot taken out of a parsed document.
///
/// Elements own their data so analyzers never hold on to the source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl Element {
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attribute value. Attribute names are matched case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value trimmed, with empty values treated as missing.
    pub fn attr_trimmed(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|value| !value.is_empty())
    }

    /// Whether `name` equals `value`, ignoring case and surrounding/repeated whitespace.
    pub fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name).is_some_and(|actual| {
            let normalized = actual.split_whitespace().collect::<Vec<_>>().join(" ");
            normalized.eq_ignore_ascii_case(value)
        })
    }

    /// Descendant text with whitespace collapsed and trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Read-only view over a page's markup.
pub trait Document {
    /// Every element whose tag is one of `tags`, in document order.
    fn elements(&self, tags: &[&str]) -> Vec<Element>;

    /// Text of the page with `script` and `style` subtrees removed,
    /// one space between text nodes.
    fn visible_text(&self) -> String;

    fn first(&self, tag: &str) -> Option<Element> {
        self.elements(&[tag]).into_iter().next()
    }

    /// First `tag` element whose attribute `name` matches `value`.
    fn first_with_attr(&self, tag: &str, name: &str, value: &str) -> Option<Element> {
        self.elements(&[tag])
            .into_iter()
            .find(|element| element.attr_is(name, value))
    }
}

/// [`Document`] backed by a `scraper` HTML tree.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

impl From<Html> for HtmlDocument {
    fn from(html: Html) -> Self {
        Self { html }
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

impl Document for HtmlDocument {
    fn elements(&self, tags: &[&str]) -> Vec<Element> {
        if tags.is_empty() {
            return Vec::new();
        }
        // An unparsable tag list simply matches nothing.
        let Ok(selector) = Selector::parse(&tags.join(", ")) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .map(|element| {
                let value = element.value();
                let attributes = value
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                Element::new(value.name(), attributes, collapse_whitespace(element.text()))
            })
            .collect()
    }

    fn visible_text(&self) -> String {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Text(text) => {
                    let hidden = node.ancestors().any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .is_some_and(|element| HIDDEN_TEXT_TAGS.contains(&element.name()))
                    });
                    (!hidden).then_some(&**text)
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_in_document_order() {
        let html = r#"
            <html>
                <body>
                    <h2>Second level</h2>
                    <h1>First level</h1>
                    <h3>  Third
                        level </h3>
                </body>
            </html>
        "#;
        let document = HtmlDocument::parse(html);
        let headings = document.elements(&["h1", "h2", "h3"]);

        let names: Vec<&str> = headings.iter().map(|h| h.name()).collect();
        assert_eq!(names, vec!["h2", "h1", "h3"]);
        assert_eq!(headings[2].text(), "Third level");
    }

    #[test]
    fn test_attribute_lookup() {
        let html = r#"
            <html>
                <head>
                    <meta name="Description" content="  Some text  ">
                    <link rel="shortcut  icon" href="/favicon.ico">
                </head>
            </html>
        "#;
        let document = HtmlDocument::parse(html);

        let meta = document
            .first_with_attr("meta", "name", "description")
            .expect("description meta");
        assert_eq!(meta.attr("content"), Some("  Some text  "));
        assert_eq!(meta.attr_trimmed("content"), Some("Some text"));
        assert!(document.first_with_attr("link", "rel", "shortcut icon").is_some());
        assert!(document.first_with_attr("link", "rel", "icon").is_none());
    }

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let html = r#"
            <html>
                <head>
                    <style>body { color: red; }</style>
                    <script>var hidden = "code";</script>
                </head>
                <body>
                    <p>Hello <b>world</b></p>
                    <script type="application/ld+json">{"a": 1}</script>
                </body>
            </html>
        "#;
        let document = HtmlDocument::parse(html);
        let text = document.visible_text();

        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
        assert!(!text.contains("\"a\""));
    }

    #[test]
    fn test_missing_elements() {
        let document = HtmlDocument::parse("<html><body></body></html>");
        assert!(document.first("title").is_none());
        assert!(document.elements(&[]).is_empty());
    }
}
