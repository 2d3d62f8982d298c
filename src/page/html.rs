//! # page::html
//!
//! [`HtmlPage`] — a [`Page`] backed by a parsed HTML document.
//!
//! The host binary feeds it a saved copy of the trading page and reloads it
//! whenever the file changes.  Each load bumps a generation counter that is
//! stamped into every [`HtmlNode`], so a handle taken from an earlier document
//! never resolves against the current one.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::error::{PageError, PageResult};
use crate::page::Page;

/// Back-reference into an [`HtmlPage`]: document generation + tree slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HtmlNode {
    generation: u64,
    id: NodeId,
}

pub struct HtmlPage {
    document:   Html,
    generation: u64,
    path:       String,
    /// Explicit title; `None` means "use the document's `<title>`".
    title:      Option<String>,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document:   Html::parse_document(html),
            generation: 0,
            path:       "/".to_string(),
            title:      None,
        }
    }

    /// Builder-style variant of [`HtmlPage::set_location`].
    pub fn with_location(mut self, path: impl Into<String>, title: Option<String>) -> Self {
        self.set_location(path, title);
        self
    }

    /// Replace the whole document.  Every previously issued node goes stale.
    pub fn load(&mut self, html: &str) {
        self.document = Html::parse_document(html);
        self.generation += 1;
    }

    pub fn set_location(&mut self, path: impl Into<String>, title: Option<String>) {
        self.path = path.into();
        self.title = title;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Remove `node` (and its subtree) from the live document, the way a
    /// re-rendering host page drops an element.
    pub fn detach(&mut self, node: HtmlNode) {
        if node.generation != self.generation {
            return;
        }
        if let Some(mut n) = self.document.tree.get_mut(node.id) {
            n.detach();
        }
    }

    fn handle(&self, el: ElementRef<'_>) -> HtmlNode {
        HtmlNode { generation: self.generation, id: el.id() }
    }

    /// Resolve a handle to a live element, or `None` if it went stale.
    fn resolve(&self, node: HtmlNode) -> Option<ElementRef<'_>> {
        if !self.is_attached(node) {
            return None;
        }
        self.document.tree.get(node.id).and_then(ElementRef::wrap)
    }

    fn compile(query: &str) -> PageResult<Selector> {
        Selector::parse(query).map_err(|e| PageError::InvalidSelector {
            selector: query.to_string(),
            reason:   format!("{e:?}"),
        })
    }
}

impl Page for HtmlPage {
    type Node = HtmlNode;

    fn select_first(&self, query: &str) -> PageResult<Option<HtmlNode>> {
        let selector = Self::compile(query)?;
        Ok(self
            .document
            .root_element()
            .select(&selector)
            .next()
            .map(|el| self.handle(el)))
    }

    fn select_all(&self, query: &str) -> PageResult<Vec<HtmlNode>> {
        let selector = Self::compile(query)?;
        Ok(self
            .document
            .root_element()
            .select(&selector)
            .map(|el| self.handle(el))
            .collect())
    }

    fn text(&self, node: HtmlNode) -> Option<String> {
        self.resolve(node).map(|el| el.text().collect())
    }

    fn attribute(&self, node: HtmlNode, name: &str) -> Option<String> {
        self.resolve(node)
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    fn text_nodes(&self, root: HtmlNode) -> Vec<String> {
        let Some(root) = self.resolve(root) else {
            return Vec::new();
        };

        root.descendants()
            .filter_map(|n| n.value().as_text())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn is_attached(&self, node: HtmlNode) -> bool {
        if node.generation != self.generation {
            return false;
        }
        let root_id = self.document.tree.root().id();
        self.document
            .tree
            .get(node.id)
            .map(|n| n.ancestors().any(|a| a.id() == root_id))
            .unwrap_or(false)
    }

    fn is_descendant(&self, node: HtmlNode, ancestor: HtmlNode) -> bool {
        if node.generation != self.generation || ancestor.generation != self.generation {
            return false;
        }
        self.document
            .tree
            .get(node.id)
            .map(|n| n.ancestors().any(|a| a.id() == ancestor.id))
            .unwrap_or(false)
    }

    fn location_path(&self) -> String {
        self.path.clone()
    }

    fn title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        Self::compile("title")
            .ok()
            .and_then(|sel| {
                self.document
                    .select(&sel)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <html><head><title> BTCUSDT | Futures </title></head><body>
          <div class="order-form">
            <span>Leverage</span>
            <button>20x</button>
          </div>
          <p id="note">hello <b>world</b></p>
        </body></html>"#;

    #[test]
    fn invalid_selector_is_an_error_not_a_panic() {
        let page = HtmlPage::parse(DOC);
        assert!(matches!(
            page.select_first("div[[["),
            Err(PageError::InvalidSelector { .. })
        ));
        assert!(page.select_all(":::").is_err());
    }

    #[test]
    fn text_and_text_nodes() {
        let page = HtmlPage::parse(DOC);
        let note = page.select_first("#note").unwrap().unwrap();
        assert_eq!(page.text(note).unwrap(), "hello world");

        let form = page.select_first(".order-form").unwrap().unwrap();
        assert_eq!(page.text_nodes(form), vec!["Leverage", "20x"]);
    }

    #[test]
    fn descendant_is_strict() {
        let page = HtmlPage::parse(DOC);
        let form = page.select_first(".order-form").unwrap().unwrap();
        let button = page.select_first(".order-form button").unwrap().unwrap();

        assert!(page.is_descendant(button, form));
        assert!(!page.is_descendant(form, button));
        assert!(!page.is_descendant(form, form));
    }

    #[test]
    fn title_from_document_unless_overridden() {
        let page = HtmlPage::parse(DOC);
        assert_eq!(page.title(), "BTCUSDT | Futures");

        let page = page.with_location("/en/futures/ETHUSDT", Some("ETHUSDT".into()));
        assert_eq!(page.title(), "ETHUSDT");
        assert_eq!(page.location_path(), "/en/futures/ETHUSDT");
    }

    #[test]
    fn detached_node_no_longer_resolves() {
        let mut page = HtmlPage::parse(DOC);
        let note = page.select_first("#note").unwrap().unwrap();
        assert!(page.is_attached(note));

        page.detach(note);
        assert!(!page.is_attached(note));
        assert_eq!(page.text(note), None);
        assert_eq!(page.select_first("#note").unwrap(), None);
    }

    #[test]
    fn reload_invalidates_old_handles() {
        let mut page = HtmlPage::parse(DOC);
        let note = page.select_first("#note").unwrap().unwrap();

        page.load(DOC);
        assert_eq!(page.generation(), 1);
        assert!(!page.is_attached(note));

        let fresh = page.select_first("#note").unwrap().unwrap();
        assert!(page.is_attached(fresh));
        assert_ne!(fresh, note);
    }
}
