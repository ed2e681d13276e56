//! CSS selector matching over [`SvgDocument`] elements.
//!
//! Parsing and matching are done by the `selectors` crate: type, `#id`, `.class`, attribute
//! selectors, combinators and structural pseudo-classes (`:first-child`, `:not(..)`, ...).
//! State pseudo-classes and pseudo-elements are rejected at parse time.

use std::fmt;

use cssparser::ToCss;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingMode, QuirksMode};
use selectors::matching::{self, MatchingContext};
use selectors::parser::{SelectorImpl, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, parser};

use crate::{
    foundation::error::{KeyplayError, KeyplayResult},
    svg::document::{NodeId, SVG_NS, SvgDocument},
};

#[derive(Clone, Debug)]
pub struct SvgSelectors;

impl SelectorImpl for SvgSelectors {
    type ExtraMatchingData = ();
    type AttrValue = String;
    type Identifier = String;
    type ClassName = String;
    type PartName = String;
    type LocalName = String;
    type NamespaceUrl = String;
    type NamespacePrefix = String;
    type BorrowedNamespaceUrl = String;
    type BorrowedLocalName = String;
    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

struct SvgSelectorParser;

impl<'i> parser::Parser<'i> for SvgSelectorParser {
    type Impl = SvgSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// No state pseudo-classes exist on a static document.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub enum PseudoClass {}

impl parser::NonTSPseudoClass for PseudoClass {
    type Impl = SvgSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }

    fn has_zero_specificity(&self) -> bool {
        match *self {}
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub enum PseudoElement {}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

impl parser::PseudoElement for PseudoElement {
    type Impl = SvgSelectors;
}

/// An element of a document as seen by the matcher.
#[derive(Clone, Copy)]
struct ElementRef<'a> {
    doc: &'a SvgDocument,
    id: NodeId,
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doc.describe(self.id))
    }
}

impl<'a> ElementRef<'a> {
    fn at(&self, id: NodeId) -> Self {
        Self { doc: self.doc, id }
    }

    fn sibling(&self, offset: isize) -> Option<Self> {
        let parent = self.doc.parent(self.id)?;
        let siblings: Vec<NodeId> = self.doc.element_children(parent).collect();
        let pos = siblings.iter().position(|&s| s == self.id)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).map(|&s| self.at(s))
    }

    /// Attribute value by local name, also matching prefixed forms such as `xlink:href`.
    fn attr_by_local(&self, local: &str) -> Option<&'a str> {
        self.doc.attrs(self.id).iter().find_map(|(k, v)| {
            let k_local = k.rsplit_once(':').map_or(k.as_str(), |(_, l)| l);
            (k_local == local && !k.starts_with("xmlns")).then_some(v.as_str())
        })
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = SvgSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.doc.node_address(self.id))
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc
            .parent(self.id)
            .filter(|&p| self.doc.is_element(p))
            .map(|p| self.at(p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        false
    }

    fn has_local_name(&self, name: &String) -> bool {
        self.doc.local_name(self.id) == Some(name.as_str())
            || self.doc.tag(self.id) == Some(name.as_str())
    }

    fn has_namespace(&self, namespace: &String) -> bool {
        namespace == SVG_NS
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.doc.tag(self.id) == other.doc.tag(other.id)
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&String>,
        local_name: &String,
        operation: &AttrSelectorOperation<&String>,
    ) -> bool {
        self.attr_by_local(local_name)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class<F>(
        &self,
        pseudo: &PseudoClass,
        _context: &mut MatchingContext<SvgSelectors>,
        _flags_setter: &mut F,
    ) -> bool
    where
        F: FnMut(&Self, matching::ElementSelectorFlags),
    {
        match *pseudo {}
    }

    fn match_pseudo_element(
        &self,
        pseudo: &PseudoElement,
        _context: &mut MatchingContext<SvgSelectors>,
    ) -> bool {
        match *pseudo {}
    }

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &String, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .attr(self.id, "id")
            .is_some_and(|v| case_sensitivity.eq(v.as_bytes(), id.as_bytes()))
    }

    fn has_class(&self, name: &String, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .classes(self.id)
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.as_bytes()))
    }

    fn exported_part(&self, _: &String) -> Option<String> {
        None
    }

    fn imported_part(&self, _: &String) -> Option<String> {
        None
    }

    fn is_part(&self, _name: &String) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.doc.children(self.id).iter().all(|&c| {
            self.doc
                .text(c)
                .is_some_and(|t| t.is_empty())
        })
    }

    fn is_root(&self) -> bool {
        self.doc.parent(self.id).is_none()
    }
}

/// A parsed selector list.
#[derive(Clone, Debug)]
pub struct Selector {
    source: String,
    list: SelectorList<SvgSelectors>,
}

impl Selector {
    pub fn parse(source: &str) -> KeyplayResult<Self> {
        let source = source.trim();
        let mut input = cssparser::ParserInput::new(source);
        let list = SelectorList::parse(&SvgSelectorParser, &mut cssparser::Parser::new(&mut input))
            .map_err(|e| KeyplayError::validation(format!("selector '{source}': {:?}", e.kind)))?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, doc: &SvgDocument, node: NodeId) -> bool {
        if !doc.is_element(node) {
            return false;
        }
        let element = ElementRef { doc, id: node };
        let mut context =
            MatchingContext::new(MatchingMode::Normal, None, None, QuirksMode::NoQuirks);
        self.list.0.iter().any(|s| {
            matching::matches_selector(s, 0, None, &element, &mut context, &mut |_, _| {})
        })
    }

    /// First descendant of `scope` in document order that matches. `scope` itself is not a
    /// candidate, but its ancestors take part in combinator matching.
    pub fn select_first(&self, doc: &SvgDocument, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .find(|&n| self.matches(doc, n))
    }

    pub fn select_all(&self, doc: &SvgDocument, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&n| self.matches(doc, n))
            .collect()
    }
}

impl std::str::FromStr for Selector {
    type Err = KeyplayError;

    fn from_str(s: &str) -> KeyplayResult<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/svg/select.rs"]
mod tests;
