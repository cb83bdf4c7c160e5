//! A small CSS selector subset.
//!
//! Supports type and universal selectors, `#id`, `.class`, and attribute
//! selectors (`[attr]`, `[attr="v"]`, `[attr^="v"]`), joined by descendant
//! (whitespace) or child (`>`) combinators, in comma-separated lists.

use std::str::FromStr;

use super::document::Document;
use super::element::ElementId;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq(String),
    /// `[attr^=val]`
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Type(String),
    Universal,
    Id(String),
    Class(String),
    Attribute { name: String, op: AttrOp },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Compounds stored right-to-left: `parts[0]` is the subject.
/// Each part carries the combinator linking it to the part on its left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse_list()
    }

    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, id))
    }

    /// The attribute name when the list is exactly one attribute-existence
    /// selector with no other constraint, e.g. `*[title]` or `[title]`
    pub fn bare_attribute(&self) -> Option<&str> {
        let [only] = self.selectors.as_slice() else {
            return None;
        };
        let [(compound, _)] = only.parts.as_slice() else {
            return None;
        };
        let mut name = None;
        for simple in &compound.simples {
            match simple {
                SimpleSelector::Universal => {}
                SimpleSelector::Attribute { name: n, op: AttrOp::Exists } if name.is_none() => {
                    name = Some(n.as_str());
                }
                _ => return None,
            }
        }
        name
    }
}

impl FromStr for SelectorList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl ComplexSelector {
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        match self.parts.split_first() {
            Some(((subject, link), rest)) => {
                subject.matches(doc, id) && match_rest(doc, id, link.as_ref(), rest)
            }
            None => false,
        }
    }
}

fn match_rest(
    doc: &Document,
    id: ElementId,
    link: Option<&Combinator>,
    rest: &[(CompoundSelector, Option<Combinator>)],
) -> bool {
    let Some(((compound, next_link), tail)) = rest.split_first() else {
        return true;
    };
    match link {
        Some(Combinator::Child) => match doc.parent(id) {
            Some(parent) => {
                compound.matches(doc, parent) && match_rest(doc, parent, next_link.as_ref(), tail)
            }
            None => false,
        },
        // Descendant: try every ancestor, backtracking on failure
        _ => {
            let mut current = doc.parent(id);
            while let Some(ancestor) = current {
                if compound.matches(doc, ancestor)
                    && match_rest(doc, ancestor, next_link.as_ref(), tail)
                {
                    return true;
                }
                current = doc.parent(ancestor);
            }
            false
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        let Some(element) = doc.get(id) else {
            return false;
        };
        self.simples.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Type(tag) => element.tag().eq_ignore_ascii_case(tag),
            SimpleSelector::Id(value) => element.html_id() == Some(value.as_str()),
            SimpleSelector::Class(class) => element.has_class(class),
            SimpleSelector::Attribute { name, op } => match op {
                AttrOp::Exists => element.has_attribute(name),
                AttrOp::Eq(value) => element.attribute(name).as_deref() == Some(value.as_str()),
                AttrOp::Prefix(value) => element
                    .attribute(name)
                    .map(|v| !value.is_empty() && v.starts_with(value.as_str()))
                    .unwrap_or(false),
            },
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Selector {
            selector: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<SelectorList> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                None => break,
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        // Collected left-to-right, reversed at the end
        let mut compounds = vec![self.parse_compound()?];
        let mut links: Vec<Combinator> = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    links.push(Combinator::Child);
                }
                Some(_) if had_space => links.push(Combinator::Descendant),
                Some(c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
            compounds.push(self.parse_compound()?);
        }

        let mut parts = Vec::with_capacity(compounds.len());
        let mut links = links.into_iter().rev();
        for compound in compounds.into_iter().rev() {
            parts.push((compound, links.next()));
        }
        Ok(ComplexSelector { parts })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector> {
        let mut simples = Vec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                simples.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_start(c) => {
                simples.push(SimpleSelector::Type(self.parse_ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    simples.push(SimpleSelector::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    simples.push(SimpleSelector::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    simples.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }
        if simples.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(CompoundSelector { simples })
    }

    fn parse_attribute(&mut self) -> Result<SimpleSelector> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.bump() {
            Some(']') => return Ok(SimpleSelector::Attribute { name, op: AttrOp::Exists }),
            Some('=') => AttrOp::Eq(self.parse_attr_value()?),
            Some('^') => {
                if self.bump() != Some('=') {
                    return Err(self.error("expected '=' after '^'"));
                }
                AttrOp::Prefix(self.parse_attr_value()?)
            }
            Some(c) => return Err(self.error(format!("unsupported attribute operator '{}'", c))),
            None => return Err(self.error("unterminated attribute selector")),
        };
        self.skip_whitespace();
        if self.bump() != Some(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(SimpleSelector::Attribute { name, op })
    }

    fn parse_attr_value(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
            }
            _ => self.parse_ident(),
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementSpec;

    fn sample() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let body = doc.body();
        let shapes = doc.append(body, ElementSpec::new("div").class("floating-shapes"));
        let shape = doc.append(shapes, ElementSpec::new("div").class("shape").class("shape-1"));
        let link = doc.append(body, ElementSpec::new("a").attr("href", "#about").attr("title", "About"));
        (doc, shapes, shape, link)
    }

    #[test]
    fn test_parse_structure() {
        let list = SelectorList::parse(".floating-shapes .shape").unwrap();
        assert_eq!(list.selectors.len(), 1);
        let parts = &list.selectors[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0.simples, vec![SimpleSelector::Class("shape".into())]);
        assert_eq!(parts[0].1, Some(Combinator::Descendant));
        assert_eq!(parts[1].1, None);

        let list = SelectorList::parse(".fade-in, .slide-in-left ,.scale-in").unwrap();
        assert_eq!(list.selectors.len(), 3);
    }

    #[test]
    fn test_descendant_and_child() {
        let (doc, shapes, shape, _) = sample();
        let descendant = SelectorList::parse(".floating-shapes .shape").unwrap();
        assert!(descendant.matches(&doc, shape));
        assert!(!descendant.matches(&doc, shapes));

        let child = SelectorList::parse("body > .floating-shapes > .shape").unwrap();
        assert!(child.matches(&doc, shape));
        let wrong = SelectorList::parse("body > .shape").unwrap();
        assert!(!wrong.matches(&doc, shape));
    }

    #[test]
    fn test_attribute_operators() {
        let (doc, _, shape, link) = sample();
        assert!(SelectorList::parse("a[href^=\"#\"]").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("[href='#about']").unwrap().matches(&doc, link));
        assert!(!SelectorList::parse("[href=\"#\"]").unwrap().matches(&doc, link));
        assert!(SelectorList::parse("*[title]").unwrap().matches(&doc, link));
        assert!(!SelectorList::parse("*[title]").unwrap().matches(&doc, shape));
    }

    #[test]
    fn test_bare_attribute_detection() {
        let bare = |s: &str| SelectorList::parse(s).unwrap().bare_attribute().map(str::to_string);
        assert_eq!(bare("*[title]").as_deref(), Some("title"));
        assert_eq!(bare("[title]").as_deref(), Some("title"));
        assert_eq!(bare("a[title]"), None);
        assert_eq!(bare("[data-tooltip=\"x\"]"), None);
        assert_eq!(bare("[title], .tooltip"), None);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", ".", "[title", "a[href~=x]", "div,", "#"] {
            let err = SelectorList::parse(bad).unwrap_err();
            assert!(matches!(err, Error::Selector { .. }), "{bad:?} should fail");
        }
    }
}
