use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::model::*;

pub const ROOT_TAG: &str = "Problem";
pub const DEFAULT_TITLE: &str = "Untitled";
pub const MISSING_STEP_STATEMENT: &str = "(No Step)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("invalid document: {0}")]
    Malformed(String),
    #[error("not a problem document (root element is <{found}>, expected <Problem>)")]
    WrongSchema { found: String },
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
}

pub fn parse_problem(content: &str) -> Result<Problem, LoadError> {
    let root = parse_tree(content)?;
    if root.name != ROOT_TAG {
        return Err(LoadError::WrongSchema { found: root.name });
    }

    let title = root
        .child("Title")
        .and_then(XmlElement::non_empty_text)
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let statement = root
        .child("Statement")
        .and_then(XmlElement::non_empty_text)
        .unwrap_or_default();

    let steps = match root.child("Steps") {
        Some(container) => container
            .children_named("ProblemStep")
            .enumerate()
            .map(|(pos, node)| Step {
                index: pos + 1,
                statement: node
                    .child("Statement")
                    .and_then(XmlElement::non_empty_text)
                    .unwrap_or_else(|| MISSING_STEP_STATEMENT.to_string()),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(Problem {
        title,
        statement,
        steps,
    })
}

#[derive(Debug)]
struct XmlElement {
    name: String,
    children: Vec<XmlNode>,
}

#[derive(Debug)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter_map(move |node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }

    fn non_empty_text(&self) -> Option<String> {
        let text = self.text_content();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn parse_tree(content: &str) -> Result<XmlElement, LoadError> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            LoadError::Malformed(format!(
                "XML error at byte {}: {}",
                reader.error_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(LoadError::Malformed(
                        "more than one root element".to_string(),
                    ));
                }
                stack.push(XmlElement {
                    name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    children: Vec::new(),
                });
            }
            Event::Empty(e) => {
                let el = XmlElement {
                    name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                    children: Vec::new(),
                };
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack.pop().ok_or_else(|| {
                    LoadError::Malformed("closing tag without opening tag".to_string())
                })?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| LoadError::Malformed(format!("bad text content: {}", e)))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LoadError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| LoadError::Malformed("document has no root element".to_string()))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), LoadError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Element(el));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err(LoadError::Malformed(
            "more than one root element".to_string(),
        )),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), LoadError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(LoadError::Malformed(
            "text outside the root element".to_string(),
        )),
    }
}
