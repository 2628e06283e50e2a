//! Minimal XML element tree for Query-protocol responses.
//!
//! Elements are keyed by local name; namespace prefixes and attributes are
//! dropped. Text of an element is the concatenation of its text and CDATA
//! children.

use crate::error::DecodeError;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descend through `path`, one child name per step.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |node, step| node.child(step))
    }

    /// Text at `path`, if the element exists.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).map(|e| e.text.as_str())
    }
}

/// Parse a whole document and return its root element.
pub fn parse(body: &[u8]) -> Result<XmlElement, DecodeError> {
    let body = std::str::from_utf8(body)
        .map_err(|e| DecodeError::Malformed(format!("body is not UTF-8: {}", e)))?;

    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(DecodeError::Malformed(
                        "content after the root element".to_string(),
                    ));
                }
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(XmlElement::named(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                close(&mut stack, &mut root, XmlElement::named(name))?;
            }
            Event::End(_) => {
                let done = stack.pop().ok_or_else(|| {
                    DecodeError::Malformed("closing tag without an opening tag".to_string())
                })?;
                close(&mut stack, &mut root, done)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None => {
                        return Err(DecodeError::Malformed(format!(
                            "text outside the root element: {:?}",
                            truncate(&text)
                        )))
                    }
                }
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DecodeError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| DecodeError::Malformed("document has no root element".to_string()))
}

fn close(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    done: XmlElement,
) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(done),
        None if root.is_none() => *root = Some(done),
        None => {
            return Err(DecodeError::Malformed(
                "more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn truncate(s: &str) -> String {
    s.chars().take(64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_ignoring_namespaces() {
        let xml = br#"<?xml version="1.0"?>
            <DescribeLogGroupsResponse xmlns="http://logs.amazonaws.com/doc/2014-03-28/">
              <DescribeLogGroupsResult>
                <LogGroups>
                  <member><LogGroupName>a</LogGroupName></member>
                  <member><LogGroupName>b</LogGroupName></member>
                </LogGroups>
                <NextToken/>
              </DescribeLogGroupsResult>
            </DescribeLogGroupsResponse>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.name, "DescribeLogGroupsResponse");
        let groups = root
            .find(&["DescribeLogGroupsResult", "LogGroups"])
            .unwrap();
        let names: Vec<_> = groups
            .children_named("member")
            .filter_map(|m| m.text_at(&["LogGroupName"]))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            root.text_at(&["DescribeLogGroupsResult", "NextToken"]),
            Some("")
        );
    }

    #[test]
    fn prefixed_names_use_local_part() {
        let root = parse(b"<ns:Root xmlns:ns=\"urn:x\"><ns:RequestId>1</ns:RequestId></ns:Root>").unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.text_at(&["RequestId"]), Some("1"));
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let root = parse(b"<A><B>x &amp; y</B><C><![CDATA[<raw>]]></C></A>").unwrap();
        assert_eq!(root.text_at(&["B"]), Some("x & y"));
        assert_eq!(root.text_at(&["C"]), Some("<raw>"));
    }

    #[test]
    fn rejects_plain_text() {
        assert!(matches!(parse(b"this is not xml"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_empty_body() {
        assert!(matches!(parse(b""), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_unclosed_root() {
        assert!(matches!(parse(b"<A><B>1</B>"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(parse(b"<A><B>1</C></A>"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_two_roots() {
        assert!(matches!(parse(b"<A/><B/>"), Err(DecodeError::Malformed(_))));
    }
}
