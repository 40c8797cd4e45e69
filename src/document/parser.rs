//! XML reader for skin documents

use std::rc::Rc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::node::Element;
use crate::errors::SkinError;

/// Parse a whole document and return its single root element
///
/// `origin` names the document in error messages.
pub fn parse_document(source: &str, origin: &str) -> Result<Rc<Element>, SkinError> {
    let mut reader = Reader::from_str(source);
    reader.trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();
    let mut lines = LineCursor::default();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(source, origin, reader.buffer_position(), e.to_string()))?;

        match event {
            Event::Start(ref e) => {
                let element = start_element(e, lines.line_at(source, position))
                    .map_err(|m| parse_error(source, origin, position, m))?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = start_element(e, lines.line_at(source, position))
                    .map_err(|m| parse_error(source, origin, position, m))?;
                attach(&mut stack, &mut root, element)
                    .map_err(|m| parse_error(source, origin, position, m))?;
            }
            Event::End(_) => {
                if let Some(mut element) = stack.pop() {
                    if let Some(text) = element.text.take() {
                        element.text = (!text.is_empty()).then_some(text);
                    }
                    attach(&mut stack, &mut root, element)
                        .map_err(|m| parse_error(source, origin, position, m))?;
                }
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|err| parse_error(source, origin, position, err.to_string()))?;
                append_text(&mut stack, &text);
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e).to_string();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(
            source,
            origin,
            source.len(),
            format!("unclosed element '{}'", open.tag),
        ));
    }

    root.map(Rc::new)
        .ok_or_else(|| parse_error(source, origin, source.len(), "no root element".to_string()))
}

fn start_element(e: &BytesStart<'_>, line: usize) -> Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).to_string());
    element.line = line;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| format!("attribute error: {}", e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("attribute '{}': {}", key, e))?
            .to_string();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Rc::new(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(format!("unexpected second root element '{}'", element.tag)),
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    // Whitespace between elements of the root's siblings has nowhere to go
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}

/// Running line count; offsets must be asked for in increasing order
#[derive(Debug)]
struct LineCursor {
    offset: usize,
    line: usize,
}

impl Default for LineCursor {
    fn default() -> Self {
        Self { offset: 0, line: 1 }
    }
}

impl LineCursor {
    fn line_at(&mut self, source: &str, offset: usize) -> usize {
        let offset = offset.min(source.len());
        if offset > self.offset {
            self.line += source.as_bytes()[self.offset..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = offset;
        }
        self.line
    }
}

/// 1-based line and 0-based column of a byte offset
pub fn line_and_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = match before.iter().rposition(|&b| b == b'\n') {
        Some(nl) => offset - nl - 1,
        None => offset,
    };
    (line, column)
}

fn parse_error(source: &str, origin: &str, offset: usize, message: String) -> SkinError {
    let (line, column) = line_and_column(source, offset);
    SkinError::Parse {
        path: origin.to_string(),
        line,
        column,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_with_attributes_and_text() {
        let root = parse_document(
            r##"<skin>
	<colors>
		<color name="key_red" value="#009f1313" />
	</colors>
	<screen name="Main" position="10,10">
		<widget source="title" render="Label">
			<convert type="Format">  %s &amp; more </convert>
		</widget>
	</screen>
</skin>"##,
            "test.xml",
        )
        .unwrap();

        assert_eq!(root.tag, "skin");
        assert_eq!(root.children.len(), 2);

        let color = &root.children[0].children[0];
        assert_eq!(color.attr("value"), Some("#009f1313"));
        assert_eq!(color.line, 3);

        let screen = &root.children[1];
        assert_eq!(screen.attributes[0], ("name".to_string(), "Main".to_string()));
        let convert = &screen.children[0].children[0];
        assert_eq!(convert.text(), "  %s & more ");
    }

    #[test]
    fn test_parse_error_reports_location() {
        let err = parse_document("<skin>\n  <colors>\n</skin>", "broken.xml").unwrap_err();
        match err {
            SkinError::Parse { path, line, .. } => {
                assert_eq!(path, "broken.xml");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_and_multiple_roots() {
        assert!(parse_document("", "empty.xml").is_err());
        assert!(parse_document("<a/><b/>", "two.xml").is_err());
        assert!(parse_document("<skin>", "open.xml").is_err());
    }

    #[test]
    fn test_element_lines_follow_the_source() {
        let root = parse_document("<skin>\n<a/>\n\n<b>\n<c/></b>\n</skin>", "lines.xml").unwrap();
        let lines: Vec<usize> = root.children.iter().map(|c| c.line).collect();
        assert_eq!(root.line, 1);
        assert_eq!(lines, vec![2, 4]);
        assert_eq!(root.children[1].children[0].line, 5);
    }

    #[test]
    fn test_large_document_parses_in_linear_time() {
        let mut source = String::from("<skin>\n<colors>\n");
        for i in 0..20_000 {
            source.push_str(&format!("<color name=\"c{}\" value=\"#00{:06x}\"/>\n", i, i));
        }
        source.push_str("</colors>\n</skin>\n");

        let started = std::time::Instant::now();
        let root = parse_document(&source, "big.xml").unwrap();
        let elapsed = started.elapsed();

        let colors = &root.children[0].children;
        assert_eq!(colors.len(), 20_000);
        assert_eq!(colors[19_999].line, 20_002);
        assert!(elapsed < std::time::Duration::from_secs(2), "took {:?}", elapsed);
    }

    #[test]
    fn test_line_and_column() {
        assert_eq!(line_and_column("ab\ncd", 4), (2, 1));
        assert_eq!(line_and_column("ab", 1), (1, 1));
    }
}
