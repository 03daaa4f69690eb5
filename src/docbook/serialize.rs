//! DocBook XML serialization.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::element::{Element, XmlNode};
use crate::error::{Error, Result};

/// Namespace declarations placed on the root element.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("xmlns", "http://docbook.org/ns/docbook"),
    ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
    ("xmlns:xi", "http://www.w3.org/2001/XInclude"),
    ("xmlns:svg", "http://www.w3.org/2000/svg"),
    ("xmlns:xhtml", "http://www.w3.org/1999/xhtml"),
    ("xmlns:mathml", "http://www.w3.org/1998/Math/MathML"),
];

/// Elements whose content is never re-indented.
///
/// Whitespace is significant in these even when they happen to hold only
/// child elements (a paragraph made of a single link, for instance).
const INLINE_CONTENT: &[&str] = &[
    "para",
    "title",
    "subtitle",
    "term",
    "programlisting",
    "link",
    "emphasis",
    "code",
    "citetitle",
    "subscript",
    "superscript",
    "phrase",
    "personname",
    "pubdate",
];

/// Serialize a finished element tree.
///
/// Element-only content is indented by `indent` spaces per level. Mixed
/// content and inline elements are written exactly as built.
pub fn serialize(root: &Element, xml_declaration: bool, indent: usize) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    if xml_declaration {
        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), Some("yes"))),
        )?;
        raw(&mut writer, "\n")?;
    }

    let mut ctx = SerializeContext {
        writer: &mut writer,
        indent,
    };
    ctx.element(root, 0, false, true)?;
    raw(&mut writer, "\n")?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Serialize(e.to_string()))
}

struct SerializeContext<'w> {
    writer: &'w mut Writer<Vec<u8>>,
    indent: usize,
}

impl SerializeContext<'_> {
    fn element(&mut self, element: &Element, depth: usize, inline: bool, root: bool) -> Result<()> {
        let mut start = BytesStart::new(element.name.as_str());
        if root {
            for &(key, value) in NAMESPACES {
                start.push_attribute((key, value));
            }
        }
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if element.children.is_empty() {
            return write(self.writer, Event::Empty(start));
        }
        write(self.writer, Event::Start(start))?;

        let inline =
            inline || element.has_text() || INLINE_CONTENT.contains(&element.name.as_str());
        for child in &element.children {
            if !inline {
                self.newline(depth + 1)?;
            }
            match child {
                XmlNode::Element(e) => self.element(e, depth + 1, inline, false)?,
                XmlNode::Text(text) => write(
                    self.writer,
                    Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))),
                )?,
                XmlNode::Comment(text) => write(
                    self.writer,
                    Event::Comment(BytesText::from_escaped(text.as_str())),
                )?,
            }
        }
        if !inline {
            self.newline(depth)?;
        }

        write(self.writer, Event::End(BytesEnd::new(element.name.as_str())))
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        let ws = format!("\n{}", " ".repeat(depth * self.indent));
        raw(self.writer, &ws)
    }
}

fn raw(writer: &mut Writer<Vec<u8>>, s: &str) -> Result<()> {
    write(writer, Event::Text(BytesText::from_escaped(s)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> XmlNode {
        XmlNode::Element(Element::new("para").with_text(text))
    }

    #[test]
    fn test_declaration_and_namespaces() {
        let root = Element::new("article").with_attr("version", "5.0");
        let xml = serialize(&root, true, 2).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n"));
        assert!(xml.contains("xmlns=\"http://docbook.org/ns/docbook\""));
        assert!(xml.contains("xmlns:xlink=\"http://www.w3.org/1999/xlink\""));
        assert!(xml.ends_with("version=\"5.0\"/>\n"));
    }

    #[test]
    fn test_no_declaration() {
        let root = Element::new("section");
        let xml = serialize(&root, false, 2).unwrap();
        assert!(xml.starts_with("<section "));
    }

    #[test]
    fn test_element_content_is_indented() {
        let mut root = Element::new("section");
        root.children.push(para("One"));
        root.children.push(para("a < b, don't"));
        let xml = serialize(&root, false, 2).unwrap();

        assert!(xml.contains(">\n  <para>One</para>\n  <para>a &lt; b, don't</para>\n</section>\n"));
    }

    #[test]
    fn test_mixed_content_is_inline() {
        let root = Element::new("para")
            .with_text("a ")
            .with_child(Element::new("emphasis").with_text("big"))
            .with_text(" b");
        let xml = serialize(&root, false, 2).unwrap();
        assert!(xml.contains(">a <emphasis>big</emphasis> b</para>"));
    }

    #[test]
    fn test_para_with_only_elements_stays_inline() {
        let link = Element::new("link")
            .with_attr("linkend", "intro")
            .with_text("Intro");
        let root = Element::new("section").with_child(Element::new("para").with_child(link));
        let xml = serialize(&root, false, 2).unwrap();
        assert!(xml.contains("\n  <para><link linkend=\"intro\">Intro</link></para>\n"));
    }

    #[test]
    fn test_preserved_space_is_untouched() {
        let mut listing = Element::new("programlisting");
        listing.children.push(XmlNode::Comment(" c ".into()));
        listing.children.push(XmlNode::Text("  x = 1\n".into()));
        let xml = serialize(&listing, false, 2).unwrap();
        assert!(xml.contains("><!-- c -->  x = 1\n</programlisting>"));
    }
}
