//! Serialization of XmlDocument trees.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::{Error, Result, XmlChild, XmlDocument, XmlElement};

impl XmlDocument {
    /// Serialize the document, prolog included, into a string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(write_error)
    }

    /// Serialize the document into any writer.
    ///
    /// Elements without children are written in their empty form (`<x/>`).
    pub fn write_to<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new(out);
        writer
            .get_mut()
            .write_all(self.prolog.as_bytes())
            .map_err(write_error)?;
        write_element(&mut writer, &self.root)
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let name = element.qualified_name();
    let mut start = BytesStart::new(name.as_str());
    for attribute in &element.attributes {
        let key = attribute.qualified_name();
        start.push_attribute((key.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            XmlChild::Element(child) => write_element(writer, child)?,
            XmlChild::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?,
            XmlChild::CData(text) => writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(write_error)?,
            XmlChild::Comment(text) => writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(write_error)?,
            XmlChild::ProcessingInstruction(text) => writer
                .write_event(Event::PI(BytesPI::new(text.as_str())))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(write_error)
}

fn write_error(err: impl std::fmt::Display) -> Error {
    Error::Write {
        message: err.to_string(),
    }
}
