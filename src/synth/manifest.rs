//! SCORM 1.2 manifest generation.

use crate::error::{Error, Result};
use crate::options::PackageOptions;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::INDEX_FILE;

const IMSCP_NS: &str = "http://www.imsproject.org/xsd/imscp_rootv1p1p2";
const ADLCP_NS: &str = "http://www.adlnet.org/xsd/adlcp_rootv1p2";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.imsproject.org/xsd/imscp_rootv1p1p2 imscp_rootv1p1p2.xsd http://www.adlnet.org/xsd/adlcp_rootv1p2 adlcp_rootv1p2.xsd";

const ORGANIZATION_ID: &str = "ORG1";
const ITEM_ID: &str = "ITEM1";
const RESOURCE_ID: &str = "RES1";

/// Render `imsmanifest.xml`.
///
/// The manifest declares one organization holding one item, bound to one
/// `webcontent` SCO resource whose entry point and only file is the
/// wrapper page. It does not depend on the archive contents.
pub fn render_manifest(options: &PackageOptions) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut manifest = BytesStart::new("manifest");
    manifest.push_attribute(("identifier", options.manifest_identifier.as_str()));
    manifest.push_attribute(("version", "1.0"));
    manifest.push_attribute(("xmlns", IMSCP_NS));
    manifest.push_attribute(("xmlns:adlcp", ADLCP_NS));
    manifest.push_attribute(("xmlns:xsi", XSI_NS));
    manifest.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    writer.write_event(Event::Start(manifest))?;

    start(&mut writer, BytesStart::new("metadata"))?;
    text_element(&mut writer, "schema", "ADL SCORM")?;
    text_element(&mut writer, "schemaversion", "1.2")?;
    end(&mut writer, "metadata")?;

    let mut organizations = BytesStart::new("organizations");
    organizations.push_attribute(("default", ORGANIZATION_ID));
    start(&mut writer, organizations)?;

    let mut organization = BytesStart::new("organization");
    organization.push_attribute(("identifier", ORGANIZATION_ID));
    start(&mut writer, organization)?;
    text_element(&mut writer, "title", &options.organization_title)?;

    let mut item = BytesStart::new("item");
    item.push_attribute(("identifier", ITEM_ID));
    item.push_attribute(("identifierref", RESOURCE_ID));
    start(&mut writer, item)?;
    text_element(&mut writer, "title", &options.item_title)?;
    end(&mut writer, "item")?;

    end(&mut writer, "organization")?;
    end(&mut writer, "organizations")?;

    start(&mut writer, BytesStart::new("resources"))?;
    let mut resource = BytesStart::new("resource");
    resource.push_attribute(("identifier", RESOURCE_ID));
    resource.push_attribute(("type", "webcontent"));
    resource.push_attribute(("adlcp:scormtype", "sco"));
    resource.push_attribute(("href", INDEX_FILE));
    start(&mut writer, resource)?;

    let mut file = BytesStart::new("file");
    file.push_attribute(("href", INDEX_FILE));
    writer.write_event(Event::Empty(file))?;

    end(&mut writer, "resource")?;
    end(&mut writer, "resources")?;
    end(&mut writer, "manifest")?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

fn start<W: Write>(writer: &mut Writer<W>, element: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Start(element))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    type Attrs = Vec<(String, String)>;

    fn attr(attrs: &Attrs, key: &str) -> Option<String> {
        attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    /// Collect (element name, attributes) for every start or empty tag.
    fn elements(xml: &str) -> Vec<(String, Attrs)> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut out = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let attrs = e
                        .attributes()
                        .flatten()
                        .map(|a| {
                            (
                                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                                String::from_utf8_lossy(&a.value).to_string(),
                            )
                        })
                        .collect();
                    out.push((name, attrs));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_manifest_is_well_formed() {
        let xml = render_manifest(&PackageOptions::default()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.ends_with("</manifest>\n"));

        let names: Vec<_> = elements(&xml).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "manifest",
                "metadata",
                "schema",
                "schemaversion",
                "organizations",
                "organization",
                "title",
                "item",
                "title",
                "resources",
                "resource",
                "file",
            ]
        );
    }

    #[test]
    fn test_manifest_identifiers() {
        let xml = render_manifest(&PackageOptions::default()).unwrap();
        let elements = elements(&xml);
        let find = |name: &str| {
            elements
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, a)| a.clone())
                .unwrap()
        };

        let manifest = find("manifest");
        assert_eq!(attr(&manifest, "identifier").as_deref(), Some("ICFtoSCORM"));
        assert_eq!(attr(&manifest, "xmlns").as_deref(), Some(IMSCP_NS));
        assert_eq!(attr(&manifest, "xmlns:adlcp").as_deref(), Some(ADLCP_NS));

        assert_eq!(
            attr(&find("organizations"), "default").as_deref(),
            Some("ORG1")
        );
        assert_eq!(
            attr(&find("organization"), "identifier").as_deref(),
            Some("ORG1")
        );

        let item = find("item");
        assert_eq!(attr(&item, "identifier").as_deref(), Some("ITEM1"));
        assert_eq!(attr(&item, "identifierref").as_deref(), Some("RES1"));

        let resource = find("resource");
        assert_eq!(attr(&resource, "identifier").as_deref(), Some("RES1"));
        assert_eq!(attr(&resource, "type").as_deref(), Some("webcontent"));
        assert_eq!(attr(&resource, "adlcp:scormtype").as_deref(), Some("sco"));
        assert_eq!(attr(&resource, "href").as_deref(), Some("index.html"));

        assert_eq!(attr(&find("file"), "href").as_deref(), Some("index.html"));
    }

    #[test]
    fn test_manifest_text_content() {
        let xml = render_manifest(&PackageOptions::default()).unwrap();
        assert!(xml.contains("<schema>ADL SCORM</schema>"));
        assert!(xml.contains("<schemaversion>1.2</schemaversion>"));
        assert!(xml.contains("<title>Unified ICF Course</title>"));
        assert!(xml.contains("<title>ICF Full Course</title>"));
    }

    #[test]
    fn test_manifest_is_deterministic() {
        let options = PackageOptions::default();
        assert_eq!(
            render_manifest(&options).unwrap(),
            render_manifest(&options).unwrap()
        );
    }

    #[test]
    fn test_manifest_escapes_titles() {
        let options = PackageOptions::new().with_organization_title("Tools & <Tips>");
        let xml = render_manifest(&options).unwrap();
        assert!(xml.contains("<title>Tools &amp; &lt;Tips&gt;</title>"));
    }
}
