//! KML (Keyhole Markup Language) export
//!
//! Produces a `kml/2.2` document with three density styles and one
//! Placemark per camera. The layout is fixed so consumers can diff exports.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Write;

use crate::error::{Result, TrafficGisError};
use crate::formats::{ExportFormat, ExportPayload};
use crate::models::{DensityLevel, PointRecord, PointSet};

pub const KML_FILENAME: &str = "traffic_cameras.kml";

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// `(style, icon color, scale, pushpin icon)`
const STYLES: [(DensityLevel, &str, &str, &str); 3] = [
    (
        DensityLevel::Low,
        "ff0000ff",
        "1.0",
        "http://maps.google.com/mapfiles/kml/pushpin/blue-pushpin.png",
    ),
    (
        DensityLevel::Medium,
        "ff00a5ff",
        "1.2",
        "http://maps.google.com/mapfiles/kml/pushpin/orange-pushpin.png",
    ),
    (
        DensityLevel::High,
        "ff0000ff",
        "1.4",
        "http://maps.google.com/mapfiles/kml/pushpin/red-pushpin.png",
    ),
];

fn xml_error(e: impl Display) -> TrafficGisError {
    TrafficGisError::Serialization(format!("XML write error: {}", e))
}

fn write_event<'a, W: Write>(writer: &mut Writer<W>, event: Event<'a>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

/// `<name>text</name>`, with the text escaped
fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_style<W: Write>(
    writer: &mut Writer<W>,
    level: DensityLevel,
    color: &str,
    scale: &str,
    href: &str,
) -> Result<()> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("id", level.style_id()));
    write_event(writer, Event::Start(style))?;
    write_event(writer, Event::Start(BytesStart::new("IconStyle")))?;
    write_text_element(writer, "color", color)?;
    write_text_element(writer, "scale", scale)?;
    write_event(writer, Event::Start(BytesStart::new("Icon")))?;
    write_text_element(writer, "href", href)?;
    write_event(writer, Event::End(BytesEnd::new("Icon")))?;
    write_event(writer, Event::End(BytesEnd::new("IconStyle")))?;
    write_event(writer, Event::End(BytesEnd::new("Style")))
}

fn write_placemark<W: Write>(writer: &mut Writer<W>, point: &PointRecord) -> Result<()> {
    let density = point.density().unwrap_or(0.0);
    let name = if point.id().is_empty() { "Camera" } else { point.id() };
    let level = DensityLevel::from_density(point.density());

    write_event(writer, Event::Start(BytesStart::new("Placemark")))?;
    write_text_element(writer, "name", name)?;
    write_text_element(
        writer,
        "description",
        &format!("Traffic Density: {:.1}%", density * 100.0),
    )?;
    write_text_element(writer, "styleUrl", &format!("#{}", level.style_id()))?;
    write_event(writer, Event::Start(BytesStart::new("Point")))?;
    write_text_element(
        writer,
        "coordinates",
        &format!("{},{},0", point.longitude(), point.latitude()),
    )?;
    write_event(writer, Event::End(BytesEnd::new("Point")))?;
    write_event(writer, Event::End(BytesEnd::new("Placemark")))
}

/// Render camera locations as a KML document
///
/// The writer targets an in-memory buffer, so the only failure is an
/// encoding error reported by the XML writer.
pub fn points_to_kml(points: &PointSet, document_name: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    write_event(&mut writer, Event::Decl(decl))?;

    let mut root = BytesStart::new("kml");
    root.push_attribute(("xmlns", KML_NAMESPACE));
    write_event(&mut writer, Event::Start(root))?;
    write_event(&mut writer, Event::Start(BytesStart::new("Document")))?;
    write_text_element(&mut writer, "name", document_name)?;
    write_text_element(
        &mut writer,
        "description",
        "Traffic camera locations and data",
    )?;

    for (level, color, scale, href) in STYLES {
        write_style(&mut writer, level, color, scale, href)?;
    }

    for point in points {
        write_placemark(&mut writer, point)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("Document")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("kml")))?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| TrafficGisError::Serialization(format!("KML is not UTF-8: {}", e)))
}

/// KML export payload
pub fn export_kml(points: &PointSet, document_name: &str) -> Result<ExportPayload> {
    let content = points_to_kml(points, document_name)?;
    tracing::debug!(placemarks = points.len(), "Serialized KML");
    Ok(ExportPayload::new(KML_FILENAME, ExportFormat::Kml, content))
}
