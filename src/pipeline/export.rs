//! TLF export: wrap reconciled lines in a layout document and serialise it.
//!
//! The document carries one `line` item per reconciled segment, horizontal
//! lines first, plus the report section describing the page. Keys are
//! kebab-case to match the TLF schema.

use super::scale::{Canvas, ScaledSegment};
use super::snap::ReconciledLines;
use crate::config::ExtractionConfig;
use crate::error::Img2TlfError;
use serde::{Deserialize, Serialize};

/// TLF schema version written into every document.
pub const TLF_VERSION: &str = "0.10.0";

/// Style shared by every exported line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineStyle {
    pub border_color: String,
    pub border_width: u32,
    pub border_style: String,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            border_color: "#000000".to_string(),
            border_width: 1,
            border_style: "solid".to_string(),
        }
    }
}

/// One `line` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlfLine {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub display: bool,
    pub description: String,
    pub style: LineStyle,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl From<&ScaledSegment> for TlfLine {
    fn from(seg: &ScaledSegment) -> Self {
        Self {
            id: String::new(),
            kind: "line".to_string(),
            display: true,
            description: String::new(),
            style: LineStyle::default(),
            x1: seg.x1,
            y1: seg.y1,
            x2: seg.x2,
            y2: seg.y2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TlfState {
    pub layout_guides: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TlfReport {
    pub paper_type: String,
    pub orientation: String,
    /// `[top, right, bottom, left]`
    pub margin: [u32; 4],
}

/// A complete TLF layout document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlfDocument {
    pub version: String,
    pub items: Vec<TlfLine>,
    pub state: TlfState,
    pub title: String,
    pub report: TlfReport,
}

impl TlfDocument {
    /// Build the document for a set of reconciled lines on `canvas`.
    pub fn from_lines(lines: &ReconciledLines, canvas: &Canvas, config: &ExtractionConfig) -> Self {
        let m = canvas.margin;
        Self {
            version: TLF_VERSION.to_string(),
            items: lines.iter().map(TlfLine::from).collect(),
            state: TlfState::default(),
            title: config.title.clone(),
            report: TlfReport {
                paper_type: config.paper_type.clone(),
                orientation: canvas.orientation.as_str().to_string(),
                margin: [m, m, m, m],
            },
        }
    }

    /// Serialise to JSON, compact unless `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> Result<String, Img2TlfError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run::Axis;
    use crate::pipeline::scale::Orientation;

    fn sample_lines() -> ReconciledLines {
        ReconciledLines {
            horizontal: vec![ScaledSegment {
                axis: Axis::Horizontal,
                x1: 12,
                y1: 50,
                x2: 90,
                y2: 50,
            }],
            vertical: vec![ScaledSegment {
                axis: Axis::Vertical,
                x1: 12,
                y1: 50,
                x2: 12,
                y2: 90,
            }],
            snapped: 2,
        }
    }

    #[test]
    fn document_uses_tlf_key_names() {
        let canvas = Canvas::for_image(100, 200, 20);
        let doc = TlfDocument::from_lines(&sample_lines(), &canvas, &ExtractionConfig::default());
        let json = doc.to_json(false).unwrap();

        assert!(json.starts_with(r#"{"version":"0.10.0","items":[{"id":"","type":"line""#));
        assert!(json.contains(
            r##""style":{"border-color":"#000000","border-width":1,"border-style":"solid"}"##
        ));
        assert!(json.contains(r#""state":{"layout-guides":[]}"#));
        assert!(json.contains(
            r#""report":{"paper-type":"A4","orientation":"portrait","margin":[20,20,20,20]}"#
        ));
    }

    #[test]
    fn items_keep_horizontal_first() {
        let canvas = Canvas::for_image(300, 100, 20);
        assert_eq!(canvas.orientation, Orientation::Landscape);
        let doc = TlfDocument::from_lines(&sample_lines(), &canvas, &ExtractionConfig::default());

        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].y1, doc.items[0].y2);
        assert_eq!(doc.items[1].x1, doc.items[1].x2);
        assert_eq!(doc.report.orientation, "landscape");
    }

    #[test]
    fn json_round_trips() {
        let canvas = Canvas::for_image(100, 100, 20);
        let config = ExtractionConfig::builder().title("plan").build().unwrap();
        let doc = TlfDocument::from_lines(&sample_lines(), &canvas, &config);

        let parsed: TlfDocument = serde_json::from_str(&doc.to_json(true).unwrap()).unwrap();
        assert_eq!(parsed, doc);
        assert_eq!(parsed.title, "plan");
    }

    #[test]
    fn empty_lines_give_empty_items() {
        let canvas = Canvas::for_image(100, 100, 20);
        let doc = TlfDocument::from_lines(
            &ReconciledLines::default(),
            &canvas,
            &ExtractionConfig::default(),
        );
        assert!(doc.items.is_empty());
        assert!(doc.to_json(false).unwrap().contains(r#""items":[]"#));
    }
}
