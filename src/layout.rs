//! Layout format: the externally hosted JSON a game is built from
//!
//! A layout is an ordered sequence of rows, each row an ordered sequence of
//! block descriptors. Vertical placement is not part of the format; rows
//! stack upward from the table top (see `sim::session::layout_position`).
//!
//! Hand-written layout files are treated leniently: a descriptor missing a
//! field or carrying garbage is skipped with a warning rather than failing
//! the whole load. Only unparseable JSON rejects the document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::BlockColor;

/// One block descriptor as it appears in the JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Cube edge length
    pub size: f32,
    pub color: BlockColor,
    #[serde(rename = "posX")]
    pub pos_x: f32,
    #[serde(rename = "posZ")]
    pub pos_z: f32,
}

/// Parsed layout: rows of block descriptors, bottom row first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    rows: Vec<Vec<BlockSpec>>,
}

impl Layout {
    /// Parse layout JSON. Invalid descriptors are dropped (logged at warn);
    /// an empty document is a valid zero-block layout.
    pub fn parse(bytes: &[u8]) -> Result<Self, LayoutError> {
        let raw: Vec<Vec<serde_json::Value>> = serde_json::from_slice(bytes)?;
        let mut rows = Vec::with_capacity(raw.len());
        for (row_idx, row) in raw.into_iter().enumerate() {
            let mut specs = Vec::with_capacity(row.len());
            for value in row {
                match serde_json::from_value::<BlockSpec>(value) {
                    Ok(spec) => specs.push(spec),
                    Err(err) => {
                        log::warn!("skipping bad block descriptor in row {row_idx}: {err}");
                    }
                }
            }
            rows.push(specs);
        }
        Ok(Layout { rows })
    }

    pub fn rows(&self) -> &[Vec<BlockSpec>] {
        &self.rows
    }

    pub fn block_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.block_count() == 0
    }
}

impl From<Vec<Vec<BlockSpec>>> for Layout {
    fn from(rows: Vec<Vec<BlockSpec>>) -> Self {
        Layout { rows }
    }
}

/// URL a layout is served from, in the shape the asset server expects.
pub fn layout_url(host: &str, port: u16, name: &str) -> String {
    format!("http://{host}:{port}/assets/games/{name}.json")
}

#[derive(Debug)]
pub enum LayoutError {
    Json(serde_json::Error),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Json(err) => write!(f, "malformed layout JSON: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_block_row() {
        let json = r#"[[{"size":4,"color":16711680,"posX":0,"posZ":0},
                        {"size":4,"color":"0x00ff00","posX":5,"posZ":0}]]"#;
        let layout = Layout::parse(json.as_bytes()).unwrap();
        assert_eq!(layout.block_count(), 2);
        assert_eq!(layout.rows()[0][0].color, BlockColor(0xff0000));
        assert_eq!(layout.rows()[0][1].color, BlockColor(0x00ff00));
        assert_eq!(layout.rows()[0][1].pos_x, 5.0);
    }

    #[test]
    fn test_parse_empty_document() {
        let layout = Layout::parse(b"[]").unwrap();
        assert!(layout.is_empty());
        assert_eq!(layout.rows().len(), 0);
    }

    #[test]
    fn test_bad_descriptor_is_skipped_not_fatal() {
        let json = r#"[[{"size":4,"color":255,"posX":0,"posZ":0},
                        {"size":4,"posX":5,"posZ":0},
                        {"color":"purple"}]]"#;
        let layout = Layout::parse(json.as_bytes()).unwrap();
        assert_eq!(layout.block_count(), 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Layout::parse(b"{not json").is_err());
        assert!(Layout::parse(b"{\"rows\": 3}").is_err());
    }

    #[test]
    fn test_layout_url() {
        assert_eq!(
            layout_url("localhost", 3000, "game01"),
            "http://localhost:3000/assets/games/game01.json"
        );
    }
}
