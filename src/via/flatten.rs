//! VIA JSON reader and flattener.
//!
//! VIA (VGG Image Annotator) project exports keep per-image annotations
//! under a top-level metadata map:
//!
//! ```json
//! {
//!   "_via_img_metadata": {
//!     "img1.jpg": {
//!       "regions": [
//!         {
//!           "shape_attributes": {"name": "rect", "x": 1, "y": 2, "width": 3, "height": 4},
//!           "region_attributes": {"label": "cat"}
//!         }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Flattening produces one [`Row`] per region: `path` (the image key),
//! `region_id` (position within the image's region list), then every shape
//! attribute, then every region attribute. Region attributes are merged
//! last, so they win when a key appears in both maps.
//!
//! Images are visited in document order and regions in list order. The
//! conversion is all-or-nothing: the first malformed record fails the
//! whole document.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::model::{Row, Table};
use crate::error::ViatabError;

/// Top-level key holding the per-image metadata map.
pub const METADATA_KEY: &str = "_via_img_metadata";

// ============================================================================
// VIA schema types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ViaImage {
    #[serde(default)]
    regions: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ViaRegion {
    #[serde(default)]
    shape_attributes: Option<Map<String, Value>>,
    #[serde(default)]
    region_attributes: Option<Map<String, Value>>,
}

// ============================================================================
// Options
// ============================================================================

/// Options controlling how missing structure is handled.
#[derive(Clone, Debug, Default)]
pub struct FlattenOptions {
    /// Treat a missing (or `null`) `regions` list or attribute map as empty
    /// instead of failing. Values of the wrong type are errors either way.
    pub lenient: bool,
}

impl FlattenOptions {
    pub fn lenient() -> Self {
        Self { lenient: true }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Flattens an already-parsed VIA document.
///
/// # Errors
/// Returns [`ViatabError::ViaJsonInvalid`] if the document lacks
/// `_via_img_metadata`, an image lacks `regions`, or a region lacks either
/// attribute map.
///
/// # Example
/// ```
/// use serde_json::json;
/// use viatab::via::flatten;
///
/// let doc = json!({"_via_img_metadata": {"img1.jpg": {"regions": [
///     {"shape_attributes": {"type": "rect", "x": 1}, "region_attributes": {"label": "cat"}}
/// ]}}});
/// let table = flatten(&doc)?;
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.columns(), &["path", "region_id", "type", "x", "label"]);
/// # Ok::<(), viatab::ViatabError>(())
/// ```
pub fn flatten(document: &Value) -> Result<Table, ViatabError> {
    flatten_with(document, &FlattenOptions::default())
}

/// Flattens an already-parsed VIA document with explicit options.
pub fn flatten_with(document: &Value, opts: &FlattenOptions) -> Result<Table, ViatabError> {
    via_to_table(document, Path::new("<document>"), opts)
}

/// Reads and flattens a VIA JSON file.
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid JSON, or does
/// not have the VIA project shape.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use viatab::via::read_via_json;
///
/// let table = read_via_json(Path::new("via_project.json"))?;
/// # Ok::<(), viatab::ViatabError>(())
/// ```
pub fn read_via_json(path: &Path) -> Result<Table, ViatabError> {
    read_via_json_with(path, &FlattenOptions::default())
}

/// Reads and flattens a VIA JSON file with explicit options.
pub fn read_via_json_with(path: &Path, opts: &FlattenOptions) -> Result<Table, ViatabError> {
    let file = File::open(path).map_err(ViatabError::Io)?;
    let reader = BufReader::new(file);

    let document: Value =
        serde_json::from_reader(reader).map_err(|source| ViatabError::ViaJsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    via_to_table(&document, path, opts)
}

/// Parses and flattens VIA JSON from a string.
///
/// Useful for testing without file I/O.
pub fn from_via_str(json: &str) -> Result<Table, ViatabError> {
    let path = Path::new("<string>");
    let document: Value =
        serde_json::from_str(json).map_err(|source| ViatabError::ViaJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    via_to_table(&document, path, &FlattenOptions::default())
}

/// Parses and flattens VIA JSON from bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_via_slice(bytes: &[u8]) -> Result<Table, ViatabError> {
    let path = Path::new("<bytes>");
    let document: Value =
        serde_json::from_slice(bytes).map_err(|source| ViatabError::ViaJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    via_to_table(&document, path, &FlattenOptions::default())
}

// ============================================================================
// Conversion: VIA -> Table
// ============================================================================

fn via_to_table(document: &Value, path: &Path, opts: &FlattenOptions) -> Result<Table, ViatabError> {
    let root = document
        .as_object()
        .ok_or_else(|| invalid(path, "document is not a JSON object"))?;

    let images = match root.get(METADATA_KEY) {
        Some(Value::Object(images)) => images,
        Some(Value::Null) | None => {
            return Err(invalid(path, format!("missing '{METADATA_KEY}'")));
        }
        Some(_) => {
            return Err(invalid(path, format!("'{METADATA_KEY}' is not a JSON object")));
        }
    };

    let mut rows = Vec::new();

    for (image_key, image_value) in images {
        // Serde also reads structs from sequences, positionally.
        if !image_value.is_object() {
            return Err(invalid(path, format!("image '{image_key}' is not a JSON object")));
        }
        let image = ViaImage::deserialize(image_value)
            .map_err(|e| invalid(path, format!("image '{image_key}': {e}")))?;

        let regions = match image.regions {
            Some(regions) => regions,
            None if opts.lenient => {
                warn!("image '{image_key}' has no 'regions'; treating as empty");
                Vec::new()
            }
            None => {
                return Err(invalid(path, format!("image '{image_key}' missing 'regions'")));
            }
        };

        debug!("image '{image_key}': {} region(s)", regions.len());

        for (region_id, region_value) in regions.iter().enumerate() {
            if !region_value.is_object() {
                return Err(invalid(
                    path,
                    format!("image '{image_key}' region[{region_id}] is not a JSON object"),
                ));
            }
            let region = ViaRegion::deserialize(region_value).map_err(|e| {
                invalid(path, format!("image '{image_key}' region[{region_id}]: {e}"))
            })?;

            let shape_attributes = require_attributes(
                region.shape_attributes,
                "shape_attributes",
                image_key,
                region_id,
                path,
                opts,
            )?;
            let region_attributes = require_attributes(
                region.region_attributes,
                "region_attributes",
                image_key,
                region_id,
                path,
                opts,
            )?;

            let mut row = Row::new(image_key.as_str(), region_id);
            row.merge(&shape_attributes);
            row.merge(&region_attributes);
            rows.push(row);
        }
    }

    Ok(Table::from_rows(rows))
}

fn require_attributes(
    attributes: Option<Map<String, Value>>,
    field: &str,
    image_key: &str,
    region_id: usize,
    path: &Path,
    opts: &FlattenOptions,
) -> Result<Map<String, Value>, ViatabError> {
    match attributes {
        Some(attributes) => Ok(attributes),
        None if opts.lenient => {
            warn!("image '{image_key}' region[{region_id}] has no '{field}'; treating as empty");
            Ok(Map::new())
        }
        None => Err(invalid(
            path,
            format!("image '{image_key}' region[{region_id}] missing '{field}'"),
        )),
    }
}

fn invalid(path: &Path, message: impl Into<String>) -> ViatabError {
    ViatabError::ViaJsonInvalid {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
