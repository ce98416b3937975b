//! VIA annotation reading and flattening.
//!
//! This module turns a VGG Image Annotator (VIA) project export into a
//! [`Table`] with one [`Row`] per annotated region. Region rows carry the
//! image key (`path`), the region's position within its image
//! (`region_id`), and every shape and region attribute of that region.
//!
//! Attribute sets differ per shape type and per annotation task, so rows are
//! ordered key/value maps rather than fixed structs; the table's column set
//! is only known once every row has been built.
//!
//! # Example
//!
//! ```
//! use viatab::via::{from_via_str, io_csv::to_csv_string};
//!
//! let table = from_via_str(r#"{"_via_img_metadata": {"img1.jpg": {"regions": [
//!     {"shape_attributes": {"name": "rect", "x": 1}, "region_attributes": {"label": "cat"}}
//! ]}}}"#)?;
//!
//! assert_eq!(to_csv_string(&table)?, "path,region_id,name,x,label\nimg1.jpg,0,rect,1,cat\n");
//! # Ok::<(), viatab::ViatabError>(())
//! ```

mod flatten;
pub mod io_csv;
pub mod io_json;
mod model;

pub use flatten::{
    flatten, flatten_with, from_via_slice, from_via_str, read_via_json, read_via_json_with,
    FlattenOptions, METADATA_KEY,
};
pub use model::{Cell, Row, Table, PATH_COLUMN, REGION_ID_COLUMN};
