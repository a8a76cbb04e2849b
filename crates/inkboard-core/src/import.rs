//! Lenient parsing of persisted page content.
//!
//! Stored documents come in two shapes: the current object form
//! (`{strokes, backgroundColor, pageStyle}`) and a legacy bare stroke
//! array. Strokes are decoded one record at a time so a single corrupt
//! record costs that record, not the whole page.

use serde_json::Value;
use thiserror::Error;

use crate::page::PageContent;
use crate::stroke::Stroke;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a stroke array or content object")]
    UnexpectedShape,
    #[error("Document contained strokes but none were valid")]
    NoValidStrokes,
}

/// Decode a stroke array, skipping invalid records.
///
/// Returns `NoValidStrokes` when the array was non-empty but every record
/// was rejected, since that points at a corrupt document rather than an
/// empty page.
fn decode_strokes(records: Vec<Value>) -> Result<Vec<Stroke>, ImportError> {
    let total = records.len();
    let mut strokes = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Stroke>(record) {
            Ok(stroke) if stroke.points.is_empty() => {
                log::warn!("Skipping stroke {} with no points", index);
            }
            Ok(stroke) => strokes.push(stroke),
            Err(e) => {
                log::warn!("Skipping invalid stroke record {}: {}", index, e);
            }
        }
    }
    if total > 0 && strokes.is_empty() {
        return Err(ImportError::NoValidStrokes);
    }
    if strokes.len() < total {
        log::info!("Imported {} of {} stroke records", strokes.len(), total);
    }
    Ok(strokes)
}

/// Serialize strokes as a flat JSON array, preserving z-order.
///
/// The output is the legacy array form, so any consumer of
/// `parse_content` can read it back.
pub fn export_strokes(strokes: &[Stroke]) -> Result<String, ImportError> {
    Ok(serde_json::to_string(strokes)?)
}

/// Parse persisted page content from JSON, accepting both the object form
/// and the legacy bare array.
pub fn parse_content(json: &str) -> Result<PageContent, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(records) => {
            // Legacy documents stored only the stroke list.
            let strokes = decode_strokes(records)?;
            Ok(PageContent {
                strokes,
                ..PageContent::default()
            })
        }
        Value::Object(mut fields) => {
            let records = match fields.remove("strokes") {
                Some(Value::Array(records)) => records,
                Some(_) => return Err(ImportError::UnexpectedShape),
                None => Vec::new(),
            };
            let strokes = decode_strokes(records)?;
            let mut content: PageContent = serde_json::from_value(Value::Object(fields))?;
            content.strokes = strokes;
            Ok(content)
        }
        _ => Err(ImportError::UnexpectedShape),
    }
}
