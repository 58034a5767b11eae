//! ViewBox resolution and the editable coordinate frame.

use std::fmt;
use std::str::FromStr;

use crate::log::debug;
use crate::number::{JsNumber, parse_float, to_number};

/// Frame used when the document gives neither `viewBox` nor `width`/`height`.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

/// The four-number coordinate frame: min-x, min-y, width, height.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ViewBoxValues {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// One editable field of a [`ViewBoxValues`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewBoxField {
    MinX,
    MinY,
    Width,
    Height,
}

impl ViewBoxField {
    pub const ALL: [ViewBoxField; 4] = [
        ViewBoxField::MinX,
        ViewBoxField::MinY,
        ViewBoxField::Width,
        ViewBoxField::Height,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewBoxField::MinX => "minX",
            ViewBoxField::MinY => "minY",
            ViewBoxField::Width => "width",
            ViewBoxField::Height => "height",
        }
    }
}

impl fmt::Display for ViewBoxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown viewBox field '{0}': expected minX, minY, width or height")]
pub struct UnknownField(pub String);

impl FromStr for ViewBoxField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minX" | "min-x" | "min_x" => Ok(ViewBoxField::MinX),
            "minY" | "min-y" | "min_y" => Ok(ViewBoxField::MinY),
            "width" => Ok(ViewBoxField::Width),
            "height" => Ok(ViewBoxField::Height),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl ViewBoxValues {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Parse a frame string. Tokens are separated by whitespace or commas;
    /// each is read as a whole number, and missing tokens are NaN.
    pub fn from_frame(frame: &str) -> Self {
        let mut tokens = frame
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(to_number);
        let mut next = || tokens.next().unwrap_or(f64::NAN);
        Self::new(next(), next(), next(), next())
    }

    pub fn get(&self, field: ViewBoxField) -> f64 {
        match field {
            ViewBoxField::MinX => self.min_x,
            ViewBoxField::MinY => self.min_y,
            ViewBoxField::Width => self.width,
            ViewBoxField::Height => self.height,
        }
    }

    pub fn set(&mut self, field: ViewBoxField, value: f64) {
        match field {
            ViewBoxField::MinX => self.min_x = value,
            ViewBoxField::MinY => self.min_y = value,
            ViewBoxField::Width => self.width = value,
            ViewBoxField::Height => self.height = value,
        }
    }

    /// Apply raw text from an edit field: blank is zero, otherwise the leading
    /// number is used (NaN when there is none).
    pub fn edit(&mut self, field: ViewBoxField, raw: &str) {
        let value = if raw.trim().is_empty() {
            0.0
        } else {
            parse_float(raw)
        };
        self.set(field, value);
    }

    pub fn is_finite(&self) -> bool {
        ViewBoxField::ALL.iter().all(|f| self.get(*f).is_finite())
    }
}

impl fmt::Display for ViewBoxValues {
    /// `"minX minY width height"` with JavaScript number formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            JsNumber(self.min_x),
            JsNumber(self.min_y),
            JsNumber(self.width),
            JsNumber(self.height)
        )
    }
}

/// Resolve the frame string from the root element's attributes.
///
/// A non-empty `viewBox` wins verbatim; otherwise `width` and `height` give
/// `"0 0 w h"` (NaN passes through for non-numeric sizes); otherwise the
/// default frame.
pub fn resolve_frame(view_box: Option<&str>, width: Option<&str>, height: Option<&str>) -> String {
    if let Some(vb) = view_box.filter(|v| !v.is_empty()) {
        return vb.to_string();
    }
    match (width.filter(|w| !w.is_empty()), height.filter(|h| !h.is_empty())) {
        (Some(w), Some(h)) => {
            let frame = format!(
                "0 0 {} {}",
                JsNumber(parse_float(w)),
                JsNumber(parse_float(h))
            );
            debug!(width = w, height = h, frame = %frame, "synthesized viewBox from size");
            frame
        }
        _ => DEFAULT_VIEW_BOX.to_string(),
    }
}

/// Resolve the frame string of a parsed `<svg>` element.
pub fn resolve_view_box(svg: roxmltree::Node<'_, '_>) -> String {
    resolve_frame(
        svg.attribute("viewBox"),
        svg.attribute("width"),
        svg.attribute("height"),
    )
}
