//! Request body for the remote document's `batchUpdate` endpoint.
//!
//! Each [`EditOperation`] maps onto exactly one request, in order:
//!
//! ```text
//! InsertText        -> insertText             { location, text }
//! SetTextStyle      -> updateTextStyle        { range, textStyle, fields }
//! SetParagraphStyle -> updateParagraphStyle   { range, paragraphStyle, fields }
//! SetListBullets    -> createParagraphBullets { range, bulletPreset }
//! ```
//!
//! The optional tab identifier is attached to every location and range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    BulletPreset, CharacterStyle, EditOperation, NamedStyle, OperationSequence, TextRange,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("request {position}: empty range {start}..{end}")]
    DegenerateRange {
        position: usize,
        start: usize,
        end: usize,
    },

    #[error("request {position}: unknown named style {name:?}")]
    UnknownNamedStyle { position: usize, name: String },

    #[error("request {position}: unknown bullet preset {name:?}")]
    UnknownBulletPreset { position: usize, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertText),
    UpdateTextStyle(UpdateTextStyle),
    UpdateParagraphStyle(UpdateParagraphStyle),
    CreateParagraphBullets(CreateParagraphBullets),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertText {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyle {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBullets {
    pub range: Range,
    pub bullet_preset: String,
}

impl Request {
    pub fn from_operation(op: &EditOperation, tab_id: Option<&str>) -> Self {
        let tab_id = tab_id.map(str::to_string);
        let range = |range: &TextRange| Range {
            start_index: range.start(),
            end_index: range.end(),
            tab_id: tab_id.clone(),
        };

        match op {
            EditOperation::InsertText { index, text } => Request::InsertText(InsertText {
                location: Location {
                    index: *index,
                    tab_id: tab_id.clone(),
                },
                text: text.clone(),
            }),
            EditOperation::SetTextStyle { range: r, style } => {
                let mut fields = Vec::new();
                if style.bold {
                    fields.push("bold");
                }
                if style.link.is_some() {
                    fields.push("link");
                }
                Request::UpdateTextStyle(UpdateTextStyle {
                    range: range(r),
                    text_style: TextStyle {
                        bold: style.bold.then_some(true),
                        link: style.link.as_ref().map(|url| Link { url: url.clone() }),
                    },
                    fields: fields.join(","),
                })
            }
            EditOperation::SetParagraphStyle { range: r, style } => {
                Request::UpdateParagraphStyle(UpdateParagraphStyle {
                    range: range(r),
                    paragraph_style: ParagraphStyle {
                        named_style_type: style.as_str().to_string(),
                    },
                    fields: "namedStyleType".to_string(),
                })
            }
            EditOperation::SetListBullets { range: r, preset } => {
                Request::CreateParagraphBullets(CreateParagraphBullets {
                    range: range(r),
                    bullet_preset: preset.as_str().to_string(),
                })
            }
        }
    }

    fn to_operation(&self, position: usize) -> Result<EditOperation, WireError> {
        let range = |r: &Range| {
            TextRange::new(r.start_index, r.end_index).ok_or(WireError::DegenerateRange {
                position,
                start: r.start_index,
                end: r.end_index,
            })
        };

        match self {
            Request::InsertText(req) => Ok(EditOperation::InsertText {
                index: req.location.index,
                text: req.text.clone(),
            }),
            Request::UpdateTextStyle(req) => Ok(EditOperation::SetTextStyle {
                range: range(&req.range)?,
                style: CharacterStyle {
                    bold: req.text_style.bold.unwrap_or(false),
                    link: req.text_style.link.as_ref().map(|link| link.url.clone()),
                },
            }),
            Request::UpdateParagraphStyle(req) => {
                let name = &req.paragraph_style.named_style_type;
                let style =
                    NamedStyle::from_name(name).ok_or_else(|| WireError::UnknownNamedStyle {
                        position,
                        name: name.clone(),
                    })?;
                Ok(EditOperation::SetParagraphStyle {
                    range: range(&req.range)?,
                    style,
                })
            }
            Request::CreateParagraphBullets(req) => {
                let preset = BulletPreset::from_name(&req.bullet_preset).ok_or_else(|| {
                    WireError::UnknownBulletPreset {
                        position,
                        name: req.bullet_preset.clone(),
                    }
                })?;
                Ok(EditOperation::SetListBullets {
                    range: range(&req.range)?,
                    preset,
                })
            }
        }
    }
}

impl BatchUpdate {
    /// Decodes the requests back into edit operations, preserving order.
    pub fn into_operations(self) -> Result<Vec<EditOperation>, WireError> {
        self.requests
            .iter()
            .enumerate()
            .map(|(position, request)| request.to_operation(position))
            .collect()
    }
}

impl OperationSequence {
    pub fn to_batch_update(&self) -> BatchUpdate {
        BatchUpdate {
            requests: self
                .operations()
                .iter()
                .map(|op| Request::from_operation(op, self.tab_id()))
                .collect(),
        }
    }
}
