//! Strict decoding of the model's reply into a [`FortuneResult`].
//!
//! The reply is normally bare JSON, but models sometimes wrap it in prose or
//! markdown fences. When the whole text does not parse, the outermost
//! `{ ... }` span is tried instead. The decoded object must match the result
//! shape exactly; anything else is an error, never a partial result.

use aishou_core::FortuneResult;
use serde_json::Value;
use thiserror::Error;

pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("reply is not JSON: {0}")]
    NotJson(serde_json::Error),

    #[error("reply is JSON but not an object")]
    NotObject,

    #[error("reply does not match the result shape: {0}")]
    Shape(serde_json::Error),

    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(u8),

    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
}

pub fn decode_reply(text: &str) -> Result<FortuneResult, DecodeError> {
    let value: Value = match serde_json::from_str(text.trim()) {
        Ok(v) => v,
        Err(whole) => match embedded_object(text) {
            Some(span) => serde_json::from_str(span).map_err(DecodeError::NotJson)?,
            None => return Err(DecodeError::NotJson(whole)),
        },
    };

    // Serde would also accept a positional array for a struct.
    if !value.is_object() {
        return Err(DecodeError::NotObject);
    }
    let result: FortuneResult = serde_json::from_value(value).map_err(DecodeError::Shape)?;
    if result.score > MAX_SCORE {
        return Err(DecodeError::ScoreOutOfRange(result.score));
    }
    if result.summary.trim().is_empty() {
        return Err(DecodeError::EmptyField("summary"));
    }
    if result.advice.trim().is_empty() {
        return Err(DecodeError::EmptyField("advice"));
    }
    Ok(result)
}

/// The span from the first `{` to the last `}`, if any.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
