use crate::error::{Result, StudioError};
use crate::models::Dimensions;

/// Parses a `"<width>x<height>"` token. Both sides are trimmed and must be
/// positive base-10 integers.
pub fn parse(token: &str) -> Result<Dimensions> {
    let (width, height) = token
        .split_once('x')
        .ok_or_else(|| StudioError::ResolutionError(format!("'{}' is not WxH", token)))?;

    Ok(Dimensions {
        width: parse_side(token, width)?,
        height: parse_side(token, height)?,
    })
}

fn parse_side(token: &str, side: &str) -> Result<u32> {
    match side.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(StudioError::ResolutionError(format!(
            "invalid dimension '{}' in '{}'",
            side, token
        ))),
        Ok(value) => Ok(value),
    }
}
