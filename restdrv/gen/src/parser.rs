//! URL template token parsing.
//!
//! A `url` node's `template` attribute is a comma-separated list of tokens:
//!
//! - `value:<text>` appends `<text>` verbatim;
//! - `get_abstract:<member>` appends the value returned by the member's accessor.
//!
//! Any other token kind is rejected.

use crate::errors::GeneratorError;

/// Prefix of literal URL tokens.
pub const LITERAL_PREFIX: &str = "value:";

/// Prefix of accessor URL tokens.
pub const ACCESSOR_PREFIX: &str = "get_abstract:";

/// One parsed URL template token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlToken {
    /// Text appended as-is.
    Literal(String),
    /// Name of the record member whose accessor supplies the text.
    Accessor(String),
}

/// Parses a URL template into its tokens.
///
/// Tokens are separated by commas and trimmed; empty tokens are dropped.
/// The text after `value:` is kept verbatim, the member after `get_abstract:`
/// is trimmed.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::parser::{UrlToken, parse_url_template};
///
/// let tokens = parse_url_template("vn_url", "value:/virtual-network/, get_abstract:uuid").unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         UrlToken::Literal("/virtual-network/".to_string()),
///         UrlToken::Accessor("uuid".to_string()),
///     ]
/// );
///
/// assert!(parse_url_template("vn_url", "query:x").is_err());
/// ```
///
/// ## Errors
///
/// Returns `GeneratorError::UnsupportedUrlToken` for tokens with any other
/// prefix, or an accessor token without a member name.
pub fn parse_url_template(node: &str, template: &str) -> Result<Vec<UrlToken>, GeneratorError> {
    template
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if let Some(text) = token.strip_prefix(LITERAL_PREFIX) {
                Ok(UrlToken::Literal(text.to_string()))
            } else if let Some(member) = token.strip_prefix(ACCESSOR_PREFIX)
                && !member.trim().is_empty()
            {
                Ok(UrlToken::Accessor(member.trim().to_string()))
            } else {
                Err(GeneratorError::UnsupportedUrlToken {
                    node: node.to_string(),
                    token: token.to_string(),
                })
            }
        })
        .collect()
}
