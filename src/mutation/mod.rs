//! Point substitutions and the string helpers used to pair them up.
//!
//! Barcode columns are plain strings such as `A123T`. Most of the resolution
//! logic works on those strings directly, while [`Substitution`] is the typed
//! form used wherever the coordinate has to be interpreted.

#[cfg(test)]
mod tests;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ----------------------------------------------------------------------------
// Substitution
// ----------------------------------------------------------------------------

/// A single point substitution, serialized as `{reference}{coord}{alt}`.
///
/// Coordinates are 1-based.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct Substitution {
    pub coord: usize,
    pub reference: char,
    pub alt: char,
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}{}{}", self.reference, self.coord, self.alt)
    }
}

impl FromStr for Substitution {
    type Err = Report;

    /// Parse a substitution from text.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use barcodeforge::mutation::Substitution;
    /// use std::str::FromStr;
    ///
    /// let sub = Substitution::from_str("A123T")?;
    /// assert_eq!(sub.reference, 'A');
    /// assert_eq!(sub.coord, 123);
    /// assert_eq!(sub.alt, 'T');
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(text: &str) -> Result<Self, Report> {
        let text = text.trim();
        let chars = text.chars().collect::<Vec<_>>();
        if chars.len() < 3 {
            return Err(eyre!("Mutation is too short to parse: {text:?}"))
                .suggestion("Mutations are expected in the format A123T.");
        }

        let reference = chars[0];
        let alt = chars[chars.len() - 1];
        let coord = chars[1..chars.len() - 1]
            .iter()
            .collect::<String>()
            .parse::<usize>()
            .wrap_err_with(|| format!("Failed to parse mutation coordinate: {text:?}"))?;
        if coord == 0 {
            return Err(eyre!("Mutation coordinates are 1-based: {text:?}"));
        }

        Ok(Substitution { coord, reference, alt })
    }
}

// ----------------------------------------------------------------------------
// Token Helpers
// ----------------------------------------------------------------------------

/// Returns the flip partner of a mutation token, swapping the first and last character.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::mutation::flip;
/// assert_eq!(flip("A123T"), "T123A");
/// assert_eq!(flip(&flip("G1C")), "G1C");
/// ```
pub fn flip(token: &str) -> String {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => format!("{last}{}{first}", chars.as_str()),
        (Some(first), None) => format!("{first}{first}"),
        _ => String::new(),
    }
}

/// Returns the token without its final (alt) base: `A123T` => `A123`.
pub fn site(token: &str) -> &str {
    match token.char_indices().next_back() {
        Some((i, _)) => &token[..i],
        None => token,
    }
}

/// Returns the alt base followed by the coordinate: `A123T` => `T123`.
///
/// A token `a` continues into a token `b` at the same coordinate when
/// `flip_site(a) == site(b)`.
pub fn flip_site(token: &str) -> String {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(last)) => format!("{last}{}", chars.as_str()),
        (Some(first), None) => first.to_string(),
        _ => String::new(),
    }
}

/// Returns the last character (alt base) of a token.
pub fn alt(token: &str) -> Option<char> {
    token.chars().next_back()
}

/// Parse the numeric genomic coordinate in the middle of a token.
///
/// ## Examples
///
/// ```rust
/// use barcodeforge::mutation::position;
/// assert_eq!(position("C23403G")?, 23403);
/// assert!(position("node_1").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn position(token: &str) -> Result<usize, Report> {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars
        .as_str()
        .parse::<usize>()
        .wrap_err_with(|| eyre!("Failed to parse genomic position from mutation: {token:?}"))
}
