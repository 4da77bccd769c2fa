//! Path pattern parsing shared by route registration and request matching.
//!
//! Both registered patterns (`/user/:name/*rest`) and concrete request paths
//! (`/user/yra/a/b`) are split with the same rules, so the catch-all
//! truncation applies symmetrically to both sides.

/// A single slash-delimited token of a pattern or path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matches only an identical token.
    Literal(&'a str),
    /// `:name` - matches exactly one token and binds it under `name`.
    Param(&'a str),
    /// `*name` - matches every remaining token, bound slash-joined under `name`.
    CatchAll(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a non-empty token by its first character.
    #[must_use]
    pub fn classify(token: &'a str) -> Self {
        if let Some(name) = token.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = token.strip_prefix('*') {
            Segment::CatchAll(name)
        } else {
            Segment::Literal(token)
        }
    }

    /// True for `:name` and `*name` segments.
    #[inline]
    #[must_use]
    pub fn is_wild(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

/// Split `raw` into its non-empty segments.
///
/// Empty tokens are dropped, so repeated, leading and trailing slashes are
/// normalized away. Accumulation stops right after the first catch-all
/// token; anything after it is silently discarded.
///
/// # Example
///
/// ```
/// use treeroute::router::{parse_parts, Segment};
///
/// let parts = parse_parts("//static/*filepath/ignored");
/// assert_eq!(parts, vec!["static", "*filepath"]);
/// assert_eq!(Segment::classify(parts[1]), Segment::CatchAll("filepath"));
/// ```
#[must_use]
pub fn parse_parts(raw: &str) -> Vec<&str> {
    let mut parts = Vec::with_capacity(raw.matches('/').count() + 1);
    for token in raw.split('/') {
        if token.is_empty() {
            continue;
        }
        parts.push(token);
        if token.starts_with('*') {
            break;
        }
    }
    parts
}

/// Parse `raw` into classified segments. See [`parse_parts`].
#[must_use]
pub fn parse(raw: &str) -> Vec<Segment<'_>> {
    parse_parts(raw).into_iter().map(Segment::classify).collect()
}

/// Whether parsing `raw` drops non-empty tokens that follow a catch-all.
#[must_use]
pub fn has_trailing_after_catch_all(raw: &str) -> bool {
    let total = raw.split('/').filter(|t| !t.is_empty()).count();
    total > parse_parts(raw).len()
}
