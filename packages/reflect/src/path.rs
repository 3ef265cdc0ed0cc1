//! Property path tokenizer.
//!
//! A property path is a `.`-separated list of segments, each a property name
//! with an optional `[index]` suffix: `order.items[2].price`.

use std::fmt;

/// Errors related to property path parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The whole expression is empty.
    #[error("empty property path")]
    Empty,

    /// A segment has no property name (`.a`, `a..b`, `a.`, `[0]`).
    #[error("empty property name in path '{path}'")]
    EmptyName { path: String },

    /// A `[` without its matching `]`.
    #[error("unclosed index in segment '{segment}'")]
    UnclosedIndex { segment: String },

    /// The text between the brackets is not a non-negative integer.
    #[error("invalid index '{index}' in segment '{segment}'")]
    InvalidIndex { segment: String, index: String },

    /// Something follows the closing `]`.
    #[error("unexpected characters after index in segment '{segment}'")]
    TrailingCharacters { segment: String },
}

/// The head segment of a property path, plus the unparsed remainder.
///
/// Splitting happens at the first `.`, so `a.b[0].c` has the head `a` and the
/// children `b[0].c`. Brackets inside the head are not nested paths: `a[0]`
/// is the property `a` at index `0`.
///
/// # Examples
///
/// ```rust
/// use metaprop_reflect::PathSegment;
///
/// let segment = PathSegment::parse("items[2].price").unwrap();
/// assert_eq!(segment.name(), "items");
/// assert_eq!(segment.index(), Some(2));
/// assert_eq!(segment.indexed_name(), "items[2]");
/// assert_eq!(segment.children(), Some("price"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: String,
    indexed_name: String,
    index: Option<usize>,
    children: Option<String>,
}

impl PathSegment {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let (head, children) = match path.split_once('.') {
            Some((head, rest)) => {
                if rest.is_empty() {
                    return Err(PathError::EmptyName {
                        path: path.to_string(),
                    });
                }
                (head, Some(rest.to_string()))
            }
            None => (path, None),
        };

        let (name, index) = Self::parse_head(head)?;
        if name.is_empty() {
            return Err(PathError::EmptyName {
                path: path.to_string(),
            });
        }

        Ok(PathSegment {
            name: name.to_string(),
            indexed_name: head.to_string(),
            index,
            children,
        })
    }

    fn parse_head(head: &str) -> Result<(&str, Option<usize>), PathError> {
        let Some(open) = head.find('[') else {
            return Ok((head, None));
        };
        let name = &head[..open];
        let after = &head[open + 1..];
        let Some(close) = after.find(']') else {
            return Err(PathError::UnclosedIndex {
                segment: head.to_string(),
            });
        };
        if close + 1 != after.len() {
            return Err(PathError::TrailingCharacters {
                segment: head.to_string(),
            });
        }

        let raw = &after[..close];
        let index = raw.parse::<usize>().map_err(|_| PathError::InvalidIndex {
            segment: head.to_string(),
            index: raw.to_string(),
        })?;
        Ok((name, Some(index)))
    }

    /// Iterate over every segment of a path, head first.
    pub fn iter(path: &str) -> Segments<'_> {
        Segments {
            rest: Some(path),
            failed: false,
        }
    }

    /// The property name, without any index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The segment as written, index included (`items[2]`).
    pub fn indexed_name(&self) -> &str {
        &self.indexed_name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// The path after this segment, if any.
    pub fn children(&self) -> Option<&str> {
        self.children.as_deref()
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// The path after this segment, or `""` at the last segment.
    pub fn remainder(&self) -> &str {
        self.children.as_deref().unwrap_or("")
    }

    /// Parse the next segment.
    ///
    /// Returns `None` at the last segment.
    pub fn next_segment(&self) -> Option<Result<PathSegment, PathError>> {
        self.children.as_deref().map(PathSegment::parse)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.children {
            Some(children) => write!(f, "{}.{}", self.indexed_name, children),
            None => f.write_str(&self.indexed_name),
        }
    }
}

/// Iterator over the segments of a property path.
///
/// Yields an error and then stops if any segment fails to parse.
pub struct Segments<'a> {
    rest: Option<&'a str>,
    failed: bool,
}

impl Iterator for Segments<'_> {
    type Item = Result<PathSegment, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let path = self.rest.take()?;
        match PathSegment::parse(path) {
            Ok(segment) => {
                if segment.has_children() {
                    // children are a suffix of `path`, so borrow instead of copying
                    self.rest = Some(&path[segment.indexed_name.len() + 1..]);
                }
                Some(Ok(segment))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
