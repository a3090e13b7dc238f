use std::fmt;

use regex::Regex;

use crate::error::Error;

/// Symbolic root of a structural path.
///
/// Specs (`DATA.cats.<array>.id`) are always authored against the document's
/// own root; while a comparison direction is active the path carries the
/// label of the side under test instead. Keeping the root as its own field
/// means switching direction swaps this value, so a document key that happens
/// to be spelled `DATA` can never collide with the symbolic label.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Root {
    Data,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Array,
    Index(usize),
}

/// Structural location of a node, rebuilt incrementally during traversal.
///
/// Index positions are always relative to the expected-side array, never the
/// actual side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPath {
    root: Root,
    segments: Vec<Segment>,
}

impl DiffPath {
    pub fn root(root: Root) -> Self {
        Self {
            root,
            segments: vec![],
        }
    }

    pub fn child(&self, next: Segment) -> DiffPath {
        let mut segments = self.segments.clone();
        segments.push(next);
        DiffPath {
            root: self.root,
            segments,
        }
    }

    /// The path with array-index markers stripped, as used for ignore-path
    /// and identity-key lookups. Any index at a given depth matches the spec
    /// for that depth uniformly.
    pub fn normalized(&self) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| !matches!(s, Segment::Index(_)))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Root::Data => write!(f, "DATA"),
            Root::Left => write!(f, "LEFT"),
            Root::Right => write!(f, "RIGHT"),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Field(key) => write!(f, ".{}", key),
            Segment::Array => write!(f, ".<array>"),
            Segment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

impl fmt::Display for DiffPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// An identity-key specification: the array it applies to plus the property
/// whose value identifies elements of that array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    pub array_path: Vec<Segment>,
    pub property: String,
}

fn parse_segments(spec: &str) -> Result<Vec<Segment>, Error> {
    let re = Regex::new(r"^DATA(\.(<array>|[A-Za-z_][A-Za-z0-9_\-]*))+$")
        .expect("segment pattern is valid");

    if !re.is_match(spec) {
        return Err(Error::InvalidPathSpec(spec.to_string()));
    }

    let segments = spec
        .split('.')
        .skip(1)
        .map(|token| {
            if token == "<array>" {
                Segment::Array
            } else {
                Segment::Field(token.to_string())
            }
        })
        .collect();

    Ok(segments)
}

/// Parses an ignore-path spec (`DATA.user.created_at`). Index markers are
/// not part of the vocabulary; ignore paths match every index uniformly.
pub fn parse_ignore_spec(spec: &str) -> Result<Vec<Segment>, Error> {
    parse_segments(spec)
}

/// Parses an identity-key spec (`DATA.cats.<array>.id`): the final segment
/// names the key property and must sit directly inside an `<array>` marker.
pub fn parse_key_spec(spec: &str) -> Result<MatchKey, Error> {
    let mut segments = parse_segments(spec)?;

    let property = match segments.pop() {
        Some(Segment::Field(name)) => name,
        _ => return Err(Error::InvalidPathSpec(spec.to_string())),
    };
    if segments.last() != Some(&Segment::Array) {
        return Err(Error::InvalidPathSpec(spec.to_string()));
    }

    Ok(MatchKey {
        array_path: segments,
        property,
    })
}
