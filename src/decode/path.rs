//! Payload locations for error messages.
//!
//! Paths are linked through the call stack and only formatted when an error
//! is built, so decoding a valid payload allocates nothing for them.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// Location of the value being decoded, e.g. `c.3.0.d[2]`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Path<'a> {
    parent: Option<&'a Path<'a>>,
    segment: Segment<'a>,
}

impl Path<'static> {
    pub(crate) fn root() -> Self {
        Path {
            parent: None,
            segment: Segment::Root,
        }
    }
}

impl<'a> Path<'a> {
    /// Path of an object key below this one.
    pub(crate) fn key(&'a self, key: &'a str) -> Path<'a> {
        Path {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    /// Path of an array element below this one.
    pub(crate) fn index(&'a self, index: usize) -> Path<'a> {
        Path {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            segments.push(path.segment);
            current = path.parent;
        }

        let mut wrote_key = false;
        for segment in segments.iter().rev() {
            match segment {
                Segment::Root => {}
                Segment::Key(key) => {
                    if wrote_key {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                    wrote_key = true;
                }
                Segment::Index(index) => {
                    write!(f, "[{}]", index)?;
                    wrote_key = true;
                }
            }
        }

        if !wrote_key {
            f.write_str("<root>")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), "<root>");
    }

    #[test]
    fn test_nested_display() {
        let root = Path::root();
        let c = root.key("c");
        let three = c.key("3");
        let d = three.key("d");
        let row = d.index(2);
        let slot = row.index(0);
        assert_eq!(slot.to_string(), "c.3.d[2][0]");
    }
}
