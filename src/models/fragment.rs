use std::collections::BTreeMap;
use std::fmt;

use super::ComponentId;

/// Key into a comprehension's template table.
pub type TemplateKey = u32;

/// Statics shared by the iterations of one comprehension, keyed by template.
pub type Templates = BTreeMap<TemplateKey, Vec<String>>;

/// Literal text segments surrounding the dynamic slots of a fragment.
///
/// Inline statics hold `N + 1` segments for `N` slots. The two reference
/// forms let the server skip retransmitting text the client already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statics {
    Inline(Vec<String>),
    /// Entry of the nearest enclosing comprehension's [`Templates`]
    Template(TemplateKey),
    /// The statics of another component in the same table
    ComponentRef(ComponentId),
}

impl Statics {
    /// Build inline statics from anything yielding string-like segments.
    pub fn inline<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Statics::Inline(segments.into_iter().map(Into::into).collect())
    }

    /// Inline segments, if the statics are not a reference.
    pub fn as_inline(&self) -> Option<&[String]> {
        match self {
            Statics::Inline(segments) => Some(segments),
            _ => None,
        }
    }
}

/// Which of the two fragment shapes a value has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Regular,
    Comprehension,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Regular => write!(f, "regular"),
            FragmentKind::Comprehension => write!(f, "comprehension"),
        }
    }
}

/// Recursive template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Children interleaved between the segments of `statics`
    Regular { children: Vec<Child>, statics: Statics },
    /// Repeated block; every row of `dynamics` renders against the same statics
    Comprehension {
        dynamics: Vec<Vec<Child>>,
        statics: Statics,
        templates: Option<Templates>,
    },
}

impl Fragment {
    pub fn regular(children: Vec<Child>, statics: Statics) -> Self {
        Fragment::Regular { children, statics }
    }

    pub fn comprehension(
        dynamics: Vec<Vec<Child>>,
        statics: Statics,
        templates: Option<Templates>,
    ) -> Self {
        Fragment::Comprehension {
            dynamics,
            statics,
            templates,
        }
    }

    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::Regular { .. } => FragmentKind::Regular,
            Fragment::Comprehension { .. } => FragmentKind::Comprehension,
        }
    }

    pub fn statics(&self) -> &Statics {
        match self {
            Fragment::Regular { statics, .. } | Fragment::Comprehension { statics, .. } => statics,
        }
    }

    /// Iterate every child in document order, rows of a comprehension included.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Child> + '_> {
        match self {
            Fragment::Regular { children, .. } => Box::new(children.iter()),
            Fragment::Comprehension { dynamics, .. } => Box::new(dynamics.iter().flatten()),
        }
    }
}

/// A slot inside a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    String(String),
    Fragment(Fragment),
    /// Reference into the root's component table
    ComponentId(ComponentId),
}

impl Child {
    pub fn as_fragment(&self) -> Option<&Fragment> {
        match self {
            Child::Fragment(fragment) => Some(fragment),
            _ => None,
        }
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::String(s.to_string())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::String(s)
    }
}

impl From<Fragment> for Child {
    fn from(fragment: Fragment) -> Self {
        Child::Fragment(fragment)
    }
}
