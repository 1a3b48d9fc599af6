//! Semantic grouping of utility class names.
//!
//! A [`GroupTable`] is an ordered list of named groups, each identified by a
//! set of keyword substrings. The entry order is significant: it defines the
//! canonical order in which groups appear in sorted output.

/// Name of the catch-all group for tokens matching no configured keyword.
pub const OTHER_GROUP: &str = "other";

/// One named bucket of the canonical ordering, with the keyword substrings
/// that place a class name in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered table of class groups. Constructed once and never mutated.
#[derive(Debug, Clone)]
pub struct GroupTable {
    groups: Vec<Group>,
    other_index: usize,
}

/// Built-in grouping, keyword substrings per group. Entry order is the
/// canonical output order.
const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("responsive", &["sm:", "md:", "lg:", "xl:", "2xl:"]),
    (
        "state",
        &[
            "hover:",
            "focus:",
            "focus-within:",
            "active:",
            "disabled:",
            "visited:",
            "group-hover:",
        ],
    ),
    (
        "layout",
        &[
            "container", "block", "inline", "flex", "grid", "hidden", "float-", "clear-",
            "object-", "overflow-", "absolute", "relative", "fixed", "sticky", "static",
            "inset-", "top-", "z-",
        ],
    ),
    (
        "spacing",
        &[
            "p-", "px-", "py-", "pt-", "pr-", "pb-", "pl-", "m-", "mx-", "my-", "mt-", "mr-",
            "mb-", "ml-", "space-x-", "space-y-", "gap-",
        ],
    ),
    ("sizing", &["w-", "h-", "min-w-", "max-w-", "min-h-", "max-h-"]),
    (
        "typography",
        &[
            "font-",
            "text-",
            "tracking-",
            "leading-",
            "list-",
            "align-",
            "whitespace-",
            "break-",
            "truncate",
            "italic",
            "uppercase",
            "capitalize",
        ],
    ),
    ("background", &["bg-", "from-", "via-", "to-"]),
    ("border", &["border", "divide-", "rounded", "ring-", "outline-"]),
    ("effects", &["shadow", "opacity-", "blur-", "mix-blend-"]),
    (
        "transition",
        &["transition", "duration-", "ease-", "delay-", "animate-"],
    ),
    (
        "transform",
        &["transform", "scale-", "rotate-", "translate-", "skew-", "origin-"],
    ),
    (
        "interactivity",
        &["cursor-", "select-", "resize", "pointer-events-", "appearance-"],
    ),
    (OTHER_GROUP, &[]),
];

impl Default for GroupTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_GROUPS
                .iter()
                .map(|(name, keywords)| (*name, keywords.to_vec())),
        )
    }
}

impl GroupTable {
    /// Build a table from ordered `(name, keywords)` entries. A catch-all
    /// `other` entry is appended when the given entries do not already
    /// contain one, so unmatched tokens always have a bucket to land in.
    pub fn new<N: Into<String>>(entries: impl IntoIterator<Item = (N, Vec<N>)>) -> Self {
        let mut groups: Vec<Group> = entries
            .into_iter()
            .map(|(name, keywords)| Group {
                name: name.into(),
                keywords: keywords.into_iter().map(Into::into).collect(),
            })
            .collect();

        if !groups.iter().any(|group| group.name == OTHER_GROUP) {
            groups.push(Group {
                name: OTHER_GROUP.to_string(),
                keywords: Vec::new(),
            });
        }

        let other_index = groups
            .iter()
            .position(|group| group.name == OTHER_GROUP)
            .unwrap_or(groups.len() - 1);

        Self {
            groups,
            other_index,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Name of the group a token belongs to. The first group in table order
    /// with a keyword contained in the token wins; tokens matching nothing
    /// resolve to [`OTHER_GROUP`].
    pub fn classify(&self, token: &str) -> &str {
        self.groups[self.classify_index(token)].name.as_str()
    }

    pub(crate) fn classify_index(&self, token: &str) -> usize {
        self.groups
            .iter()
            .position(|group| {
                group
                    .keywords
                    .iter()
                    .any(|keyword| token.contains(keyword.as_str()))
            })
            .unwrap_or(self.other_index)
    }
}
