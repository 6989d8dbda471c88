use crate::arguments::{normalize_arguments, Argument, NormalizedArguments};
use commentq_shared::types::Result;
use derive_more::Display;

/// How collected comments are filtered
#[derive(Clone, Debug, Display, PartialEq)]
pub enum Filter {
    /// Every comment
    #[display("all")]
    All,
    /// Comments whose trimmed text equals the value
    #[display("text == {_0}")]
    Text(Argument),
    /// Comments with a pseudo-attribute
    #[display("{name} == {value}")]
    Attribute { name: String, value: Argument },
}

/// A comment search
#[derive(Clone, Debug, PartialEq)]
pub struct CommentQuery {
    pub(crate) deep: bool,
    pub(crate) filter: Filter,
}

impl CommentQuery {
    /// All comments; with `deep` also those inside descendant elements
    #[must_use]
    pub fn all(deep: bool) -> Self {
        Self {
            deep,
            filter: Filter::All,
        }
    }

    /// Comments whose text equals the value. An empty value selects all comments.
    #[must_use]
    pub fn by_text(value: impl Into<Argument>, deep: bool) -> Self {
        NormalizedArguments {
            deep,
            name: String::new(),
            value: value.into(),
        }
        .into()
    }

    /// Comments that hold the pseudo-attribute `name` with the given value. An empty name turns
    /// this into a text search.
    #[must_use]
    pub fn by_attribute(name: &str, value: impl Into<Argument>, deep: bool) -> Self {
        NormalizedArguments {
            deep,
            name: name.to_string(),
            value: value.into(),
        }
        .into()
    }

    /// Builds a query from up to three loosely typed arguments, see `normalize_arguments`
    pub fn from_arguments(arguments: &[Argument]) -> Result<Self> {
        Ok(normalize_arguments(arguments)?.into())
    }

    #[must_use]
    pub fn deep(&self) -> bool {
        self.deep
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

impl std::fmt::Display for CommentQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = if self.deep { "deep" } else { "children" };
        write!(f, "{} ({scope})", self.filter)
    }
}

impl From<NormalizedArguments> for CommentQuery {
    fn from(arguments: NormalizedArguments) -> Self {
        let filter = if !arguments.name.is_empty() {
            Filter::Attribute {
                name: arguments.name,
                value: arguments.value,
            }
        } else if arguments.value.is_truthy() {
            Filter::Text(arguments.value)
        } else {
            Filter::All
        };

        Self {
            deep: arguments.deep,
            filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn named_constructors() {
        assert_eq!(CommentQuery::all(true).filter(), &Filter::All);
        assert!(CommentQuery::all(true).deep());

        let query = CommentQuery::by_text("hello", false);
        assert_eq!(query.filter(), &Filter::Text("hello".into()));
        assert!(!query.deep());

        let query = CommentQuery::by_attribute("name", "x", true);
        assert_eq!(
            query.filter(),
            &Filter::Attribute {
                name: "name".into(),
                value: "x".into()
            }
        );
    }

    #[test]
    fn empty_parts_fall_through() {
        assert_eq!(CommentQuery::by_text("", true), CommentQuery::all(true));
        assert_eq!(
            CommentQuery::by_attribute("", "x", false),
            CommentQuery::by_text("x", false)
        );
        // an attribute search with an empty value looks for bare attributes
        assert_eq!(
            CommentQuery::by_attribute("collapsed", "", false).filter(),
            &Filter::Attribute {
                name: "collapsed".into(),
                value: "".into()
            }
        );
    }

    #[test_case(&[], CommentQuery::all(false); "no arguments")]
    #[test_case(&[true.into()], CommentQuery::all(true); "deep")]
    #[test_case(&["v".into()], CommentQuery::by_text("v", false); "value")]
    #[test_case(&["v".into(), true.into()], CommentQuery::by_text("v", true); "value and deep")]
    #[test_case(&["n".into(), "v".into()], CommentQuery::by_attribute("n", "v", false); "name and value")]
    #[test_case(&["n".into(), "v".into(), true.into()], CommentQuery::by_attribute("n", "v", true); "name value and deep")]
    fn call_shapes(arguments: &[Argument], expected: CommentQuery) {
        assert_eq!(CommentQuery::from_arguments(arguments).unwrap(), expected);
    }

    #[test]
    fn too_many_arguments() {
        let arguments = vec![Argument::from("a"); 4];
        assert!(CommentQuery::from_arguments(&arguments).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(CommentQuery::all(false).to_string(), "all (children)");
        assert_eq!(CommentQuery::by_text("x", true).to_string(), "text == x (deep)");
        assert_eq!(
            CommentQuery::by_attribute("n", 3, false).to_string(),
            "n == 3 (children)"
        );
    }
}
