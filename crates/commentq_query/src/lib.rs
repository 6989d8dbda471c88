//! Comment search engine
//!
//! Finds comment nodes below one or more root nodes of a document and optionally filters them by
//! their full text, or by pseudo-attributes written inside the comment:
//!
//! ```text
//! <!-- widget name="sidebar" width=300 collapsed -->
//! ```
//!
//! A search is described by a `CommentQuery`. Queries are built with the named constructors
//! (`CommentQuery::all`, `CommentQuery::by_text`, `CommentQuery::by_attribute`) or from a loosely
//! typed argument list with `CommentQuery::from_arguments`, which accepts the six classic call
//! shapes:
//!
//! | arguments              | query                                        |
//! |------------------------|----------------------------------------------|
//! | `()`                   | child comments                               |
//! | `(true)`               | all comments                                 |
//! | `(value)`              | child comments whose text equals value       |
//! | `(value, true)`        | all comments whose text equals value         |
//! | `(name, value)`        | child comments with the pseudo-attribute     |
//! | `(name, value, true)`  | all comments with the pseudo-attribute       |

pub mod arguments;
pub mod attributes;
pub mod collector;
pub mod matcher;
pub mod query;
pub mod search;

pub use arguments::{normalize_arguments, Argument, NormalizedArguments};
pub use attributes::{parse_attributes, AttributeMap};
pub use collector::{collect_comments, CommentIterator};
pub use matcher::{has_attribute, has_text, MatchOptions};
pub use query::{CommentQuery, Filter};
pub use search::{find_comments, search_all, CommentEngine, CommentSet};
