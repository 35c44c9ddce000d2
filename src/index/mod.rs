pub mod entry;
pub mod scoped;
pub mod search;
pub mod simple;
pub mod term_match;

use std::collections::HashSet;
use std::hash::Hash;

pub use self::entry::TermIndexEntry;
pub use self::scoped::ScopedTermIndex;
pub use self::search::{LongestMatchStrategy, NaiveSearchStrategy, SearchStrategy};
pub use self::simple::SimpleTermIndex;
pub use self::term_match::TermMatch;

/// Associates terms with ids and finds those terms in arbitrary text.
pub trait TermIndex<Id> {
    fn add(&mut self, id: Id, text: &str);

    fn add_all<I, T>(&mut self, terms: I)
    where
        Self: Sized,
        I: IntoIterator<Item = (Id, T)>,
        T: AsRef<str>,
    {
        for (id, text) in terms {
            self.add(id, text.as_ref());
        }
    }

    fn remove(&mut self, id: &Id);

    fn match_text(&self, input: &str) -> Vec<TermMatch<Id>>;

    fn search(&self, input: &str) -> HashSet<Id>
    where
        Id: Eq + Hash,
    {
        self.match_text(input)
            .into_iter()
            .map(TermMatch::into_id)
            .collect()
    }
}
