//! Filtered/sorted view over the current collection.

use crate::item::PantryItem;

/// Records matching a search string, name matches first.
///
/// The view is lazy and restartable: nothing is filtered until it is iterated,
/// and every call to [`SearchView::iter`] starts over. Ordering is a stable
/// partition of the input, which is the same as a stable sort on
/// "name matches" (true first). An empty search matches every record and
/// keeps the input order.
#[derive(Debug, Clone)]
pub struct SearchView<'a> {
    items: &'a [PantryItem],
    needle: String,
}

impl<'a> SearchView<'a> {
    pub fn new(items: &'a [PantryItem], search: &str) -> Self {
        Self {
            items,
            needle: search.to_lowercase(),
        }
    }

    pub fn iter(&self) -> SearchIter<'_> {
        SearchIter {
            items: self.items,
            needle: &self.needle,
            pass: Pass::NameMatches,
            pos: 0,
        }
    }
}

impl<'v, 'a> IntoIterator for &'v SearchView<'a> {
    type Item = &'v PantryItem;
    type IntoIter = SearchIter<'v>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Pass {
    NameMatches,
    CategoryOnly,
    Done,
}

/// Two passes over the input: name matches, then category-only matches.
#[derive(Debug, Clone)]
pub struct SearchIter<'v> {
    items: &'v [PantryItem],
    needle: &'v str,
    pass: Pass,
    pos: usize,
}

impl<'v> Iterator for SearchIter<'v> {
    type Item = &'v PantryItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let keep: fn(&PantryItem, &str) -> bool = match self.pass {
                Pass::NameMatches => |item, needle| item.name_contains(needle),
                Pass::CategoryOnly => {
                    |item, needle| !item.name_contains(needle) && item.category_contains(needle)
                }
                Pass::Done => return None,
            };

            while let Some(item) = self.items.get(self.pos) {
                self.pos += 1;
                if keep(item, self.needle) {
                    return Some(item);
                }
            }

            self.pos = 0;
            self.pass = match self.pass {
                Pass::NameMatches => Pass::CategoryOnly,
                _ => Pass::Done,
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.pass {
            Pass::Done => (0, Some(0)),
            _ => (0, Some(self.items.len())),
        }
    }
}
