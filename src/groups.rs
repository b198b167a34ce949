use std::{collections::BTreeMap, fmt};

/// The capture groups of a compiled pattern.
///
/// Every group has an index. Index `0` is the implicit group for the overall
/// match, and every explicit group, named or not, gets the next index in the
/// order its opening parenthesis appears in the pattern. Named groups can
/// additionally be looked up by name.
///
/// The table is derived once from the compiled pattern. Two compilations of
/// the same pattern, by the same engine or by different engines, produce
/// equal tables.
///
/// # Name order
///
/// Engines disagree on the order in which they list group names. This table
/// renders names in lexicographic order, e.g., `{id=2, type=1}` for the
/// pattern `(?<type>\w+) (?<id>\d+)`, which matches the introspection output
/// of the JVM's `Pattern::namedGroups`. Declaration order is available via
/// [`GroupTable::declared`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupTable {
    /// One entry per group in index order. Index 0 is always `None`.
    slots: Vec<Option<String>>,
    by_name: BTreeMap<String, usize>,
}

impl GroupTable {
    /// Builds a table from one optional name per group, in index order. The
    /// first entry corresponds to the overall match and must be unnamed.
    ///
    /// If a name is repeated, then the first group bearing it wins. (None of
    /// the engines in this crate accept duplicate names by default, so this
    /// only matters for hand written tables.)
    pub fn new<I, S>(names: I) -> GroupTable
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut slots = vec![];
        let mut by_name = BTreeMap::new();
        for (index, name) in names.into_iter().enumerate() {
            let name = name.map(|n| n.as_ref().to_string());
            if index == 0 {
                debug_assert!(name.is_none(), "group 0 cannot have a name");
                slots.push(None);
                continue;
            }
            if let Some(ref name) = name {
                by_name.entry(name.clone()).or_insert(index);
            }
            slots.push(name);
        }
        if slots.is_empty() {
            slots.push(None);
        }
        GroupTable { slots, by_name }
    }

    /// Returns the index of the group with the given name.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of the group at the given index, if it has one.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.slots.get(index)?.as_deref()
    }

    /// Returns the total number of groups, including the group for the
    /// overall match.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of named groups.
    pub fn named_len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns every named group as a `(name, index)` pair, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.by_name.iter().map(|(name, &index)| (name.as_str(), index))
    }

    /// Returns every named group as a `(name, index)` pair, ordered by index.
    /// That is, in the order the groups are declared in the pattern.
    pub fn declared(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Some((name.as_deref()?, index)))
    }

    /// Returns one optional name per group, in index order.
    pub fn slots(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.slots.iter().map(|name| name.as_deref())
    }
}

impl fmt::Display for GroupTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, index)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={index}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lexicographic() {
        let table = GroupTable::new([None, Some("type"), Some("id")]);
        assert_eq!("{id=2, type=1}", table.to_string());
        let declared: Vec<_> = table.declared().collect();
        assert_eq!(vec![("type", 1), ("id", 2)], declared);
    }

    #[test]
    fn unnamed_groups_share_the_index_space() {
        let table = GroupTable::new([None, None, Some("b"), None, Some("a")]);
        assert_eq!(5, table.len());
        assert_eq!(2, table.named_len());
        assert_eq!(Some(4), table.index("a"));
        assert_eq!(Some(2), table.index("b"));
        assert_eq!(None, table.name(1));
        assert_eq!("{a=4, b=2}", table.to_string());
    }

    #[test]
    fn empty() {
        let table = GroupTable::new(Vec::<Option<&str>>::new());
        assert_eq!(1, table.len());
        assert_eq!("{}", table.to_string());
    }
}
