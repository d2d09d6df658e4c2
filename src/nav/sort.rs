use std::cmp::Ordering;

use crate::fs::entry::DirEntry;

/// Field entries are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Size,
    Date,
}

impl SortField {
    /// Parse a sort field from a config string. Unknown values fall back to name.
    pub fn from_config(s: &str) -> Self {
        match s {
            "size" => SortField::Size,
            "date" | "modified" => SortField::Date,
            _ => SortField::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Size => "Size",
            SortField::Date => "Date",
        }
    }

    /// Cycle to the next sort field.
    pub fn next(&self) -> Self {
        match self {
            SortField::Name => SortField::Size,
            SortField::Size => SortField::Date,
            SortField::Date => SortField::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_config(s: &str) -> Self {
        match s {
            "desc" => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortConfig {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    fn compare(&self, a: &DirEntry, b: &DirEntry) -> Ordering {
        let ord = match self.field {
            SortField::Name => a.name.as_bytes().cmp(b.name.as_bytes()),
            SortField::Size => a.size.cmp(&b.size),
            SortField::Date => a.modified.cmp(&b.modified),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Order entries as: `..` first, then directories, then files.
///
/// Directories and files are sorted independently with the same comparator.
/// The sort is stable, so entries that compare equal keep their prior order
/// and re-sorting an already sorted list changes nothing.
pub fn sort_entries(entries: Vec<DirEntry>, config: SortConfig) -> Vec<DirEntry> {
    let mut parent = Vec::with_capacity(1);
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in entries {
        if entry.is_parent() {
            parent.push(entry);
        } else if entry.is_dir {
            dirs.push(entry);
        } else {
            files.push(entry);
        }
    }

    dirs.sort_by(|a, b| config.compare(a, b));
    files.sort_by(|a, b| config.compare(a, b));

    parent.extend(dirs);
    parent.extend(files);
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::source::mock::{dir, file};
    use std::time::{Duration, SystemTime};

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn dated(mut entry: DirEntry, secs: u64) -> DirEntry {
        entry.modified = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        entry
    }

    fn sample() -> Vec<DirEntry> {
        vec![
            dated(file("b.txt", 30), 300),
            dated(dir("zeta"), 100),
            dated(file("a.txt", 10), 200),
            DirEntry::parent(),
            dated(dir("Alpha"), 400),
            dated(file("C.md", 20), 100),
        ]
    }

    #[test]
    fn name_ascending_is_bytewise() {
        let sorted = sort_entries(sample(), SortConfig::default());
        assert_eq!(
            names(&sorted),
            vec!["..", "Alpha", "zeta", "C.md", "a.txt", "b.txt"]
        );
    }

    #[test]
    fn name_descending_keeps_dirs_first() {
        let sorted = sort_entries(sample(), SortConfig::new(SortField::Name, SortOrder::Desc));
        assert_eq!(
            names(&sorted),
            vec!["..", "zeta", "Alpha", "b.txt", "a.txt", "C.md"]
        );
    }

    #[test]
    fn size_sort_orders_files_numerically() {
        let sorted = sort_entries(sample(), SortConfig::new(SortField::Size, SortOrder::Asc));
        assert_eq!(&names(&sorted)[3..], &["a.txt", "C.md", "b.txt"]);
        let sorted = sort_entries(sample(), SortConfig::new(SortField::Size, SortOrder::Desc));
        assert_eq!(&names(&sorted)[3..], &["b.txt", "C.md", "a.txt"]);
    }

    #[test]
    fn date_sort_orders_by_mtime() {
        let sorted = sort_entries(sample(), SortConfig::new(SortField::Date, SortOrder::Asc));
        assert_eq!(
            names(&sorted),
            vec!["..", "zeta", "Alpha", "C.md", "a.txt", "b.txt"]
        );
    }

    #[test]
    fn ties_preserve_prior_order() {
        let entries = vec![file("x", 5), file("y", 5), file("w", 5)];
        let sorted = sort_entries(entries, SortConfig::new(SortField::Size, SortOrder::Desc));
        assert_eq!(names(&sorted), vec!["x", "y", "w"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        for field in [SortField::Name, SortField::Size, SortField::Date] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let config = SortConfig::new(field, order);
                let once = sort_entries(sample(), config);
                let twice = sort_entries(once.clone(), config);
                assert_eq!(once, twice, "{field:?} {order:?}");
            }
        }
    }

    #[test]
    fn directories_precede_files_for_every_config() {
        for field in [SortField::Name, SortField::Size, SortField::Date] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let sorted = sort_entries(sample(), SortConfig::new(field, order));
                assert!(sorted[0].is_parent());
                let first_file = sorted.iter().position(|e| !e.is_dir).unwrap();
                assert!(sorted[first_file..].iter().all(|e| !e.is_dir));
            }
        }
    }

    #[test]
    fn cycle_field_and_parse() {
        assert_eq!(SortField::Name.next(), SortField::Size);
        assert_eq!(SortField::Size.next(), SortField::Date);
        assert_eq!(SortField::Date.next(), SortField::Name);
        assert_eq!(SortField::from_config("modified"), SortField::Date);
        assert_eq!(SortField::from_config("bogus"), SortField::Name);
        assert_eq!(SortOrder::from_config("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
