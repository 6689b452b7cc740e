//! Previous/next target cycling
//!
//! The ring of entries is the overview followed by every traversable body in
//! catalog order.

use orrery_core::Catalog;

/// Label of the overview entry
pub const OVERVIEW_LABEL: &str = "View Solar System";

#[derive(Clone, Debug)]
pub struct FocusCycle {
    entries: Vec<Option<String>>,
    index: usize,
}

impl FocusCycle {
    pub fn new(catalog: &Catalog) -> Self {
        let entries = std::iter::once(None)
            .chain(catalog.traversable().map(|b| Some(b.name.clone())))
            .collect();
        Self { entries, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries[self.index].as_deref()
    }

    pub fn next(&mut self) -> Option<&str> {
        self.index = (self.index + 1) % self.entries.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&str> {
        self.index = (self.index + self.entries.len() - 1) % self.entries.len();
        self.current()
    }

    /// Point the cycle at `target` after it was chosen some other way.
    /// Returns false, leaving the position alone, if it is not in the ring.
    pub fn sync(&mut self, target: Option<&str>) -> bool {
        match self.entries.iter().position(|e| e.as_deref() == target) {
            Some(i) => {
                self.index = i;
                true
            }
            None => false,
        }
    }

    /// Display label for the current entry
    pub fn label<'a>(&self, catalog: &'a Catalog) -> &'a str {
        self.current()
            .and_then(|name| catalog.get(name))
            .map(|b| b.label())
            .unwrap_or(OVERVIEW_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_both_ways() {
        let catalog = Catalog::builtin().unwrap();
        let mut cycle = FocusCycle::new(&catalog);
        assert_eq!(cycle.current(), None);
        assert_eq!(cycle.next(), Some("Sun"));
        assert_eq!(cycle.previous(), None);
        let last = cycle.previous().map(str::to_string);
        assert_eq!(last.as_deref(), Some("Neptune"));
        assert_eq!(cycle.next(), None);
    }

    #[test]
    fn test_cycle_skips_non_traversable() {
        let catalog = Catalog::builtin().unwrap();
        let mut cycle = FocusCycle::new(&catalog);
        let mut seen = Vec::new();
        for _ in 1..cycle.len() {
            seen.push(cycle.next().unwrap().to_string());
        }
        assert!(!seen.iter().any(|n| n == "Phobos" || n == "Deimos" || n == "Saturn Rings"));
        assert!(seen.iter().any(|n| n == "Moon"));
        assert_eq!(cycle.next(), None);
    }

    #[test]
    fn test_labels_and_sync() {
        let catalog = Catalog::builtin().unwrap();
        let mut cycle = FocusCycle::new(&catalog);
        assert_eq!(cycle.label(&catalog), OVERVIEW_LABEL);

        assert!(cycle.sync(Some("Earth")));
        assert_eq!(cycle.current(), Some("Earth"));
        assert_eq!(cycle.label(&catalog), catalog.get("Earth").unwrap().label());

        assert!(!cycle.sync(Some("Phobos")));
        assert_eq!(cycle.current(), Some("Earth"));
        // Moons without a display name fall back to their name
        assert!(cycle.sync(Some("Io")));
        assert_eq!(cycle.label(&catalog), "Io");
    }
}
