//! Ordered set of monitored targets with positional ids

use crate::models::Target;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    targets: Vec<Target>,
}

impl Registry {
    pub fn add(&mut self, url: impl Into<String>, name: Option<String>) -> Target {
        let url = url.into();
        let display_name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| url.clone());
        let target = Target {
            id: self.targets.len(),
            url,
            display_name,
        };
        self.targets.push(target.clone());
        target
    }

    /// Removes the target at `id`, shifting every later target down by one.
    ///
    /// Ids are positions, so any id held for a later target is stale after this call.
    pub fn remove(&mut self, id: usize) -> Option<Target> {
        if id >= self.targets.len() {
            return None;
        }
        let removed = self.targets.remove(id);
        for (position, target) in self.targets.iter_mut().enumerate().skip(id) {
            target.id = position;
        }
        Some(removed)
    }

    pub fn get(&self, id: usize) -> Option<&Target> {
        self.targets.get(id)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.targets.iter().any(|t| t.url == url)
    }

    pub fn list(&self) -> Vec<Target> {
        self.targets.clone()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(registry: &Registry) {
        for (position, target) in registry.list().iter().enumerate() {
            assert_eq!(target.id, position);
        }
    }

    #[test]
    fn test_add_assigns_next_id_and_defaults_name() {
        let mut registry = Registry::default();
        let a = registry.add("https://a.example", Some("A".into()));
        let b = registry.add("https://b.example", None);
        let c = registry.add("https://c.example", Some(String::new()));

        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
        assert_eq!(b.display_name, "https://b.example");
        assert_eq!(c.display_name, "https://c.example");
    }

    #[test]
    fn test_remove_reindexes_later_targets() {
        let mut registry = Registry::default();
        registry.add("https://a.example", Some("A".into()));
        registry.add("https://b.example", Some("B".into()));
        registry.add("https://c.example", Some("C".into()));

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.display_name, "B");

        let names: Vec<_> = registry.list().into_iter().map(|t| t.display_name).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_contiguous(&registry);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut registry = Registry::default();
        registry.add("https://a.example", None);

        assert!(registry.remove(1).is_none());
        assert!(registry.remove(usize::MAX).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ids_stay_contiguous_under_mixed_operations() {
        let mut registry = Registry::default();
        let ops: &[(bool, usize)] = &[
            (true, 0),
            (true, 0),
            (true, 0),
            (false, 0),
            (true, 0),
            (false, 2),
            (false, 5),
            (true, 0),
            (false, 1),
        ];
        for (i, (add, id)) in ops.iter().enumerate() {
            if *add {
                registry.add(format!("https://{i}.example"), None);
            } else {
                registry.remove(*id);
            }
            assert_contiguous(&registry);
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_urls_tracked_separately() {
        let mut registry = Registry::default();
        registry.add("https://same.example", Some("first".into()));
        registry.add("https://same.example", Some("second".into()));

        assert_eq!(registry.len(), 2);
        registry.remove(0);
        assert!(registry.contains_url("https://same.example"));
        assert_eq!(registry.get(0).unwrap().display_name, "second");
    }
}
