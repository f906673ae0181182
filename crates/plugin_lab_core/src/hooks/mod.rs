//! Locally owned hook registry.
//!
//! # Responsibility
//! - Track named callbacks per hook and priority, the way a host dispatch
//!   table would, without any process-global state.
//! - Run string filters in priority order.
//!
//! # Invariants
//! - Callbacks run in ascending priority, then registration order.
//! - A callback name is unique per `(hook, priority)`; re-adding replaces it.
//! - Empty priority buckets and hooks are pruned on removal.

pub mod site_name;

use std::collections::BTreeMap;

/// Default priority used by registration helpers.
pub const DEFAULT_PRIORITY: i32 = 10;

/// String filter: receives the current value and one context argument.
pub type FilterFn = fn(String, &str) -> String;

#[derive(Clone)]
struct HookCallback {
    name: String,
    /// `None` for action registrations, which carry no filter body here.
    filter: Option<FilterFn>,
}

impl std::fmt::Debug for HookCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookCallback")
            .field("name", &self.name)
            .field("is_filter", &self.filter.is_some())
            .finish()
    }
}

/// Hook name -> priority -> callbacks.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: BTreeMap<String, BTreeMap<i32, Vec<HookCallback>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, hook: &str, callback: &str, filter: FilterFn, priority: i32) {
        self.insert(hook, callback, Some(filter), priority);
    }

    /// Registers an action callback by name.
    pub fn add_action(&mut self, hook: &str, callback: &str, priority: i32) {
        self.insert(hook, callback, None, priority);
    }

    /// With `callback = None`, reports whether anything is attached to `hook`.
    pub fn has_hook(&self, hook: &str, callback: Option<&str>) -> bool {
        match callback {
            None => self.hooks.contains_key(hook),
            Some(name) => self.hook_priority(hook, name).is_some(),
        }
    }

    /// Lowest priority at which `callback` is attached to `hook`.
    pub fn hook_priority(&self, hook: &str, callback: &str) -> Option<i32> {
        self.hooks.get(hook).and_then(|buckets| {
            buckets
                .iter()
                .find(|(_, callbacks)| callbacks.iter().any(|entry| entry.name == callback))
                .map(|(priority, _)| *priority)
        })
    }

    /// Detaches `callback` from `hook` at exactly `priority`.
    pub fn remove_hook(&mut self, hook: &str, callback: &str, priority: i32) -> bool {
        let Some(buckets) = self.hooks.get_mut(hook) else {
            return false;
        };
        let Some(callbacks) = buckets.get_mut(&priority) else {
            return false;
        };

        let before = callbacks.len();
        callbacks.retain(|entry| entry.name != callback);
        let removed = callbacks.len() != before;

        if callbacks.is_empty() {
            buckets.remove(&priority);
        }
        if buckets.is_empty() {
            self.hooks.remove(hook);
        }
        removed
    }

    /// Threads `value` through every filter on `hook`.
    pub fn apply_filters(&self, hook: &str, value: String, arg: &str) -> String {
        let Some(buckets) = self.hooks.get(hook) else {
            return value;
        };
        buckets
            .values()
            .flatten()
            .filter_map(|entry| entry.filter)
            .fold(value, |current, filter| filter(current, arg))
    }

    fn insert(&mut self, hook: &str, callback: &str, filter: Option<FilterFn>, priority: i32) {
        let callbacks = self
            .hooks
            .entry(hook.to_string())
            .or_default()
            .entry(priority)
            .or_default();

        let entry = HookCallback {
            name: callback.to_string(),
            filter,
        };
        match callbacks.iter_mut().find(|existing| existing.name == callback) {
            Some(existing) => *existing = entry,
            None => callbacks.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HookRegistry;

    fn exclaim(value: String, _: &str) -> String {
        value + "!"
    }

    fn shout(value: String, _: &str) -> String {
        value.to_uppercase()
    }

    fn tag(value: String, arg: &str) -> String {
        format!("{value}[{arg}]")
    }

    #[test]
    fn filters_run_by_priority_then_registration_order() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("title", "exclaim", exclaim, 20);
        hooks.add_filter("title", "shout", shout, 5);
        hooks.add_filter("title", "tag", tag, 20);

        assert_eq!(
            hooks.apply_filters("title", "hi".to_string(), "x"),
            "HI![x]"
        );
    }

    #[test]
    fn unknown_hook_returns_value_unchanged() {
        let hooks = HookRegistry::new();
        assert_eq!(hooks.apply_filters("none", "same".to_string(), ""), "same");
    }

    #[test]
    fn readding_same_callback_replaces_it() {
        let mut hooks = HookRegistry::new();
        hooks.add_filter("title", "f", exclaim, 10);
        hooks.add_filter("title", "f", exclaim, 10);
        assert_eq!(hooks.apply_filters("title", "a".to_string(), ""), "a!");
    }

    #[test]
    fn remove_requires_matching_priority_and_prunes() {
        let mut hooks = HookRegistry::new();
        hooks.add_action("save", "analyze", 10);

        assert!(!hooks.remove_hook("save", "analyze", 11));
        assert_eq!(hooks.hook_priority("save", "analyze"), Some(10));

        assert!(hooks.remove_hook("save", "analyze", 10));
        assert!(!hooks.has_hook("save", None));
        assert!(!hooks.remove_hook("save", "analyze", 10));
    }

    #[test]
    fn has_hook_distinguishes_callbacks() {
        let mut hooks = HookRegistry::new();
        hooks.add_action("save", "analyze", 10);
        assert!(hooks.has_hook("save", None));
        assert!(hooks.has_hook("save", Some("analyze")));
        assert!(!hooks.has_hook("save", Some("other")));
    }
}
