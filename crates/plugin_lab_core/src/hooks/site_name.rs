//! Site name suffix filter and site info lookups that run through it.

use crate::hooks::{HookRegistry, DEFAULT_PRIORITY};

pub const BLOGINFO_HOOK: &str = "bloginfo";
pub const SITE_NAME_FILTER: &str = "append_site_name_suffix";
pub const SITE_NAME_SUFFIX: &str = " - plugin-lab";

/// Appends [`SITE_NAME_SUFFIX`] when the requested field is the site name.
///
/// `show` is the requested bloginfo field; `""` means the name too.
pub fn append_site_name_suffix(mut output: String, show: &str) -> String {
    if matches!(show, "name" | "") {
        output.push_str(SITE_NAME_SUFFIX);
    }
    output
}

pub fn register_site_name_filter(hooks: &mut HookRegistry) {
    hooks.add_filter(
        BLOGINFO_HOOK,
        SITE_NAME_FILTER,
        append_site_name_suffix,
        DEFAULT_PRIORITY,
    );
}

pub fn is_site_name_filter_registered(hooks: &HookRegistry) -> bool {
    hooks.has_hook(BLOGINFO_HOOK, Some(SITE_NAME_FILTER))
}

pub fn remove_site_name_filter(hooks: &mut HookRegistry) -> bool {
    hooks.remove_hook(BLOGINFO_HOOK, SITE_NAME_FILTER, DEFAULT_PRIORITY)
}

/// Registers the filter again unless it is already attached.
pub fn reregister_site_name_filter(hooks: &mut HookRegistry) {
    if !is_site_name_filter_registered(hooks) {
        register_site_name_filter(hooks);
    }
}

pub fn site_name_filter_priority(hooks: &HookRegistry) -> Option<i32> {
    hooks.hook_priority(BLOGINFO_HOOK, SITE_NAME_FILTER)
}

/// Raw site settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl SiteInfo {
    /// Looks up `show` and passes it through the `bloginfo` filters.
    ///
    /// Unknown fields resolve to an empty string before filtering.
    pub fn bloginfo(&self, show: &str, hooks: &HookRegistry) -> String {
        let raw = match show {
            "" | "name" => self.name.as_str(),
            "description" => self.description.as_str(),
            "url" | "wpurl" | "siteurl" => self.url.as_str(),
            _ => "",
        };
        hooks.apply_filters(BLOGINFO_HOOK, raw.to_string(), show)
    }
}

/// Appends hook status and the filtered site name to the admin footer.
///
/// Users without the manage-options capability get the footer unchanged.
pub fn admin_footer_debug(
    footer_text: &str,
    can_manage_options: bool,
    site: &SiteInfo,
    hooks: &HookRegistry,
) -> String {
    if !can_manage_options {
        return footer_text.to_string();
    }
    let status = if is_site_name_filter_registered(hooks) {
        "ON"
    } else {
        "OFF"
    };
    format!(
        "{footer_text} | Hook Status: {status} | Site Name: {}",
        site.bloginfo("name", hooks)
    )
}
