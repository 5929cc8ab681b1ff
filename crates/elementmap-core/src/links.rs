//! Control panel links for resolved elements.

use crate::config::SiteConfig;
use crate::db::{DisplayRecord, EditTarget};

/// Builds the `url` of each result from site settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
    cp_trigger: String,
    /// `Some(locale)` when the active locale is not the primary one.
    locale_segment: Option<String>,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(site: &SiteConfig) -> Self {
        let locale_segment =
            (site.locale != site.primary_locale()).then(|| site.locale.clone());
        Self {
            base_url: site.base_url.trim_end_matches('/').to_string(),
            cp_trigger: site.cp_trigger.trim_matches('/').to_string(),
            locale_segment,
        }
    }

    fn cp(&self, path: &str) -> String {
        if self.cp_trigger.is_empty() {
            format!("{}/{path}", self.base_url)
        } else {
            format!("{}/{}/{path}", self.base_url, self.cp_trigger)
        }
    }

    fn with_locale(&self, mut url: String) -> String {
        if let Some(locale) = &self.locale_segment {
            url.push('/');
            url.push_str(locale);
        }
        url
    }

    /// Link for a display record.
    ///
    /// Entries and categories link to their edit page, global sets to their
    /// content page, tags to their tag group settings, and assets to the
    /// public file (empty when the asset is not publicly served).
    #[must_use]
    pub fn link(&self, record: &DisplayRecord) -> String {
        match &record.target {
            EditTarget::Entry { section, slug } => self.with_locale(self.cp(&format!(
                "entries/{section}/{}",
                id_slug(record.id, slug.as_deref())
            ))),
            EditTarget::Category { group, slug } => self.with_locale(self.cp(&format!(
                "categories/{group}/{}",
                id_slug(record.id, slug.as_deref())
            ))),
            EditTarget::GlobalSet { handle } => match &self.locale_segment {
                Some(locale) => self.cp(&format!("globals/{locale}/{handle}")),
                None => self.cp(&format!("globals/{handle}")),
            },
            EditTarget::Tag { group_id } => self.cp(&format!("settings/tags/{group_id}")),
            EditTarget::Asset { url } => url.clone().unwrap_or_default(),
        }
    }
}

fn id_slug(id: i64, slug: Option<&str>) -> String {
    match slug.filter(|s| !s.is_empty()) {
        Some(slug) => format!("{id}-{slug}"),
        None => id.to_string(),
    }
}
