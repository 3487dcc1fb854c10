// Step 2: template selection

use crate::models::draft::TemplateValue;
use crate::models::records::TemplateRecord;
use crate::utils::validation::FieldErrors;

pub const FIELD_TEMPLATE: &str = "template";
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Single-select template picker. Selection is independent of the view mode and of the
/// active filters: a selected template stays selected while it is filtered out of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateForm {
    pub search: String,
    pub category: String,
    pub view_mode: ViewMode,
    pub selected: Option<String>,
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            view_mode: ViewMode::Grid,
            selected: None,
        }
    }
}

impl TemplateForm {
    /// Fresh form with the first catalog entry preselected.
    pub fn with_default(catalog: &[TemplateRecord]) -> Self {
        Self {
            selected: catalog.first().map(|t| t.id.clone()),
            ..Self::default()
        }
    }

    /// `"all"` followed by each distinct category in catalog order.
    pub fn categories(catalog: &[TemplateRecord]) -> Vec<String> {
        let mut out = vec![ALL_CATEGORIES.to_string()];
        for t in catalog {
            if !out.iter().any(|c| c == &t.category) {
                out.push(t.category.clone());
            }
        }
        out
    }

    pub fn filtered<'a>(&self, catalog: &'a [TemplateRecord]) -> Vec<&'a TemplateRecord> {
        let needle = self.search.trim().to_lowercase();
        catalog
            .iter()
            .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
            .filter(|t| self.category == ALL_CATEGORIES || t.category == self.category)
            .collect()
    }

    pub fn cycle_category(&mut self, catalog: &[TemplateRecord]) {
        let categories = Self::categories(catalog);
        let pos = categories
            .iter()
            .position(|c| c == &self.category)
            .unwrap_or(0);
        self.category = categories[(pos + 1) % categories.len()].clone();
    }

    pub fn select(&mut self, template_id: &str) {
        self.selected = Some(template_id.to_string());
    }

    pub fn is_selected(&self, template_id: &str) -> bool {
        self.selected.as_deref() == Some(template_id)
    }

    pub fn validate(&self, catalog: &[TemplateRecord]) -> Result<TemplateValue, FieldErrors> {
        let Some(id) = self.selected.as_ref() else {
            return Err(FieldErrors::single(FIELD_TEMPLATE, "Select a template."));
        };
        if !catalog.iter().any(|t| &t.id == id) {
            return Err(FieldErrors::single(
                FIELD_TEMPLATE,
                "The selected template is no longer available.",
            ));
        }
        Ok(TemplateValue {
            template_id: id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_templates;

    #[test]
    fn categories_start_with_wildcard_and_are_distinct() {
        let cats = TemplateForm::categories(&default_templates());
        assert_eq!(
            cats,
            vec!["all", "Production", "Maintenance", "Quality", "Operations"]
        );
    }

    #[test]
    fn filters_combine_name_and_category() {
        let catalog = default_templates();
        let mut form = TemplateForm::default();
        assert_eq!(form.filtered(&catalog).len(), 5);

        form.category = "Maintenance".to_string();
        let ids: Vec<&str> = form.filtered(&catalog).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tpl2", "tpl5"]);

        form.search = "DOWNTIME".to_string();
        let ids: Vec<&str> = form.filtered(&catalog).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tpl5"]);

        form.category = "Quality".to_string();
        assert!(form.filtered(&catalog).is_empty());
    }

    #[test]
    fn category_cycle_wraps_to_all() {
        let catalog = default_templates();
        let mut form = TemplateForm::default();
        for _ in 0..5 {
            form.cycle_category(&catalog);
        }
        assert_eq!(form.category, ALL_CATEGORIES);
    }

    #[test]
    fn view_mode_does_not_touch_selection() {
        let catalog = default_templates();
        let mut form = TemplateForm::with_default(&catalog);
        form.select("tpl3");
        form.view_mode = form.view_mode.toggle();
        assert_eq!(form.view_mode, ViewMode::List);
        assert!(form.is_selected("tpl3"));
        form.view_mode = form.view_mode.toggle();
        assert!(form.is_selected("tpl3"));
    }

    #[test]
    fn selection_survives_filtering_it_out() {
        let catalog = default_templates();
        let mut form = TemplateForm::with_default(&catalog);
        form.search = "quality".to_string();
        assert!(form.filtered(&catalog).iter().all(|t| t.id != "tpl1"));
        assert_eq!(form.validate(&catalog).unwrap().template_id, "tpl1");
    }

    #[test]
    fn validation_requires_known_selection() {
        let catalog = default_templates();
        let mut form = TemplateForm::default();
        assert!(form.validate(&catalog).unwrap_err().contains(FIELD_TEMPLATE));

        form.select("tpl9");
        assert_eq!(
            form.validate(&catalog).unwrap_err().first(FIELD_TEMPLATE),
            Some("The selected template is no longer available.")
        );
    }
}
