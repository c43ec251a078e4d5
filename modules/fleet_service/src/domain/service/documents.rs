use super::{fetch, remove};
use crate::contract::{
    Caller, FleetError, FormCategory, FormTemplate, Manual, ManualType, NewFormTemplate, NewManual,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::validation::{require_text, validate_form_fields};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Manual {
    const COLLECTION: &'static str = "manuals";
}

impl Record for FormTemplate {
    const COLLECTION: &'static str = "form_templates";
}

/// Manuals and the form templates derived from them
pub struct DocumentsService {
    manuals: Collection<Manual>,
    templates: Collection<FormTemplate>,
}

impl DocumentsService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            manuals: Collection::new(store.clone()),
            templates: Collection::new(store),
        }
    }

    // ===== Manuals =====

    #[instrument(skip(self, caller, new_manual), fields(title = %new_manual.title))]
    pub async fn create_manual(&self, caller: &Caller, new_manual: NewManual) -> Result<Manual, FleetError> {
        caller.require_staff_or_master()?;
        require_text("title", &new_manual.title)?;
        require_text("version", &new_manual.version)?;

        let now = Utc::now();
        let manual = Manual {
            id: String::new(),
            title: new_manual.title,
            manual_type: new_manual.manual_type,
            version: new_manual.version,
            file_url: new_manual.file_url,
            description: new_manual.description,
            created_by: caller.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        let manual = self.manuals.insert(&manual).await.map_err(FleetError::internal)?;
        info!(manual_id = %manual.id, "manual created");
        Ok(manual)
    }

    pub async fn list_manuals(&self, caller: &Caller, manual_type: Option<ManualType>) -> Result<Vec<Manual>, FleetError> {
        caller.require_any()?;
        let filters: Vec<_> = manual_type
            .map(|t| FieldFilter::eq("manual_type", t))
            .into_iter()
            .collect();
        let mut manuals = self.manuals.find(&filters).await.map_err(FleetError::internal)?;
        manuals.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(manuals)
    }

    pub async fn get_manual(&self, caller: &Caller, id: &str) -> Result<Manual, FleetError> {
        caller.require_any()?;
        fetch(&self.manuals, "Manual", id).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_manual(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.manuals, "Manual", id).await?;
        info!(manual_id = %id, "manual deleted");
        Ok(())
    }

    // ===== Form templates =====

    #[instrument(skip(self, caller, new_template), fields(name = %new_template.name))]
    pub async fn create_template(
        &self,
        caller: &Caller,
        new_template: NewFormTemplate,
    ) -> Result<FormTemplate, FleetError> {
        caller.require_staff_or_master()?;
        require_text("name", &new_template.name)?;
        validate_form_fields(&new_template.fields)?;
        if let Some(manual_id) = &new_template.manual_reference_id {
            fetch(&self.manuals, "Manual", manual_id).await?;
        }

        let now = Utc::now();
        let template = FormTemplate {
            id: String::new(),
            name: new_template.name,
            category: new_template.category,
            description: new_template.description,
            fields: new_template.fields,
            approval_required: new_template.approval_required,
            manual_reference_id: new_template.manual_reference_id,
            scheduled: new_template.scheduled,
            role: new_template.role,
            created_by: caller.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        let template = self.templates.insert(&template).await.map_err(FleetError::internal)?;
        info!(template_id = %template.id, fields = template.fields.len(), "form template created");
        Ok(template)
    }

    pub async fn list_templates(
        &self,
        caller: &Caller,
        category: Option<FormCategory>,
    ) -> Result<Vec<FormTemplate>, FleetError> {
        caller.require_staff_or_master()?;
        let filters: Vec<_> = category
            .map(|c| FieldFilter::eq("category", c))
            .into_iter()
            .collect();
        let mut templates = self.templates.find(&filters).await.map_err(FleetError::internal)?;
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    pub async fn get_template(&self, caller: &Caller, id: &str) -> Result<FormTemplate, FleetError> {
        caller.require_any()?;
        fetch(&self.templates, "Form template", id).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_template(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.templates, "Form template", id).await?;
        info!(template_id = %id, "form template deleted");
        Ok(())
    }
}
