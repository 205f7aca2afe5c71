//! Field-level form errors for re-rendered HTML forms

use std::collections::BTreeMap;

use blog_service::ServiceError;
use serde::Serialize;
use validator::ValidationErrors;

/// Messages grouped by form field, plus messages for the whole form
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// All messages on one line, for JSON bodies
    pub fn summary(&self) -> String {
        self.non_field
            .iter()
            .cloned()
            .chain(
                self.fields
                    .iter()
                    .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}"))),
            )
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Place a service failure next to the field it concerns
    ///
    /// Returns `None` when the failure is not about the submitted input.
    pub fn from_service(err: &ServiceError) -> Option<Self> {
        if !err.is_validation() {
            return None;
        }
        let mut errors = Self::new();
        let message = match err {
            ServiceError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };
        match err.field() {
            Some(field) => errors.add(field, message),
            None => errors.add_non_field(message),
        }
        Some(errors)
    }
}

impl From<&ValidationErrors> for FormErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut form = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| format!("Invalid {field}"), ToString::to_string);
                form.add(field.as_ref(), message);
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::DomainError;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
    }

    #[test]
    fn test_from_validation_errors() {
        let errors = Sample {
            title: String::new(),
        }
        .validate()
        .unwrap_err();

        let form = FormErrors::from(&errors);
        assert_eq!(form.fields["title"], vec!["Title is required".to_string()]);
        assert_eq!(form.summary(), "title: Title is required");
    }

    #[test]
    fn test_service_error_lands_on_field() {
        let err = ServiceError::from(DomainError::SlugTaken("hello-world".into()));
        let form = FormErrors::from_service(&err).unwrap();
        assert_eq!(form.fields["title"].len(), 1);
        assert!(form.fields["title"][0].contains("hello-world"));

        let err = ServiceError::validation("Select a valid category");
        let form = FormErrors::from_service(&err).unwrap();
        assert_eq!(form.non_field, vec!["Select a valid category".to_string()]);
    }

    #[test]
    fn test_non_input_failures_are_not_form_errors() {
        assert!(FormErrors::from_service(&ServiceError::Unauthenticated).is_none());
        assert!(FormErrors::from_service(&ServiceError::internal("boom")).is_none());
    }
}
