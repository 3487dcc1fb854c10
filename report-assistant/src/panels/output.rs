// Step 5: output format, file name and optional email dispatch

use crate::models::draft::{EmailDispatch, OutputFormat, OutputValue};
use crate::utils::validation::{parse_recipient_list, validate_file_name, FieldErrors};
use chrono::NaiveDate;

pub const FIELD_FORMAT: &str = "format";
pub const FIELD_FILE_NAME: &str = "fileName";
pub const FIELD_RECIPIENTS: &str = "recipients";

pub const DEFAULT_EMAIL_MESSAGE: &str = "Please find the attached SCADA report.";
pub const DEFAULT_LOCATION_LABEL: &str = "Default Location";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputForm {
    pub format: Option<OutputFormat>,
    pub file_name: String,
    /// Folder picking is not wired up yet; `None` means the default location.
    pub location: Option<String>,
    email_immediately: bool,
    pub recipients: String,
    pub email_message: String,
}

impl OutputForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            format: Some(OutputFormat::Pdf),
            file_name: default_file_name(today),
            location: None,
            email_immediately: false,
            recipients: String::new(),
            email_message: DEFAULT_EMAIL_MESSAGE.to_string(),
        }
    }

    pub fn email_immediately(&self) -> bool {
        self.email_immediately
    }

    /// Turning email off drops the recipients and restores the default message.
    pub fn set_email_immediately(&mut self, enabled: bool) {
        self.email_immediately = enabled;
        if !enabled {
            self.recipients.clear();
            self.email_message = DEFAULT_EMAIL_MESSAGE.to_string();
        }
    }

    pub fn toggle_email_immediately(&mut self) {
        self.set_email_immediately(!self.email_immediately);
    }

    pub fn location_label(&self) -> &str {
        self.location.as_deref().unwrap_or(DEFAULT_LOCATION_LABEL)
    }

    pub fn validate(&self) -> Result<OutputValue, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.format.is_none() {
            errors.add(FIELD_FORMAT, "You need to select an output format.");
        }

        if let Err(e) = validate_file_name(&self.file_name) {
            errors.add(FIELD_FILE_NAME, e.to_string());
        }

        let email = if self.email_immediately {
            match parse_recipient_list(&self.recipients) {
                Ok(recipients) if recipients.is_empty() => {
                    errors.add(FIELD_RECIPIENTS, "At least one recipient is required.");
                    None
                }
                Ok(recipients) => {
                    let message = self.email_message.trim();
                    Some(EmailDispatch {
                        recipients,
                        message: (!message.is_empty()).then(|| message.to_string()),
                    })
                }
                Err(_) => {
                    errors.add(
                        FIELD_RECIPIENTS,
                        "Please provide valid email addresses, separated by commas.",
                    );
                    None
                }
            }
        } else {
            None
        };

        match self.format {
            Some(format) if errors.is_empty() => Ok(OutputValue {
                format,
                file_name: self.file_name.trim().to_string(),
                location: self.location.clone(),
                email,
            }),
            _ => Err(errors),
        }
    }
}

pub fn default_file_name(today: NaiveDate) -> String {
    format!("SCADA_Report_{}", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let form = OutputForm::new(today());
        assert_eq!(form.file_name, "SCADA_Report_2024-01-31");
        assert_eq!(form.location_label(), DEFAULT_LOCATION_LABEL);

        let value = form.validate().unwrap();
        assert_eq!(value.format, OutputFormat::Pdf);
        assert_eq!(value.email, None);
    }

    #[test]
    fn file_name_and_format_are_required() {
        let mut form = OutputForm::new(today());
        form.format = None;
        form.file_name = "  ".to_string();

        let errors = form.validate().unwrap_err();
        assert!(errors.contains(FIELD_FORMAT));
        assert_eq!(errors.first(FIELD_FILE_NAME), Some("File name is required."));
    }

    #[test]
    fn recipients_are_validated_per_address() {
        let mut form = OutputForm::new(today());
        form.set_email_immediately(true);

        form.recipients = "a@b.com, c@d.com".to_string();
        let email = form.validate().unwrap().email.unwrap();
        assert_eq!(email.recipients, vec!["a@b.com", "c@d.com"]);
        assert_eq!(email.message.as_deref(), Some(DEFAULT_EMAIL_MESSAGE));

        form.recipients = "a@b.com, not-an-email".to_string();
        assert_eq!(
            form.validate().unwrap_err().first(FIELD_RECIPIENTS),
            Some("Please provide valid email addresses, separated by commas.")
        );

        form.recipients.clear();
        assert!(form.validate().unwrap_err().contains(FIELD_RECIPIENTS));
    }

    #[test]
    fn empty_recipients_pass_when_email_is_off() {
        let form = OutputForm::new(today());
        assert!(!form.email_immediately());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn disabling_email_clears_recipients_and_restores_message() {
        let mut form = OutputForm::new(today());
        form.toggle_email_immediately();
        form.recipients = "ops@example.com".to_string();
        form.email_message = "custom".to_string();

        form.toggle_email_immediately();
        assert!(form.recipients.is_empty());
        assert_eq!(form.email_message, DEFAULT_EMAIL_MESSAGE);
    }

    #[test]
    fn blank_message_is_omitted() {
        let mut form = OutputForm::new(today());
        form.set_email_immediately(true);
        form.recipients = "ops@example.com".to_string();
        form.email_message = "   ".to_string();
        assert_eq!(form.validate().unwrap().email.unwrap().message, None);
    }
}
