//! User details form: draft, validation and simulated submission

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::timer::TimerQueue;
use crate::consts::SUBMIT_LATENCY_MS;

/// Form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Phone,
    Email,
    City,
    Age,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Name, Field::Phone, Field::Email, Field::City, Field::Age];

    /// DOM id / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::City => "city",
            Field::Age => "age",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

/// Form validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum ValidationError {
    #[error("Please fill all fields")]
    MissingFields { missing: Vec<Field> },
}

/// Details captured by a successful submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetails {
    name: String,
    phone: String,
    email: String,
    city: String,
    age: String,
}

impl UserDetails {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> &str {
        &self.age
    }
}

/// In-progress form contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub age: String,
}

impl FormDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::City => &self.city,
            Field::Age => &self.age,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::City => &mut self.city,
            Field::Age => &mut self.age,
        };
        *slot = value.into();
    }

    /// Every field must be non-empty after trimming
    pub fn validate(&self) -> Result<UserDetails, ValidationError> {
        let missing: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { missing });
        }
        Ok(UserDetails {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
            age: self.age.trim().to_string(),
        })
    }
}

/// Submission state of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitStatus {
    Idle,
    /// Control surface disabled until the simulated call completes
    Submitting,
}

/// Outcome of a submit press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    /// Already in flight; the press is dropped
    Ignored,
    Rejected(ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormTimer {
    SubmitDone,
}

#[derive(Debug, Clone)]
pub struct FormScreen {
    draft: FormDraft,
    focused: Option<Field>,
    status: SubmitStatus,
    /// Validated snapshot being submitted
    pending: Option<UserDetails>,
    /// Last rejected submit, cleared by the next edit
    error: Option<ValidationError>,
    timers: TimerQueue<FormTimer>,
}

impl FormScreen {
    pub fn enter() -> Self {
        Self {
            draft: FormDraft::default(),
            focused: None,
            status: SubmitStatus::Idle,
            pending: None,
            error: None,
            timers: TimerQueue::new(),
        }
    }

    /// Edit a field. Ignored while submitting (inputs are disabled).
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.status == SubmitStatus::Submitting {
            log::debug!("Ignoring edit to {} during submission", field.as_str());
            return;
        }
        self.draft.set(field, value);
        self.error = None;
    }

    pub fn focus(&mut self, field: Option<Field>) {
        self.focused = field;
    }

    pub fn submit(&mut self, now_ms: u64) -> SubmitOutcome {
        if self.status == SubmitStatus::Submitting {
            log::debug!("Submit pressed while in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        match self.draft.validate() {
            Ok(details) => {
                log::info!("Submitting details for {}", details.name());
                self.pending = Some(details);
                self.error = None;
                self.status = SubmitStatus::Submitting;
                self.timers.after(now_ms, SUBMIT_LATENCY_MS, FormTimer::SubmitDone);
                SubmitOutcome::Started
            }
            Err(e) => {
                log::debug!("Validation failed: {:?}", e);
                self.error = Some(e.clone());
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// Fire due timers. Returns the submitted details once the simulated call completes.
    pub fn advance(&mut self, now_ms: u64) -> Option<UserDetails> {
        let mut done = None;
        while let Some((_, FormTimer::SubmitDone)) = self.timers.pop_due(now_ms) {
            self.status = SubmitStatus::Idle;
            if let Some(details) = self.pending.take() {
                log::info!("Submission complete");
                done = Some(details);
            }
        }
        done
    }

    pub fn teardown(&mut self) {
        self.timers.clear();
        self.pending = None;
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled() -> FormDraft {
        FormDraft {
            name: "Asha".into(),
            phone: "9999999999".into(),
            email: "a@b.com".into(),
            city: "Delhi".into(),
            age: "30".into(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let details = filled().validate().unwrap();
        assert_eq!(details.name(), "Asha");
        assert_eq!(details.city(), "Delhi");
        assert_eq!(details.age(), "30");
    }

    #[test]
    fn test_each_blank_field_is_reported() {
        for field in Field::ALL {
            let mut draft = filled();
            draft.set(field, "   ");
            let err = draft.validate().unwrap_err();
            assert_eq!(err, ValidationError::MissingFields { missing: vec![field] });
            assert_eq!(err.to_string(), "Please fill all fields");
        }
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut draft = filled();
        draft.set(Field::Name, "  Asha  ");
        assert_eq!(draft.validate().unwrap().name(), "Asha");
    }

    #[test]
    fn test_submit_completes_after_latency() {
        let mut form = FormScreen::enter();
        for field in Field::ALL {
            form.set_field(field, filled().get(field).to_string());
        }
        assert_eq!(form.submit(100), SubmitOutcome::Started);
        assert_eq!(form.status(), SubmitStatus::Submitting);
        assert_eq!(form.advance(1599), None);
        let details = form.advance(1600).unwrap();
        assert_eq!(details.name(), "Asha");
        assert_eq!(form.status(), SubmitStatus::Idle);
    }

    #[test]
    fn test_duplicate_submit_is_ignored() {
        let mut form = FormScreen::enter();
        for field in Field::ALL {
            form.set_field(field, filled().get(field).to_string());
        }
        assert_eq!(form.submit(0), SubmitOutcome::Started);
        assert_eq!(form.submit(10), SubmitOutcome::Ignored);
        assert_eq!(form.submit(1000), SubmitOutcome::Ignored);

        let mut completions = 0;
        for now in (0..10_000).step_by(50) {
            if form.advance(now).is_some() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_edits_locked_while_submitting() {
        let mut form = FormScreen::enter();
        for field in Field::ALL {
            form.set_field(field, filled().get(field).to_string());
        }
        form.submit(0);
        form.set_field(Field::Name, "Changed");
        assert_eq!(form.draft().name, "Asha");
    }

    #[test]
    fn test_rejected_submit_stays_idle() {
        let mut form = FormScreen::enter();
        form.set_field(Field::Name, "Asha");
        assert!(matches!(form.submit(0), SubmitOutcome::Rejected(_)));
        assert_eq!(form.status(), SubmitStatus::Idle);
        assert_eq!(form.advance(10_000), None);
    }

    #[test]
    fn test_rejection_is_kept_until_next_edit() {
        let mut form = FormScreen::enter();
        form.set_field(Field::Name, "Asha");
        form.submit(0);
        assert_eq!(
            form.validation_error(),
            Some(&ValidationError::MissingFields {
                missing: vec![Field::Phone, Field::Email, Field::City, Field::Age]
            })
        );

        form.set_field(Field::Phone, "9999999999");
        assert_eq!(form.validation_error(), None);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_str(field.as_str()), Some(field));
        }
        assert_eq!(Field::from_str("zip"), None);
    }

    fn value() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("  \t ".to_string()),
            "[a-zA-Z0-9@. ]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn prop_blank_field_never_submits(values in prop::array::uniform5(value())) {
            let mut form = FormScreen::enter();
            for (field, v) in Field::ALL.into_iter().zip(values.iter()) {
                form.set_field(field, v.clone());
            }
            let blank: Vec<Field> = Field::ALL
                .into_iter()
                .filter(|f| form.draft().get(*f).trim().is_empty())
                .collect();

            let outcome = form.submit(0);
            if blank.is_empty() {
                prop_assert_eq!(outcome, SubmitOutcome::Started);
            } else {
                prop_assert_eq!(
                    outcome,
                    SubmitOutcome::Rejected(ValidationError::MissingFields { missing: blank })
                );
                prop_assert_eq!(form.advance(100_000), None);
            }
        }
    }
}
