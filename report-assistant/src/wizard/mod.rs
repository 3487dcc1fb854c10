//! Linear step wizard.
//!
//! A [`Wizard`] owns an ordered list of [`StepDefinition`]s, the serializable [`WizardState`]
//! (current step index + labels) and the accumulated draft. Panel form state is owned by the
//! caller and passed in by reference on every transition, so the controller never holds UI
//! state of its own.
//!
//! Invariant: `0 <= step_index < steps.len()`. `next` and `back` clamp at the ends.

use crate::utils::validation::FieldErrors;
use log::debug;
use serde::{Deserialize, Serialize};

/// Accumulates the last valid value of every step.
pub trait Draft: Default {
    type Value;

    fn commit(&mut self, value: Self::Value);

    /// Drop whatever step `step` committed earlier.
    fn clear(&mut self, step: usize);
}

/// Validates the active step's form state against the draft collected so far.
pub type Validator<F, D> = fn(&F, &D) -> Result<<D as Draft>::Value, FieldErrors>;

pub struct StepDefinition<F, D: Draft> {
    label: &'static str,
    validate: Validator<F, D>,
}

impl<F, D: Draft> StepDefinition<F, D> {
    pub fn new(label: &'static str, validate: Validator<F, D>) -> Self {
        Self { label, validate }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn validate(&self, form: &F, draft: &D) -> Result<D::Value, FieldErrors> {
        (self.validate)(form, draft)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    step_index: usize,
    labels: Vec<String>,
}

impl WizardState {
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn current_label(&self) -> &str {
        self.labels
            .get(self.step_index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_first(&self) -> bool {
        self.step_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.step_index + 1 >= self.labels.len()
    }
}

/// Whether `next` requires the active step to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gate {
    /// Invalid steps surface their field errors and do not advance.
    #[default]
    Validate,
    /// Always advance. A valid value is committed; an invalid step clears its earlier value so
    /// the draft never holds data the form no longer shows.
    Ungated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission is only available from the last step")]
    NotOnLastStep,
    #[error("the last step has invalid fields: {0}")]
    Invalid(FieldErrors),
}

pub struct Wizard<F, D: Draft> {
    state: WizardState,
    steps: Vec<StepDefinition<F, D>>,
    draft: D,
    gate: Gate,
}

impl<F, D: Draft> Wizard<F, D> {
    pub fn new(steps: Vec<StepDefinition<F, D>>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        let labels = steps.iter().map(|s| s.label.to_string()).collect();
        Ok(Self {
            state: WizardState {
                step_index: 0,
                labels,
            },
            steps,
            draft: D::default(),
            gate: Gate::default(),
        })
    }

    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> Gate {
        self.gate
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn step_index(&self) -> usize {
        self.state.step_index
    }

    /// Run the active step's validator without changing anything.
    pub fn validate_current(&self, form: &F) -> Result<D::Value, FieldErrors> {
        self.steps[self.state.step_index].validate(form, &self.draft)
    }

    /// Advance one step. On the last step this is a no-op.
    ///
    /// With [`Gate::Validate`] the active step must validate; its value is committed to the
    /// draft before moving. Returns the (possibly unchanged) step index.
    pub fn next(&mut self, form: &F) -> Result<usize, FieldErrors> {
        if self.state.is_last() {
            return Ok(self.state.step_index);
        }

        match (self.validate_current(form), self.gate) {
            (Ok(value), _) => self.draft.commit(value),
            (Err(errors), Gate::Validate) => {
                debug!(
                    "[PHASE: wizard] [STEP: next] Step '{}' blocked: {}",
                    self.state.current_label(),
                    errors
                );
                return Err(errors);
            }
            (Err(_), Gate::Ungated) => self.draft.clear(self.state.step_index),
        }

        self.state.step_index += 1;
        debug!(
            "[PHASE: wizard] [STEP: next] Moved to step {} ('{}')",
            self.state.step_index,
            self.state.current_label()
        );
        Ok(self.state.step_index)
    }

    /// Go back one step. On the first step this is a no-op.
    pub fn back(&mut self) -> usize {
        if !self.state.is_first() {
            self.state.step_index -= 1;
            debug!(
                "[PHASE: wizard] [STEP: back] Moved to step {} ('{}')",
                self.state.step_index,
                self.state.current_label()
            );
        }
        self.state.step_index
    }

    /// Validate and commit the last step, then hand the completed draft to `on_complete`.
    pub fn submit<R>(
        &mut self,
        form: &F,
        on_complete: impl FnOnce(&D) -> R,
    ) -> Result<R, SubmitError> {
        if !self.state.is_last() {
            return Err(SubmitError::NotOnLastStep);
        }

        let value = self.validate_current(form).map_err(SubmitError::Invalid)?;
        self.draft.commit(value);
        debug!("[PHASE: wizard] [STEP: submit] Draft complete; invoking completion");
        Ok(on_complete(&self.draft))
    }

    /// Start over: first step, empty draft.
    pub fn reset(&mut self) {
        self.state.step_index = 0;
        self.draft = D::default();
    }

    pub fn progress(&self) -> Vec<(&'static str, StepStatus)> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let status = match i.cmp(&self.state.step_index) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Upcoming,
                };
                (step.label, status)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Numbers {
        values: Vec<(usize, i32)>,
    }

    impl Draft for Numbers {
        type Value = (usize, i32);

        fn commit(&mut self, value: Self::Value) {
            self.values.retain(|(step, _)| *step != value.0);
            self.values.push(value);
        }

        fn clear(&mut self, step: usize) {
            self.values.retain(|(s, _)| *s != step);
        }
    }

    struct Form {
        inputs: [i32; 3],
    }

    fn positive(step: usize, form: &Form) -> Result<(usize, i32), FieldErrors> {
        let v = form.inputs[step];
        if v > 0 {
            Ok((step, v))
        } else {
            Err(FieldErrors::single("value", "must be positive"))
        }
    }

    fn wizard() -> Wizard<Form, Numbers> {
        Wizard::new(vec![
            StepDefinition::new("one", |f: &Form, _: &Numbers| positive(0, f)),
            StepDefinition::new("two", |f: &Form, _: &Numbers| positive(1, f)),
            StepDefinition::new("three", |f: &Form, _: &Numbers| positive(2, f)),
        ])
        .unwrap()
    }

    #[test]
    fn empty_step_list_is_rejected() {
        let steps: Vec<StepDefinition<Form, Numbers>> = Vec::new();
        assert!(matches!(Wizard::new(steps), Err(WizardError::NoSteps)));
    }

    #[test]
    fn next_and_back_clamp_at_the_ends() {
        let form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();

        assert_eq!(w.back(), 0);
        assert_eq!(w.next(&form).unwrap(), 1);
        assert_eq!(w.next(&form).unwrap(), 2);
        assert_eq!(w.next(&form).unwrap(), 2);
        assert_eq!(w.next(&form).unwrap(), 2);
        assert_eq!(w.back(), 1);
        assert_eq!(w.back(), 0);
        assert_eq!(w.back(), 0);
    }

    #[test]
    fn back_then_next_restores_index_for_every_step() {
        let form = Form { inputs: [1, 2, 3] };
        for target in 0..3 {
            let mut w = wizard();
            for _ in 0..target {
                w.next(&form).unwrap();
            }
            assert_eq!(w.step_index(), target);

            if target > 0 {
                w.back();
                w.next(&form).unwrap();
                assert_eq!(w.step_index(), target);
            }
            if target < 2 {
                w.next(&form).unwrap();
                w.back();
                assert_eq!(w.step_index(), target);
            }
        }
    }

    #[test]
    fn gate_blocks_invalid_step_and_surfaces_errors() {
        let form = Form { inputs: [0, 2, 3] };
        let mut w = wizard();

        let err = w.next(&form).unwrap_err();
        assert_eq!(err.first("value"), Some("must be positive"));
        assert_eq!(w.step_index(), 0);
        assert!(w.draft().values.is_empty());
    }

    #[test]
    fn ungated_wizard_advances_but_only_commits_valid_values() {
        let form = Form { inputs: [0, 2, 3] };
        let mut w = wizard().with_gate(Gate::Ungated);

        assert_eq!(w.next(&form).unwrap(), 1);
        assert!(w.draft().values.is_empty());
        assert_eq!(w.next(&form).unwrap(), 2);
        assert_eq!(w.draft().values, vec![(1, 2)]);
    }

    #[test]
    fn ungated_wizard_clears_a_step_that_turned_invalid() {
        let mut form = Form { inputs: [1, 2, 3] };
        let mut w = wizard().with_gate(Gate::Ungated);

        w.next(&form).unwrap();
        assert_eq!(w.draft().values, vec![(0, 1)]);

        w.back();
        form.inputs[0] = -1;
        assert_eq!(w.next(&form).unwrap(), 1);
        assert!(w.draft().values.is_empty());
    }

    #[test]
    fn submit_only_from_last_step() {
        let form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();

        assert!(matches!(
            w.submit(&form, |_| ()),
            Err(SubmitError::NotOnLastStep)
        ));

        w.next(&form).unwrap();
        w.next(&form).unwrap();
        let collected = w.submit(&form, |d| d.values.clone()).unwrap();
        assert_eq!(collected, vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn submit_surfaces_last_step_errors() {
        let mut form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();
        w.next(&form).unwrap();
        w.next(&form).unwrap();

        form.inputs[2] = -1;
        match w.submit(&form, |_| ()) {
            Err(SubmitError::Invalid(errors)) => assert!(errors.contains("value")),
            other => panic!("expected invalid submit, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn recommitting_a_step_replaces_its_value() {
        let mut form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();
        w.next(&form).unwrap();
        w.back();
        form.inputs[0] = 7;
        w.next(&form).unwrap();
        assert_eq!(w.draft().values, vec![(0, 7)]);
    }

    #[test]
    fn progress_marks_completed_current_upcoming() {
        let form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();
        w.next(&form).unwrap();

        let p = w.progress();
        assert_eq!(
            p,
            vec![
                ("one", StepStatus::Completed),
                ("two", StepStatus::Current),
                ("three", StepStatus::Upcoming),
            ]
        );
    }

    #[test]
    fn state_is_serializable_and_reset_clears_draft() {
        let form = Form { inputs: [1, 2, 3] };
        let mut w = wizard();
        w.next(&form).unwrap();

        let json = serde_json::to_value(w.state()).unwrap();
        assert_eq!(json["stepIndex"], 1);
        assert_eq!(json["labels"][2], "three");

        w.reset();
        assert_eq!(w.step_index(), 0);
        assert!(w.draft().values.is_empty());
    }
}
