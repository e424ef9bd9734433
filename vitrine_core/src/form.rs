// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contact form validation and submission.
//!
//! [`ContactForm`] holds the fields and the [`SubmissionState`]. It does not
//! know how a submission is carried out: [`ContactForm::begin_submit`]
//! validates and hands back the field data, and the caller later reports the
//! outcome with [`ContactForm::resolve`]. [`SimulatedSubmitter`] is one such
//! caller, settling after a fixed latency with an outcome drawn from an
//! [`OutcomeSource`].

use alloc::string::String;
use alloc::vec::Vec;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::notify::NoticeKind;
use crate::time::Duration;
use crate::timer::{TimerHost, TimerId, Timeout};

/// Notice shown when submission is refused because of field errors.
pub const FIX_ERRORS_NOTICE: &str = "Please fix the errors above";
/// Notice shown after a successful submission.
pub const SENT_NOTICE: &str = "Message sent successfully! I'll get back to you soon.";
/// Notice shown after a failed submission.
pub const FAILED_NOTICE: &str = "Sorry, there was an error sending your message. Please try again.";

/// Form submission settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormConfig {
    /// Simulated submission latency.
    pub latency: Duration,
    /// Probability that a simulated submission succeeds.
    pub success_ratio: f64,
    /// When set, submissions are POSTed here instead of simulated.
    pub endpoint: Option<String>,
}

impl FormConfig {
    /// 2 s simulated latency, 90% success.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latency: Duration(2000),
            success_ratio: 0.9,
            endpoint: None,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which rules a field is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Required only.
    Text,
    /// Required, then email format.
    Email,
}

impl FieldKind {
    /// Maps an input's `type` attribute.
    #[must_use]
    pub fn from_input_type(ty: &str) -> Self {
        if ty.eq_ignore_ascii_case("email") {
            Self::Email
        } else {
            Self::Text
        }
    }
}

/// Why a field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Empty after trimming.
    #[error("This field is required")]
    Required,
    /// Not of the form `local@domain.tld`.
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Why a submission failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The collaborator refused the submission.
    #[error("submission rejected")]
    Rejected,
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Checks `value` as a simple `local@domain.tld` address.
///
/// Exactly one `@`, no whitespace, a non-empty local part, and a domain with
/// a `.` that has at least one character on each side.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Applies the rules for `kind` to `value`. Required takes precedence over
/// format.
pub fn validate_value(value: &str, kind: FieldKind) -> Result<(), FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    if kind == FieldKind::Email && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

/// One input or textarea.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    name: String,
    kind: FieldKind,
    value: String,
    error: Option<FieldError>,
}

impl FormField {
    /// Creates an empty field.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: String::new(),
            error: None,
        }
    }

    /// The field's `name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule set.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current value, untrimmed.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The error currently displayed, if any.
    #[must_use]
    pub const fn error(&self) -> Option<FieldError> {
        self.error
    }

    /// Whether the last validation passed (or none has run).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Validates and records the result.
    pub fn validate(&mut self) -> Result<(), FieldError> {
        let result = validate_value(&self.value, self.kind);
        self.error = result.err();
        result
    }

    /// Stores new input and clears any shown error without re-validating.
    /// Returns `true` if an error was cleared.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        self.value = value.into();
        self.error.take().is_some()
    }

    fn reset(&mut self) {
        self.value.clear();
        self.error = None;
    }
}

/// Lifecycle of one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Submitted; the button is disabled.
    Pending,
    /// Last submission went through.
    Succeeded,
    /// Last submission failed.
    Failed(SubmitError),
}

/// Outcome of [`ContactForm::begin_submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitStart {
    /// Some fields are invalid; nothing was sent.
    Invalid(Vec<(usize, FieldError)>),
    /// A submission is already pending.
    Busy,
    /// Now pending; send these `(name, trimmed value)` pairs.
    Started(Vec<(String, String)>),
}

impl SubmitStart {
    /// Notice to show for this start, if any.
    #[must_use]
    pub fn notice(&self) -> Option<(&'static str, NoticeKind)> {
        match self {
            Self::Invalid(_) => Some((FIX_ERRORS_NOTICE, NoticeKind::Error)),
            Self::Busy | Self::Started(_) => None,
        }
    }
}

/// What the presenter does once a submission settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Whether it succeeded.
    pub succeeded: bool,
    /// Whether field values were cleared.
    pub cleared: bool,
    /// Notice text.
    pub notice: &'static str,
    /// Notice flavour.
    pub kind: NoticeKind,
}

/// The contact form.
#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    fields: Vec<FormField>,
    state: SubmissionState,
}

impl ContactForm {
    /// Creates a form over `fields`.
    #[must_use]
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            state: SubmissionState::Idle,
        }
    }

    /// All fields.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Field `i`.
    #[must_use]
    pub fn field(&self, i: usize) -> Option<&FormField> {
        self.fields.get(i)
    }

    /// Current submission state.
    #[must_use]
    pub const fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub const fn submit_enabled(&self) -> bool {
        !matches!(self.state, SubmissionState::Pending)
    }

    /// Field `i` lost focus.
    pub fn blur(&mut self, i: usize) -> Option<Result<(), FieldError>> {
        self.fields.get_mut(i).map(FormField::validate)
    }

    /// Field `i` was edited. Returns `true` if a shown error was cleared.
    ///
    /// Editing after a settled submission returns the form to idle.
    pub fn input(&mut self, i: usize, value: impl Into<String>) -> bool {
        let Some(field) = self.fields.get_mut(i) else {
            return false;
        };
        let cleared = field.set_value(value);
        if matches!(
            self.state,
            SubmissionState::Succeeded | SubmissionState::Failed(_)
        ) {
            self.state = SubmissionState::Idle;
        }
        cleared
    }

    /// Re-validates every field and, if all pass, moves to
    /// [`SubmissionState::Pending`].
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.state == SubmissionState::Pending {
            return SubmitStart::Busy;
        }
        let errors: Vec<(usize, FieldError)> = self
            .fields
            .iter_mut()
            .enumerate()
            .filter_map(|(i, f)| f.validate().err().map(|e| (i, e)))
            .collect();
        if !errors.is_empty() {
            return SubmitStart::Invalid(errors);
        }
        self.state = SubmissionState::Pending;
        SubmitStart::Started(
            self.fields
                .iter()
                .map(|f| (f.name.clone(), String::from(f.value.trim())))
                .collect(),
        )
    }

    /// Reports the outcome of the pending submission.
    ///
    /// Success clears the fields; failure keeps them. The submit control is
    /// enabled afterwards either way. Returns `None` if nothing was pending.
    pub fn resolve(&mut self, outcome: Result<(), SubmitError>) -> Option<Resolution> {
        if self.state != SubmissionState::Pending {
            return None;
        }
        let resolution = match outcome {
            Ok(()) => {
                self.fields.iter_mut().for_each(FormField::reset);
                self.state = SubmissionState::Succeeded;
                tracing::info!("contact form submitted");
                Resolution {
                    succeeded: true,
                    cleared: true,
                    notice: SENT_NOTICE,
                    kind: NoticeKind::Success,
                }
            }
            Err(err) => {
                tracing::info!(%err, "contact form submission failed");
                self.state = SubmissionState::Failed(err);
                Resolution {
                    succeeded: false,
                    cleared: false,
                    notice: FAILED_NOTICE,
                    kind: NoticeKind::Error,
                }
            }
        };
        Some(resolution)
    }
}

/// Decides how a simulated submission ends.
pub trait OutcomeSource {
    /// Draws the next outcome.
    fn next_outcome(&mut self) -> Result<(), SubmitError>;
}

impl<O: OutcomeSource + ?Sized> OutcomeSource for alloc::boxed::Box<O> {
    fn next_outcome(&mut self) -> Result<(), SubmitError> {
        (**self).next_outcome()
    }
}

/// Succeeds with a fixed probability.
#[derive(Clone, Debug)]
pub struct RatioOutcome {
    rng: SmallRng,
    success_ratio: f64,
}

impl RatioOutcome {
    /// Creates a source succeeding with probability `success_ratio`, clamped
    /// to `[0, 1]`.
    #[must_use]
    pub fn new(seed: u64, success_ratio: f64) -> Self {
        let success_ratio = if success_ratio.is_nan() {
            0.0
        } else {
            success_ratio.clamp(0.0, 1.0)
        };
        Self {
            rng: SmallRng::seed_from_u64(seed),
            success_ratio,
        }
    }
}

impl OutcomeSource for RatioOutcome {
    fn next_outcome(&mut self) -> Result<(), SubmitError> {
        if self.rng.random::<f64>() < self.success_ratio {
            Ok(())
        } else {
            Err(SubmitError::Rejected)
        }
    }
}

/// Always produces the same outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedOutcome(pub Result<(), SubmitError>);

impl OutcomeSource for FixedOutcome {
    fn next_outcome(&mut self) -> Result<(), SubmitError> {
        self.0.clone()
    }
}

/// Settles submissions after a fixed latency.
pub struct SimulatedSubmitter<O> {
    latency: Duration,
    outcomes: O,
    pending: Option<TimerId>,
}

impl<O> core::fmt::Debug for SimulatedSubmitter<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedSubmitter")
            .field("latency", &self.latency)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<O: OutcomeSource> SimulatedSubmitter<O> {
    /// Creates a submitter.
    #[must_use]
    pub fn new(latency: Duration, outcomes: O) -> Self {
        Self {
            latency,
            outcomes,
            pending: None,
        }
    }

    /// Starts a submission; it settles on [`Timeout::SubmissionSettled`].
    pub fn begin<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        self.pending = Some(timers.schedule(self.latency, Timeout::SubmissionSettled));
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handles the latency timer and draws the outcome.
    pub fn settle(&mut self) -> Option<Result<(), SubmitError>> {
        self.pending.take()?;
        Some(self.outcomes.next_outcome())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    fn contact() -> ContactForm {
        ContactForm::new(vec![
            FormField::new("name", FieldKind::Text),
            FormField::new("email", FieldKind::Email),
            FormField::new("message", FieldKind::Text),
        ])
    }

    fn fill(form: &mut ContactForm) {
        form.input(0, "Ada");
        form.input(1, " ada@example.com ");
        form.input(2, "Hello");
    }

    #[test]
    fn email_format_examples() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b@c.d.e"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@x."));
        assert!(!is_valid_email("us er@x.com"));
    }

    #[test]
    fn required_takes_precedence_over_format() {
        assert_eq!(validate_value("   ", FieldKind::Email), Err(FieldError::Required));
        assert_eq!(validate_value("", FieldKind::Text), Err(FieldError::Required));
        assert_eq!(validate_value("nope", FieldKind::Email), Err(FieldError::InvalidEmail));
        assert_eq!(validate_value("nope", FieldKind::Text), Ok(()));
        assert_eq!(FieldError::Required.to_string(), "This field is required");
    }

    #[test]
    fn input_clears_error_without_revalidating() {
        let mut form = contact();
        assert_eq!(form.blur(1), Some(Err(FieldError::Required)));
        assert!(form.input(1, "still not an email"));
        assert!(form.field(1).is_some_and(FormField::is_valid));
        assert!(!form.input(1, "x"), "nothing left to clear");
    }

    #[test]
    fn invalid_form_is_not_submitted() {
        let mut form = contact();
        form.input(0, "Ada");
        let start = form.begin_submit();
        assert_eq!(
            start,
            SubmitStart::Invalid(vec![(1, FieldError::Required), (2, FieldError::Required)])
        );
        assert_eq!(start.notice(), Some((FIX_ERRORS_NOTICE, NoticeKind::Error)));
        assert_eq!(*form.state(), SubmissionState::Idle);
    }

    #[test]
    fn success_clears_fields_and_reenables() {
        let mut form = contact();
        fill(&mut form);
        let SubmitStart::Started(data) = form.begin_submit() else {
            panic!("valid form should start");
        };
        assert_eq!(
            data[1],
            (String::from("email"), String::from("ada@example.com"))
        );
        assert!(!form.submit_enabled());
        assert_eq!(form.begin_submit(), SubmitStart::Busy);

        let r = form.resolve(Ok(())).expect("pending");
        assert!(r.succeeded && r.cleared);
        assert_eq!(r.notice, SENT_NOTICE);
        assert!(form.submit_enabled());
        assert!(form.fields().iter().all(|f| f.value().is_empty()));
        assert_eq!(form.resolve(Ok(())), None, "nothing pending");
    }

    #[test]
    fn failure_keeps_fields_and_reenables() {
        let mut form = contact();
        fill(&mut form);
        form.begin_submit();
        let r = form
            .resolve(Err(SubmitError::Status(503)))
            .expect("pending");
        assert!(!r.succeeded);
        assert_eq!(r.kind, NoticeKind::Error);
        assert!(form.submit_enabled());
        assert_eq!(form.field(0).map(FormField::value), Some("Ada"));
        assert_eq!(*form.state(), SubmissionState::Failed(SubmitError::Status(503)));

        form.input(2, "Hello again");
        assert_eq!(*form.state(), SubmissionState::Idle, "editing resets");
    }

    #[test]
    fn simulated_submission_settles_after_latency() {
        for outcome in [Ok(()), Err(SubmitError::Rejected)] {
            let mut form = contact();
            fill(&mut form);
            let mut timers = ManualTimers::new();
            let mut sim = SimulatedSubmitter::new(Duration(2000), FixedOutcome(outcome.clone()));

            assert!(matches!(form.begin_submit(), SubmitStart::Started(_)));
            sim.begin(&mut timers);
            assert_eq!(*form.state(), SubmissionState::Pending);
            assert!(timers.advance(Duration(1999)).is_empty());
            assert_eq!(timers.advance(Duration(1)), [Timeout::SubmissionSettled]);
            assert_eq!(timers.now(), HostTime(2000));

            let settled = sim.settle().expect("timer was ours");
            let r = form.resolve(settled).expect("pending");
            assert_eq!(r.succeeded, outcome.is_ok());
            assert!(form.submit_enabled());
            assert_eq!(sim.settle(), None);
        }
    }

    #[test]
    fn ratio_outcome_extremes_are_deterministic() {
        let mut always = RatioOutcome::new(1, 1.0);
        let mut never = RatioOutcome::new(1, 0.0);
        for _ in 0..100 {
            assert_eq!(always.next_outcome(), Ok(()));
            assert_eq!(never.next_outcome(), Err(SubmitError::Rejected));
        }
    }

    #[test]
    fn ratio_outcome_is_roughly_the_configured_split() {
        let mut source = RatioOutcome::new(0x5eed, 0.9);
        let ok = (0..10_000).filter(|_| source.next_outcome().is_ok()).count();
        assert!((8_500..9_500).contains(&ok), "got {ok} successes out of 10000");
    }
}
