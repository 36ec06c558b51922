//! Signup (lead capture) modal.

use std::time::{Duration, Instant};

use crate::leads::{LeadError, LeadForm};

/// Delay between hiding the modal and clearing its form, so the close
/// animation never shows an empty form.
pub const RESET_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
    Submitted,
}

#[derive(Debug, Clone)]
pub struct SignupModal {
    phase: ModalPhase,
    submitted: bool,
    form: LeadForm,
    reset_at: Option<Instant>,
}

impl Default for SignupModal {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupModal {
    pub fn new() -> Self {
        Self {
            phase: ModalPhase::Closed,
            submitted: false,
            form: LeadForm::default(),
            reset_at: None,
        }
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LeadForm {
        &mut self.form
    }

    /// Reopening cancels a pending reset; a submitted modal reopens on its
    /// success view until the reset has run.
    pub fn open(&mut self) {
        self.reset_at = None;
        self.phase = if self.submitted {
            ModalPhase::Submitted
        } else {
            ModalPhase::Open
        };
    }

    /// Validates the form; on success the modal shows its success view and
    /// the lead to send is returned. `None` unless the form is showing.
    pub fn submit(&mut self) -> Result<Option<LeadForm>, LeadError> {
        if self.phase != ModalPhase::Open {
            return Ok(None);
        }
        self.form.validate()?;
        self.submitted = true;
        self.phase = ModalPhase::Submitted;
        Ok(Some(self.form.normalized()))
    }

    /// Hides immediately; form and success state clear at `now + RESET_DELAY`.
    pub fn close(&mut self, now: Instant) {
        if self.phase == ModalPhase::Closed {
            return;
        }
        self.phase = ModalPhase::Closed;
        self.reset_at = Some(now + RESET_DELAY);
    }

    /// Apply the pending reset if it is due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.reset_at {
            if now >= at {
                self.reset_at = None;
                self.submitted = false;
                self.form = LeadForm::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(modal: &mut SignupModal) {
        let form = modal.form_mut();
        form.name = "Ana".into();
        form.email = "ana@example.com".into();
        form.phone = "11912345678".into();
    }

    #[test]
    fn submit_requires_valid_form() {
        let mut modal = SignupModal::new();
        modal.open();
        assert!(modal.submit().is_err());
        assert_eq!(modal.phase(), ModalPhase::Open);
        fill(&mut modal);
        let lead = modal.submit().unwrap().unwrap();
        assert_eq!(lead.name, "Ana");
        assert_eq!(modal.phase(), ModalPhase::Submitted);
        assert!(modal.submit().unwrap().is_none());
    }

    #[test]
    fn close_resets_after_delay() {
        let t0 = Instant::now();
        let mut modal = SignupModal::new();
        modal.open();
        fill(&mut modal);
        modal.submit().unwrap();
        modal.close(t0);
        assert_eq!(modal.phase(), ModalPhase::Closed);

        modal.tick(t0 + Duration::from_millis(100));
        assert_eq!(modal.form().name, "Ana");

        modal.tick(t0 + RESET_DELAY);
        assert_eq!(modal.form(), &LeadForm::default());
        modal.open();
        assert_eq!(modal.phase(), ModalPhase::Open);
    }

    #[test]
    fn reopening_before_reset_keeps_success_view() {
        let t0 = Instant::now();
        let mut modal = SignupModal::new();
        modal.open();
        fill(&mut modal);
        modal.submit().unwrap();
        modal.close(t0);
        modal.open();
        modal.tick(t0 + Duration::from_secs(1));
        assert_eq!(modal.phase(), ModalPhase::Submitted);
        assert_eq!(modal.form().name, "Ana");
    }
}
