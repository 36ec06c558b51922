//! Client UI state for the landing page: accordions, the signup modal and the
//! sticky call-to-action. Time is passed in explicitly so transitions are
//! deterministic.

pub mod accordion;
pub mod signup;
pub mod sticky_cta;

pub use accordion::Accordion;
pub use signup::{ModalPhase, SignupModal};
pub use sticky_cta::StickyCta;
