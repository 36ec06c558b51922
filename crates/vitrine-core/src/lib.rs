//! Vitrine core library.
//! Locale resolution, session refresh, lead capture and page interaction events
//! for the marketing site. The gateway crate wires these into HTTP.

pub mod config;
pub mod dispatcher;
pub mod interaction;
pub mod leads;
pub mod locale;
pub mod resolver;

pub use config::{AnalyticsSettings, AuthSettings, ConfigError, LeadSettings, SiteConfig};
pub use dispatcher::{
    AnalyticsEvent, AnalyticsSink, Dispatcher, DispatcherConfig, EventType, MemorySink, PageContext,
    Signal, SinkSlot,
};
pub use leads::{LeadError, LeadForm, LeadForwarder};
pub use locale::{Locale, LocaleContext, LocaleSet, UnknownLocale};
pub use resolver::{
    Cookie, CookieSet, RequestParts, Resolution, ResolverPipeline, ResponseMutation, RouteMatcher,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
