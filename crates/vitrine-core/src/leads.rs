//! Lead capture: validates signup-modal submissions and forwards accepted
//! leads to the configured webhook. Nothing is stored locally.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LeadSettings;

const MIN_PHONE_DIGITS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("name is required")]
    MissingName,

    #[error("email address is invalid")]
    InvalidEmail,

    #[error("phone number needs at least 8 digits")]
    InvalidPhone,

    #[error("lead webhook unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lead webhook rejected the lead: HTTP {0}")]
    Rejected(u16),
}

/// The three fields of the signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl LeadForm {
    pub fn validate(&self) -> Result<(), LeadError> {
        if self.name.trim().is_empty() {
            return Err(LeadError::MissingName);
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(LeadError::InvalidEmail);
        }
        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        if digits < MIN_PHONE_DIGITS {
            return Err(LeadError::InvalidPhone);
        }
        Ok(())
    }

    /// Trimmed copy, as forwarded.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            phone: self.phone.trim().to_string(),
            locale: self.locale.clone(),
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
            .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReceipt {
    pub lead_id: String,
    pub forwarded: bool,
}

pub struct LeadForwarder {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl LeadForwarder {
    pub fn new(settings: &LeadSettings) -> Result<Self, LeadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            webhook_url: settings.webhook_url.clone(),
        })
    }

    /// Validate, assign an id, and forward when a webhook is configured.
    /// Forwarding failures are logged; the visitor still gets a receipt.
    pub async fn submit(&self, form: &LeadForm) -> Result<LeadReceipt, LeadError> {
        form.validate()?;
        let lead = form.normalized();
        let lead_id = format!("lead_{}", uuid::Uuid::new_v4().simple());

        let forwarded = match &self.webhook_url {
            Some(url) => match self.forward(url, &lead_id, &lead).await {
                Ok(()) => {
                    tracing::info!(target: "vitrine::leads", "[LEADS] {} forwarded to webhook", lead_id);
                    true
                }
                Err(e) => {
                    tracing::warn!(target: "vitrine::leads", "[LEADS] {} not forwarded: {}", lead_id, e);
                    false
                }
            },
            None => {
                tracing::info!(target: "vitrine::leads", "[LEADS] {} accepted (no webhook configured)", lead_id);
                false
            }
        };

        Ok(LeadReceipt { lead_id, forwarded })
    }

    async fn forward(&self, url: &str, lead_id: &str, lead: &LeadForm) -> Result<(), LeadError> {
        let payload = serde_json::json!({
            "lead_id": lead_id,
            "name": lead.name,
            "email": lead.email,
            "phone": lead.phone,
            "locale": lead.locale,
            "received_at": chrono::Utc::now().to_rfc3339(),
        });
        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(LeadError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LeadForm {
        LeadForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "+55 (11) 91234-5678".into(),
            locale: Some("pt-BR".into()),
        }
    }

    #[test]
    fn valid_form_passes() {
        form().validate().unwrap();
    }

    #[test]
    fn rejects_bad_fields() {
        let mut f = form();
        f.name = "  ".into();
        assert!(matches!(f.validate(), Err(LeadError::MissingName)));

        for email in ["ana", "ana@", "@example.com", "ana@example", "a b@example.com", "a@b@c.com"] {
            let mut f = form();
            f.email = email.into();
            assert!(matches!(f.validate(), Err(LeadError::InvalidEmail)), "{}", email);
        }

        let mut f = form();
        f.phone = "123-45".into();
        assert!(matches!(f.validate(), Err(LeadError::InvalidPhone)));
    }

    #[test]
    fn normalization_trims_and_lowercases_email() {
        let mut f = form();
        f.name = " Ana ".into();
        f.email = " Ana@Example.COM ".into();
        let n = f.normalized();
        assert_eq!(n.name, "Ana");
        assert_eq!(n.email, "ana@example.com");
    }

    #[tokio::test]
    async fn accepted_without_webhook() {
        let forwarder = LeadForwarder::new(&LeadSettings::default()).unwrap();
        let receipt = forwarder.submit(&form()).await.unwrap();
        assert!(receipt.lead_id.starts_with("lead_"));
        assert!(!receipt.forwarded);
    }

    #[tokio::test]
    async fn invalid_lead_is_not_accepted() {
        let forwarder = LeadForwarder::new(&LeadSettings::default()).unwrap();
        let mut f = form();
        f.email = "nope".into();
        assert!(forwarder.submit(&f).await.is_err());
    }
}
