//! Incident case submission: persist a case record, then notify.
//!
//! The case record is always written to disk first. Notification (SMS via
//! Twilio, or a written notice standing in for an email send) happens after
//! and its failure never loses the case.

use std::path::{Path, PathBuf};
use std::time::Duration;

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{ToolsConfig, TwilioConfig};
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};
use crate::tools::{random_hex, unix_seconds};

/// Timeout for the Twilio notification request.
const SMS_TIMEOUT: Duration = Duration::from_secs(15);

/// Default notification channel.
const DEFAULT_CONTACT_METHOD: &str = "sms";

/// Default urgency when the caller does not specify one.
const DEFAULT_URGENCY: &str = "normal";

/// A persisted incident case.
#[derive(Debug, Serialize)]
struct CaseRecord {
    case_id: String,
    timestamp: String,
    location: String,
    incident_description: String,
    urgency: String,
    contact_method: String,
    status: String,
}

/// Generate a case ID: unix time plus an uppercase random suffix.
fn new_case_id() -> String {
    format!("CASE_{}_{}", unix_seconds(), random_hex(8).to_uppercase())
}

/// How the notification step concluded.
enum NotificationOutcome {
    SmsSent(String),
    NoticeWritten(PathBuf),
    Failed(String),
}

/// Case submission tool.
///
/// # Parameters
///
/// - `description` (required): What happened.
/// - `location` (required): Where the incident happened.
/// - `contact_method` (optional): "sms" or "email". Default "sms"; without
///   Twilio credentials both channels write a local notice.
/// - `urgency` (optional): "low", "normal", or "high". Default "normal".
pub struct SubmitCase {
    client: reqwest::Client,
    config: ToolsConfig,
}

impl SubmitCase {
    /// Create a new case submission tool.
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Send the SMS notification via Twilio.
    async fn send_sms(&self, twilio: &TwilioConfig, body: &str) -> Result<(), ToolError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            twilio.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&twilio.account_sid, Some(&twilio.auth_token))
            .form(&[
                ("Body", body),
                ("From", twilio.from_number.as_str()),
                ("To", twilio.to_number.as_str()),
            ])
            .timeout(SMS_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Upstream(format!(
                "SMS service returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Notify about a submitted case. Never propagates failure.
    async fn notify(&self, case: &CaseRecord) -> NotificationOutcome {
        let body = format!(
            "Safety case {} submitted.\nLocation: {}\nUrgency: {}\nDescription: {}",
            case.case_id, case.location, case.urgency, case.incident_description
        );

        if case.contact_method == "sms" {
            if let Some(twilio) = &self.config.twilio {
                return match self.send_sms(twilio, &body).await {
                    Ok(()) => NotificationOutcome::SmsSent(twilio.to_number.clone()),
                    Err(e) => {
                        warn!("SMS notification for {} failed: {}", case.case_id, e);
                        NotificationOutcome::Failed(e.to_string())
                    }
                };
            }
        }

        // Email channel, or SMS without Twilio credentials: write a notice
        // next to the case record.
        let notice = format!(
            "To: {}\nSubject: Safety case {}\n\n{}\n",
            self.config.contact_email, case.case_id, body
        );
        let path = notification_path(&self.config.data_dir, &case.case_id);
        match tokio::fs::write(&path, notice).await {
            Ok(()) => NotificationOutcome::NoticeWritten(path),
            Err(e) => {
                warn!("Notification notice for {} failed: {}", case.case_id, e);
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Path of the case record file inside the data directory. The ID already
/// carries the `CASE_` prefix.
fn case_path(data_dir: &Path, case_id: &str) -> PathBuf {
    data_dir.join(format!("{}.json", case_id))
}

/// Path of the notification notice written next to the case record.
fn notification_path(data_dir: &Path, case_id: &str) -> PathBuf {
    data_dir.join(format!("{}_notification.txt", case_id))
}

#[async_trait]
impl Tool for SubmitCase {
    fn name(&self) -> &str {
        "submit_case"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "submit_case",
            "Submit a safety incident case for follow-up. Records the case and sends a notification.",
        )
        .required("description", ParamKind::String, "What happened")
        .required("location", ParamKind::String, "Where the incident happened")
        .optional(
            "contact_method",
            ParamKind::String,
            json!(DEFAULT_CONTACT_METHOD),
            "Notification channel: sms or email",
        )
        .optional(
            "urgency",
            ParamKind::String,
            json!(DEFAULT_URGENCY),
            "Urgency: low, normal, or high",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Write down the details (time, place, what happened) and report directly to local authorities."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let description = args.require_text("description")?;
        let location = args.require_text("location")?;
        let contact_method = args
            .get_string_or("contact_method", DEFAULT_CONTACT_METHOD)
            .to_lowercase();
        let urgency = args.get_string_or("urgency", DEFAULT_URGENCY).to_lowercase();

        let case = CaseRecord {
            case_id: new_case_id(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            location,
            incident_description: description,
            urgency,
            contact_method,
            status: "submitted".to_string(),
        };

        // The record is written before any notification attempt.
        tokio::fs::create_dir_all(&self.config.data_dir).await?;
        let path = case_path(&self.config.data_dir, &case.case_id);
        let record = serde_json::to_string_pretty(&case)?;
        tokio::fs::write(&path, record).await?;

        info!("Case {} recorded at {}", case.case_id, path.display());

        let notification = match self.notify(&case).await {
            NotificationOutcome::SmsSent(to) => {
                format!("An SMS notification was sent to {}.", to)
            }
            NotificationOutcome::NoticeWritten(_) => format!(
                "A notification notice was recorded for {}.",
                self.config.contact_email
            ),
            NotificationOutcome::Failed(reason) => format!(
                "The case is safely recorded, but the notification could not be sent ({}).",
                reason
            ),
        };

        debug!("Case {} notification: {}", case.case_id, notification);

        Ok(ToolOutput::success(format!(
            "Case submitted successfully.\n\
             Case ID: {}\n\
             Status: submitted\n\
             Urgency: {}\n\
             {}\n\
             Keep the case ID for follow-up with local authorities.",
            case.case_id, case.urgency, notification
        ))
        .with_artifact(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use serde_json::Value;

    fn make_args(description: &str, location: &str) -> ToolArgs {
        let mut params = HashMap::new();
        params.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
        params.insert("location".to_string(), Value::String(location.to_string()));
        ToolArgs::new(params)
    }

    fn temp_config(dir: &tempfile::TempDir) -> ToolsConfig {
        ToolsConfig::builder().data_dir(dir.path()).build()
    }

    #[test]
    fn test_case_id_shape() {
        let id = new_case_id();
        assert!(id.starts_with("CASE_"));
        let suffix = id.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_case_ids_unique() {
        assert_ne!(new_case_id(), new_case_id());
    }

    #[test]
    fn test_file_names_carry_single_prefix() {
        let dir = Path::new("/data");
        let record = case_path(dir, "CASE_1700000000_AB12CD34");
        let notice = notification_path(dir, "CASE_1700000000_AB12CD34");

        assert_eq!(
            record,
            PathBuf::from("/data/CASE_1700000000_AB12CD34.json")
        );
        assert_eq!(
            notice,
            PathBuf::from("/data/CASE_1700000000_AB12CD34_notification.txt")
        );
        assert!(!record.to_string_lossy().contains("case_CASE_"));
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SubmitCase::new(temp_config(&dir));
        let result = tool.execute(make_args("   ", "Accra")).await;
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_case_record_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SubmitCase::new(temp_config(&dir));

        let output = tool
            .execute(make_args("Witnessed a theft at the market", "Osu, Accra"))
            .await
            .unwrap();

        assert!(output.success);
        assert!(output.content.contains("Case ID: CASE_"));

        let path = output.artifact_path.unwrap();
        assert!(path.exists());

        let record: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(record["status"], "submitted");
        assert_eq!(record["location"], "Osu, Accra");
        assert_eq!(
            record["incident_description"],
            "Witnessed a theft at the market"
        );
        assert_eq!(record["urgency"], "normal");
        assert_eq!(record["contact_method"], "sms");
        assert!(record["case_id"].as_str().unwrap().starts_with("CASE_"));
        assert!(!record["timestamp"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notice_written_without_twilio() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SubmitCase::new(temp_config(&dir));

        let mut args = make_args("Harassment near the station", "Accra");
        args.params
            .insert("urgency".to_string(), Value::String("High".to_string()));

        let output = tool.execute(args).await.unwrap();
        assert!(output.content.contains("Urgency: high"));
        assert!(output.content.contains("notification notice was recorded"));

        let notices: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .ends_with("_notification.txt")
            })
            .collect();
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn test_email_channel_writes_notice() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig::builder()
            .data_dir(dir.path())
            .twilio("AC123", "secret", "+15550001111", "+15550002222")
            .build();
        let tool = SubmitCase::new(config);

        let mut args = make_args("Lost wallet", "Accra");
        args.params.insert(
            "contact_method".to_string(),
            Value::String("email".to_string()),
        );

        // Twilio is configured, but the email channel never touches it.
        let output = tool.execute(args).await.unwrap();
        assert!(output.content.contains("notification notice was recorded"));
    }

    #[test]
    fn test_schema_parameter_order() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SubmitCase::new(temp_config(&dir));
        let schema = tool.schema();
        let names: Vec<&str> = schema.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["description", "location", "contact_method", "urgency"]
        );
    }
}
