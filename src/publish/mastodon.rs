//! Mastodon publisher
//!
//! Mastodon refuses a poll and media on the same status, so a quiz is a
//! small thread:
//! 1. Public status with the map and the country clue
//! 2. Unlisted reply holding the poll
//! 3. Unlisted reply revealing the answer, scheduled before the poll closes
//!
//! API documentation: https://docs.joinmastodon.org/methods/statuses/

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};
use crate::poll::PollSpec;
use crate::publish::{PublishReceipt, Publisher};
use chrono::Utc;
use reqwest::blocking::{multipart, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// How often and how long to wait for server-side media processing
const MEDIA_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MEDIA_POLL_ATTEMPTS: u32 = 30;

/// The answer goes out this long before the poll closes
const ANSWER_LEAD: Duration = Duration::from_secs(3600);

const LANGUAGE: &str = "en";

/// Mastodon publisher
#[derive(Debug, Clone)]
pub struct MastodonPublisher {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MediaAttachment {
    id: String,
    /// Null while the server is still processing
    #[serde(default)]
    url: Option<String>,
}

/// Status or scheduled status; only the fields we read
#[derive(Debug, Deserialize)]
struct StatusResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Default, Serialize)]
struct NewStatus<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    media_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_reply_to_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    poll: Option<NewPoll<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spoiler_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduled_at: Option<String>,
    visibility: &'a str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct NewPoll<'a> {
    options: &'a [String],
    expires_in: u64,
    multiple: bool,
    hide_totals: bool,
}

/// Normalize an instance name or URL to `https://host` without trailing slash
pub fn instance_url(instance: &str) -> String {
    let instance = instance.trim().trim_end_matches('/');
    if instance.starts_with("http://") || instance.starts_with("https://") {
        instance.to_string()
    } else {
        format!("https://{}", instance)
    }
}

/// Delay before the answer reveal for a poll lasting `expiry`
pub fn answer_delay(expiry: Duration) -> Duration {
    if expiry > ANSWER_LEAD {
        expiry - ANSWER_LEAD
    } else {
        expiry
    }
}

impl MastodonPublisher {
    /// Create a publisher for `instance` authenticated with `access_token`
    pub fn new(instance: &str, access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: instance_url(instance),
            access_token: access_token.into(),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.access_token)
    }

    /// Send a write request with a fresh idempotency key
    fn send_write(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .authorized(builder)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .send()
            .map_err(|e| Error::Publish(format!("{} request failed: {}", what, e)))?;
        check_status(response, what)
    }

    /// Poll the media endpoint until the server has processed the upload
    fn wait_for_media(&self, id: &str) -> Result<()> {
        let url = format!("{}/api/v1/media/{}", self.base_url, urlencoding::encode(id));
        for _ in 0..MEDIA_POLL_ATTEMPTS {
            thread::sleep(MEDIA_POLL_INTERVAL);
            let response = self
                .authorized(self.client.get(&url))
                .send()
                .map_err(|e| Error::Publish(format!("Media status request failed: {}", e)))?;
            if response.status() == StatusCode::PARTIAL_CONTENT {
                continue;
            }
            let media: MediaAttachment = check_status(response, "Media status")?.json()?;
            if media.url.is_some() {
                return Ok(());
            }
        }
        Err(Error::Publish(format!("Media {} was never processed", id)))
    }
}

impl StatusApi for MastodonPublisher {
    fn upload_media(&self, poll: &PollSpec) -> Result<String> {
        let part = multipart::Part::bytes(poll.image.clone())
            .file_name("map.png")
            .mime_str("image/png")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("description", poll.alt_text.clone());

        let url = format!("{}/api/v2/media", self.base_url);
        let response = self.send_write(self.client.post(&url).multipart(form), "Media upload")?;
        let processing = response.status() == StatusCode::ACCEPTED;
        let media: MediaAttachment = response.json()?;
        debug!("Uploaded media {} (processing: {})", media.id, processing);

        if processing || media.url.is_none() {
            self.wait_for_media(&media.id)?;
        }
        Ok(media.id)
    }

    fn post_status(&self, status: &NewStatus<'_>, what: &str) -> Result<StatusResponse> {
        let url = format!("{}/api/v1/statuses", self.base_url);
        let response = self.send_write(self.client.post(&url).json(status), what)?;
        Ok(response.json()?)
    }

    fn delete_status(&self, id: &str) -> Result<()> {
        let url = format!("{}/api/v1/statuses/{}", self.base_url, urlencoding::encode(id));
        let response = self
            .authorized(self.client.delete(&url))
            .send()
            .map_err(|e| Error::Publish(format!("Delete request failed: {}", e)))?;
        check_status(response, "Delete")?;
        Ok(())
    }
}

impl Publisher for MastodonPublisher {
    fn name(&self) -> &'static str {
        "mastodon"
    }

    fn publish(&self, poll: &PollSpec) -> Result<PublishReceipt> {
        publish_thread(self, poll)
    }
}

/// The Mastodon calls a quiz thread is made of
trait StatusApi {
    /// Upload the map and wait until it can be attached
    fn upload_media(&self, poll: &PollSpec) -> Result<String>;

    fn post_status(&self, status: &NewStatus<'_>, what: &str) -> Result<StatusResponse>;

    fn delete_status(&self, id: &str) -> Result<()>;
}

/// Post the map, the poll reply and the scheduled answer
///
/// A failed poll reply removes the map status again. A failed answer is
/// logged only: the poll is already complete.
fn publish_thread(api: &dyn StatusApi, poll: &PollSpec) -> Result<PublishReceipt> {
    let media_id = api.upload_media(poll)?;

    let image_text = poll.image_status();
    let image_status = api.post_status(
        &NewStatus {
            status: &image_text,
            media_ids: vec![media_id.as_str()],
            visibility: "public",
            language: LANGUAGE,
            ..Default::default()
        },
        "Image status",
    )?;
    info!("Posted map status {}", image_status.id);

    let poll_text = poll.poll_status();
    let reply = poll_reply(&poll_text, &image_status.id, poll);
    let poll_status = match api.post_status(&reply, "Poll status") {
        Ok(status) => status,
        Err(e) => {
            error!("Poll reply failed, removing map status {}", image_status.id);
            if let Err(rollback) = api.delete_status(&image_status.id) {
                warn!("Could not remove map status {}: {}", image_status.id, rollback);
            }
            return Err(e);
        }
    };
    info!("Posted poll status {}", poll_status.id);

    let answer_text = poll.answer_status();
    let spoiler = poll.answer_spoiler();
    let scheduled_at = Utc::now()
        + chrono::Duration::from_std(answer_delay(poll.expiry))
            .map_err(|e| Error::Publish(format!("Invalid answer delay: {}", e)))?;
    let answer = NewStatus {
        status: &answer_text,
        in_reply_to_id: Some(poll_status.id.as_str()),
        spoiler_text: Some(spoiler.as_str()),
        scheduled_at: Some(scheduled_at.to_rfc3339()),
        visibility: "unlisted",
        language: LANGUAGE,
        ..Default::default()
    };
    let answer_scheduled = match api.post_status(&answer, "Answer status") {
        Ok(scheduled) => {
            info!("Scheduled answer {} for {}", scheduled.id, scheduled_at);
            true
        }
        Err(e) => {
            error!("Poll is live but the answer could not be scheduled: {}", e);
            false
        }
    };

    Ok(PublishReceipt {
        image_status_url: image_status.url,
        poll_status_url: poll_status.url,
        answer_scheduled,
    })
}

fn poll_reply<'a>(text: &'a str, reply_to: &'a str, poll: &'a PollSpec) -> NewStatus<'a> {
    NewStatus {
        status: text,
        in_reply_to_id: Some(reply_to),
        poll: Some(NewPoll {
            options: &poll.options,
            expires_in: poll.expiry.as_secs(),
            multiple: false,
            hide_totals: false,
        }),
        visibility: "unlisted",
        language: LANGUAGE,
        ..Default::default()
    }
}

/// Turn a non-2xx response into a publish error carrying the API message
fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::Publish(format!(
        "{} failed with {}: {}",
        what,
        status,
        error_detail(&body)
    )))
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}
