//! Typed webhook events and payload dispatch.
//!
//! Every delivery declares its event type in the `X-Forge-Event` header.
//! [`parse_event`] maps that name to a typed payload through one closed,
//! explicit table: an unrecognized name fails with
//! [`WebhookError::UnknownEventType`] rather than falling back to a generic
//! shape, because downstream handlers are typically exhaustive matches over
//! the known variants.
//!
//! Payload structs use `Option` fields throughout: the API distinguishes
//! an absent field from a zero value, and so does this crate.
//!
//! # Example
//!
//! ```rust
//! use forge_api::webhooks::{parse_event, Event};
//!
//! let payload = br#"{"zen":"Keep it logically awesome.","hook_id":42}"#;
//! match parse_event("ping", payload).unwrap() {
//!     Event::Ping(ping) => assert_eq!(ping.hook_id, Some(42)),
//!     _ => unreachable!(),
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::webhooks::WebhookError;

/// An account (user or organization) referenced by an event payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account id.
    pub id: Option<u64>,
    /// Login name.
    pub login: Option<String>,
    /// Account kind, `"User"` or `"Organization"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// A repository referenced by an event payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique repository id.
    pub id: Option<u64>,
    /// Short name.
    pub name: Option<String>,
    /// `owner/name` form.
    pub full_name: Option<String>,
    /// Whether the repository is private.
    pub private: Option<bool>,
    /// The default branch name.
    pub default_branch: Option<String>,
    /// The owning account.
    pub owner: Option<Account>,
}

/// An issue referenced by an event payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    pub number: Option<u64>,
    /// Title line.
    pub title: Option<String>,
    /// `"open"` or `"closed"`.
    pub state: Option<String>,
    /// Body text. `None` when absent, `Some("")` when explicitly empty.
    pub body: Option<String>,
    /// The authoring account.
    pub user: Option<Account>,
}

/// A comment on an issue or pull request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment id.
    pub id: Option<u64>,
    /// Body text.
    pub body: Option<String>,
    /// The authoring account.
    pub user: Option<Account>,
}

/// A pull request referenced by an event payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number within the repository.
    pub number: Option<u64>,
    /// Title line.
    pub title: Option<String>,
    /// `"open"` or `"closed"`.
    pub state: Option<String>,
    /// Whether the pull request has been merged.
    pub merged: Option<bool>,
    /// The authoring account.
    pub user: Option<Account>,
}

/// A release referenced by an event payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Unique release id.
    pub id: Option<u64>,
    /// The git tag the release points at.
    pub tag_name: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Whether the release is an unpublished draft.
    pub draft: Option<bool>,
    /// Whether the release is marked as a prerelease.
    pub prerelease: Option<bool>,
}

/// A commit carried in a push payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushCommit {
    /// Commit SHA.
    pub id: Option<String>,
    /// Commit message.
    pub message: Option<String>,
    /// Commit timestamp.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Sent when a hook is first installed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingEvent {
    /// A random string of wisdom.
    pub zen: Option<String>,
    /// The id of the hook that fired.
    pub hook_id: Option<u64>,
}

/// Sent for every pushed ref.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    /// The full ref that was pushed, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    /// SHA before the push.
    pub before: Option<String>,
    /// SHA after the push.
    pub after: Option<String>,
    /// The pushed commits.
    #[serde(default)]
    pub commits: Vec<PushCommit>,
    /// The repository pushed to.
    pub repository: Option<Repository>,
    /// The account that pushed.
    pub sender: Option<Account>,
}

/// Sent when a branch or tag is created.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEvent {
    /// The created ref name.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    /// `"branch"` or `"tag"`.
    pub ref_type: Option<String>,
    /// The repository the ref was created in.
    pub repository: Option<Repository>,
    /// The account that created the ref.
    pub sender: Option<Account>,
}

/// Sent when a branch or tag is deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEvent {
    /// The deleted ref name.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    /// `"branch"` or `"tag"`.
    pub ref_type: Option<String>,
    /// The repository the ref was deleted from.
    pub repository: Option<Repository>,
    /// The account that deleted the ref.
    pub sender: Option<Account>,
}

/// Sent when a repository is forked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkEvent {
    /// The newly created fork.
    pub forkee: Option<Repository>,
    /// The repository that was forked.
    pub repository: Option<Repository>,
    /// The forking account.
    pub sender: Option<Account>,
}

/// Sent when an issue is opened, edited, closed, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesEvent {
    /// What happened, e.g. `"opened"`.
    pub action: Option<String>,
    /// The issue itself.
    pub issue: Option<Issue>,
    /// The repository the issue belongs to.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when an issue or pull-request comment is created, edited, or deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    /// What happened to the comment.
    pub action: Option<String>,
    /// The issue the comment is on.
    pub issue: Option<Issue>,
    /// The comment itself.
    pub comment: Option<Comment>,
    /// The repository.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when a collaborator is added, removed, or has permissions edited.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEvent {
    /// What happened to the membership.
    pub action: Option<String>,
    /// The affected account.
    pub member: Option<Account>,
    /// The repository.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when a private repository is made public.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicEvent {
    /// The repository that went public.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when a pull request is opened, synchronized, closed, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// What happened, e.g. `"opened"`.
    pub action: Option<String>,
    /// The pull request number.
    pub number: Option<u64>,
    /// The pull request itself.
    pub pull_request: Option<PullRequest>,
    /// The repository.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when a release is published, edited, or deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// What happened to the release.
    pub action: Option<String>,
    /// The release itself.
    pub release: Option<Release>,
    /// The repository.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// Sent when an account stars a repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    /// Always `"started"`.
    pub action: Option<String>,
    /// The repository.
    pub repository: Option<Repository>,
    /// The acting account.
    pub sender: Option<Account>,
}

/// A verified, decoded webhook delivery.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// `ping`: hook installed.
    Ping(PingEvent),
    /// `push`: ref pushed.
    Push(PushEvent),
    /// `create`: branch or tag created.
    Create(CreateEvent),
    /// `delete`: branch or tag deleted.
    Delete(DeleteEvent),
    /// `fork`: repository forked.
    Fork(ForkEvent),
    /// `issues`: issue activity.
    Issues(IssuesEvent),
    /// `issue_comment`: comment activity.
    IssueComment(IssueCommentEvent),
    /// `member`: collaborator activity.
    Member(MemberEvent),
    /// `public`: repository made public.
    Public(PublicEvent),
    /// `pull_request`: pull request activity.
    PullRequest(PullRequestEvent),
    /// `release`: release activity.
    Release(ReleaseEvent),
    /// `watch`: repository starred.
    Watch(WatchEvent),
}

impl Event {
    /// Returns the event type name this variant dispatches from.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Ping(_) => "ping",
            Self::Push(_) => "push",
            Self::Create(_) => "create",
            Self::Delete(_) => "delete",
            Self::Fork(_) => "fork",
            Self::Issues(_) => "issues",
            Self::IssueComment(_) => "issue_comment",
            Self::Member(_) => "member",
            Self::Public(_) => "public",
            Self::PullRequest(_) => "pull_request",
            Self::Release(_) => "release",
            Self::Watch(_) => "watch",
        }
    }
}

/// The closed list of event type names [`parse_event`] accepts.
#[must_use]
pub const fn known_event_types() -> &'static [&'static str] {
    &[
        "ping",
        "push",
        "create",
        "delete",
        "fork",
        "issues",
        "issue_comment",
        "member",
        "public",
        "pull_request",
        "release",
        "watch",
    ]
}

/// Decodes a raw payload into the typed event declared by `event_type`.
///
/// The name→variant mapping lives here and nowhere else. Dispatch never
/// guesses: a name outside the closed table fails with
/// [`WebhookError::UnknownEventType`] naming the unrecognized value.
///
/// # Errors
///
/// [`WebhookError::UnknownEventType`] for names outside the table, or
/// [`WebhookError::InvalidPayload`] when the payload fails JSON decoding.
pub fn parse_event(event_type: &str, payload: &[u8]) -> Result<Event, WebhookError> {
    match event_type {
        "ping" => Ok(Event::Ping(serde_json::from_slice(payload)?)),
        "push" => Ok(Event::Push(serde_json::from_slice(payload)?)),
        "create" => Ok(Event::Create(serde_json::from_slice(payload)?)),
        "delete" => Ok(Event::Delete(serde_json::from_slice(payload)?)),
        "fork" => Ok(Event::Fork(serde_json::from_slice(payload)?)),
        "issues" => Ok(Event::Issues(serde_json::from_slice(payload)?)),
        "issue_comment" => Ok(Event::IssueComment(serde_json::from_slice(payload)?)),
        "member" => Ok(Event::Member(serde_json::from_slice(payload)?)),
        "public" => Ok(Event::Public(serde_json::from_slice(payload)?)),
        "pull_request" => Ok(Event::PullRequest(serde_json::from_slice(payload)?)),
        "release" => Ok(Event::Release(serde_json::from_slice(payload)?)),
        "watch" => Ok(Event::Watch(serde_json::from_slice(payload)?)),
        other => Err(WebhookError::UnknownEventType {
            event_type: other.to_string(),
        }),
    }
}
