//! Moderation workflow state machine
//!
//! Edits and deletes by non-admin owners never touch the live article;
//! they become pending requests an admin resolves. The transition logic
//! lives here as pure functions so it can be exercised without a database;
//! the repository persists the outcomes transactionally.

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review status enum
///
/// `Pending -> {Approved, Rejected}`; both outcomes are terminal. A retry
/// after resolution creates a fresh request, it never reopens this one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Check if the request has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReviewStatus::Approved | ReviewStatus::Rejected)
    }
}

impl From<&str> for ReviewStatus {
    fn from(s: &str) -> Self {
        match s {
            "APPROVED" => ReviewStatus::Approved,
            "REJECTED" => ReviewStatus::Rejected,
            _ => ReviewStatus::Pending,
        }
    }
}

impl From<String> for ReviewStatus {
    fn from(s: String) -> Self {
        ReviewStatus::from(s.as_str())
    }
}

impl From<ReviewStatus> for String {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pending => "PENDING".to_string(),
            ReviewStatus::Approved => "APPROVED".to_string(),
            ReviewStatus::Rejected => "REJECTED".to_string(),
        }
    }
}

/// The full proposed-field snapshot carried by an edit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSnapshot {
    pub title: String,
    pub category_id: Uuid,
    pub image_url: Option<String>,
    pub summary: String,
    pub content: String,
}

/// Fields every content-touching edit path writes to the live article.
///
/// Publication never survives a content change: both flags are forced off
/// so the article goes back through admin review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    pub title: String,
    pub category_id: Uuid,
    pub image_url: Option<String>,
    pub summary: String,
    pub content: String,
    pub is_approved: bool,
    pub is_published: bool,
}

/// Apply an approved snapshot (or a direct admin edit) to the live article.
pub fn apply_edit(snapshot: EditSnapshot) -> AppliedEdit {
    AppliedEdit {
        title: snapshot.title,
        category_id: snapshot.category_id,
        image_url: snapshot.image_url,
        summary: snapshot.summary,
        content: snapshot.content,
        is_approved: false,
        is_published: false,
    }
}

/// A reviewer's resolution of a pending request.
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
    pub reviewed_by: Uuid,
    pub reviewed_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

impl ReviewDecision {
    pub fn approve(reviewer_id: Uuid) -> Self {
        Self {
            status: ReviewStatus::Approved,
            reviewed_by: reviewer_id,
            reviewed_at: Utc::now(),
            rejection_reason: None,
        }
    }

    /// Reject with a free-text reason, stored verbatim (may be empty).
    pub fn reject(reviewer_id: Uuid, reason: String) -> Self {
        Self {
            status: ReviewStatus::Rejected,
            reviewed_by: reviewer_id,
            reviewed_at: Utc::now(),
            rejection_reason: Some(reason),
        }
    }
}

/// Guard a transition: resolved requests never reopen.
pub fn ensure_pending(status: ReviewStatus) -> Result<()> {
    if status.is_terminal() {
        Err(AppError::Conflict {
            message: format!("Request already resolved as {}", String::from(status)),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> EditSnapshot {
        EditSnapshot {
            title: "Rewritten title".to_string(),
            category_id: Uuid::new_v4(),
            image_url: Some("https://example.com/cover.png".to_string()),
            summary: "New summary".to_string(),
            content: "New content".to_string(),
        }
    }

    #[test]
    fn test_status_parsing_falls_back_to_pending() {
        assert_eq!(ReviewStatus::from("APPROVED"), ReviewStatus::Approved);
        assert_eq!(ReviewStatus::from("REJECTED"), ReviewStatus::Rejected);
        assert_eq!(ReviewStatus::from("PENDING"), ReviewStatus::Pending);
        assert_eq!(ReviewStatus::from("garbage"), ReviewStatus::Pending);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(ReviewStatus::Approved.is_terminal());
        assert!(ReviewStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_apply_edit_copies_fields_and_relocks() {
        let snap = snapshot();
        let applied = apply_edit(snap.clone());

        assert_eq!(applied.title, snap.title);
        assert_eq!(applied.category_id, snap.category_id);
        assert_eq!(applied.image_url, snap.image_url);
        assert_eq!(applied.summary, snap.summary);
        assert_eq!(applied.content, snap.content);
        // Re-review is always required after a content change
        assert!(!applied.is_approved);
        assert!(!applied.is_published);
    }

    #[test]
    fn test_rejection_reason_stored_verbatim() {
        let reviewer = Uuid::new_v4();
        let decision = ReviewDecision::reject(reviewer, "  too short  ".to_string());
        assert_eq!(decision.status, ReviewStatus::Rejected);
        assert_eq!(decision.rejection_reason.as_deref(), Some("  too short  "));

        let empty = ReviewDecision::reject(reviewer, String::new());
        assert_eq!(empty.rejection_reason.as_deref(), Some(""));
    }

    #[test]
    fn test_approve_decision() {
        let reviewer = Uuid::new_v4();
        let decision = ReviewDecision::approve(reviewer);
        assert_eq!(decision.status, ReviewStatus::Approved);
        assert_eq!(decision.reviewed_by, reviewer);
        assert!(decision.rejection_reason.is_none());
    }

    #[test]
    fn test_ensure_pending_rejects_resolved() {
        assert!(ensure_pending(ReviewStatus::Pending).is_ok());
        assert!(ensure_pending(ReviewStatus::Approved).is_err());
        assert!(ensure_pending(ReviewStatus::Rejected).is_err());
    }
}
