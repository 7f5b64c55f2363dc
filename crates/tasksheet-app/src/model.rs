// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "In-process")]
    InProcess,
    #[serde(rename = "Need to start")]
    NeedToStart,
    Complete,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [Self; 4] = [
        Self::InProcess,
        Self::NeedToStart,
        Self::Complete,
        Self::Blocked,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProcess => "In-process",
            Self::NeedToStart => "Need to start",
            Self::Complete => "Complete",
            Self::Blocked => "Blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(normalized))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(normalized))
    }
}

/// One editable column of the sheet, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    JobRequest,
    Submitted,
    Status,
    Submitter,
    SubmitterUrl,
    Assigned,
    Priority,
    DueDate,
    EstValue,
}

impl Field {
    pub const ALL: [Self; 9] = [
        Self::JobRequest,
        Self::Submitted,
        Self::Status,
        Self::Submitter,
        Self::SubmitterUrl,
        Self::Assigned,
        Self::Priority,
        Self::DueDate,
        Self::EstValue,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::JobRequest => "jobRequest",
            Self::Submitted => "submitted",
            Self::Status => "status",
            Self::Submitter => "submitter",
            Self::SubmitterUrl => "submitterUrl",
            Self::Assigned => "assigned",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
            Self::EstValue => "estValue",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::JobRequest => "Job Request",
            Self::Submitted => "Submitted",
            Self::Status => "Status",
            Self::Submitter => "Submitter",
            Self::SubmitterUrl => "URL",
            Self::Assigned => "Assigned",
            Self::Priority => "Priority",
            Self::DueDate => "Due Date",
            Self::EstValue => "Est. Value",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == value)
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    pub const fn is_enum(self) -> bool {
        matches!(self, Self::Status | Self::Priority)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub job_request: String,
    pub submitted: String,
    pub status: TaskStatus,
    pub submitter: String,
    pub submitter_url: String,
    pub assigned: String,
    pub priority: Priority,
    pub due_date: String,
    pub est_value: String,
}

/// Result of writing text into a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWrite {
    Written { old: String },
    Rejected,
}

impl Record {
    /// Placeholder row appended by the add action.
    pub fn placeholder(id: RecordId, today: Date) -> Self {
        let date = format_sheet_date(today);
        Self {
            id,
            job_request: "New task...".to_owned(),
            submitted: date.clone(),
            status: TaskStatus::NeedToStart,
            submitter: "New User".to_owned(),
            submitter_url: "www.newuser...".to_owned(),
            assigned: "Unassigned".to_owned(),
            priority: Priority::Medium,
            due_date: date,
            est_value: "0 ₹".to_owned(),
        }
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::JobRequest => self.job_request.clone(),
            Field::Submitted => self.submitted.clone(),
            Field::Status => self.status.as_str().to_owned(),
            Field::Submitter => self.submitter.clone(),
            Field::SubmitterUrl => self.submitter_url.clone(),
            Field::Assigned => self.assigned.clone(),
            Field::Priority => self.priority.as_str().to_owned(),
            Field::DueDate => self.due_date.clone(),
            Field::EstValue => self.est_value.clone(),
        }
    }

    /// Writes text into a field. Enum fields only accept one of their
    /// known labels; anything else leaves the record untouched.
    pub fn write(&mut self, field: Field, value: &str) -> FieldWrite {
        let old = self.value(field);
        let slot = match field {
            Field::Status => {
                let Some(status) = TaskStatus::parse(value) else {
                    return FieldWrite::Rejected;
                };
                self.status = status;
                return FieldWrite::Written { old };
            }
            Field::Priority => {
                let Some(priority) = Priority::parse(value) else {
                    return FieldWrite::Rejected;
                };
                self.priority = priority;
                return FieldWrite::Written { old };
            }
            Field::JobRequest => &mut self.job_request,
            Field::Submitted => &mut self.submitted,
            Field::Submitter => &mut self.submitter,
            Field::SubmitterUrl => &mut self.submitter_url,
            Field::Assigned => &mut self.assigned,
            Field::DueDate => &mut self.due_date,
            Field::EstValue => &mut self.est_value,
        };
        value.clone_into(slot);
        FieldWrite::Written { old }
    }
}

/// Dates in the sheet are plain text shaped `DD-MM-YYYY`.
pub fn format_sheet_date(date: Date) -> String {
    format!(
        "{:02}-{:02}-{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    AllOrders,
    Pending,
    Reviewed,
    Arrived,
}

impl TabKind {
    pub const ALL: [Self; 4] = [Self::AllOrders, Self::Pending, Self::Reviewed, Self::Arrived];

    pub const fn label(self) -> &'static str {
        match self {
            Self::AllOrders => "All Orders",
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Arrived => "Arrived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(normalized))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    Wide,
    Narrow,
}

impl LayoutMode {
    pub const fn for_width(width: u16, narrow_below: u16) -> Self {
        if width < narrow_below {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Wide => "grid",
            Self::Narrow => "cards",
        }
    }
}

/// The rows the sheet opens with.
pub fn seed_records() -> Vec<Record> {
    let row = |id: i64,
               job_request: &str,
               submitted: &str,
               status: TaskStatus,
               submitter: &str,
               submitter_url: &str,
               assigned: &str,
               priority: Priority,
               due_date: &str,
               est_value: &str| Record {
        id: RecordId::new(id),
        job_request: job_request.to_owned(),
        submitted: submitted.to_owned(),
        status,
        submitter: submitter.to_owned(),
        submitter_url: submitter_url.to_owned(),
        assigned: assigned.to_owned(),
        priority,
        due_date: due_date.to_owned(),
        est_value: est_value.to_owned(),
    };

    vec![
        row(
            1,
            "Launch social media campaign for pro...",
            "15-11-2024",
            TaskStatus::InProcess,
            "Alisha Patel",
            "www.alishapatel...",
            "Sophie Choudhury",
            Priority::Medium,
            "20-11-2024",
            "6,200,000 ₹",
        ),
        row(
            2,
            "Update press kit for company redesign",
            "28-10-2024",
            TaskStatus::NeedToStart,
            "Irfan Khan",
            "www.irfankhan...",
            "Tejas Pandey",
            Priority::High,
            "30-10-2024",
            "3,500,000 ₹",
        ),
        row(
            3,
            "Finalize user testing feedback for app...",
            "05-12-2024",
            TaskStatus::InProcess,
            "Mark Johnson",
            "www.markjohns...",
            "Rachel Lee",
            Priority::Medium,
            "10-12-2024",
            "4,750,000 ₹",
        ),
        row(
            4,
            "Design new features for the website",
            "10-01-2025",
            TaskStatus::Complete,
            "Emily Green",
            "www.emilygreen...",
            "Tom Wright",
            Priority::Low,
            "15-01-2025",
            "5,800,000 ₹",
        ),
        row(
            5,
            "Prepare financial report for Q4",
            "25-01-2025",
            TaskStatus::Blocked,
            "Jessica Brown",
            "www.jessicabro...",
            "Kevin Smith",
            Priority::Low,
            "30-01-2025",
            "2,800,000 ₹",
        ),
    ]
}
