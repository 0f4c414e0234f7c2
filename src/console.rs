//! Terminal view layer: confirmation prompts and plain-text rendering.

use async_trait::async_trait;
use std::fmt::Write as _;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::attendance::{ActionPrompt, StatusView};
use crate::model::attendance::{AttendanceHistoryEntry, HistorySummary};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveBalance, LeaveRequest, LeaveType};
use crate::model::permission::PermissionRequest;
use crate::utils::display::truncate;
use crate::utils::time::format_wall_time;

pub const WORKING_HOURS: &str = "10:00 AM – 6:00 PM";

/// Asks on stdin; `assume_yes` answers every confirmation with yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt {
    pub assume_yes: bool,
}

impl TerminalPrompt {
    async fn ask(&self, question: &str) -> Option<String> {
        let mut out = tokio::io::stdout();
        out.write_all(question.as_bytes()).await.ok()?;
        out.flush().await.ok()?;
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .ok()?;
        Some(line)
    }
}

#[async_trait]
impl ActionPrompt for TerminalPrompt {
    async fn acknowledge_check_in_closed(&self, current_time: &str, cutoff: &str) {
        println!("❌ Check-In Closed");
        println!("Check-In is not allowed after {cutoff}.");
        println!("Current Time: {current_time}");
        if !self.assume_yes {
            let _ = self.ask("Press Enter to close ").await;
        }
    }

    async fn confirm_check_out(&self, current_time: &str) -> bool {
        println!("Confirm Check-Out");
        println!("Time: {current_time}");
        if self.assume_yes {
            return true;
        }
        match self.ask("Are you sure you want to check out now? [y/N] ").await {
            Some(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}

pub fn render_today(view: &StatusView, employee: Option<&Employee>) -> String {
    let fallback = Employee::default();
    let employee = employee.unwrap_or(&fallback);
    let mut out = String::new();
    let _ = writeln!(out, "Name: {}", employee.display_name());
    let _ = writeln!(out, "Email: {}", employee.display_email());
    let _ = writeln!(out, "Working Hours: {WORKING_HOURS}");
    let _ = writeln!(out, "[{}] {}", view.tone, view.message);
    out
}

pub fn render_history(entries: &[AttendanceHistoryEntry], summary: &HistorySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Present: {}  Late: {}  Absent: {}",
        summary.present, summary.late, summary.absent
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{}  {:>8}  {:>8}  {:<8}  {}",
            e.date,
            format_wall_time(e.check_in.as_ref()),
            format_wall_time(e.check_out.as_ref()),
            e.status.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            e.remarks.as_deref().filter(|r| !r.is_empty()).unwrap_or("-"),
        );
    }
    out
}

pub fn render_leave_types(types: &[LeaveType]) -> String {
    types
        .iter()
        .map(|t| format!("{:>4}  {}\n", t.id, t.name))
        .collect()
}

pub fn render_balance(balance: &[LeaveBalance]) -> String {
    if balance.is_empty() {
        return "No leave balance available.\n".to_string();
    }
    balance
        .iter()
        .map(|b| {
            format!(
                "{}\n  Total: {}  Available: {}  Used: {}  Pending: {}\n",
                b.leave_type, b.total_allowed, b.available, b.used, b.pending
            )
        })
        .collect()
}

/// Leave table; `reason_width` is 50 for one's own list and 80 for the approval queue.
pub fn render_leaves(leaves: &[LeaveRequest], reason_width: usize) -> String {
    if leaves.is_empty() {
        return "No leave requests found.\n".to_string();
    }
    let mut out = String::new();
    for l in leaves {
        let who = match (&l.employee_name, &l.employee_id) {
            (Some(name), Some(id)) => format!("{name} ({id})  "),
            (Some(name), None) => format!("{name}  "),
            _ => String::new(),
        };
        let days = l
            .total_days
            .map(|d| format!("{d} days"))
            .unwrap_or_default();
        let _ = write!(
            out,
            "#{}  {who}{}  {} to {}  {days}  {}  {}",
            l.id,
            l.leave_type_name,
            l.start_date,
            l.end_date,
            truncate(&l.reason, reason_width),
            l.status,
        );
        if let Some(note) = l.decision_note() {
            let _ = write!(out, " ({note})");
        }
        out.push('\n');
    }
    out
}

pub fn render_permissions(items: &[PermissionRequest]) -> String {
    if items.is_empty() {
        return "No permission requests found.\n".to_string();
    }
    items
        .iter()
        .map(|p| {
            format!(
                "{}  {} - {}  {}  {}\n",
                p.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                format_wall_time(p.start_time.as_ref()),
                format_wall_time(p.end_time.as_ref()),
                p.status.as_deref().unwrap_or("-"),
                truncate(&p.reason, 50),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{DerivedStatus, StatusTone};
    use serde_json::json;

    #[test]
    fn today_shows_placeholders_without_employee() {
        let view = StatusView {
            status: DerivedStatus::NoActionYet,
            message: "No action yet".into(),
            tone: StatusTone::Neutral,
        };
        let text = render_today(&view, None);
        assert!(text.contains("Name: —"));
        assert!(text.contains("[neutral] No action yet"));
    }

    #[test]
    fn leave_rows_truncate_reason_and_show_decision() {
        let leaves: Vec<LeaveRequest> = serde_json::from_value(json!([{
            "id": 9,
            "leave_type_name": "Casual Leave",
            "start_date": "2024-06-10",
            "end_date": "2024-06-11",
            "total_days": 2,
            "reason": "x".repeat(60),
            "status": "Rejected",
            "rejection_reason": "Quarter close"
        }]))
        .unwrap();
        let text = render_leaves(&leaves, 50);
        assert!(text.contains(&format!("{}...", "x".repeat(50))));
        assert!(text.contains("Rejected (Quarter close)"));
        assert!(text.starts_with("#9"));
    }
}
