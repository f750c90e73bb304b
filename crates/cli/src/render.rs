//! Plain-text rendering of the roster and notifications.

use rollcall_client::ClientConfig;
use rollcall_events::{Notification, NotificationLevel};
use rollcall_view::ViewSnapshot;

/// One line per student: id, name, status, saved/pending markers, remarks.
///
/// A trailing `~` marks rows whose save is still in flight, `*` rows whose
/// local status has not been acknowledged.
pub fn roster_table(snapshot: &ViewSnapshot, photos: Option<&ClientConfig>) -> String {
    let Some(key) = snapshot.key else {
        return "No roster loaded\n".to_string();
    };

    let mut out = format!("{} ({})\n", key.grade.label(), key.date);
    if snapshot.records.is_empty() {
        out.push_str("No students found\n");
        return out;
    }

    for record in &snapshot.records {
        let marker = if snapshot.is_saving(record.student_id) {
            "~"
        } else if record.is_dirty() {
            "*"
        } else {
            " "
        };
        let saved = if record.is_saved() { "saved" } else { "" };

        out.push_str(&format!(
            "{:>6}  {:<24} {:<9}{} {:<6}",
            record.student_id,
            record.student_name,
            record.status.label(),
            marker,
            saved,
        ));
        if record.status.accepts_remarks() && !record.remarks.is_empty() {
            out.push_str(&format!(" {}", record.remarks));
        }
        if let (Some(config), Some(image)) = (photos, record.student_image.as_deref()) {
            out.push_str(&format!(" <{}>", config.media_url(image)));
        }
        out.push('\n');
    }
    out
}

pub fn notification_line(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}
