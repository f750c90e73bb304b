//! Command-line arguments and command dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use rollcall_core::attendance::AttendanceStatus;
use rollcall_core::grades::Grade;
use rollcall_core::types::StudentId;
use rollcall_view::{AttendanceView, ViewError};

#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(about = "Mark and save daily class attendance")]
#[command(version)]
pub struct Cli {
    /// Class code or label, e.g. `Nursery`, `7`, `1st Year`
    #[arg(short, long, default_value = "Nursery")]
    pub grade: Grade,

    /// Attendance date (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the roster
    Show {
        /// Include photo URLs
        #[arg(long)]
        photos: bool,
    },
    /// Set one student's status and save it
    Set {
        student_id: StudentId,
        status: AttendanceStatus,
    },
    /// Set one student's remarks and save them
    Remark {
        student_id: StudentId,
        text: String,
        /// Pick `text` from the canned remarks list
        #[arg(long)]
        canned: bool,
    },
    /// Mark every unmarked student (`none` resets the roster locally)
    MarkAll { status: AttendanceStatus },
    /// Save the whole roster
    SaveAll,
}

/// Load the roster and apply `command` to it.
///
/// Silent saves started here may still be in flight on return; callers
/// wait on [`AttendanceView::wait_idle`] before exiting.
pub async fn execute(
    view: &AttendanceView,
    grade: Grade,
    date: NaiveDate,
    command: &Command,
) -> Result<(), ViewError> {
    view.load(grade, date).await?;

    match command {
        Command::Show { .. } => {}
        Command::Set { student_id, status } => {
            if !view.set_status(*student_id, *status).await? {
                tracing::info!(student_id, status = %status, "Status unchanged, nothing to save");
            }
        }
        Command::Remark {
            student_id,
            text,
            canned,
        } => {
            if *canned {
                view.select_remark(*student_id, text).await?;
            } else {
                view.set_remarks(*student_id, text.clone()).await?;
                view.commit_remarks(*student_id).await?;
            }
        }
        Command::MarkAll { status } => {
            view.mark_all(*status).await?;
        }
        Command::SaveAll => {
            view.save_all().await?;
        }
    }

    Ok(())
}
