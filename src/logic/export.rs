//! Exporting signups as comma-separated text.

use crate::{
    dal::Store,
    schema::{Signup, SignupError},
};
use log::info;

/// The name the export is delivered under.
pub const EXPORT_FILENAME: &str = "signups.csv";

/// The header row, in column order.
pub const HEADER: [&str; 9] = [
    "MemberID",
    "DisplayName",
    "RoleClass",
    "GearLevel",
    "Availability",
    "Voice",
    "Team",
    "Note",
    "SubmittedAt",
];

/// An export, ready to be sent as a file.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    /// The file name to deliver it under.
    pub filename: &'static str,

    /// The number of signups (data rows) in it.
    pub count: usize,

    /// The UTF-8 text.
    pub bytes: Vec<u8>,
}

/// Replaces commas with full-width commas, so a value can't split its cell.
fn cell(value: &str) -> String {
    value.replace(',', "，")
}

/// Like `cell`, but also flattens line breaks to single spaces.
fn note_cell(value: &str) -> String {
    cell(&value.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

/// Formats signups as comma-separated text: a header row, then one row per signup, in the order
/// given.
pub fn format_csv(signups: &[Signup]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for signup in signups {
        let row = [
            signup.member_id.to_string(),
            cell(&signup.display_name),
            cell(&signup.role_class),
            cell(&signup.gear_level),
            cell(&signup.availability),
            cell(&signup.voice_capability),
            cell(signup.team.as_str()),
            note_cell(&signup.note),
            signup.submitted_at.clone(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Exports the signups of one community, or of every community if `community_id` is `None`.
pub fn export<S: Store>(db: &S, community_id: Option<i64>) -> Result<Export, SignupError> {
    let signups = match community_id {
        Some(community_id) => db.list_signups_by_community(community_id)?,
        None => db.list_all_signups()?,
    };
    info!(
        "Exporting {} signups from {}",
        signups.len(),
        community_id.map_or_else(|| "every community".to_string(), |id| format!("community {}", id))
    );
    Ok(Export {
        filename: EXPORT_FILENAME,
        count: signups.len(),
        bytes: format_csv(&signups).into_bytes(),
    })
}
