//! Outlook mail-message (.msg) metadata extraction.
//!
//! MSG files are OLE/CFB containers with MAPI properties; parsing is
//! delegated to the `msg_parser` crate. This module only surfaces the
//! small metadata record callers care about (subject, addresses, date,
//! body, attachment names), not the full MAPI property set.

use std::path::Path;

use msg_parser::Outlook;
use serde::Serialize;

use crate::error::{ExtractError, Result};

/// Metadata record extracted from one .msg file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MsgMetadata {
    /// Subject line
    pub subject: String,
    /// Sender, formatted as `Name <email>` when a display name exists
    pub from: String,
    /// Primary recipients, one formatted address per entry
    pub to: Vec<String>,
    /// Send date from the transport headers, if present
    pub date: Option<String>,
    /// Plain text body
    pub body: String,
    /// Attachment filenames, in container order
    pub attachments: Vec<String>,
}

/// Extract the metadata record from an MSG file.
///
/// # Errors
///
/// Returns [`ExtractError::Extraction`] if the file is not a valid
/// OLE/CFB message or cannot be parsed.
pub fn extract_msg_metadata<P: AsRef<Path>>(path: P) -> Result<MsgMetadata> {
    let path = path.as_ref();
    let outlook = Outlook::from_path(path).map_err(|e| {
        ExtractError::Extraction(format!("Failed to parse MSG {}: {e}", path.display()))
    })?;

    Ok(outlook_to_metadata(outlook))
}

fn outlook_to_metadata(outlook: Outlook) -> MsgMetadata {
    let from = format_person(&outlook.sender.name, &outlook.sender.email);

    let to = outlook
        .to
        .iter()
        .map(|person| format_person(&person.name, &person.email))
        .collect();

    let date = if outlook.headers.date.is_empty() {
        None
    } else {
        Some(outlook.headers.date)
    };

    // Prefer the long filename, fall back to the display name
    let attachments = outlook
        .attachments
        .iter()
        .map(|att| {
            if att.file_name.is_empty() {
                att.display_name.clone()
            } else {
                att.file_name.clone()
            }
        })
        .collect();

    MsgMetadata {
        subject: outlook.subject,
        from,
        to,
        date,
        body: outlook.body,
        attachments,
    }
}

/// Format as `Name <email>`, or just the email when no name is set.
fn format_person(name: &str, email: &str) -> String {
    if name.is_empty() {
        email.to_string()
    } else {
        format!("{name} <{email}>")
    }
}
