//! Comment events. Comments never carry a meaningful diff, so updates are
//! reported without consulting `updatedFrom`.

use herald_core::entities::Comment;
use herald_core::{Action, ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::{blockquote, display_name, identifier, truncate};

/// # Errors
///
/// `UnsupportedAction` for anything but create, update, or remove.
pub fn classify(
    envelope: &Envelope<Comment>,
    settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    let comment = &envelope.data;
    let author = display_name(Some(&comment.user));
    let target = format!(
        "[{} {}]({})",
        identifier(&comment.issue.team.key, comment.issue.number),
        comment.issue.title,
        envelope.url
    );

    let result = match envelope.action()? {
        Action::Create => {
            let preview = truncate(&comment.body, settings.comment_preview_chars);
            ClassifiedResult::notify(
                format!(
                    "💬 **{author}** commented on {target}\n\n{}",
                    blockquote(&preview)
                ),
                Priority::Medium,
            )
        }
        Action::Update => ClassifiedResult::notify(
            format!("📝 **{author}** updated their comment on {target}"),
            Priority::Low,
        ),
        Action::Remove => ClassifiedResult::notify(
            format!("🗑️ **{author}** deleted their comment on {target}"),
            Priority::Low,
        ),
    };
    Ok(result)
}
