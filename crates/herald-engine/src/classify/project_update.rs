//! Project update (status post) events.

use herald_core::entities::ProjectUpdate;
use herald_core::enums::ProjectHealth;
use herald_core::{Action, ClassifiedResult, ClassifierSettings, ClassifyError, Envelope, Priority};

use crate::format::{blockquote, display_name, health_line, project_link, truncate};

/// # Errors
///
/// `UnsupportedAction` for anything but create, update, or remove.
pub fn classify(
    envelope: &Envelope<ProjectUpdate>,
    settings: &ClassifierSettings,
) -> Result<ClassifiedResult, ClassifyError> {
    let post = &envelope.data;
    let author = display_name(Some(&post.user));
    let link = project_link(&post.project.name, &envelope.url);

    let result = match envelope.action()? {
        Action::Create => {
            let (icon, priority) = match post.health {
                ProjectHealth::OffTrack => ("🚨", Priority::High),
                ProjectHealth::AtRisk => ("⚠️", Priority::Medium),
                ProjectHealth::OnTrack | ProjectHealth::Unknown => ("📝", Priority::Medium),
            };
            let preview = truncate(&post.body, settings.project_update_preview_chars);
            ClassifiedResult::notify(
                format!(
                    "{icon} **Project Update**\n{link}\n*by {author}* • {}\n\n{}",
                    health_line(post.health),
                    blockquote(&preview)
                ),
                priority,
            )
        }
        Action::Update => ClassifiedResult::notify(
            format!("📝 **{author}** updated their project update for {link}"),
            Priority::Low,
        ),
        Action::Remove => ClassifiedResult::notify(
            format!("🗑️ **{author}** deleted their project update for {link}"),
            Priority::Low,
        ),
    };
    Ok(result)
}
