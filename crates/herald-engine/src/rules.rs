//! Ordered update rules.
//!
//! Every entity that reacts to `update` events declares a `&'static [Rule<E>]`
//! table. The table is walked top to bottom and the first rule whose `when`
//! holds produces the notification; later rules are not consulted. An update
//! that matches nothing is reported as [`ClassifyError::IgnoredChange`].

use chrono::{DateTime, Utc};
use herald_core::entities::Entity;
use herald_core::{ClassifiedResult, ClassifierSettings, ClassifyError, Envelope};

/// Everything a rule may look at for one `update` event.
#[derive(Debug)]
pub struct Update<'a, E: Entity> {
    /// Current snapshot.
    pub data: &'a E,
    /// Previous values of the changed fields.
    pub changes: &'a E::Changes,
    pub url: &'a str,
    /// Reference instant for relative date rendering.
    pub reference: Option<DateTime<Utc>>,
    pub settings: &'a ClassifierSettings,
}

impl<'a, E: Entity> Update<'a, E> {
    /// # Errors
    ///
    /// Returns [`ClassifyError::MissingDiffData`] when the envelope carries
    /// no `updatedFrom`.
    pub fn from_envelope(
        envelope: &'a Envelope<E>,
        settings: &'a ClassifierSettings,
    ) -> Result<Self, ClassifyError> {
        Ok(Self {
            data: &envelope.data,
            changes: envelope.changes()?,
            url: &envelope.url,
            reference: envelope.reference_time(),
            settings,
        })
    }
}

/// A named `(when, then)` pair.
pub struct Rule<E: Entity> {
    pub name: &'static str,
    pub when: fn(&Update<'_, E>) -> bool,
    pub then: fn(&Update<'_, E>) -> ClassifiedResult,
}

impl<E: Entity> std::fmt::Debug for Rule<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// The first rule in `rules` whose condition holds.
#[must_use]
pub fn first_match<'r, E: Entity>(rules: &'r [Rule<E>], update: &Update<'_, E>) -> Option<&'r Rule<E>> {
    rules.iter().find(|rule| (rule.when)(update))
}

/// Run the first matching rule.
///
/// # Errors
///
/// Returns [`ClassifyError::IgnoredChange`] when no rule matches.
pub fn apply<E: Entity>(
    rules: &[Rule<E>],
    update: &Update<'_, E>,
) -> Result<ClassifiedResult, ClassifyError> {
    let rule = first_match(rules, update).ok_or(ClassifyError::IgnoredChange { entity: E::TYPE })?;
    tracing::debug!(entity = %E::TYPE, rule = rule.name, "update rule matched");
    Ok((rule.then)(update))
}
