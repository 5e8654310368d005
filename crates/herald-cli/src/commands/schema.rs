use schemars::schema_for;
use serde_json::Value;

use herald_core::entities::{Comment, Cycle, Issue, IssueSla, Project, ProjectUpdate};
use herald_core::{ClassifiedResult, RawEnvelope};

use crate::cli::{SchemaArgs, SchemaTarget};

/// Render the `schemars` output for `$ty` as a `serde_json::Value`.
macro_rules! schema_value {
    ($ty:ty) => {
        serde_json::to_value(schema_for!($ty))
    };
}

/// Handle `herald schema`.
pub fn handle(args: &SchemaArgs) -> anyhow::Result<()> {
    let schema = schema_for_target(args.target)?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn schema_for_target(target: SchemaTarget) -> serde_json::Result<Value> {
    match target {
        SchemaTarget::Envelope => schema_value!(RawEnvelope),
        SchemaTarget::Issue => schema_value!(Issue),
        SchemaTarget::Comment => schema_value!(Comment),
        SchemaTarget::Project => schema_value!(Project),
        SchemaTarget::ProjectUpdate => schema_value!(ProjectUpdate),
        SchemaTarget::Cycle => schema_value!(Cycle),
        SchemaTarget::Sla => schema_value!(IssueSla),
        SchemaTarget::Result => schema_value!(ClassifiedResult),
    }
}
