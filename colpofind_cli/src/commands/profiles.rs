use crate::cli::{Cli, ProfileAction};
use crate::commands::{CommandError, Result};
use crate::output::{format_output, OutputData};
use colpofind_core::profiles::{ProfileStore, DEFAULT_PROFILE};

pub fn run(cli: &Cli, action: ProfileAction) -> Result<()> {
    let store = ProfileStore::new_default();

    let output_data = match action {
        ProfileAction::List => OutputData::ProfileList(store.list_all()?),
        ProfileAction::Show { name } => OutputData::ProfileDetail(store.load(&name)?),
        ProfileAction::Init { name, from } => {
            if store.load_all()?.contains_key(&name) {
                return Err(CommandError::InvalidInput(format!(
                    "user profile '{}' already exists in {}",
                    name,
                    store.path().display()
                )));
            }
            let mut profile = store.load(from.as_deref().unwrap_or(DEFAULT_PROFILE))?;
            profile.name = name.clone();
            store.save(&profile)?;
            OutputData::Message(format!(
                "Created profile '{}' in {}",
                name,
                store.path().display()
            ))
        }
        ProfileAction::Delete { name } => {
            if !store.delete(&name)? {
                return Err(CommandError::InvalidInput(format!(
                    "'{}' is not a user profile",
                    name
                )));
            }
            OutputData::Message(format!("Deleted profile '{}'", name))
        }
        ProfileAction::Path => OutputData::Message(store.path().display().to_string()),
    };

    format_output(&output_data, &cli.output)
}
