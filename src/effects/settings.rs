//! Settings effect: every settings change writes the whole slice.

use crate::effects::env::StorageEnv;
use crate::effects::registration::{persist, EffectRegistration};
use crate::slices::{SettingsAction, SETTINGS_KEY};

pub fn settings_effects<Env>() -> Vec<EffectRegistration<Env>>
where
    Env: StorageEnv + Clone + Send + Sync + 'static,
{
    vec![EffectRegistration::silent(
        "settings.persist",
        SettingsAction::TAGS,
        |_, state| persist(SETTINGS_KEY, state.settings.clone()),
    )]
}
