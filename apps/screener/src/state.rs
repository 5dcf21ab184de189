use tracing::{info, warn};

use crate::config::Config;
use crate::errors::ScreenerResult;
use crate::fields::SkillSynonyms;
use crate::history::HistoryStore;
use crate::training::bundle::ModelBundle;

/// Everything a command needs, built once at startup and passed by reference.
pub struct AppState {
    pub config: Config,
    pub synonyms: SkillSynonyms,
    /// `None` when no model has been trained or the artifacts fail to load.
    pub model: Option<ModelBundle>,
    pub history: HistoryStore,
}

impl AppState {
    pub fn load(config: Config) -> ScreenerResult<Self> {
        let synonyms = SkillSynonyms::load(config.synonyms_path.as_deref())?;
        info!("Synonym table ready ({} skills)", synonyms.skill_count());

        let model = match ModelBundle::load(&config.models_dir) {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Ignoring unusable model artifacts: {e}");
                None
            }
        };

        let history = HistoryStore::new(config.history_path());

        Ok(Self {
            config,
            synonyms,
            model,
            history,
        })
    }
}
