//! The feedback engine: catalog, log and profile owned together.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{CatalogConfig, Config, ConfigPaths, FeedbackConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::feedback::{FeedbackEntry, FeedbackLog, Rating};
use crate::paths::expand_path_template;
use crate::profile::Profile;
use crate::ranking::{self, RankedEntry};

#[derive(Debug, Clone)]
pub struct TrainerOptions {
    pub catalog_path: PathBuf,
    pub feedback_path: PathBuf,
    pub catalog: CatalogConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug)]
pub struct Trainer {
    catalog: Catalog,
    log: FeedbackLog,
    profile: Profile,
    diagnostics: Diagnostics,
}

impl TrainerOptions {
    pub fn new(catalog_path: impl Into<PathBuf>, feedback_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            feedback_path: feedback_path.into(),
            catalog: CatalogConfig::default(),
            feedback: FeedbackConfig::default(),
        }
    }

    pub fn from_config(config: &Config, paths: &ConfigPaths) -> Self {
        Self {
            catalog_path: expand_path_template(&config.storage.catalog_path, paths),
            feedback_path: expand_path_template(&config.storage.feedback_path, paths),
            catalog: config.catalog.clone(),
            feedback: config.feedback.clone(),
        }
    }
}

impl Trainer {
    pub fn open(options: TrainerOptions) -> Result<Self> {
        let mut diagnostics = Diagnostics::new();
        let catalog = Catalog::load(&options.catalog_path, &options.catalog, &mut diagnostics)?;
        Self::assemble(catalog, options.feedback_path, &options.feedback, diagnostics)
    }

    /// Opens with an already built catalog.
    pub fn with_catalog(
        catalog: Catalog,
        feedback_path: impl Into<PathBuf>,
        feedback: &FeedbackConfig,
    ) -> Result<Self> {
        Self::assemble(catalog, feedback_path.into(), feedback, Diagnostics::new())
    }

    fn assemble(
        catalog: Catalog,
        feedback_path: PathBuf,
        feedback: &FeedbackConfig,
        mut diagnostics: Diagnostics,
    ) -> Result<Self> {
        let log = FeedbackLog::load(&feedback_path, feedback.on_corrupt, &mut diagnostics)?;
        let profile = Profile::replay(log.entries(), feedback.keep_empty_notes);
        info!(
            catalog = catalog.len(),
            feedback = log.len(),
            rated = profile.rated_count(),
            "trainer ready"
        );
        Ok(Self {
            catalog,
            log,
            profile,
            diagnostics,
        })
    }

    pub fn list_catalog_ids(&self) -> Vec<&str> {
        self.catalog.ids().collect()
    }

    pub fn get_catalog_entry(&self, product_id: &str) -> Option<&CatalogEntry> {
        self.catalog.lookup(product_id)
    }

    /// Records one rating. The category is the override when given, else the
    /// catalog entry's primary category. Ids missing from the catalog are
    /// still recorded and raise a `DanglingProduct` diagnostic.
    pub fn submit_feedback(
        &mut self,
        product_id: &str,
        rating_label: &str,
        notes: &str,
        category_override: Option<&str>,
    ) -> Result<FeedbackEntry> {
        let rating = Rating::from_label(rating_label);
        let known = self.catalog.lookup(product_id);
        if known.is_none() {
            self.diagnostics.record(
                DiagnosticKind::DanglingProduct,
                format!("{product_id} is not in the catalog; recording feedback anyway"),
            );
        }
        let category = category_override
            .map(str::to_string)
            .or_else(|| known.map(|entry| entry.category.clone()));

        let entry = FeedbackEntry::new(product_id, rating, notes, category);
        self.log.append(entry.clone())?;
        self.profile.update(&entry);
        debug!(product_id, %rating, category = ?entry.category, "feedback recorded");
        Ok(entry)
    }

    pub fn get_top_n(&self, n: usize) -> Vec<RankedEntry> {
        ranking::top_n(&self.profile, &self.catalog, n)
    }

    pub fn get_notes_for_category(&self, category: &str) -> &[String] {
        self.profile.notes_for(category)
    }

    pub fn search_catalog(&self, query: &str, category: Option<&str>, limit: usize) -> Vec<&CatalogEntry> {
        self.catalog.search(query, category, limit)
    }

    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    pub fn score(&self, product_id: &str) -> u32 {
        self.profile.score(product_id)
    }

    pub fn feedback(&self) -> &[FeedbackEntry] {
        self.log.entries()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn feedback_path(&self) -> &std::path::Path {
        self.log.path()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.drain()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::config::CorruptPolicy;
    use crate::error::TrainerError;

    fn ale_catalog() -> Catalog {
        let mut diagnostics = Diagnostics::new();
        Catalog::from_entries(vec![CatalogEntry::new("b1", "IPA", "Ale")], &mut diagnostics)
    }

    fn open(dir: &Path, catalog: Catalog) -> Trainer {
        Trainer::with_catalog(catalog, dir.join("user_feedback.json"), &FeedbackConfig::default()).unwrap()
    }

    #[test]
    fn test_scenario_two_ratings_on_one_beer() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());

        trainer.submit_feedback("b1", "good", "juicy", None).unwrap();
        trainer.submit_feedback("b1", "neutral", "ok", None).unwrap();

        assert_eq!(trainer.score("b1"), 3);
        assert_eq!(trainer.get_notes_for_category("Ale"), ["juicy", "ok"]);
        let top = trainer.get_top_n(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product_id, "b1");
        assert_eq!(top[0].score, 3);
        assert_eq!(top[0].display.name, "IPA");
        assert_eq!(top[0].display.category, "Ale");
        assert!(trainer.diagnostics().is_empty());
    }

    #[test]
    fn test_scenario_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), Catalog::empty());

        let entry = trainer.submit_feedback("x", "bad", "meh", None).unwrap();
        assert_eq!(entry.category, None);
        assert_eq!(trainer.score("x"), 0);

        let top = trainer.get_top_n(1);
        assert_eq!(top[0].product_id, "x");
        assert_eq!(top[0].score, 0);
        assert_eq!(top[0].display.name, "");
        assert_eq!(top[0].display.price, "");
        assert_eq!(trainer.diagnostics().count(DiagnosticKind::DanglingProduct), 1);
    }

    #[test]
    fn test_open_with_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = Trainer::open(TrainerOptions::new(
            dir.path().join("beer_data.xlsx"),
            dir.path().join("user_feedback.json"),
        ))
        .unwrap();

        assert!(trainer.list_catalog_ids().is_empty());
        assert!(trainer.get_catalog_entry("b1").is_none());
        assert!(trainer.feedback().is_empty());
        assert_eq!(trainer.diagnostics().count(DiagnosticKind::MissingSource), 2);
    }

    #[test]
    fn test_open_from_csv_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("beers.csv");
        fs::write(
            &catalog_path,
            "beer_id,name_jp,style_main_jp,price\nb1,IPA,Ale,900\nb2,Stout,Stout,800\n",
        )
        .unwrap();
        let mut trainer = Trainer::open(TrainerOptions::new(
            &catalog_path,
            dir.path().join("user_feedback.json"),
        ))
        .unwrap();

        assert_eq!(trainer.list_catalog_ids(), vec!["b1", "b2"]);
        assert_eq!(trainer.categories(), vec!["Ale", "Stout"]);
        trainer.submit_feedback("b2", "good", "roasty", None).unwrap();
        assert_eq!(trainer.get_top_n(5)[0].display.price, "800");
        assert_eq!(trainer.get_notes_for_category("Stout"), ["roasty"]);
    }

    #[test]
    fn test_category_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());

        let entry = trainer
            .submit_feedback("b1", "good", "hazy and soft", Some("Hazy IPA"))
            .unwrap();
        assert_eq!(entry.category.as_deref(), Some("Hazy IPA"));
        assert_eq!(trainer.get_notes_for_category("Hazy IPA"), ["hazy and soft"]);
        assert!(trainer.get_notes_for_category("Ale").is_empty());
    }

    #[test]
    fn test_dangling_id_with_override_collects_notes() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());

        trainer.submit_feedback("beer_002", "普通", "少し苦味が強い", Some("Stout")).unwrap();
        assert_eq!(trainer.get_notes_for_category("Stout"), ["少し苦味が強い"]);
        assert_eq!(trainer.score("beer_002"), 1);
    }

    #[test]
    fn test_unknown_label_counts_as_neutral() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());

        trainer.submit_feedback("b1", "neutral", "", None).unwrap();
        let after_neutral = trainer.score("b1");
        trainer.submit_feedback("b1", "fantastic", "", None).unwrap();
        assert_eq!(trainer.score("b1") - after_neutral, 1);
        assert_eq!(trainer.feedback()[1].rating, Rating::Neutral);
    }

    #[test]
    fn test_score_monotonicity() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());

        let labels = ["bad", "good", "neutral", "bad", "good", "bad"];
        let mut previous = 0;
        for label in labels {
            trainer.submit_feedback("b1", label, "", None).unwrap();
            let current = trainer.score("b1");
            match label {
                "bad" => assert_eq!(current, previous),
                _ => assert!(current > previous),
            }
            previous = current;
        }
    }

    #[test]
    fn test_top_n_bound() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = open(dir.path(), ale_catalog());
        for id in ["b1", "b2", "b1", "b3"] {
            trainer.submit_feedback(id, "good", "", None).unwrap();
        }
        assert_eq!(trainer.get_top_n(2).len(), 2);
        assert_eq!(trainer.get_top_n(100).len(), 3);
        assert!(trainer.get_top_n(0).is_empty());
    }

    #[test]
    fn test_resume_matches_single_pass() {
        let dir = tempfile::tempdir().unwrap();
        let submissions = [
            ("b1", "good", "juicy", None),
            ("b2", "bad", "flat", Some("Lager")),
            ("b1", "neutral", "", None),
            ("b3", "good", "bright", Some("Lager")),
            ("b1", "bad", "tired", None),
        ];

        let first = dir.path().join("first");
        {
            let mut trainer = open(&first, ale_catalog());
            for (id, label, notes, category) in &submissions[..2] {
                trainer.submit_feedback(id, label, notes, *category).unwrap();
            }
        }
        let mut resumed = open(&first, ale_catalog());
        assert_eq!(resumed.feedback().len(), 2);
        for (id, label, notes, category) in &submissions[2..] {
            resumed.submit_feedback(id, label, notes, *category).unwrap();
        }

        let mut single = open(&dir.path().join("second"), ale_catalog());
        for (id, label, notes, category) in &submissions {
            single.submit_feedback(id, label, notes, *category).unwrap();
        }

        assert_eq!(resumed.profile(), single.profile());
        assert_eq!(resumed.feedback(), single.feedback());
        assert_eq!(resumed.get_top_n(10), single.get_top_n(10));

        let reopened = open(&first, ale_catalog());
        assert_eq!(reopened.profile(), single.profile());
    }

    #[test]
    fn test_failed_persist_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut trainer = Trainer::with_catalog(
            ale_catalog(),
            blocker.join("user_feedback.json"),
            &FeedbackConfig::default(),
        )
        .unwrap();

        assert!(trainer.submit_feedback("b1", "good", "juicy", None).is_err());
        assert!(trainer.feedback().is_empty());
        assert_eq!(trainer.score("b1"), 0);
        assert!(trainer.get_top_n(5).is_empty());
    }

    #[test]
    fn test_corrupt_log_policies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_feedback.json");

        fs::write(&path, "not json").unwrap();
        let strict = FeedbackConfig {
            keep_empty_notes: false,
            on_corrupt: CorruptPolicy::Fail,
        };
        let err = Trainer::with_catalog(ale_catalog(), &path, &strict).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrainerError>(),
            Some(TrainerError::CorruptLog { .. })
        ));

        let mut trainer = Trainer::with_catalog(ale_catalog(), &path, &FeedbackConfig::default()).unwrap();
        assert!(trainer.feedback().is_empty());
        let drained = trainer.drain_diagnostics();
        assert!(drained.iter().any(|d| d.kind == DiagnosticKind::QuarantinedLog));
        assert!(trainer.diagnostics().is_empty());

        trainer.submit_feedback("b1", "good", "fresh start", None).unwrap();
        assert_eq!(open(dir.path(), ale_catalog()).feedback().len(), 1);
    }

    #[test]
    fn test_options_from_config() {
        let paths = ConfigPaths::rooted_at(Path::new("/srv/beer"));
        let mut config = Config::default_config();
        config.storage.catalog_path = "${CONFIG_DIR}/beers.csv".to_string();
        let options = TrainerOptions::from_config(&config, &paths);

        assert_eq!(options.catalog_path, Path::new("/srv/beer/beers.csv"));
        assert_eq!(options.feedback_path, Path::new("/srv/beer/user_feedback.json"));
    }
}
