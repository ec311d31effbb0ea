// SPDX-License-Identifier: MPL-2.0
//! The translator: one active bundle, loaded with a single fallback step.
//!
//! A [`Translator`] is owned by the caller's application context and shared
//! by reference (or `Arc`) with whatever needs translations. Loads may
//! overlap; each one draws a generation number when it starts and a result
//! older than the committed generation is dropped.

use super::binding::{self, Binding, BindingTarget};
use super::language::{self, LanguageCode, SupportedLanguages};
use super::page::Page;
use super::preference::PreferenceStore;
use super::source::BundleSource;
use super::tree::TranslationTree;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

/// Capacity of the change notification channel.
const EVENT_CAPACITY: usize = 16;

/// Broadcast after a successful language switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub language: LanguageCode,
}

#[derive(Debug, Default)]
struct Active {
    language: Option<LanguageCode>,
    tree: Arc<TranslationTree>,
    generation: u64,
}

pub struct Translator {
    languages: SupportedLanguages,
    source: Arc<dyn BundleSource>,
    preferences: Arc<dyn PreferenceStore>,
    environment_locale: Option<String>,
    active: RwLock<Active>,
    next_generation: AtomicU64,
    events: broadcast::Sender<LanguageChanged>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("languages", &self.languages)
            .field("environment_locale", &self.environment_locale)
            .field("current_language", &self.current_language())
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Creates a translator with nothing loaded yet.
    ///
    /// The environment locale is taken from the operating system; use
    /// [`Translator::with_environment_locale`] to override it.
    pub fn new(
        languages: SupportedLanguages,
        source: Arc<dyn BundleSource>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            languages,
            source,
            preferences,
            environment_locale: language::system_locale(),
            active: RwLock::new(Active::default()),
            next_generation: AtomicU64::new(0),
            events,
        }
    }

    #[must_use]
    pub fn with_environment_locale(mut self, locale: Option<String>) -> Self {
        self.environment_locale = locale;
        self
    }

    #[must_use]
    pub fn languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    /// Language of the active bundle, `None` until the first successful load.
    #[must_use]
    pub fn current_language(&self) -> Option<LanguageCode> {
        self.read_active().language.clone()
    }

    /// Snapshot of the active bundle.
    #[must_use]
    pub fn tree(&self) -> Arc<TranslationTree> {
        Arc::clone(&self.read_active().tree)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.events.subscribe()
    }

    /// Picks the starting language: persisted choice, environment, default.
    #[must_use]
    pub fn detect(&self) -> LanguageCode {
        let persisted = match self.preferences.load() {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(error = %err, "could not read language preference");
                None
            }
        };
        self.languages
            .detect(persisted.as_deref(), self.environment_locale.as_deref())
    }

    /// Resolves `key` against the active bundle, falling back to the key.
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        let active = self.read_active();
        match active.tree.lookup(key) {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(key, "translation key not found");
                key.to_string()
            }
        }
    }

    /// Loads the bundle for `requested`, falling back to the default once.
    ///
    /// Unsupported codes are coerced to the default before fetching. On
    /// success the bundle replaces the active one and the language is
    /// persisted. Returns the language that was activated.
    ///
    /// # Errors
    ///
    /// Returns the last load error if both the requested and the default
    /// bundle fail, or [`Error::Superseded`] if a newer load committed
    /// first. The active bundle is unchanged in both cases.
    pub async fn load(&self, requested: &str) -> Result<LanguageCode> {
        let language = self.languages.coerce(requested);
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let fetched = self.source.fetch(&language).await;
        let (language, tree) = match fetched {
            Ok(tree) => (language, tree),
            Err(err) => {
                tracing::error!(language = %language, error = %err, "failed to load bundle");
                let default = self.languages.default_language();
                if language == *default {
                    return Err(err);
                }
                tracing::warn!(fallback = %default, "retrying with default language");
                match self.source.fetch(default).await {
                    Ok(tree) => (default.clone(), tree),
                    Err(err) => {
                        tracing::error!(language = %default, error = %err, "failed to load bundle");
                        return Err(err);
                    }
                }
            }
        };

        self.commit(generation, &language, tree)?;
        Ok(language)
    }

    /// Switches to `requested` and notifies subscribers.
    ///
    /// Returns `Ok(None)` without loading when the (coerced) language is
    /// already active.
    ///
    /// # Errors
    ///
    /// Propagates [`Translator::load`] failures; no event is sent then.
    pub async fn change_language(&self, requested: &str) -> Result<Option<LanguageCode>> {
        let target = self.languages.coerce(requested);
        if self.current_language().as_ref() == Some(&target) {
            return Ok(None);
        }

        let activated = self.load(target.as_str()).await?;
        // No subscribers is not an error.
        let _ = self.events.send(LanguageChanged {
            language: activated.clone(),
        });
        Ok(Some(activated))
    }

    /// Detects the starting language and loads it.
    ///
    /// # Errors
    ///
    /// See [`Translator::load`].
    pub async fn init(&self) -> Result<LanguageCode> {
        let detected = self.detect();
        self.load(detected.as_str()).await
    }

    /// Writes the active bundle into caller-supplied bindings.
    pub fn apply<T: BindingTarget>(&self, bindings: &mut [Binding<T>]) {
        binding::apply(&self.tree(), bindings);
    }

    /// Localizes every marked element of `page` and highlights the active
    /// language toggle.
    pub fn localize(&self, page: &mut Page) {
        let (tree, language) = {
            let active = self.read_active();
            (
                Arc::clone(&active.tree),
                active
                    .language
                    .clone()
                    .unwrap_or_else(|| self.languages.default_language().clone()),
            )
        };
        page.localize(&tree, &language);
    }

    fn commit(&self, generation: u64, language: &LanguageCode, tree: TranslationTree) -> Result<()> {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if generation < active.generation {
            tracing::debug!(
                language = %language,
                generation,
                committed = active.generation,
                "discarding stale bundle"
            );
            return Err(Error::Superseded);
        }
        *active = Active {
            language: Some(language.clone()),
            tree: Arc::new(tree),
            generation,
        };
        tracing::debug!(language = %language, generation, "bundle activated");

        // Saved under the write guard so a stale load cannot persist after a newer one.
        if let Err(err) = self.preferences.save(language.as_str()) {
            tracing::warn!(language = %language, error = %err, "could not persist language preference");
        }
        Ok(())
    }

    fn read_active(&self) -> std::sync::RwLockReadGuard<'_, Active> {
        self.active.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::i18n::binding::ApplyMode;
    use crate::i18n::preference::MemoryStore;
    use crate::i18n::source::MemorySource;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    fn german() -> TranslationTree {
        TranslationTree::from_value(json!({"nav": {"home": "Startseite"}, "title": "Hochzeit"}))
            .expect("object root")
    }

    fn polish() -> TranslationTree {
        TranslationTree::from_value(json!({"nav": {"home": "Strona główna"}, "title": "Ślub"}))
            .expect("object root")
    }

    fn translator(source: MemorySource, store: Arc<MemoryStore>) -> Translator {
        Translator::new(SupportedLanguages::default(), Arc::new(source), store)
            .with_environment_locale(None)
    }

    fn both() -> MemorySource {
        MemorySource::new()
            .with_bundle("de", german())
            .with_bundle("pl", polish())
    }

    #[tokio::test]
    async fn load_activates_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let t = translator(both(), Arc::clone(&store));

        let activated = t.load("pl").await.expect("load");

        assert_eq!(activated, "pl");
        assert_eq!(t.current_language(), Some(activated));
        assert_eq!(t.translate("nav.home"), "Strona główna");
        assert_eq!(store.load().expect("store").as_deref(), Some("pl"));
    }

    #[tokio::test]
    async fn load_unsupported_behaves_like_default() {
        let store = Arc::new(MemoryStore::new());
        let t = translator(both(), Arc::clone(&store));

        let activated = t.load("fr").await.expect("load");

        assert_eq!(activated, "de");
        assert_eq!(*t.tree(), german());
        assert_eq!(store.load().expect("store").as_deref(), Some("de"));
    }

    #[tokio::test]
    async fn failed_load_falls_back_to_default() {
        let store = Arc::new(MemoryStore::with_language("pl"));
        let t = translator(MemorySource::new().with_bundle("de", german()), Arc::clone(&store));

        let activated = t.load("pl").await.expect("fallback");

        assert_eq!(activated, "de");
        assert_eq!(t.translate("title"), "Hochzeit");
        assert_eq!(store.load().expect("store").as_deref(), Some("de"));
    }

    #[tokio::test]
    async fn failed_default_keeps_previous_bundle() {
        let store = Arc::new(MemoryStore::new());
        let t = translator(MemorySource::new().with_bundle("pl", polish()), Arc::clone(&store));
        t.load("pl").await.expect("initial load");

        let result = t.load("de").await;

        assert!(matches!(result, Err(Error::Load(LoadError::NotFound(_)))));
        assert_eq!(t.current_language().as_ref().map(LanguageCode::as_str), Some("pl"));
        assert_eq!(t.translate("title"), "Ślub");
        assert_eq!(store.load().expect("store").as_deref(), Some("pl"));
    }

    #[tokio::test]
    async fn nothing_loaded_translates_to_keys() {
        let t = translator(MemorySource::new(), Arc::new(MemoryStore::new()));
        assert!(t.load("pl").await.is_err());
        assert_eq!(t.current_language(), None);
        assert_eq!(t.translate("nav.home"), "nav.home");
    }

    #[tokio::test]
    async fn detect_uses_store_then_environment() {
        let store = Arc::new(MemoryStore::with_language("pl"));
        let t = translator(both(), Arc::clone(&store))
            .with_environment_locale(Some("de-DE".to_string()));
        assert_eq!(t.detect(), "pl");

        let t = translator(both(), Arc::new(MemoryStore::new()))
            .with_environment_locale(Some("pl-PL".to_string()));
        assert_eq!(t.detect(), "pl");

        let t = translator(both(), Arc::new(MemoryStore::new()))
            .with_environment_locale(Some("fr-FR".to_string()));
        assert_eq!(t.detect(), "de");
    }

    #[tokio::test]
    async fn init_loads_detected_language() {
        let t = translator(both(), Arc::new(MemoryStore::with_language("pl")));
        assert_eq!(t.init().await.expect("init"), "pl");
        assert_eq!(t.translate("title"), "Ślub");
    }

    #[tokio::test]
    async fn change_language_notifies_subscribers() {
        let t = translator(both(), Arc::new(MemoryStore::new()));
        t.load("de").await.expect("initial load");
        let mut events = t.subscribe();

        let changed = t.change_language("pl").await.expect("change");

        assert_eq!(changed.as_ref().map(LanguageCode::as_str), Some("pl"));
        let event = events.try_recv().expect("event");
        assert_eq!(event.language, "pl");
    }

    #[tokio::test]
    async fn change_to_active_language_is_noop() {
        let t = translator(both(), Arc::new(MemoryStore::new()));
        t.load("de").await.expect("initial load");
        let mut events = t.subscribe();

        assert_eq!(t.change_language("de").await.expect("change"), None);
        assert_eq!(t.change_language("xx").await.expect("change"), None);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn apply_uses_active_bundle() {
        let t = translator(both(), Arc::new(MemoryStore::new()));
        t.load("pl").await.expect("load");

        let mut bindings = vec![Binding::new(
            "title",
            ApplyMode::Text,
            crate::i18n::page::Element::new("h1"),
        )];
        t.apply(&mut bindings);

        assert_eq!(bindings[0].target.text(), Some("Ślub"));
    }

    /// Holds back the Polish bundle until released.
    struct GatedSource {
        gate: Arc<Notify>,
        inner: MemorySource,
    }

    #[async_trait]
    impl BundleSource for GatedSource {
        async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
            if language == "pl" {
                self.gate.notified().await;
            }
            self.inner.fetch(language).await
        }
    }

    #[tokio::test]
    async fn stale_load_does_not_overwrite_newer_one() {
        let gate = Arc::new(Notify::new());
        let source = GatedSource {
            gate: Arc::clone(&gate),
            inner: both(),
        };
        let store = Arc::new(MemoryStore::new());
        let t = Translator::new(SupportedLanguages::default(), Arc::new(source), store.clone())
            .with_environment_locale(None);

        let (slow, fast) = tokio::join!(t.load("pl"), async {
            let result = t.load("de").await;
            gate.notify_one();
            result
        });

        assert!(matches!(slow, Err(Error::Superseded)));
        assert_eq!(fast.expect("fast load"), "de");
        assert_eq!(t.current_language().as_ref().map(LanguageCode::as_str), Some("de"));
        assert_eq!(t.translate("title"), "Hochzeit");
        assert_eq!(store.load().expect("store").as_deref(), Some("de"));
    }

    /// Fails every fetch once switched off.
    struct SwitchableSource {
        offline: std::sync::atomic::AtomicBool,
        inner: MemorySource,
    }

    #[async_trait]
    impl BundleSource for SwitchableSource {
        async fn fetch(&self, language: &LanguageCode) -> Result<TranslationTree> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(LoadError::Network("offline".to_string()).into());
            }
            self.inner.fetch(language).await
        }
    }

    #[tokio::test]
    async fn failed_retry_keeps_previous_bundle_and_preference() {
        let source = Arc::new(SwitchableSource {
            offline: std::sync::atomic::AtomicBool::new(false),
            inner: both(),
        });
        let store = Arc::new(MemoryStore::new());
        let t = Translator::new(SupportedLanguages::default(), source.clone(), store.clone())
            .with_environment_locale(None);
        t.load("pl").await.expect("initial load");

        source.offline.store(true, Ordering::SeqCst);
        let result = t.load("pl").await;

        assert!(matches!(result, Err(Error::Load(LoadError::Network(_)))));
        assert_eq!(t.current_language().as_ref().map(LanguageCode::as_str), Some("pl"));
        assert_eq!(*t.tree(), polish());
        assert_eq!(store.load().expect("store").as_deref(), Some("pl"));
    }

    /// Blocks the first save of `pl` until released.
    struct BlockingStore {
        inner: MemoryStore,
        entered: std::sync::Mutex<Option<std::sync::mpsc::Sender<()>>>,
        release: std::sync::Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl PreferenceStore for BlockingStore {
        fn load(&self) -> Result<Option<String>> {
            self.inner.load()
        }

        fn save(&self, language: &str) -> Result<()> {
            if language == "pl" {
                let entered = self.entered.lock().expect("entered lock").take();
                if let Some(entered) = entered {
                    entered.send(()).expect("signal save");
                    self.release
                        .lock()
                        .expect("release lock")
                        .recv()
                        .expect("wait for release");
                }
            }
            self.inner.save(language)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_preference_save_cannot_outlive_newer_load() {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let store = Arc::new(BlockingStore {
            inner: MemoryStore::new(),
            entered: std::sync::Mutex::new(Some(entered_tx)),
            release: std::sync::Mutex::new(release_rx),
        });
        let t = Arc::new(
            Translator::new(SupportedLanguages::default(), Arc::new(both()), store.clone())
                .with_environment_locale(None),
        );

        let first = tokio::spawn({
            let t = Arc::clone(&t);
            async move { t.load("pl").await }
        });
        // Both waits run on the test thread, which is not a runtime worker.
        entered_rx.recv().expect("pl save started");

        let second = tokio::spawn({
            let t = Arc::clone(&t);
            async move { t.load("de").await }
        });
        std::thread::sleep(std::time::Duration::from_millis(50));
        release_tx.send(()).expect("release save");

        assert_eq!(first.await.expect("join").expect("pl load"), "pl");
        assert_eq!(second.await.expect("join").expect("de load"), "de");
        assert_eq!(t.current_language().as_ref().map(LanguageCode::as_str), Some("de"));
        assert_eq!(store.load().expect("store").as_deref(), Some("de"));
    }
}
