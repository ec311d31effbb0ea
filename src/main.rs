// SPDX-License-Identifier: MPL-2.0
use page_i18n::config::{self, Config, SUPPORTED_LANGUAGES};
use page_i18n::error::Error;
use page_i18n::i18n::{
    BundleSource, DirSource, EmbeddedSource, HttpSource, Page, SettingsStore, SupportedLanguages,
    Translator,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
page-i18n: resolve translation keys and localize pages

USAGE:
  page-i18n [OPTIONS] [KEY...]

OPTIONS:
  --lang CODE      Switch to CODE instead of detecting the language
  --url BASE       Fetch <BASE>/<code>.json over HTTP
  --origin URL     Fetch <URL>/assets/locales/<code>.json over HTTP
  --dir DIR        Read <DIR>/<code>.json from disk
  --page FILE      Localize the JSON element list in FILE and print it
  --config FILE    Settings file (default: platform config dir)
  -h, --help       Print this help
";

struct Flags {
    lang: Option<String>,
    url: Option<String>,
    origin: Option<String>,
    dir: Option<PathBuf>,
    page: Option<PathBuf>,
    config: Option<PathBuf>,
    keys: Vec<String>,
}

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    Ok(Some(Flags {
        lang: args.opt_value_from_str("--lang")?,
        url: args.opt_value_from_str("--url")?,
        origin: args.opt_value_from_str("--origin")?,
        dir: args.opt_value_from_str("--dir")?,
        page: args.opt_value_from_str("--page")?,
        config: args.opt_value_from_str("--config")?,
        keys: args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .collect(),
    }))
}

fn bundle_source(flags: &Flags, config: &Config) -> Result<Arc<dyn BundleSource>, Error> {
    let url = flags.url.clone().or_else(|| config.bundle_url.clone());
    let origin = flags.origin.clone().or_else(|| config.bundle_origin.clone());
    let dir = flags.dir.clone().or_else(|| config.bundle_dir.clone());

    let source: Arc<dyn BundleSource> = match (url, origin, dir) {
        (Some(url), _, _) => Arc::new(HttpSource::new(url, config.request_timeout())?),
        (None, Some(origin), _) => {
            Arc::new(HttpSource::from_origin(&origin, config.request_timeout())?)
        }
        (None, None, Some(dir)) => Arc::new(DirSource::new(dir)),
        (None, None, None) => Arc::new(EmbeddedSource),
    };
    Ok(source)
}

async fn run(flags: Flags) -> Result<(), Error> {
    let config = match &flags.config {
        Some(path) if path.exists() => config::load_from_path(path)?,
        Some(_) => Config::default(),
        None => config::load()?,
    };
    let store = match &flags.config {
        Some(path) => SettingsStore::at(path),
        None => SettingsStore::new(),
    };

    let translator = Translator::new(
        SupportedLanguages::new(SUPPORTED_LANGUAGES.iter().copied(), config::DEFAULT_LANGUAGE)?,
        bundle_source(&flags, &config)?,
        Arc::new(store),
    );

    let language = match &flags.lang {
        Some(lang) => translator.load(lang).await?,
        None => translator.init().await?,
    };
    tracing::info!(%language, "bundle loaded");

    for key in &flags.keys {
        println!("{} = {}", key, translator.translate(key));
    }

    if let Some(path) = &flags.page {
        let content = std::fs::read_to_string(path)?;
        let mut page: Page = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid page file: {e}")))?;
        translator.localize(&mut page);
        let rendered = serde_json::to_string_pretty(&page)
            .map_err(|e| Error::Config(format!("cannot render page: {e}")))?;
        println!("{rendered}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(flags).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "page-i18n failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
