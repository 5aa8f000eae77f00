//! Command-line front end over the editor.

use std::collections::BTreeMap;
use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Args,
    Parser,
    Subcommand,
    ValueEnum,
};
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::document::Language;
use crate::editor::{
    Session,
    SessionError,
};
use crate::item::{
    EditItem,
    ItemId,
    State,
};
use crate::overlay::OverlayError;
use crate::translate::{
    self,
    PseudoTranslator,
};
use crate::view::{
    Filter,
    QualityFilter,
    SortDescriptor,
    SortKey,
    SortSpec,
    TranslatedFilter,
    ViewQuery,
};
use crate::workspace::{
    self,
    ScanError,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Translator is not configured")]
    NeedsApiKey,
}

#[derive(Debug, Parser)]
#[command(name = "xcstrings-editor", about = "Inspect and edit Xcode String Catalogs", version)]
pub struct Cli {
    /// Workspace root holding `.xcstrings-editor.json`.
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List catalogs in the workspace.
    Scan,

    /// Count items per state and language.
    Status(DocumentArgs),

    /// Print the items of one language.
    List(ListArgs),

    /// Set the translation of one item.
    Set(SetArgs),

    /// Set or clear a review flag on items.
    Mark(MarkArgs),

    /// Remove translations of items.
    Clear(ItemsArgs),

    /// Use the source string as translation.
    #[command(name = "copy-source")]
    CopySource(ItemsArgs),

    /// Print source and translation text of items.
    Export(ExportArgs),

    /// Fill items with pseudo-localized text.
    Pseudo(ItemsArgs),

    /// Rewrite a catalog in canonical layout.
    Normalize(DocumentArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DocumentArgs {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct ItemsArgs {
    pub file: PathBuf,

    /// Item ids, `{key}|XCSTRINGEDITORDIVIDER|{lang}[/{variant}...]`.
    #[arg(required = true)]
    pub ids: Vec<ItemId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TranslatedArg {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Missing,
    Different,
    Similar,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    State,
    Key,
    Source,
    Translation,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    pub file: PathBuf,

    #[arg(long, short)]
    pub language: Language,

    /// Case-insensitive text search.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub new: bool,
    #[arg(long)]
    pub translated: Option<TranslatedArg>,
    #[arg(long)]
    pub quality: Option<QualityArg>,
    #[arg(long)]
    pub modified: bool,
    #[arg(long)]
    pub needs_review: bool,
    #[arg(long)]
    pub needs_work: bool,
    #[arg(long)]
    pub translate_later: bool,
    #[arg(long)]
    pub same_as_source: bool,

    /// Sort keys in precedence order.
    #[arg(long, value_delimiter = ',')]
    pub sort: Vec<SortArg>,
    #[arg(long)]
    pub descending: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SetArgs {
    pub file: PathBuf,
    pub id: ItemId,
    /// New translation; empty clears it.
    pub text: String,
    #[arg(long)]
    pub reverse: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkFlag {
    NeedsReview,
    TranslateLater,
    NeedsWork,
    DontTranslate,
}

#[derive(Debug, Clone, Args)]
pub struct MarkArgs {
    pub flag: MarkFlag,

    #[command(flatten)]
    pub items: ItemsArgs,

    /// Clear the flag instead of setting it.
    #[arg(long)]
    pub off: bool,

    /// Apply "needs work" to every language of the same keys.
    #[arg(long)]
    pub all_languages: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Source,
    Translation,
    Pair,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub items: ItemsArgs,

    #[arg(long, value_enum, default_value_t = ExportFormat::Pair)]
    pub format: ExportFormat,
}

impl ListArgs {
    fn query(&self, base: ViewQuery) -> ViewQuery {
        let filter = Filter {
            new: self.new,
            translated: match self.translated {
                None => TranslatedFilter::Any,
                Some(TranslatedArg::Yes) => TranslatedFilter::Translated,
                Some(TranslatedArg::No) => TranslatedFilter::Untranslated,
            },
            translation_quality: match self.quality {
                None => QualityFilter::Any,
                Some(QualityArg::Missing) => QualityFilter::Missing,
                Some(QualityArg::Different) => QualityFilter::Different,
                Some(QualityArg::Similar) => QualityFilter::Similar,
                Some(QualityArg::Exact) => QualityFilter::Exact,
            },
            modified: self.modified,
            needs_review: self.needs_review,
            needs_work: self.needs_work,
            translate_later: self.translate_later,
            source_equals_translation: self.same_as_source,
        };

        let sort = if self.sort.is_empty() {
            SortSpec::default()
        } else {
            SortSpec::new(
                self.sort
                    .iter()
                    .map(|&arg| {
                        let key = match arg {
                            SortArg::State => SortKey::State,
                            SortArg::Key => SortKey::Key,
                            SortArg::Source => SortKey::Source,
                            SortArg::Translation => SortKey::Translation,
                        };
                        if self.descending {
                            SortDescriptor::descending(key)
                        } else {
                            SortDescriptor::ascending(key)
                        }
                    })
                    .collect(),
            )
        };

        ViewQuery {
            language: self.language,
            filter,
            search_text: self.search.clone().unwrap_or_default(),
            sort,
            ..base
        }
    }
}

/// Runs `cli`, writing results to `out`.
///
/// # Errors
/// Returns the first error of the command.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mut config = ConfigManager::new();
    config.load_settings(Some(cli.workspace.clone()))?;

    match cli.command {
        Commands::Scan => scan(&cli.workspace, &config, out),
        Commands::Status(args) => status(&config, &args.file, out),
        Commands::List(args) => list(&config, &args, out),
        Commands::Set(args) => {
            let mut session = open(&config, &args.file, std::slice::from_ref(&args.id))?;
            let changed =
                session.editor_mut().update_translation(&args.id, &args.text, args.reverse.as_deref());
            if !changed {
                writeln!(out, "unchanged: {}", args.id)?;
            }
            save(&mut session, out)
        }
        Commands::Mark(args) => {
            let MarkArgs { flag, items, off, all_languages } = args;
            let mut session = open(&config, &items.file, &items.ids)?;
            let editor = session.editor_mut();
            let ids = Some(items.ids.as_slice());
            match flag {
                MarkFlag::NeedsReview => editor.set_needs_review(ids, !off),
                MarkFlag::TranslateLater => editor.set_translate_later(ids, !off),
                MarkFlag::NeedsWork => editor.set_needs_work(ids, !off, all_languages),
                MarkFlag::DontTranslate => editor.set_should_translate(ids, off),
            }
            save(&mut session, out)
        }
        Commands::Clear(args) => {
            let mut session = open(&config, &args.file, &args.ids)?;
            session.editor_mut().clear_translation(Some(args.ids.as_slice()));
            save(&mut session, out)
        }
        Commands::CopySource(args) => {
            let mut session = open(&config, &args.file, &args.ids)?;
            session.editor_mut().copy_from_source(Some(args.ids.as_slice()));
            save(&mut session, out)
        }
        Commands::Export(args) => {
            let session = open(&config, &args.items.file, &args.items.ids)?;
            let ids = Some(args.items.ids.as_slice());
            let text = match args.format {
                ExportFormat::Source => session.editor().source_text(ids),
                ExportFormat::Translation => session.editor().translation_text(ids),
                ExportFormat::Pair => session.editor().source_and_translation_text(ids),
            };
            writeln!(out, "{text}")?;
            Ok(())
        }
        Commands::Pseudo(args) => {
            let mut session = open(&config, &args.file, &args.ids)?;
            let concurrency = config.get_settings().batch.concurrency;
            let report = translate::translate_items(
                session.editor_mut(),
                &PseudoTranslator,
                Some(args.ids.as_slice()),
                concurrency,
            )
            .await;
            for (id, err) in &report.failed {
                writeln!(out, "failed: {id}: {err}")?;
            }
            if report.needs_api_key {
                return Err(CliError::NeedsApiKey);
            }
            writeln!(out, "translated {} item(s)", report.translated)?;
            save(&mut session, out)
        }
        Commands::Normalize(args) => {
            let session = open(&config, &args.file, &[])?;
            session.normalize()?;
            writeln!(out, "normalized {}", args.file.display())?;
            Ok(())
        }
    }
}

/// Opens `file`, adding columns for the languages of `ids`.
fn open(config: &ConfigManager, file: &Path, ids: &[ItemId]) -> Result<Session, CliError> {
    let mut session = Session::open(file, config.overlay_store()?)?;
    for id in ids {
        session.editor_mut().add_language(id.language);
    }
    Ok(session)
}

fn save(session: &mut Session, out: &mut impl Write) -> Result<(), CliError> {
    if session.save()? {
        writeln!(out, "saved {}", session.path().display())?;
    }
    Ok(())
}

fn scan(root: &Path, config: &ConfigManager, out: &mut impl Write) -> Result<(), CliError> {
    for path in workspace::find_documents(root, config.get_settings())? {
        writeln!(out, "{}\t{}", workspace::title(&path), path.display())?;
    }
    Ok(())
}

fn status(config: &ConfigManager, file: &Path, out: &mut impl Write) -> Result<(), CliError> {
    let session = open(config, file, &[])?;
    let editor = session.editor();

    writeln!(out, "{}", workspace::title(file))?;
    for &language in editor.languages() {
        let mut counts: BTreeMap<State, usize> = BTreeMap::new();
        for root in editor.items().iter().filter(|root| root.language == language) {
            *counts.entry(root.state()).or_default() += 1;
        }
        let summary: Vec<String> =
            counts.iter().map(|(state, count)| format!("{state} {count}")).collect();
        writeln!(out, "{language}\t{}", summary.join(", "))?;
    }
    Ok(())
}

fn list(config: &ConfigManager, args: &ListArgs, out: &mut impl Write) -> Result<(), CliError> {
    let mut session = open(config, &args.file, &[])?;
    session.editor_mut().add_language(args.language);
    session.editor_mut().set_current_language(args.language);

    let base = ViewQuery { visibility: config.get_settings().visibility, ..ViewQuery::default() };
    let editor = session.editor();
    for root in editor.view(&args.query(base)) {
        write_item(out, root, 0)?;
    }
    Ok(())
}

fn write_item(out: &mut impl Write, item: &EditItem, depth: usize) -> io::Result<()> {
    writeln!(
        out,
        "{:indent$}{}\t{}\t{}\t{}",
        "",
        item.state(),
        item.key,
        item.source_string,
        item.translation.as_deref().unwrap_or(""),
        indent = depth * 2,
    )?;
    for child in item.children.iter().flatten() {
        write_item(out, child, depth + 1)?;
    }
    Ok(())
}
