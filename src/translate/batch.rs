//! Batch translation over editor items.

use std::pin::pin;

use futures::stream::{
    self,
    StreamExt,
};

use super::{
    Translator,
    TranslatorError,
};
use crate::document::Language;
use crate::editor::Editor;
use crate::item::ItemId;

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Items changed by their result.
    pub translated: usize,
    /// Items that failed with a retryable error.
    pub failed: Vec<(ItemId, TranslatorError)>,
    /// The provider is not configured; the batch stopped early.
    pub needs_api_key: bool,
}

impl BatchReport {
    fn record_failure(&mut self, id: ItemId, err: TranslatorError) -> bool {
        if err.is_configuration_error() {
            tracing::warn!(%err, "Stopping batch, translator not configured");
            self.needs_api_key = true;
            return false;
        }
        tracing::warn!(%id, %err, "Translation failed");
        self.failed.push((id, err));
        true
    }
}

/// A leaf to send to the provider.
#[derive(Debug)]
struct Job {
    /// Item receiving the result.
    id: ItemId,
    /// Text to translate.
    text: String,
    /// Target language of the forward request.
    language: Language,
}

/// Translates every leaf below `ids` (or the selection) and applies the
/// results with [`Editor::update_translation`].
///
/// Each leaf costs a forward request and a reverse request. Up to
/// `concurrency` leaves are in flight at once; completions are applied one at
/// a time as they arrive. A configuration error stops the batch; results
/// applied before it are kept.
pub async fn translate_items<T>(
    editor: &mut Editor,
    translator: &T,
    ids: Option<&[ItemId]>,
    concurrency: usize,
) -> BatchReport
where
    T: Translator + Sync,
{
    let source_language = editor.document().source_language;
    let jobs: Vec<Job> = editor
        .target_leaves(ids)
        .into_iter()
        .filter(|leaf| leaf.language != source_language && !leaf.source_string.is_empty())
        .map(|leaf| Job { id: leaf.id.clone(), text: leaf.source_string.clone(), language: leaf.language })
        .collect();
    tracing::info!(items = jobs.len(), concurrency, "Translating");

    let mut results = pin!(
        stream::iter(jobs)
            .map(move |job| async move {
                let result = async {
                    let translation = translator.translate(&job.text, source_language, job.language).await?;
                    let reverse = translator.translate(&translation, job.language, source_language).await?;
                    Ok::<_, TranslatorError>((translation, reverse))
                }
                .await;
                (job.id, result)
            })
            .buffer_unordered(concurrency.max(1))
    );

    let mut report = BatchReport::default();
    while let Some((id, result)) = results.next().await {
        match result {
            Ok((translation, reverse)) => {
                if editor.update_translation(&id, &translation, Some(&reverse)) {
                    report.translated += 1;
                } else {
                    tracing::debug!(%id, "Translation left the item unchanged");
                }
            }
            Err(err) => {
                if !report.record_failure(id, err) {
                    break;
                }
            }
        }
    }
    report
}

/// Fills `reverse_translation` of every translated leaf below `ids` without
/// touching the translations themselves.
pub async fn reverse_translate<T>(
    editor: &mut Editor,
    translator: &T,
    ids: Option<&[ItemId]>,
    concurrency: usize,
) -> BatchReport
where
    T: Translator + Sync,
{
    let source_language = editor.document().source_language;
    let jobs: Vec<Job> = editor
        .target_leaves(ids)
        .into_iter()
        .filter_map(|leaf| {
            let text = leaf.translation.as_ref().filter(|text| !text.is_empty())?;
            Some(Job { id: leaf.id.clone(), text: text.clone(), language: leaf.language })
        })
        .collect();

    let mut results = pin!(
        stream::iter(jobs)
            .map(move |job| async move {
                let result = translator.translate(&job.text, job.language, source_language).await;
                (job.id, result)
            })
            .buffer_unordered(concurrency.max(1))
    );

    let mut report = BatchReport::default();
    while let Some((id, result)) = results.next().await {
        match result {
            Ok(reverse) => {
                if editor.set_reverse_translation(&id, Some(&reverse)) {
                    report.translated += 1;
                }
            }
            Err(err) => {
                if !report.record_failure(id, err) {
                    break;
                }
            }
        }
    }
    report
}

/// Language code of the most likely detection, if any.
///
/// # Errors
/// Returns the provider's error.
pub async fn detect_language<T>(translator: &T, text: &str) -> Result<Option<String>, TranslatorError>
where
    T: Translator,
{
    let detections = translator.detect(text).await?;
    Ok(detections.into_iter().next().map(|detection| detection.language))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::document::PluralType;
    use crate::overlay::Overlay;
    use crate::test_utils::{
        MockTranslator,
        hello_document,
        plural_document,
        root,
    };

    fn editor() -> Editor {
        Editor::with_languages(
            hello_document(),
            Overlay::default(),
            vec![Language::English, Language::French, Language::German],
        )
    }

    #[tokio::test]
    async fn test_translate_applies_forward_and_reverse() {
        let mut editor = editor();
        let fr = root("Hello", Language::French);
        let translator = MockTranslator::default();

        let report = translate_items(&mut editor, &translator, Some(&[fr.clone()]), 1).await;

        assert_eq!(report.translated, 1);
        let item = editor.item(&fr).unwrap();
        assert_eq!(item.translation.as_deref(), Some("[fr] Hello"));
        assert_eq!(item.reverse_translation.as_deref(), Some("[en] [fr] Hello"));
        assert!(editor.is_modified());
        assert_eq!(translator.calls(), 2);
    }

    #[tokio::test]
    async fn test_translate_skips_source_language() {
        let mut editor = editor();
        let translator = MockTranslator::default();
        editor.select([root("Hello", Language::English)]);

        let report = translate_items(&mut editor, &translator, None, 4).await;

        assert_eq!(report, BatchReport::default());
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_translate_fills_plural_leaves_concurrently() {
        let mut editor =
            Editor::with_languages(plural_document(), Overlay::default(), vec![Language::French]);
        let fr = root("%d files", Language::French);

        let report = translate_items(&mut editor, &MockTranslator::default(), Some(&[fr.clone()]), 4).await;

        assert_eq!(report.translated, 2);
        let one = editor.item(&fr.child(PluralType::One)).unwrap();
        assert_eq!(one.translation.as_deref(), Some("[fr] %d file"));
    }

    /// A root and one of its own slots name the same leaf; it is sent once.
    #[tokio::test]
    async fn test_overlapping_targets_translate_each_leaf_once() {
        let mut editor =
            Editor::with_languages(plural_document(), Overlay::default(), vec![Language::French]);
        let fr = root("%d files", Language::French);
        let translator = MockTranslator::default();
        let ids = [fr.clone(), fr.child(PluralType::One)];

        let report = translate_items(&mut editor, &translator, Some(&ids), 2).await;

        assert_eq!(report.translated, 2);
        assert_eq!(translator.calls(), 4);
    }

    /// A result equal to the current text is not counted.
    #[tokio::test]
    async fn test_unchanged_result_is_not_counted() {
        let mut editor = editor();
        let fr = root("Hello", Language::French);
        editor.update_translation(&fr, "[fr] Hello", None);

        let report = translate_items(&mut editor, &MockTranslator::default(), Some(&[fr.clone()]), 1).await;

        assert_eq!(report.translated, 0);
        assert!(report.failed.is_empty());
    }

    /// InvalidApi: no further requests after the first failure
    #[tokio::test]
    async fn test_configuration_error_stops_batch() {
        let mut editor = editor();
        let translator = MockTranslator::failing(TranslatorError::InvalidApi);
        let ids = [root("Hello", Language::French), root("Hello", Language::German)];

        let report = translate_items(&mut editor, &translator, Some(&ids), 1).await;

        assert!(report.needs_api_key);
        assert!(report.failed.is_empty());
        assert_eq!(translator.calls(), 1);
        assert!(!editor.is_modified());
    }

    #[tokio::test]
    async fn test_retryable_errors_are_collected() {
        let mut editor = editor();
        let translator = MockTranslator::failing(TranslatorError::Network("timeout".to_string()));
        let ids = [root("Hello", Language::French), root("Hello", Language::German)];

        let report = translate_items(&mut editor, &translator, Some(&ids), 2).await;

        assert!(!report.needs_api_key);
        assert_eq!(report.failed.len(), 2);
    }

    #[tokio::test]
    async fn test_reverse_translate_keeps_translation() {
        let mut editor = editor();
        let fr = root("Hello", Language::French);
        editor.update_translation(&fr, "Bonjour", None);
        let translator = MockTranslator::default();

        let ids = [fr.clone(), root("Hello", Language::German)];

        let report = reverse_translate(&mut editor, &translator, Some(&ids), 1).await;

        assert_eq!(report.translated, 1);
        let item = editor.item(&fr).unwrap();
        assert_eq!(item.translation.as_deref(), Some("Bonjour"));
        assert_eq!(item.reverse_translation.as_deref(), Some("[en] Bonjour"));
    }

    #[googletest::test]
    fn test_detect_language_returns_first() {
        let translator = MockTranslator::default();

        let detected = tokio_test::block_on(detect_language(&translator, "Bonjour"));

        expect_that!(detected, ok(some(eq("fr"))));
    }

    #[googletest::test]
    fn test_detect_language_propagates_errors() {
        let translator = MockTranslator::failing(TranslatorError::NotImplemented);

        let detected = tokio_test::block_on(detect_language(&translator, "Bonjour"));

        expect_that!(detected, err(eq(&TranslatorError::NotImplemented)));
    }
}
