use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// Source of dependency annotations for raw text.
///
/// Implementations return the annotation in the ten-column tab-separated
/// format, one block per sentence. Providers fail soft: on any transport or
/// encoding error they return `String::new()`, which the analyzer treats as
/// "nothing to analyze". A panic is still contained by the analyzer, but yields
/// a fallback result instead of an empty list.
pub trait AnnotationProvider {
    fn annotate(&self, text: &str) -> String;
}

impl<F> AnnotationProvider for F
where
    F: Fn(&str) -> String,
{
    fn annotate(&self, text: &str) -> String {
        self(text)
    }
}

/// Replays a fixed annotation whatever the input, e.g. one read from a file.
#[derive(Debug, Clone, Default)]
pub struct StaticAnnotation(pub String);

impl AnnotationProvider for StaticAnnotation {
    fn annotate(&self, _text: &str) -> String {
        self.0.clone()
    }
}

/// Memoizes another provider by input text.
///
/// Empty annotations are not remembered, so a transient failure upstream is
/// retried on the next call.
#[derive(Debug, Default)]
pub struct CachedProvider<P> {
    inner: P,
    cache: RwLock<HashMap<String, String>>,
}

impl<P: AnnotationProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, cache: RwLock::new(HashMap::new()) }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().map_or(0, |cache| cache.len())
    }
}

impl<P: AnnotationProvider> AnnotationProvider for CachedProvider<P> {
    fn annotate(&self, text: &str) -> String {
        if let Some(hit) = self.cache.read().ok().and_then(|cache| cache.get(text).cloned()) {
            trace!(len = text.len(), "annotation cache hit");
            return hit;
        }

        let annotation = self.inner.annotate(text);
        if !annotation.trim().is_empty() {
            if let Ok(mut cache) = self.cache.write() {
                cache.insert(text.to_string(), annotation.clone());
            }
        }
        annotation
    }
}
