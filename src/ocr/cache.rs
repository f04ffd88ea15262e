//! Cached OCR word extraction.
//!
//! OCR is by far the slowest step of a run, and a page is revisited many
//! times while samples are generated, so word lists are persisted next to
//! the inputs the first time a page is seen.

use super::engine::{OcrDetection, OcrEngine};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use table_augment_core::core::{
    AugmentError, AugmentResult, DEFAULT_OCR_ENGINE_MODE, DEFAULT_OCR_MIN_LEVEL,
    DEFAULT_OCR_TARGET_WIDTH, DEFAULT_OUTLIER_FACTOR,
};
use table_augment_core::domain::WordBox;
use table_augment_core::utils::resize_to_width;
use tracing::{debug, info};

/// Settings for running OCR and filtering its output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Width pages are resized to before OCR.
    pub target_width: u32,
    /// Detections must be strictly above this level.
    pub min_level: u32,
    /// Boxes with at least this multiple of the reference area are dropped.
    pub outlier_factor: f64,
    /// Tesseract OCR engine mode.
    pub oem: i32,
    /// Tesseract language.
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_OCR_TARGET_WIDTH,
            min_level: DEFAULT_OCR_MIN_LEVEL,
            outlier_factor: DEFAULT_OUTLIER_FACTOR,
            oem: DEFAULT_OCR_ENGINE_MODE,
            language: "eng".to_string(),
        }
    }
}

/// OCR front end that reads from and writes to a per-page cache file.
#[derive(Debug)]
pub struct OcrCache<E> {
    engine: E,
    settings: OcrSettings,
}

impl<E: OcrEngine> OcrCache<E> {
    pub fn new(engine: E, settings: OcrSettings) -> Self {
        Self { engine, settings }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Returns the word boxes of `page`.
    ///
    /// An existing `cache_path` is returned verbatim without running the
    /// engine. Otherwise OCR runs, the result is filtered, written to
    /// `cache_path` and returned.
    pub fn get_ocr(&self, cache_path: &Path, page: &GrayImage) -> AugmentResult<Vec<WordBox>> {
        if cache_path.exists() {
            debug!("Using cached OCR from {}", cache_path.display());
            return read_word_list(cache_path);
        }

        let words = self.run_ocr(page)?;
        write_word_list(cache_path, &words)?;
        Ok(words)
    }

    /// Runs the engine on `page` and returns filtered words in page
    /// coordinates. Does not touch the cache.
    pub fn run_ocr(&self, page: &GrayImage) -> AugmentResult<Vec<WordBox>> {
        if page.width() == 0 || page.height() == 0 {
            return Err(AugmentError::invalid_input("cannot run OCR on an empty page"));
        }
        let (resized, ratio) = resize_to_width(page, self.settings.target_width);

        info!("OCR start ({}x{})", resized.width(), resized.height());
        let start = Instant::now();
        let detections = self.engine.detect(&resized)?;
        info!(
            "OCR end: {} detections in {:.2}ms",
            detections.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let words = words_from_detections(detections, ratio, self.settings.min_level);
        let detected = words.len();
        let words = filter_outliers(words, self.settings.outlier_factor);
        if words.len() < detected {
            debug!("Dropped {} oversized OCR boxes", detected - words.len());
        }
        Ok(words)
    }
}

/// Keeps word-level (or finer) detections with visible text and maps them
/// back to page coordinates.
///
/// `ratio` is the factor the page was scaled by before OCR. Each coordinate
/// is divided by it and truncated; right/bottom are derived from the
/// truncated origin plus the truncated extent.
pub fn words_from_detections(
    detections: Vec<OcrDetection>,
    ratio: f64,
    min_level: u32,
) -> Vec<WordBox> {
    let scale = |v: i32| (f64::from(v) / ratio) as i32;
    detections
        .into_iter()
        .filter(|d| d.level > min_level && !d.text.trim().is_empty())
        .map(|d| {
            let left = scale(d.left);
            let top = scale(d.top);
            WordBox::new(d.text, left, top, left + scale(d.width), top + scale(d.height))
        })
        .collect()
}

/// Drops boxes that are implausibly large compared with a typical word.
///
/// Boxes are sorted by area, largest first. The reference area is the mean
/// over the ranks `[len / 20, len - ceil(len / 4))`, which leaves out both
/// the biggest false detections and the smallest noise. Boxes whose area is
/// at least `factor` times the reference are removed.
///
/// When that rank window is empty, or the reference area is not positive,
/// the sorted list is returned without filtering.
pub fn filter_outliers(mut words: Vec<WordBox>, factor: f64) -> Vec<WordBox> {
    words.sort_by_key(|w| std::cmp::Reverse(w.area()));

    let len = words.len();
    let start = len / 20;
    let end = len - len.div_ceil(4);
    if start >= end {
        return words;
    }

    let reference =
        words[start..end].iter().map(|w| w.area() as f64).sum::<f64>() / (end - start) as f64;
    if reference <= 0.0 {
        return words;
    }

    let limit = reference * factor;
    words.retain(|w| (w.area() as f64) < limit);
    words
}

/// Reads a word list written by [`write_word_list`].
pub fn read_word_list(path: &Path) -> AugmentResult<Vec<WordBox>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AugmentError::ocr(format!("reading '{}'", path.display()), e))
}

/// Writes a word list as a JSON array of 6-element records, creating parent
/// directories as needed.
pub fn write_word_list(path: &Path, words: &[WordBox]) -> AugmentResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).map_err(|e| AugmentError::output(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, words)?;
    writer.flush().map_err(|e| AugmentError::output(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Engine returning fixed detections and counting invocations.
    struct CountingEngine {
        calls: Cell<usize>,
        detections: Vec<OcrDetection>,
    }

    impl OcrEngine for CountingEngine {
        fn detect(&self, _image: &GrayImage) -> AugmentResult<Vec<OcrDetection>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.detections.clone())
        }
    }

    fn detection(level: u32, text: &str, left: i32, top: i32, width: i32, height: i32) -> OcrDetection {
        OcrDetection {
            level,
            text: text.to_string(),
            left,
            top,
            width,
            height,
            confidence: 90.0,
        }
    }

    fn word(side: i32) -> WordBox {
        WordBox::new("w", 0, 0, side, side)
    }

    #[test]
    fn test_words_from_detections_filters_and_rescales() {
        let detections = vec![
            detection(4, "line", 0, 0, 500, 50),
            detection(5, "  ", 10, 10, 20, 20),
            detection(5, "Total", 25, 51, 101, 49),
        ];
        let words = words_from_detections(detections, 2.5, 4);
        assert_eq!(words, vec![WordBox::new("Total", 10, 20, 50, 39)]);
    }

    #[test]
    fn test_filter_outliers_drops_whole_table_box() {
        let mut words: Vec<WordBox> = (0..40).map(|i| word(10 + i % 3)).collect();
        words.push(WordBox::new("table", 0, 0, 800, 600));

        let filtered = filter_outliers(words, 30.0);
        assert_eq!(filtered.len(), 40);
        assert!(filtered.iter().all(|w| w.text == "w"));
    }

    #[test]
    fn test_filter_outliers_keeps_boxes_below_threshold() {
        // 20 boxes of area 100 and one of area 2900 (< 30 * 100).
        let mut words: Vec<WordBox> = (0..20).map(|_| word(10)).collect();
        words.push(WordBox::new("wide", 0, 0, 290, 10));
        let filtered = filter_outliers(words, 30.0);
        assert_eq!(filtered.len(), 21);
        assert_eq!(filtered[0].text, "wide");
    }

    #[test]
    fn test_filter_outliers_guards_empty_reference() {
        assert!(filter_outliers(Vec::new(), 30.0).is_empty());

        let single = vec![WordBox::new("only", 0, 0, 1000, 1000)];
        assert_eq!(filter_outliers(single.clone(), 30.0), single);

        let degenerate = vec![WordBox::new("a", 5, 5, 5, 9), WordBox::new("b", 5, 5, 5, 9)];
        assert_eq!(filter_outliers(degenerate, 30.0).len(), 2);
    }

    #[test]
    fn test_get_ocr_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("ocr").join("page.json");
        let engine = CountingEngine {
            calls: Cell::new(0),
            detections: vec![
                detection(5, "alpha", 0, 0, 50, 20),
                detection(5, "beta", 100, 0, 60, 20),
            ],
        };
        let cache = OcrCache::new(engine, OcrSettings::default());
        let page = GrayImage::new(1250, 800);

        let first = cache.get_ocr(&cache_path, &page).unwrap();
        let second = cache.get_ocr(&cache_path, &page).unwrap();

        assert_eq!(cache.engine().calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        // page was doubled in width for OCR, so coordinates are halved back
        assert!(first.contains(&WordBox::new("beta", 50, 0, 80, 10)));
    }

    #[test]
    fn test_get_ocr_returns_existing_cache_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("page.json");
        std::fs::write(&cache_path, r#"[[3,"abc",1,2,3,4],[1,"x",10,10,9000,9000]]"#).unwrap();

        let engine = CountingEngine {
            calls: Cell::new(0),
            detections: Vec::new(),
        };
        let cache = OcrCache::new(engine, OcrSettings::default());
        let words = cache.get_ocr(&cache_path, &GrayImage::new(10, 10)).unwrap();

        assert_eq!(cache.engine().calls.get(), 0);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].right, 9000);
    }

    #[test]
    fn test_corrupt_cache_is_an_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("page.json");
        std::fs::write(&cache_path, "not json").unwrap();

        let err = read_word_list(&cache_path).unwrap_err();
        assert!(err.to_string().contains("page.json"));
    }
}
