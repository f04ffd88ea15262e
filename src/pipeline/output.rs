//! Output directory layout and sample persistence.

use crate::ocr::write_word_list;
use std::path::{Path, PathBuf};
use table_augment_core::core::{
    AugmentError, AugmentResult, DEFAULT_IMAGE_EXTENSION, GROUND_TRUTH_EXTENSION, GT_SUBDIR,
    IMAGES_SUBDIR, OCR_SUBDIR,
};
use table_augment_core::domain::{TableModel, XmlElement};
use table_augment_core::utils::save_gray_image;
use tracing::debug;

/// Files written for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePaths {
    pub image: PathBuf,
    pub ocr: PathBuf,
    pub ground_truth: PathBuf,
}

/// Writes samples below an output root with `images/`, `ocr/` and `gt/`
/// subdirectories.
#[derive(Debug, Clone)]
pub struct SampleWriter {
    root: PathBuf,
    ocr_extension: String,
}

impl SampleWriter {
    /// Creates the output root and its subdirectories.
    pub fn create(root: &Path, ocr_extension: &str) -> AugmentResult<Self> {
        for dir in [IMAGES_SUBDIR, OCR_SUBDIR, GT_SUBDIR] {
            let path = root.join(dir);
            std::fs::create_dir_all(&path).map_err(|e| AugmentError::output(&path, e))?;
        }
        Ok(Self {
            root: root.to_path_buf(),
            ocr_extension: ocr_extension.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `F_i_c`, with the smallest `c` whose image does not exist yet.
    pub fn next_sample_name(&self, file: &str, table_index: usize) -> String {
        let mut counter = 0usize;
        loop {
            let name = format!("{file}_{table_index}_{counter}");
            if !self.paths(&name).image.exists() {
                return name;
            }
            counter += 1;
        }
    }

    pub fn paths(&self, name: &str) -> SamplePaths {
        SamplePaths {
            image: self
                .root
                .join(IMAGES_SUBDIR)
                .join(format!("{name}.{DEFAULT_IMAGE_EXTENSION}")),
            ocr: self
                .root
                .join(OCR_SUBDIR)
                .join(format!("{name}.{}", self.ocr_extension)),
            ground_truth: self
                .root
                .join(GT_SUBDIR)
                .join(format!("{name}.{GROUND_TRUTH_EXTENSION}")),
        }
    }

    /// Writes the crop, its words and a ground-truth document wrapping
    /// `fragment`. The three writes are independent; a failure part way
    /// leaves the earlier files in place.
    pub fn write<T: TableModel>(
        &self,
        name: &str,
        table: &T,
        fragment: XmlElement,
    ) -> AugmentResult<SamplePaths> {
        let paths = self.paths(name);
        let input_file = format!("{name}.{DEFAULT_IMAGE_EXTENSION}");

        save_gray_image(table.image(), &paths.image)?;
        write_word_list(&paths.ocr, table.words())?;
        XmlElement::ground_truth_document(&input_file, fragment).write_to_file(&paths.ground_truth)?;

        debug!("Wrote sample {name}");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::read_word_list;
    use image::{GrayImage, Luma};
    use table_augment_core::core::TableError;
    use table_augment_core::domain::{Axis, Block, WordBox};

    struct StaticTable {
        image: GrayImage,
        blocks: Vec<Block>,
        words: Vec<WordBox>,
    }

    impl TableModel for StaticTable {
        fn from_region(
            _page: &GrayImage,
            _region: &XmlElement,
            _words: &[WordBox],
        ) -> Result<Self, TableError> {
            Err(TableError::InvalidRegion {
                message: "unused".to_string(),
            })
        }

        fn blocks(&self, _axis: Axis) -> &[Block] {
            &self.blocks
        }

        fn image(&self) -> &GrayImage {
            &self.image
        }

        fn words(&self) -> &[WordBox] {
            &self.words
        }

        fn replicate(&mut self, _: usize, _: usize, _: Axis) -> Result<(), TableError> {
            Ok(())
        }

        fn remove(&mut self, _: usize, _: Axis) -> Result<(), TableError> {
            Ok(())
        }

        fn to_xml(&self) -> Option<XmlElement> {
            None
        }
    }

    #[test]
    fn test_create_bootstraps_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let writer = SampleWriter::create(&root, "json").unwrap();

        assert_eq!(writer.root(), root.as_path());
        for sub in ["images", "ocr", "gt"] {
            assert!(root.join(sub).is_dir());
        }
        // idempotent
        assert!(SampleWriter::create(&root, "json").is_ok());
    }

    #[test]
    fn test_next_sample_name_skips_existing_images() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SampleWriter::create(dir.path(), "json").unwrap();

        assert_eq!(writer.next_sample_name("page", 2), "page_2_0");
        std::fs::write(dir.path().join("images/page_2_0.png"), b"").unwrap();
        std::fs::write(dir.path().join("images/page_2_1.png"), b"").unwrap();
        // only images count
        std::fs::write(dir.path().join("gt/page_2_2.xml"), b"").unwrap();
        assert_eq!(writer.next_sample_name("page", 2), "page_2_2");
        assert_eq!(writer.next_sample_name("page", 3), "page_3_0");
    }

    #[test]
    fn test_write_produces_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SampleWriter::create(dir.path(), "json").unwrap();
        let table = StaticTable {
            image: GrayImage::from_pixel(12, 8, Luma([200])),
            blocks: vec![Block { start: 0, end: 8 }],
            words: vec![WordBox::new("x", 1, 1, 4, 4)],
        };
        let fragment = XmlElement::new("Table")
            .with_attribute("x0", 0)
            .with_attribute("y0", 0)
            .with_attribute("x1", 12)
            .with_attribute("y1", 8);

        let paths = writer.write("page_0_0", &table, fragment).unwrap();

        let image = image::open(&paths.image).unwrap().to_luma8();
        assert_eq!(image.dimensions(), (12, 8));
        assert_eq!(read_word_list(&paths.ocr).unwrap(), table.words);

        let gt = XmlElement::from_file(&paths.ground_truth).unwrap();
        assert_eq!(gt.attribute("InputFile"), Some("page_0_0.png"));
        assert_eq!(gt.tables().len(), 1);
        assert_eq!(gt.tables()[0].attribute("x1"), Some("12"));
        assert!(paths.ocr.ends_with("ocr/page_0_0.json"));
    }
}
