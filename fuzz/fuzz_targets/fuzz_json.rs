#![no_main]

use k8s_image_lister::extract::extract_from_text;
use k8s_image_lister::file_types::ManifestFormat;
use libfuzzer_sys::fuzz_target;
use std::panic::AssertUnwindSafe;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            extract_from_text(content, ManifestFormat::Json)
        }));

        let Ok(result) = result else {
            panic!("extractor panicked");
        };

        assert!(result.errors.len() <= 1, "one source, at most one error");
        if !result.errors.is_empty() {
            assert!(result.references.is_empty(), "failed source produced references");
        }

        for r in &result.references {
            assert!(!r.image.is_empty(), "empty image");
            assert_eq!(r.image, r.image.trim(), "untrimmed image");
        }
    }
});
