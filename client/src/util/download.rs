//! Storyboard export: per-entry downloads and full-sequence export.
//!
//! Exported files are named by their 1-based sequence position, zero-padded
//! to two digits. Sequence export spaces the download triggers out so the
//! browser's multiple-download throttling does not swallow entries.

#[cfg(test)]
#[path = "download_test.rs"]
mod download_test;

/// Milliseconds between download triggers during sequence export.
#[cfg(feature = "hydrate")]
const EXPORT_SPACING_MS: u64 = 200;

/// Filename for the entry at `index` (0-based position in the list).
#[must_use]
pub fn export_filename(index: usize) -> String {
    format!("storyboard_scene_{:02}.png", index + 1)
}

/// Trigger a browser download of one data URL under `filename`.
#[cfg(feature = "hydrate")]
pub fn download_data_url(src: &str, filename: &str) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(element) = document.create_element("a") else {
        return;
    };
    let Ok(anchor) = element.dyn_into::<web_sys::HtmlAnchorElement>() else {
        return;
    };

    anchor.set_href(src);
    anchor.set_download(filename);
    anchor.click();
}

/// Download every entry image in list order, one file per entry, with a
/// small delay between triggers.
#[cfg(feature = "hydrate")]
pub fn export_sequence(images: Vec<String>) {
    leptos::task::spawn_local(async move {
        for (index, src) in images.iter().enumerate() {
            if index > 0 {
                gloo_timers::future::sleep(std::time::Duration::from_millis(EXPORT_SPACING_MS))
                    .await;
            }
            download_data_url(src, &export_filename(index));
        }
    });
}
