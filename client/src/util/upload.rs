//! Image upload: read a local PNG/JPEG into a data URL.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

/// Generic message for any upload read failure.
pub const UPLOAD_READ_ERROR: &str = "Failed to read the uploaded image.";

/// Only PNG and JPEG uploads are accepted.
#[must_use]
pub fn is_supported_image(mime_type: &str) -> bool {
    matches!(mime_type, "image/png" | "image/jpeg")
}

/// Entry prompt recorded for an uploaded file.
#[must_use]
pub fn upload_prompt(filename: &str) -> String {
    format!("Uploaded: {filename}")
}

/// Read a file into a data URL and hand the result to `callback`.
///
/// The read is asynchronous via `FileReader`; any failure (including a
/// non-string result) is reported as the generic read error.
#[cfg(feature = "hydrate")]
pub fn read_image_file(file: &web_sys::File, callback: impl Fn(Result<String, String>) + 'static) {
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Ok(reader) = web_sys::FileReader::new() else {
        callback(Err(UPLOAD_READ_ERROR.to_owned()));
        return;
    };

    let callback = Rc::new(callback);
    let reader_for_result = reader.clone();
    let callback_for_load = Rc::clone(&callback);

    // `loadend` fires after both success and error; a failed read leaves a
    // non-string result, which maps to the generic error below.
    let onloadend = Closure::<dyn FnMut(web_sys::ProgressEvent)>::new(move |_event| {
        let outcome = reader_for_result
            .result()
            .ok()
            .and_then(|value| value.as_string())
            .ok_or_else(|| UPLOAD_READ_ERROR.to_owned());
        callback_for_load(outcome);
    });
    reader.set_onloadend(Some(onloadend.as_ref().unchecked_ref()));
    // The closure must outlive this call; the browser owns it from here.
    onloadend.forget();

    if reader.read_as_data_url(file).is_err() {
        callback(Err(UPLOAD_READ_ERROR.to_owned()));
    }
}
