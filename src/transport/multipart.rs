use bytes::Bytes;
use reqwest::multipart::{Form, Part};

/// Builder for multipart/form-data requests
pub struct MultipartBuilder {
    form: Form,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { form: Form::new() }
    }

    /// Adds a file part, typed from its extension.
    pub fn add_file(mut self, field_name: &str, file_name: &str, data: Bytes) -> Self {
        let content_type = Self::content_type_for(file_name);
        let part = Part::bytes(data.to_vec()).file_name(file_name.to_string());
        let part = match part.mime_str(content_type.as_ref()) {
            Ok(typed) => typed,
            Err(_) => Part::bytes(data.to_vec()).file_name(file_name.to_string()),
        };

        self.form = self.form.part(field_name.to_string(), part);
        self
    }

    pub fn add_text(mut self, field_name: &str, value: &str) -> Self {
        self.form = self.form.text(field_name.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> Form {
        self.form
    }

    fn content_type_for(file_name: &str) -> mime::Mime {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("jsonl") => "application/jsonl"
                .parse()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM),
            Some("json") => mime::APPLICATION_JSON,
            Some("csv") => mime::TEXT_CSV,
            _ => mime::APPLICATION_OCTET_STREAM,
        }
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
